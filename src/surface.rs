//! Immediate-mode 2D drawing contract consumed by the engines.
//!
//! Mirrors the subset of `CanvasRenderingContext2d` the greeting needs. The
//! browser implementation lives in `web::canvas`; [`Recording`] captures calls
//! so engine output can be asserted natively.

use crate::geom::Size;

pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_fill_style(&mut self, css: &str);
    fn set_stroke_style(&mut self, css: &str);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool);
    /// Axis-aligned ellipse given radii.
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    /// Blit the image loaded from `src`; a not-yet-loaded image draws nothing.
    fn draw_image(&mut self, src: &str, x: f64, y: f64, w: f64, h: f64);

    fn clear(&mut self, size: Size) {
        self.clear_rect(0.0, 0.0, size.width, size.height);
    }
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    ClearRect(f64, f64, f64, f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64 },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64 },
    Fill,
    Stroke,
    FillRect(f64, f64, f64, f64),
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    DrawImage { src: String, x: f64, y: f64, w: f64, h: f64 },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct Recording {
    pub ops: Vec<Op>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for Recording {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::ClearRect(x, y, w, h));
    }
    fn set_fill_style(&mut self, css: &str) {
        self.ops.push(Op::FillStyle(css.to_owned()));
    }
    fn set_stroke_style(&mut self, css: &str) {
        self.ops.push(Op::StrokeStyle(css.to_owned()));
    }
    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::LineWidth(width));
    }
    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }
    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64, _anticlockwise: bool) {
        self.ops.push(Op::Arc { x, y, radius });
    }
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) {
        self.ops.push(Op::Ellipse { x, y, rx, ry });
    }
    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }
    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::FillRect(x, y, w, h));
    }
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(Op::Translate(x, y));
    }
    fn rotate(&mut self, angle: f64) {
        self.ops.push(Op::Rotate(angle));
    }
    fn draw_image(&mut self, src: &str, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::DrawImage { src: src.to_owned(), x, y, w, h });
    }
}
