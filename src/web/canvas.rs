use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::error::GreetingError;
use crate::geom::Size;
use crate::surface::Surface;

/// [`Surface`] backed by a `<canvas>` 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>, // keyed by src, created on first use
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, GreetingError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(GreetingError::NoContext)?
            .dyn_into()
            .map_err(|_| GreetingError::NoContext)?;
        Ok(Self { canvas, ctx, images: HashMap::new() })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store (this also clears it).
    pub fn resize(&self, size: Size) {
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }

    fn image(&mut self, src: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(src) {
            let img = HtmlImageElement::new().ok()?;
            img.set_src(src);
            self.images.insert(src.to_owned(), img);
        }
        self.images.get(src)
    }
}

impl Surface for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }
    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(css));
    }
    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(css));
    }
    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn close_path(&mut self) {
        self.ctx.close_path();
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        self.ctx.arc_with_anticlockwise(x, y, radius, start, end, anticlockwise).ok();
    }
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) {
        self.ctx.ellipse(x, y, rx, ry, 0.0, 0.0, TAU).ok();
    }
    fn fill(&mut self) {
        self.ctx.fill();
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }
    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.ctx.translate(x, y).ok();
    }
    fn rotate(&mut self, angle: f64) {
        self.ctx.rotate(angle).ok();
    }
    fn draw_image(&mut self, src: &str, x: f64, y: f64, w: f64, h: f64) {
        let ctx = self.ctx.clone();
        if let Some(img) = self.image(src) {
            if img.complete() && img.natural_width() > 0 {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h).ok();
            }
        }
    }
}
