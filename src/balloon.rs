//! Floating balloons released when the gift box opens.
//!
//! Balloons start below the canvas, rise at their own speed and park just
//! under the top edge. Hovering one pops it; the field tops itself up with a
//! fresh batch whenever the live count drops below the floor.

use serde::{Deserialize, Serialize};

use crate::frame::{FrameStep, Scene};
use crate::geom::{Point, Rgb, Size};
use crate::random::RandomSource;
use crate::surface::Surface;

/// Gap kept between a parked balloon and the top edge.
const TOP_GAP: f64 = 5.0;
/// Knot sits this far below the bottom of the balloon body.
const KNOT_DROP: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonOptions {
    pub total: usize,            // batch size appended on startup / replenish / Enter
    pub floor: usize,            // live count that triggers a replenish
    pub radius: (f64, f64),      // body width range
    pub rise: (f64, f64),        // px per frame
    pub channel: (f64, f64),     // per RGB channel, pastel range
    pub tether: (f64, f64),      // string length
    pub depth: (f64, f64),       // max start distance below the canvas
    pub alpha: f64,              // body opacity
    pub pop_sound: String,
}

impl Default for BalloonOptions {
    fn default() -> Self {
        Self {
            total: 48,
            floor: 16,
            radius: (90.0, 150.0),
            rise: (4.0, 6.0),
            channel: (100.0, 255.0),
            tether: (150.0, 250.0),
            depth: (300.0, 700.0),
            alpha: 170.0 / 255.0,
            pop_sound: "assets/music/pop.mp3".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Balloon {
    pub radius: f64,
    pub position: Point,
    pub rise_speed: f64,
    pub color: Rgb,
    pub tether: f64,
}

impl Balloon {
    pub fn random<R: RandomSource + ?Sized>(opts: &BalloonOptions, bounds: Size, rng: &mut R) -> Self {
        let radius = rng.between(opts.radius.0, opts.radius.1);
        let x = rng.below(bounds.width);
        let depth = rng.between(opts.depth.0, opts.depth.1);
        let y = rng.between(bounds.height, bounds.height + depth);
        let rise_speed = rng.between(opts.rise.0, opts.rise.1);
        let mut channel = || rng.between(opts.channel.0, opts.channel.1).clamp(0.0, 255.0) as u8;
        let color = Rgb::new(channel(), channel(), channel());
        let tether = rng.between(opts.tether.0, opts.tether.1);
        Self { radius, position: Point::new(x, y), rise_speed, color, tether }
    }

    /// Highest point (smallest y) the balloon may reach.
    pub fn ceiling(&self) -> f64 {
        self.radius / 2.0 + TOP_GAP
    }

    pub fn rise(&mut self) {
        self.position.y -= self.rise_speed;
        if self.position.y < self.ceiling() {
            self.position.y = self.ceiling();
        }
    }

    /// Pointer strictly inside the square of side `radius` around the center.
    pub fn contains(&self, p: Point) -> bool {
        let half = self.radius / 2.0;
        (self.position.x + half > p.x && self.position.x - half < p.x)
            && (self.position.y + half > p.y && self.position.y - half < p.y)
    }

    pub fn draw<S: Surface>(&self, ctx: &mut S, alpha: f64) {
        let Point { x, y } = self.position;
        let knot_y = y + self.radius / 2.0 + KNOT_DROP;

        ctx.save();
        ctx.set_stroke_style("rgb(255,255,255)");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(x, knot_y);
        ctx.line_to(x, y + self.tether);
        ctx.stroke();
        ctx.restore();

        ctx.save();
        ctx.set_fill_style(&self.color.with_alpha(alpha).to_string());
        ctx.begin_path();
        ctx.ellipse(x, y, self.radius / 2.0, (self.radius + 10.0) / 2.0);
        ctx.fill();
        ctx.begin_path();
        ctx.ellipse(x, knot_y, 5.0, 3.5);
        ctx.fill();
        ctx.restore();
    }
}

pub struct BalloonField {
    options: BalloonOptions,
    bounds: Size,
    balloons: Vec<Balloon>,
    pointer: Option<Point>,
    pops: usize,
    running: bool,
}

impl BalloonField {
    pub fn new<R: RandomSource + ?Sized>(options: BalloonOptions, bounds: Size, rng: &mut R) -> Self {
        let mut field = Self { options, bounds, balloons: Vec::new(), pointer: None, pops: 0, running: true };
        field.append_batch(rng);
        field
    }

    pub fn append_batch<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let (opts, bounds) = (&self.options, self.bounds);
        self.balloons.extend((0..opts.total).map(|_| Balloon::random(opts, bounds, rng)));
        log::debug!("balloon batch appended, {} live", self.balloons.len());
    }

    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn len(&self) -> usize {
        self.balloons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balloons.is_empty()
    }

    pub fn options(&self) -> &BalloonOptions {
        &self.options
    }

    /// Pops since the last call; each one should play the pop sound.
    pub fn take_pops(&mut self) -> usize {
        std::mem::take(&mut self.pops)
    }

    pub fn resume(&mut self) {
        self.running = true;
    }
}

impl Scene for BalloonField {
    fn frame<S: Surface, R: RandomSource + ?Sized>(&mut self, surface: &mut S, rng: &mut R) -> FrameStep {
        surface.clear(self.bounds);
        let alpha = self.options.alpha;
        let pointer = self.pointer;
        let before = self.balloons.len();
        self.balloons.retain_mut(|balloon| {
            balloon.draw(surface, alpha);
            balloon.rise();
            !pointer.is_some_and(|p| balloon.contains(p))
        });
        self.pops += before - self.balloons.len();
        if self.balloons.len() < self.options.floor {
            self.append_batch(rng);
        }
        if self.running { FrameStep::Continue } else { FrameStep::Halt }
    }

    fn stop<S: Surface>(&mut self, clear: bool, surface: &mut S) {
        self.running = false;
        if clear {
            surface.clear(self.bounds);
        }
    }

    fn bounds(&self) -> Size {
        self.bounds
    }
}
