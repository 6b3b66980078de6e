use std::f64::consts::PI;
use std::rc::Rc;

use super::options::{ShapeDescriptor, ShapeTemplate};
use crate::geom::{Point, Rgb, Rgba, Size};
use crate::random::RandomSource;
use crate::surface::Surface;

/// Distance outside the canvas edge where edge-spawned particles appear.
pub const EDGE_MARGIN: f64 = 10.0;
/// Square confetti is a 15x5 strip pivoting at its own center.
pub const SQUARE_WIDTH: f64 = 15.0;
pub const SQUARE_HEIGHT: f64 = 5.0;

const SMALL_RADIUS: f64 = 3.0;
const SMALL_ALPHA: f64 = 0.4;
const LARGE_ALPHA: f64 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Square,
    /// Offsets of the two outer vertices: (dx1, dy1, dx2, dy2).
    Triangle { angles: [f64; 4] },
    Line { length: f64, radius: f64 },
    Image { src: Rc<str>, edge: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub shape: Shape,
    pub position: Point,
    pub fall_speed: f64,
    pub size: f64,
    pub color: Rgba,
    pub rotation: f64,
    pub rotate: bool,
}

/// One pool entry. An `Empty` slot never comes back to life.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Live(Particle),
    Empty,
}

impl Slot {
    pub fn particle(&self) -> Option<&Particle> {
        match self {
            Slot::Live(p) => Some(p),
            Slot::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

impl Particle {
    /// Draw a particle from `desc`. `at` pins the position (respawn); otherwise
    /// placement follows the descriptor's `start_from_edge`.
    pub fn spawn<R: RandomSource + ?Sized>(
        desc: &ShapeDescriptor,
        color: Rgb,
        at: Option<Point>,
        bounds: Size,
        rng: &mut R,
    ) -> Self {
        // Every particle rolls all geometry; only the fields its shape needs survive.
        let length = rng.below_floor(65.0) - 30.0;
        let radius = rng.below(4.0) + 1.0;
        let angles = [
            rng.below_floor(10.0) + 2.0,
            rng.below_floor(10.0) + 2.0,
            rng.below_floor(10.0) + 2.0,
            rng.below_floor(10.0) + 2.0,
        ];
        let rotation = rng.below_floor(360.0) * PI / 180.0;

        let position = match at {
            Some(p) => p,
            None => {
                let x = rng.below(bounds.width);
                let y = if desc.start_from_edge {
                    if desc.clock >= 0.0 { -EDGE_MARGIN } else { bounds.height + EDGE_MARGIN }
                } else {
                    rng.below(bounds.height)
                };
                Point::new(x, y)
            }
        };
        let fall_speed = rng.below(desc.clock / 7.0) + desc.clock / 30.0;

        let shape = match &desc.template {
            ShapeTemplate::Circle => Shape::Circle { radius },
            ShapeTemplate::Square => Shape::Square,
            ShapeTemplate::Triangle => Shape::Triangle { angles },
            ShapeTemplate::Line => Shape::Line { length, radius },
            ShapeTemplate::Image { src, edge } => Shape::Image { src: src.clone(), edge: *edge },
        };
        let alpha = match shape {
            Shape::Square | Shape::Image { .. } => 1.0,
            _ if radius <= SMALL_RADIUS => SMALL_ALPHA,
            _ => LARGE_ALPHA,
        };

        Self {
            shape,
            position,
            fall_speed,
            size: desc.size,
            color: color.with_alpha(alpha),
            rotation,
            rotate: desc.rotate,
        }
    }

    /// Whether the particle has left the canvas through its exit edge.
    pub fn is_off_canvas(&self, bounds: Size) -> bool {
        (self.fall_speed >= 0.0 && self.position.y > bounds.height)
            || (self.fall_speed < 0.0 && self.position.y < 0.0)
    }

    /// Respawn y for a particle that left with the given speed.
    pub fn entry_y(fall_speed: f64, bounds: Size) -> f64 {
        if fall_speed >= 0.0 { -EDGE_MARGIN } else { bounds.height }
    }

    pub fn draw<S: Surface>(&self, ctx: &mut S) {
        let Point { x, y } = self.position;
        let s = self.size;
        let css = self.color.to_string();
        ctx.set_fill_style(&css);
        ctx.set_stroke_style(&css);
        ctx.begin_path();

        match &self.shape {
            Shape::Circle { radius } => {
                ctx.move_to(x, y);
                ctx.arc(x, y, radius * s, 0.0, PI * 2.0, true);
                ctx.fill();
            }
            Shape::Triangle { angles: [a, b, c, d] } => {
                ctx.move_to(x, y);
                ctx.line_to(x + a * s, y + b * s);
                ctx.line_to(x + c * s, y + d * s);
                ctx.close_path();
                ctx.fill();
            }
            Shape::Line { length, radius } => {
                ctx.move_to(x, y);
                ctx.line_to(x + length * s, y + radius * 5.0);
                ctx.set_line_width(2.0 * s);
                ctx.stroke();
            }
            Shape::Square => {
                ctx.save();
                ctx.translate(x + SQUARE_WIDTH, y + SQUARE_HEIGHT);
                ctx.rotate(self.rotation);
                ctx.fill_rect(-SQUARE_WIDTH * s, -SQUARE_HEIGHT * s, SQUARE_WIDTH * s, SQUARE_HEIGHT * s);
                ctx.restore();
            }
            Shape::Image { src, edge } => {
                let half = edge / 2.0;
                ctx.save();
                ctx.translate(x + half, y + half);
                if self.rotate {
                    ctx.rotate(self.rotation);
                }
                ctx.draw_image(src, -half * s, -half * s, edge * s, edge * s);
                ctx.restore();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Op, Recording};

    /// Replays a fixed value for every draw.
    struct Constant(f64);
    impl RandomSource for Constant {
        fn unit(&mut self) -> f64 {
            self.0
        }
    }

    fn desc(template: ShapeTemplate, clock: f64, start_from_edge: bool) -> ShapeDescriptor {
        ShapeDescriptor { template, size: 1.0, clock, rotate: false, start_from_edge }
    }

    const BOUNDS: Size = Size::new(200.0, 100.0);

    #[test]
    fn test_spawn_geometry_from_random_draws() {
        let p = Particle::spawn(&desc(ShapeTemplate::Line, 21.0, false), Rgb::new(1, 2, 3), None, BOUNDS, &mut Constant(0.5));
        assert_eq!(p.shape, Shape::Line { length: 2.0, radius: 3.0 });
        assert_eq!(p.position, Point::new(100.0, 50.0));
        assert!((p.fall_speed - (1.5 + 0.7)).abs() < 1e-9);
        assert!((p.rotation - PI).abs() < 1e-9);
        // radius 3 counts as small
        assert_eq!(p.color.alpha, 0.4);
    }

    #[test]
    fn test_large_radius_alpha_and_full_opacity_shapes() {
        let circle = Particle::spawn(&desc(ShapeTemplate::Circle, 25.0, false), Rgb::new(0, 0, 0), None, BOUNDS, &mut Constant(0.9));
        assert_eq!(circle.color.alpha, 0.8);
        let square = Particle::spawn(&desc(ShapeTemplate::Square, 25.0, false), Rgb::new(0, 0, 0), None, BOUNDS, &mut Constant(0.1));
        assert_eq!(square.color.alpha, 1.0);
    }

    #[test]
    fn test_edge_spawn_depends_on_clock_sign() {
        let falling = Particle::spawn(&desc(ShapeTemplate::Circle, 16.0, true), Rgb::new(0, 0, 0), None, BOUNDS, &mut Constant(0.3));
        assert_eq!(falling.position.y, -EDGE_MARGIN);
        let rising = Particle::spawn(&desc(ShapeTemplate::Circle, -16.0, true), Rgb::new(0, 0, 0), None, BOUNDS, &mut Constant(0.3));
        assert_eq!(rising.position.y, BOUNDS.height + EDGE_MARGIN);
        assert!(rising.fall_speed < 0.0);
    }

    #[test]
    fn test_off_canvas_uses_speed_sign() {
        let mut p = Particle::spawn(&desc(ShapeTemplate::Circle, 7.0, false), Rgb::new(0, 0, 0), None, BOUNDS, &mut Constant(0.0));
        p.position.y = 100.0;
        assert!(!p.is_off_canvas(BOUNDS));
        p.position.y = 100.5;
        assert!(p.is_off_canvas(BOUNDS));
        p.fall_speed = -1.0;
        assert!(!p.is_off_canvas(BOUNDS));
        p.position.y = -0.1;
        assert!(p.is_off_canvas(BOUNDS));
        assert_eq!(Particle::entry_y(-1.0, BOUNDS), 100.0);
        assert_eq!(Particle::entry_y(0.0, BOUNDS), -10.0);
    }

    #[test]
    fn test_square_draws_about_its_pivot() {
        let mut p = Particle::spawn(&desc(ShapeTemplate::Square, 7.0, false), Rgb::new(9, 9, 9), Some(Point::new(10.0, 20.0)), BOUNDS, &mut Constant(0.0));
        p.size = 2.0;
        let mut rec = Recording::new();
        p.draw(&mut rec);
        assert!(rec.ops.contains(&Op::FillStyle("rgba(9,9,9,1)".into())));
        assert!(rec.ops.contains(&Op::Translate(25.0, 25.0)));
        assert!(rec.ops.contains(&Op::FillRect(-30.0, -10.0, 30.0, 10.0)));
        assert_eq!(rec.count(|op| *op == Op::Save), rec.count(|op| *op == Op::Restore));
    }

    #[test]
    fn test_image_rotates_only_when_enabled() {
        let template = ShapeTemplate::Image { src: Rc::from("star.svg"), edge: 20.0 };
        let mut p = Particle::spawn(&desc(template, 7.0, false), Rgb::new(0, 0, 0), Some(Point::new(0.0, 0.0)), BOUNDS, &mut Constant(0.0));
        let mut rec = Recording::new();
        p.draw(&mut rec);
        assert_eq!(rec.count(|op| matches!(op, Op::Rotate(_))), 0);
        assert!(rec.ops.contains(&Op::DrawImage { src: "star.svg".into(), x: -10.0, y: -10.0, w: 20.0, h: 20.0 }));
        p.rotate = true;
        rec.take();
        p.draw(&mut rec);
        assert_eq!(rec.count(|op| matches!(op, Op::Rotate(_))), 1);
    }
}
