//! Confetti particle engine.
//!
//! A fixed pool of weighted-random particles falls (or rises) across the
//! canvas. Each frame clears the surface, then draws and advances every slot
//! in order. Particles that leave through their exit edge are either replaced
//! in place by a fresh draw at the opposite edge or retired for good; once
//! every slot is retired the engine stops itself.
//!
//! The engine never talks to the browser: it draws through [`Surface`] and
//! reports through [`FrameStep`] whether another frame should be requested.

mod options;
mod particle;
mod weighted;

pub use options::{
    ConfettiOptions, DEFAULT_PALETTE, PropDetail, PropSpec, ShapeDescriptor, ShapeKind, ShapeTemplate,
};
pub use particle::{EDGE_MARGIN, Particle, SQUARE_HEIGHT, SQUARE_WIDTH, Shape, Slot};
pub use weighted::WeightedTable;

use crate::frame::{FrameStep, Scene};
use crate::geom::{Point, Rgb, Size};
use crate::random::RandomSource;
use crate::surface::Surface;

/// Partial update applied by [`Confetti::start`]; `None` keeps the current value.
#[derive(Clone, Copy, Debug, Default)]
pub struct StartOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub animate: Option<bool>,
}

pub struct Confetti {
    bounds: Size,
    animate: bool,
    respawn: bool,
    spin_divisor: f64,
    shapes: WeightedTable<ShapeDescriptor>,
    palette: Vec<Rgb>,
    slots: Vec<Slot>,
}

impl Confetti {
    /// Build an engine and fill its pool. `viewport` is used for any
    /// dimension the options leave unset.
    pub fn new<R: RandomSource + ?Sized>(options: &ConfettiOptions, viewport: Size, rng: &mut R) -> Self {
        let mut engine = Self {
            bounds: viewport,
            animate: true,
            respawn: true,
            spin_divisor: options.spin_divisor,
            shapes: WeightedTable::new([]),
            palette: Vec::new(),
            slots: Vec::new(),
        };
        engine.configure(options, viewport, rng);
        engine
    }

    /// Re-read options and redraw the whole pool.
    pub fn configure<R: RandomSource + ?Sized>(&mut self, options: &ConfettiOptions, viewport: Size, rng: &mut R) {
        self.bounds = Size::new(
            options.width.unwrap_or(viewport.width),
            options.height.unwrap_or(viewport.height),
        );
        self.animate = options.animate;
        self.respawn = options.respawn;
        self.spin_divisor = if options.spin_divisor != 0.0 { options.spin_divisor } else { options::DEFAULT_SPIN_DIVISOR };
        self.palette = options.palette();
        self.shapes = options.shape_table();
        self.slots = (0..options.max).map(|_| self.draw_slot(None, rng)).collect();
        log::debug!(
            "confetti configured: {} particles, {} shapes, {}x{}",
            self.slots.len(),
            self.shapes.len(),
            self.bounds.width,
            self.bounds.height
        );
    }

    fn draw_slot<R: RandomSource + ?Sized>(&self, at: Option<Point>, rng: &mut R) -> Slot {
        match self.shapes.pick(rng) {
            Some(desc) => {
                let color = self.palette[rng.index(self.palette.len())];
                Slot::Live(Particle::spawn(desc, color, at, self.bounds, rng))
            }
            None => Slot::Empty,
        }
    }

    pub fn start(&mut self, opts: StartOptions) {
        if let Some(w) = opts.width {
            self.bounds.width = w;
        }
        if let Some(h) = opts.height {
            self.bounds.height = h;
        }
        if let Some(animate) = opts.animate {
            self.animate = animate;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animate
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    fn update_slot<R: RandomSource + ?Sized>(&mut self, index: usize, rng: &mut R) {
        let bounds = self.bounds;
        let Slot::Live(particle) = &mut self.slots[index] else {
            return;
        };
        if self.animate {
            particle.position.y += particle.fall_speed;
        }
        if particle.rotate {
            particle.rotation += particle.fall_speed / self.spin_divisor;
        }
        if !particle.is_off_canvas(bounds) {
            return;
        }
        let speed = particle.fall_speed;
        let next = if self.respawn {
            let at = Point::new(rng.below_floor(bounds.width), Particle::entry_y(speed, bounds));
            log::trace!("respawning confetti slot {}", index);
            self.draw_slot(Some(at), rng)
        } else {
            Slot::Empty
        };
        self.slots[index] = next;
    }
}

impl Scene for Confetti {
    fn frame<S: Surface, R: RandomSource + ?Sized>(&mut self, surface: &mut S, rng: &mut R) -> FrameStep {
        surface.clear(self.bounds);
        for index in 0..self.slots.len() {
            if let Slot::Live(particle) = &self.slots[index] {
                particle.draw(surface);
            }
            self.update_slot(index, rng);
        }
        if self.slots.iter().all(Slot::is_empty) {
            log::debug!("confetti pool exhausted, stopping");
            self.stop(true, surface);
        }
        if self.animate { FrameStep::Continue } else { FrameStep::Halt }
    }

    fn stop<S: Surface>(&mut self, clear: bool, surface: &mut S) {
        self.animate = false;
        if clear {
            surface.clear(self.bounds);
        }
    }

    fn bounds(&self) -> Size {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Op, Recording};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0xC0FFEE)
    }

    const VIEW: Size = Size::new(320.0, 240.0);

    #[test]
    fn test_pool_size_is_invariant() {
        let mut rng = rng();
        let opts = ConfettiOptions { max: 37, clock: 60.0, ..ConfettiOptions::default() };
        let mut confetti = Confetti::new(&opts, VIEW, &mut rng);
        let mut surface = Recording::new();
        for _ in 0..500 {
            assert_eq!(confetti.frame(&mut surface, &mut rng), FrameStep::Continue);
            assert_eq!(confetti.slots().len(), 37);
            surface.take();
        }
        assert_eq!(confetti.live_count(), 37);
    }

    #[test]
    fn test_width_height_override_viewport() {
        let opts = ConfettiOptions { width: Some(10.0), height: Some(20.0), ..ConfettiOptions::default() };
        let confetti = Confetti::new(&opts, VIEW, &mut rng());
        assert_eq!(confetti.bounds(), Size::new(10.0, 20.0));
    }

    #[test]
    fn test_falling_particle_respawns_above_top() {
        let mut rng = rng();
        let opts = ConfettiOptions { max: 1, clock: 30.0, ..ConfettiOptions::default() };
        let mut confetti = Confetti::new(&opts, VIEW, &mut rng);
        if let Slot::Live(p) = &mut confetti.slots[0] {
            p.position.y = VIEW.height + 0.5;
        }
        confetti.frame(&mut Recording::new(), &mut rng);
        let p = confetti.slots()[0].particle().expect("respawned");
        assert_eq!(p.position.y, -EDGE_MARGIN);
        assert!(p.position.x >= 0.0 && p.position.x < VIEW.width);
        assert_eq!(p.position.x, p.position.x.floor());
    }

    #[test]
    fn test_rising_particle_respawns_at_bottom() {
        let mut rng = rng();
        let opts = ConfettiOptions { max: 1, clock: -30.0, ..ConfettiOptions::default() };
        let mut confetti = Confetti::new(&opts, VIEW, &mut rng);
        if let Slot::Live(p) = &mut confetti.slots[0] {
            p.position.y = -0.5;
        }
        confetti.frame(&mut Recording::new(), &mut rng);
        let p = confetti.slots()[0].particle().expect("respawned");
        assert_eq!(p.position.y, VIEW.height);
        assert!(p.fall_speed < 0.0);
    }

    #[test]
    fn test_single_particle_without_respawn_halts() {
        let json = r#"{"max":1, "props":["circle"], "colors":[[255,0,0]], "respawn":false, "clock":7}"#;
        let opts: ConfettiOptions = serde_json::from_str(json).unwrap();
        let mut rng = rng();
        let mut confetti = Confetti::new(&opts, VIEW, &mut rng);
        let p = confetti.slots()[0].particle().unwrap();
        assert!(matches!(p.shape, Shape::Circle { .. }));
        assert_eq!(p.color.rgb, Rgb::new(255, 0, 0));

        let mut surface = Recording::new();
        let mut frames = 0;
        loop {
            frames += 1;
            assert!(frames < 10_000, "particle never left the canvas");
            let step = confetti.frame(&mut surface, &mut rng);
            if confetti.slots()[0].is_empty() {
                assert_eq!(step, FrameStep::Halt);
                break;
            }
            assert_eq!(step, FrameStep::Continue);
            surface.take();
        }
        assert!(!confetti.is_animating());
        // the frame ends with the stop clear
        assert_eq!(surface.ops.last(), Some(&Op::ClearRect(0.0, 0.0, VIEW.width, VIEW.height)));
        // an empty pool stays empty
        assert_eq!(confetti.frame(&mut surface, &mut rng), FrameStep::Halt);
        assert_eq!(confetti.slots().len(), 1);
        assert!(confetti.slots()[0].is_empty());
    }

    #[test]
    fn test_paused_engine_draws_without_moving() {
        let mut rng = rng();
        let opts = ConfettiOptions { max: 5, animate: false, ..ConfettiOptions::default() };
        let mut confetti = Confetti::new(&opts, VIEW, &mut rng);
        let before: Vec<Slot> = confetti.slots().to_vec();
        let mut surface = Recording::new();
        assert_eq!(confetti.frame(&mut surface, &mut rng), FrameStep::Halt);
        assert_eq!(confetti.slots(), before.as_slice());
        assert_eq!(surface.count(|op| *op == Op::BeginPath), 5);

        confetti.start(StartOptions { animate: Some(true), ..StartOptions::default() });
        assert_eq!(confetti.frame(&mut surface, &mut rng), FrameStep::Continue);
    }

    #[test]
    fn test_rotation_advances_by_speed_over_divisor() {
        let mut rng = rng();
        let opts = ConfettiOptions {
            max: 1,
            rotate: true,
            props: vec![PropSpec::Kind(ShapeKind::Square)],
            ..ConfettiOptions::default()
        };
        let mut confetti = Confetti::new(&opts, Size::new(100.0, 1.0e9), &mut rng);
        let before = confetti.slots()[0].particle().unwrap().clone();
        confetti.frame(&mut Recording::new(), &mut rng);
        let after = confetti.slots()[0].particle().unwrap();
        let expected = before.rotation + before.fall_speed / 35.0;
        assert!((after.rotation - expected).abs() < 1e-9);
        assert!((after.position.y - (before.position.y + before.fall_speed)).abs() < 1e-9);
    }

    #[test]
    fn test_start_updates_bounds_and_stop_clears() {
        let mut rng = rng();
        let mut confetti = Confetti::new(&ConfettiOptions::default(), VIEW, &mut rng);
        confetti.start(StartOptions { width: Some(800.0), height: Some(600.0), animate: Some(true) });
        assert_eq!(confetti.bounds(), Size::new(800.0, 600.0));
        let mut surface = Recording::new();
        confetti.stop(true, &mut surface);
        confetti.stop(false, &mut surface);
        assert!(!confetti.is_animating());
        assert_eq!(surface.ops, vec![Op::ClearRect(0.0, 0.0, 800.0, 600.0)]);
    }

    #[test]
    fn test_frame_clears_then_draws_in_slot_order() {
        let mut rng = rng();
        let opts = ConfettiOptions {
            max: 3,
            props: vec![PropSpec::Kind(ShapeKind::Circle)],
            ..ConfettiOptions::default()
        };
        let mut confetti = Confetti::new(&opts, Size::new(100.0, 1.0e9), &mut rng);
        let xs: Vec<f64> = confetti.slots().iter().map(|s| s.particle().unwrap().position.x).collect();
        let mut surface = Recording::new();
        confetti.frame(&mut surface, &mut rng);
        assert!(matches!(surface.ops[0], Op::ClearRect(..)));
        let arcs: Vec<f64> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Arc { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(arcs, xs);
    }
}
