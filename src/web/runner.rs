//! `requestAnimationFrame` loop driving one [`Scene`].
//!
//! Each runner owns its scene, surface, RNG and pending frame id; nothing is
//! shared between runners. The frame callback only holds a `Weak` to the
//! runner state, so dropping every `SceneRunner` handle ends the loop.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::canvas::CanvasSurface;
use crate::error::GreetingError;
use crate::frame::{FrameLoop, FrameScheduler, FrameStep, Scene};
use crate::geom::Size;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type AfterFrame<S> = Box<dyn FnMut(&mut S)>;

pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn request(&mut self) -> Result<i32, GreetingError> {
        let cb = self.callback.borrow();
        let cb = cb.as_ref().ok_or_else(|| GreetingError::Js("frame callback not installed".into()))?;
        Ok(self.window.request_animation_frame(cb.as_ref().unchecked_ref())?)
    }

    fn cancel(&mut self, handle: i32) -> Result<(), GreetingError> {
        self.window.cancel_animation_frame(handle)?;
        Ok(())
    }
}

struct RunnerState<S> {
    scene: S,
    surface: CanvasSurface,
    rng: SmallRng,
    frames: FrameLoop<RafScheduler>,
    after_frame: Option<AfterFrame<S>>,
}

impl<S: Scene> RunnerState<S> {
    fn tick(&mut self) {
        self.frames.fired();
        let step = self.scene.frame(&mut self.surface, &mut self.rng);
        if let Some(hook) = self.after_frame.as_mut() {
            hook(&mut self.scene);
        }
        if step == FrameStep::Continue {
            if let Err(err) = self.frames.request() {
                log::error!("failed to request animation frame: {}", err);
            }
        }
    }
}

pub struct SceneRunner<S: Scene + 'static> {
    state: Rc<RefCell<RunnerState<S>>>,
}

impl<S: Scene + 'static> Clone for SceneRunner<S> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone() }
    }
}

impl<S: Scene + 'static> SceneRunner<S> {
    pub fn new(scene: S, surface: CanvasSurface, rng: SmallRng) -> Result<Self, GreetingError> {
        let window = web_sys::window().ok_or(GreetingError::NoWindow)?;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let state = Rc::new(RefCell::new(RunnerState {
            scene,
            surface,
            rng,
            frames: FrameLoop::new(RafScheduler { window, callback: callback.clone() }),
            after_frame: None,
        }));
        let weak: Weak<RefCell<RunnerState<S>>> = Rc::downgrade(&state);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().tick();
            }
        }) as Box<dyn FnMut(f64)>));
        Ok(Self { state })
    }

    /// Request the next frame; a request already pending is replaced.
    pub fn start(&self) {
        if let Err(err) = self.state.borrow_mut().frames.request() {
            log::error!("failed to request animation frame: {}", err);
        }
    }

    /// Cancel the pending frame and stop the scene. Idempotent.
    pub fn stop(&self, clear: bool) {
        let mut guard = self.state.borrow_mut();
        let st = &mut *guard;
        st.frames.cancel();
        st.scene.stop(clear, &mut st.surface);
    }

    pub fn is_scheduled(&self) -> bool {
        self.state.borrow().frames.is_pending()
    }

    pub fn resize(&self, size: Size) {
        self.state.borrow().surface.resize(size);
    }

    pub fn bounds(&self) -> Size {
        self.state.borrow().scene.bounds()
    }

    pub fn with_scene<T>(&self, f: impl FnOnce(&mut S, &mut SmallRng) -> T) -> T {
        let mut guard = self.state.borrow_mut();
        let st = &mut *guard;
        f(&mut st.scene, &mut st.rng)
    }

    /// Hook run after every frame, e.g. to turn scene events into sounds.
    pub fn set_after_frame(&self, hook: impl FnMut(&mut S) + 'static) {
        self.state.borrow_mut().after_frame = Some(Box::new(hook));
    }
}
