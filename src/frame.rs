//! Per-instance bookkeeping for a pending animation-frame request.
//!
//! The browser hands out an integer id for every `requestAnimationFrame`; the
//! loop owner has to remember it to be able to cancel. `FrameLoop` keeps at
//! most one outstanding request so a scene never runs two loops at once.

use crate::error::GreetingError;
use crate::geom::Size;
use crate::random::RandomSource;
use crate::surface::Surface;

/// What a scene wants after finishing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    Continue,
    Halt,
}

/// Anything that can be driven one frame at a time by a frame loop.
pub trait Scene {
    fn frame<S: Surface, R: RandomSource + ?Sized>(&mut self, surface: &mut S, rng: &mut R) -> FrameStep;

    /// Stop animating; `clear` wipes the surface.
    fn stop<S: Surface>(&mut self, clear: bool, surface: &mut S);

    fn bounds(&self) -> Size;
}

/// Source of animation frames (request / cancel semantics).
pub trait FrameScheduler {
    type Handle: Copy + std::fmt::Debug;

    fn request(&mut self) -> Result<Self::Handle, GreetingError>;
    fn cancel(&mut self, handle: Self::Handle) -> Result<(), GreetingError>;
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, pending: None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Request the next frame, replacing any request still outstanding.
    pub fn request(&mut self) -> Result<(), GreetingError> {
        self.cancel();
        self.pending = Some(self.scheduler.request()?);
        Ok(())
    }

    /// Revoke the outstanding request. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(err) = self.scheduler.cancel(handle) {
                log::debug!("ignoring failed frame cancel {:?}: {}", handle, err);
            }
        }
    }

    /// The outstanding request has been delivered.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
