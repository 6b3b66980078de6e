//! Gift → cake → candles → card choreography.
//!
//! The controller owns the current step explicitly and turns inputs (clicks,
//! fired timers) into [`Effect`]s. It never touches the page: the browser
//! shell applies the effects and feeds timers back in as [`Input::Timer`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Welcome = 0,
    GiftReady = 1,
    GiftOpening = 2,
    CakeServed = 3,
    WishPrompt = 4,
    CandlesOut = 5,
    CardOpen = 6,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::Welcome,
        Step::GiftReady,
        Step::GiftOpening,
        Step::CakeServed,
        Step::WishPrompt,
        Step::CandlesOut,
        Step::CardOpen,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    /// CSS class projecting this step onto the cake container.
    pub fn class_name(self) -> String {
        format!("step-{}", self.index())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Continue the automatic presentation with this step.
    Advance(Step),
    /// Move from blown-out candles to the open card.
    Reveal,
    /// Candles relight, arrows appear, confetti starts.
    Relight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    GiftBoxClicked,
    OperateClicked,
    CakeClicked,
    ArrowClicked,
    Timer(Timer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperateLabel {
    OpenGift,
    MakeWish,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Start the background music unless it is already playing.
    PlayMusic,
    ShowOperate(bool),
    OperateLabel(OperateLabel),
    ShowGiftBox(bool),
    ShowCakeWrapper(bool),
    TintCakeWrapper,
    /// Load the cake image; the wrapper is shown once it has loaded.
    ServeCake,
    LaunchBalloons,
    Blow(bool),
    ShowArrows,
    LaunchConfetti,
    FlipCard,
    StepClass(Step),
    Schedule { delay_ms: u32, timer: Timer },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTimings {
    /// Delay before auto-advancing away from steps 0..=3.
    pub advance_ms: [u32; 4],
    pub reveal_ms: u32,
    pub relight_ms: u32,
}

impl Default for StepTimings {
    fn default() -> Self {
        Self { advance_ms: [2000, 2000, 1000, 7000], reveal_ms: 1500, relight_ms: 1000 }
    }
}

pub struct StepController {
    step: Step,
    timings: StepTimings,
    busy: bool,        // a presentation run is in flight
    gift_armed: bool,  // gift box accepts its single click
    cake_armed: bool,  // cake accepts its single click
    relit: bool,       // candles relit and confetti launched
}

impl StepController {
    /// Compact viewports skip the welcome step.
    pub fn new(compact: bool, timings: StepTimings) -> Self {
        Self {
            step: if compact { Step::GiftReady } else { Step::Welcome },
            timings,
            busy: false,
            gift_armed: true,
            cake_armed: false,
            relit: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Effects that render the initial step.
    pub fn begin(&mut self) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.apply(self.step, &mut fx);
        fx
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        let mut fx = Vec::new();
        match input {
            Input::GiftBoxClicked => {
                if self.gift_armed && !self.busy {
                    self.gift_armed = false;
                    self.busy = true;
                    self.present_next(&mut fx);
                }
            }
            Input::OperateClicked => {
                if !self.busy {
                    self.busy = true;
                    if self.step == Step::WishPrompt {
                        self.blow_candles(&mut fx);
                    } else {
                        self.present_next(&mut fx);
                    }
                }
            }
            Input::CakeClicked => {
                if self.cake_armed {
                    self.blow_candles(&mut fx);
                }
            }
            Input::ArrowClicked => fx.push(Effect::FlipCard),
            // Timers outlive the step that scheduled them; a click can move on first.
            Input::Timer(Timer::Advance(step)) => {
                if self.busy && self.step.next() == Some(step) {
                    self.present(step, &mut fx);
                } else {
                    log::debug!("stale advance to {:?} dropped at {:?}", step, self.step);
                }
            }
            Input::Timer(Timer::Reveal) => {
                if self.step == Step::CandlesOut {
                    self.apply(Step::CardOpen, &mut fx);
                }
            }
            Input::Timer(Timer::Relight) => {
                if self.step == Step::CardOpen && !self.relit {
                    self.relit = true;
                    fx.push(Effect::Blow(false));
                    fx.push(Effect::ShowArrows);
                    fx.push(Effect::LaunchConfetti);
                }
            }
        }
        fx
    }

    fn present_next(&mut self, fx: &mut Vec<Effect>) {
        match self.step.next() {
            Some(next) => self.present(next, fx),
            None => log::debug!("no step after {:?}", self.step),
        }
    }

    /// Apply `step` and keep the automatic presentation going up to the wish prompt.
    fn present(&mut self, step: Step, fx: &mut Vec<Effect>) {
        self.apply(step, fx);
        if step <= Step::CakeServed {
            if let Some(next) = step.next() {
                let delay_ms = self.timings.advance_ms[step.index()];
                fx.push(Effect::Schedule { delay_ms, timer: Timer::Advance(next) });
            }
        }
    }

    fn blow_candles(&mut self, fx: &mut Vec<Effect>) {
        self.cake_armed = false;
        self.apply(Step::CandlesOut, fx);
        fx.push(Effect::Schedule { delay_ms: self.timings.reveal_ms, timer: Timer::Reveal });
    }

    fn apply(&mut self, step: Step, fx: &mut Vec<Effect>) {
        // Autoplay is refused until the first user gesture, so every step retries.
        fx.push(Effect::PlayMusic);
        match step {
            Step::Welcome | Step::GiftReady => {
                if step == Step::Welcome {
                    fx.push(Effect::ShowOperate(true));
                }
                fx.push(Effect::OperateLabel(OperateLabel::OpenGift));
                fx.push(Effect::ShowGiftBox(true));
                fx.push(Effect::ShowCakeWrapper(false));
            }
            Step::GiftOpening => {
                fx.push(Effect::ShowOperate(false));
                fx.push(Effect::LaunchBalloons);
            }
            Step::CakeServed => {
                fx.push(Effect::TintCakeWrapper);
                fx.push(Effect::ShowGiftBox(false));
                fx.push(Effect::ServeCake);
                self.cake_armed = true;
            }
            Step::WishPrompt => {
                self.busy = false;
                fx.push(Effect::ShowOperate(true));
                fx.push(Effect::OperateLabel(OperateLabel::MakeWish));
            }
            Step::CandlesOut => {
                fx.push(Effect::ShowOperate(false));
                fx.push(Effect::Blow(true));
            }
            Step::CardOpen => {
                fx.push(Effect::Schedule { delay_ms: self.timings.relight_ms, timer: Timer::Relight });
                fx.push(Effect::FlipCard);
            }
        }
        self.step = step;
        fx.push(Effect::StepClass(step));
    }
}
