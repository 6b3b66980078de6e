//! Browser shell: binds the engines and the step controller to the page.
//!
//! Everything here needs a real `window`; the pure logic it drives lives in
//! the parent modules and is tested natively.

mod balloons;
mod canvas;
mod confetti;
mod runner;
mod stage;

pub use canvas::CanvasSurface;
pub use confetti::ConfettiHandle;
pub use runner::{RafScheduler, SceneRunner};
pub use stage::Stage;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlMediaElement, Window};

use crate::balloon::BalloonField;
use crate::config::GreetingConfig;
use crate::confetti::Confetti;
use crate::error::GreetingError;
use crate::geom::Size;
use crate::sequence::{Effect, Input, StepController, Timer};

pub(crate) fn document() -> Result<Document, GreetingError> {
    web_sys::window()
        .ok_or(GreetingError::NoWindow)?
        .document()
        .ok_or(GreetingError::NoDocument)
}

pub(crate) fn query(doc: &Document, selector: &str) -> Result<Element, GreetingError> {
    doc.query_selector(selector)?
        .ok_or_else(|| GreetingError::MissingElement(selector.to_owned()))
}

pub(crate) fn body_size(doc: &Document) -> Size {
    doc.body()
        .map(|b| {
            let rect = b.get_bounding_client_rect();
            Size::new(rect.width(), rect.height())
        })
        .unwrap_or_default()
}

pub(crate) fn window_size(win: &Window) -> Size {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(dim(win.inner_width()), dim(win.inner_height()))
}

/// Start playback. Browsers refuse `play()` until the first user gesture;
/// the refusal is routed to `on_refused` instead of surfacing as an
/// unhandled promise rejection.
pub fn play_media(media: &HtmlMediaElement, on_refused: &Closure<dyn FnMut(JsValue)>) {
    match media.play() {
        Ok(promise) => {
            let _ = promise.catch(on_refused);
        }
        Err(err) => log::debug!("play() threw: {:?}", err),
    }
}

/// Rejection handler for [`play_media`] that logs at debug level.
pub fn log_refused_playback(what: &'static str) -> Closure<dyn FnMut(JsValue)> {
    Closure::wrap(Box::new(move |err: JsValue| {
        log::debug!("{} playback refused: {:?}", what, err);
    }) as Box<dyn FnMut(JsValue)>)
}

// --- Greeting app -----------------------------------------------------------

struct Greeting {
    config: GreetingConfig,
    window: Window,
    document: Document,
    stage: Stage,
    controller: StepController,
    confetti: Option<SceneRunner<Confetti>>,
    balloons: Option<SceneRunner<BalloonField>>,
}

type SharedGreeting = Rc<RefCell<Greeting>>;

/// Wire up the page and render the first step.
pub fn mount(config: GreetingConfig) -> Result<GreetingHandle, GreetingError> {
    let window = web_sys::window().ok_or(GreetingError::NoWindow)?;
    let document = window.document().ok_or(GreetingError::NoDocument)?;
    let stage = Stage::find(&document, &config)?;
    let compact = window_size(&window).width < config.compact_below;
    let controller = StepController::new(compact, config.timings.clone());

    let app: SharedGreeting = Rc::new(RefCell::new(Greeting {
        config,
        window,
        document,
        stage,
        controller,
        confetti: None,
        balloons: None,
    }));

    wire_listeners(&app)?;
    let effects = app.borrow_mut().controller.begin();
    run_effects(&app, effects);
    Ok(GreetingHandle { app })
}

fn listen(target: &web_sys::EventTarget, event: &str, app: &SharedGreeting, input: Input) -> Result<(), GreetingError> {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        dispatch(&app, input);
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_listeners(app: &SharedGreeting) -> Result<(), GreetingError> {
    let a = app.borrow();
    listen(&a.stage.gift_box, "click", app, Input::GiftBoxClicked)?;
    listen(&a.stage.operate, "click", app, Input::OperateClicked)?;
    listen(&a.stage.cake, "click", app, Input::CakeClicked)?;
    for arrow in &a.stage.arrows {
        listen(arrow, "click", app, Input::ArrowClicked)?;
    }

    // Cake image load
    {
        let app_load = app.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            app_load.borrow().stage.cake_loaded();
        }) as Box<dyn FnMut(_)>);
        a.stage.cake.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Resize keeps both engines on the same dimensions
    {
        let app_resize = app.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let g = app_resize.borrow();
            if let Some(confetti) = &g.confetti {
                confetti::fit_to_body(confetti, &g.document);
            }
            if let Some(balloons) = &g.balloons {
                let size = window_size(&g.window);
                balloons.resize(size);
                balloons.with_scene(|field, _| field.resize(size));
            }
        }) as Box<dyn FnMut(_)>);
        a.window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn dispatch(app: &SharedGreeting, input: Input) {
    let effects = app.borrow_mut().controller.handle(input);
    log::debug!("{:?} -> {} effects", input, effects.len());
    run_effects(app, effects);
}

fn run_effects(app: &SharedGreeting, effects: Vec<Effect>) {
    for effect in effects {
        if let Err(err) = apply(app, effect) {
            log::error!("greeting effect failed: {}", err);
        }
    }
}

fn apply(app: &SharedGreeting, effect: Effect) -> Result<(), GreetingError> {
    match effect {
        Effect::Schedule { delay_ms, timer } => schedule(app, delay_ms, timer),
        Effect::LaunchBalloons => {
            let mut g = app.borrow_mut();
            if g.balloons.is_none() {
                g.balloons = Some(balloons::launch(&g.document, &g.config.balloons)?);
            }
            Ok(())
        }
        Effect::LaunchConfetti => {
            let mut g = app.borrow_mut();
            if g.confetti.is_none() {
                let runner = confetti::attach(&g.document, &g.config.selectors.confetti_canvas, &g.config.confetti)?;
                g.confetti = Some(runner);
            }
            if let Some(runner) = &g.confetti {
                confetti::fit_to_body(runner, &g.document);
            }
            Ok(())
        }
        other => {
            app.borrow().stage.apply(&other);
            Ok(())
        }
    }
}

fn schedule(app: &SharedGreeting, delay_ms: u32, timer: Timer) -> Result<(), GreetingError> {
    let app_timer = app.clone();
    let callback = Closure::once_into_js(move || dispatch(&app_timer, Input::Timer(timer)));
    let window = app.borrow().window.clone();
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms as i32)?;
    Ok(())
}

/// Handle returned to JS by `start_greeting`.
#[wasm_bindgen]
pub struct GreetingHandle {
    app: SharedGreeting,
}

#[wasm_bindgen]
impl GreetingHandle {
    /// Current step index (0..=6).
    pub fn step(&self) -> usize {
        self.app.borrow().controller.step().index()
    }

    /// Stop both engines, clearing their canvases.
    pub fn stop(&self) {
        let g = self.app.borrow();
        if let Some(confetti) = &g.confetti {
            confetti.stop(true);
        }
        if let Some(balloons) = &g.balloons {
            balloons.stop(true);
        }
    }
}
