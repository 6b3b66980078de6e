use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement};

use super::canvas::CanvasSurface;
use super::runner::SceneRunner;
use super::{body_size, document};
use crate::confetti::{Confetti, ConfettiOptions, StartOptions};
use crate::error::GreetingError;
use crate::geom::Size;

/// Bind a confetti engine to the `<canvas>` matched by `selector`.
/// Fails when nothing matches or the match is not a canvas.
pub fn attach(doc: &Document, selector: &str, options: &ConfettiOptions) -> Result<SceneRunner<Confetti>, GreetingError> {
    let element = doc
        .query_selector(selector)?
        .ok_or_else(|| GreetingError::MissingElement(selector.to_owned()))?;
    let canvas: HtmlCanvasElement = element
        .dyn_into()
        .map_err(|_| GreetingError::NotACanvas(selector.to_owned()))?;
    let rect = canvas.get_bounding_client_rect();
    let viewport = Size::new(rect.width(), rect.height());

    let surface = CanvasSurface::new(canvas)?;
    let mut rng = SmallRng::from_entropy();
    let confetti = Confetti::new(options, viewport, &mut rng);
    log::info!("confetti attached to {} ({} particles)", selector, confetti.slots().len());
    SceneRunner::new(confetti, surface, rng)
}

/// Match the canvas to the page body and restart the loop with the new size.
pub fn fit_to_body(runner: &SceneRunner<Confetti>, doc: &Document) {
    let size = body_size(doc);
    runner.resize(size);
    runner.stop(true);
    runner.with_scene(|confetti, _| {
        confetti.start(StartOptions { width: Some(size.width), height: Some(size.height), animate: Some(true) })
    });
    runner.start();
}

/// JS handle over a confetti canvas: `render`, `start`, `stop`.
#[wasm_bindgen]
pub struct ConfettiHandle {
    runner: SceneRunner<Confetti>,
}

#[wasm_bindgen]
impl ConfettiHandle {
    /// Attach to `selector` (default `#confetti-holder`) and start rendering.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: Option<String>, options_json: Option<String>) -> Result<ConfettiHandle, JsValue> {
        let selector = selector.unwrap_or_else(|| "#confetti-holder".to_owned());
        let options = parse_options(options_json.as_deref())?;
        let runner = attach(&document()?, &selector, &options)?;
        runner.start();
        Ok(ConfettiHandle { runner })
    }

    /// Rebuild the particle pool from new options.
    pub fn render(&self, options_json: Option<String>) -> Result<(), JsValue> {
        let options = parse_options(options_json.as_deref())?;
        let viewport = self.runner.bounds();
        self.runner.with_scene(|confetti, rng| confetti.configure(&options, viewport, rng));
        self.runner.start();
        Ok(())
    }

    pub fn start(&self, width: Option<f64>, height: Option<f64>, animate: Option<bool>) {
        self.runner.with_scene(|confetti, _| confetti.start(StartOptions { width, height, animate }));
        self.runner.start();
    }

    pub fn stop(&self, clear: Option<bool>) {
        self.runner.stop(clear.unwrap_or(false));
    }

    /// Whether a frame is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.runner.is_scheduled()
    }

    /// Resize the canvas to the page body and restart.
    pub fn fit(&self) -> Result<(), JsValue> {
        fit_to_body(&self.runner, &document()?);
        Ok(())
    }
}

fn parse_options(json: Option<&str>) -> Result<ConfettiOptions, GreetingError> {
    match json.map(str::trim) {
        None | Some("") => Ok(ConfettiOptions::default()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}
