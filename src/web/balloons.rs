use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlAudioElement, HtmlCanvasElement};

use super::canvas::CanvasSurface;
use super::runner::SceneRunner;
use super::{log_refused_playback, play_media, window_size};
use crate::balloon::{BalloonField, BalloonOptions};
use crate::error::GreetingError;
use crate::geom::Point;

const CANVAS_STYLE: &str = "position:fixed; left:0; top:0; pointer-events:none; z-index:10;";

/// Full-window balloon canvas with hover popping and Enter for more balloons.
pub fn launch(doc: &Document, options: &BalloonOptions) -> Result<SceneRunner<BalloonField>, GreetingError> {
    let win = web_sys::window().ok_or(GreetingError::NoWindow)?;
    let body = doc.body().ok_or(GreetingError::NoDocument)?;
    let canvas: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| GreetingError::NotACanvas("canvas".into()))?;
    canvas.set_attribute("style", CANVAS_STYLE).ok();
    body.append_child(&canvas)?;

    let size = window_size(&win);
    let surface = CanvasSurface::new(canvas)?;
    surface.resize(size);

    let mut rng = SmallRng::from_entropy();
    let field = BalloonField::new(options.clone(), size, &mut rng);
    let runner = SceneRunner::new(field, surface, rng)?;

    // Pop sound per removed balloon
    let pop = HtmlAudioElement::new_with_src(&options.pop_sound)?;
    let pop_refused = log_refused_playback("pop");
    runner.set_after_frame(move |field: &mut BalloonField| {
        for _ in 0..field.take_pops() {
            pop.set_current_time(0.0);
            play_media(&pop, &pop_refused);
        }
    });

    {
        let runner_move = runner.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let p = Point::new(evt.client_x() as f64, evt.client_y() as f64);
            runner_move.with_scene(|field, _| field.set_pointer(Some(p)));
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Pointer leaving the page stops hover popping
    {
        let runner_leave = runner.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            if evt.related_target().is_none() {
                runner_leave.with_scene(|field, _| field.set_pointer(None));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("mouseout", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let runner_key = runner.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key().eq_ignore_ascii_case("enter") {
                runner_key.with_scene(|field, rng| field.append_batch(rng));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    runner.start();
    log::info!("balloons launched ({} live)", runner.with_scene(|field, _| field.len()));
    Ok(runner)
}
