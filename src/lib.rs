//! Birthday greeting core crate.
//!
//! Confetti and balloon engines draw through the [`surface::Surface`] trait
//! and are driven one frame at a time; the [`sequence`] controller scripts the
//! gift / cake / card steps as pure state transitions. The `web` module binds
//! all of it to a browser page via `start_greeting()`.

use wasm_bindgen::prelude::*;

pub mod balloon;
pub mod config;
pub mod confetti;
pub mod error;
pub mod frame;
pub mod geom;
pub mod random;
pub mod sequence;
pub mod surface;
pub mod web;

pub use config::GreetingConfig;
pub use error::GreetingError;
pub use web::{ConfettiHandle, GreetingHandle};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    // Already installed when the module is started twice.
    console_log::init_with_level(level).ok();
    log::info!("birthday-confetti starting");
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Mount the greeting on the current page. `config_json` overrides any part
/// of [`GreetingConfig`]; omit it for the shipped defaults.
#[wasm_bindgen]
pub fn start_greeting(config_json: Option<String>) -> Result<GreetingHandle, JsValue> {
    let config = GreetingConfig::from_json(config_json.as_deref())?;
    Ok(web::mount(config)?)
}
