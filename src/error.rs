use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GreetingError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("element `{0}` not found")]
    MissingElement(String),
    #[error("element `{0}` is not a <canvas>")]
    NotACanvas(String),
    #[error("element `{0}` is not an HTML element")]
    NotAnHtmlElement(String),
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for GreetingError {
    fn from(value: JsValue) -> Self {
        GreetingError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<GreetingError> for JsValue {
    fn from(err: GreetingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
