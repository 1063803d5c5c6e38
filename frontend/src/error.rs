use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Element not found: {0}")]
    MissingElement(String),
}

impl From<JsValue> for FrontendError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        Self::Dom(text)
    }
}

/// The request never produced an HTTP reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}
