//! Error types shared by the core and the browser bindings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlueError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    /// A JavaScript exception or rejected promise, rendered as text
    #[error("javascript error: {0}")]
    Js(String),

    #[error("server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GlueError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GlueError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T, E = GlueError> = std::result::Result<T, E>;
