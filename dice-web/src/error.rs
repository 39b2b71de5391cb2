//! Error types for the web renderer

use wasm_bindgen::JsValue;

/// Errors raised while setting up or drawing with WebGL
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// A shader stage failed to compile; carries the driver's info log
    #[error("Shader compilation error ({stage}): {log}")]
    ShaderCompile { stage: &'static str, log: String },

    /// The program failed to link
    #[error("Program link error: {0}")]
    ProgramLink(String),

    /// A GPU object could not be created
    #[error("Failed to create {0}")]
    Allocation(&'static str),

    /// An attribute the program needs was not found
    #[error("Missing attribute: {0}")]
    MissingAttribute(&'static str),

    /// A cube was drawn that has no uploaded buffers
    #[error("No buffers uploaded for cube {0}")]
    UnknownCube(usize),

    /// Window, document or canvas lookup failed
    #[error("DOM error: {0}")]
    Dom(String),
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result type for web renderer operations
pub type Result<T> = std::result::Result<T, WebError>;
