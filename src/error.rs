use thiserror::Error;

/// Failures surfaced while binding an animation to its host.
///
/// Rendering itself never fails; everything here happens before the first
/// frame or while talking to the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("2d drawing context unavailable")]
    ContextUnavailable,

    #[error("host element missing: {0}")]
    MissingElement(String),

    #[error("animation frame request rejected: {0}")]
    FrameRequest(String),

    #[error("resize observation failed: {0}")]
    ResizeObservation(String),

    #[error("invalid mesh topology: {0}")]
    InvalidTopology(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(target_arch = "wasm32")]
impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
