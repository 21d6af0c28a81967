use std::fmt;

use wasm_bindgen::JsValue;

pub type RenderResult<T> = Result<T, RenderError>;

/// Pipeline stage a GLSL source string was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no WebGL rendering context available (tried {tried})")]
    ContextUnavailable { tried: String },

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },

    #[error("linked program has no active attribute '{name}'")]
    MissingAttribute { name: &'static str },

    #[error("failed to allocate {what}")]
    Allocation { what: &'static str },

    #[error("image '{src}' failed to load")]
    ResourceLoad { src: String },

    #[error("gave up waiting for {pending} image(s) after {timeout_ms} ms")]
    ResourceTimeout { pending: usize, timeout_ms: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl RenderError {
    pub fn allocation(what: &'static str) -> Self {
        Self::Allocation { what }
    }

    /// Whether the page should carry on without the animated background.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenderError::ContextUnavailable { .. }
                | RenderError::ResourceLoad { .. }
                | RenderError::ResourceTimeout { .. }
        )
    }
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => RenderError::Js(message),
            None => RenderError::Js(format!("{value:?}")),
        }
    }
}

impl From<RenderError> for JsValue {
    fn from(err: RenderError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("layer {index}: {reason}")]
    Layer { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn layer(index: usize, reason: impl Into<String>) -> Self {
        Self::Layer {
            index,
            reason: reason.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_errors_name_the_stage() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".into(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader failed to compile: 0:3: syntax error"
        );
    }

    #[test]
    fn only_environment_failures_are_recoverable() {
        assert!(RenderError::ContextUnavailable {
            tried: "webgl2, webgl".into()
        }
        .is_recoverable());
        assert!(RenderError::ResourceLoad { src: "a.jpg".into() }.is_recoverable());
        assert!(!RenderError::ShaderLink { log: "x".into() }.is_recoverable());
        assert!(!RenderError::allocation("framebuffer").is_recoverable());
    }

    #[test]
    fn config_errors_convert_transparently() {
        let err: RenderError = ConfigError::layer(2, "speed must be positive").into();
        assert_eq!(err.to_string(), "layer 2: speed must be positive");
    }
}
