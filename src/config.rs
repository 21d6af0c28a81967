//! Page-level configuration, read from a JSON `<script>` block.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::layer::LayerParams;
use crate::motion::Tracking;

/// Id of the `<script type="application/json">` element holding the config.
pub const CONFIG_ELEMENT_ID: &str = "parallax-config";

/// Texture units left for layer images once the framebuffer pair takes two
/// of the eight WebGL guarantees.
pub const MAX_LAYERS: usize = 6;

/// Where a layer pass draws, or which offscreen target it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    #[default]
    Screen,
    Fb1,
    Fb2,
}

impl Target {
    /// Index into the framebuffer pair; `None` for the visible canvas.
    pub fn offscreen_index(&self) -> Option<usize> {
        match self {
            Target::Screen => None,
            Target::Fb1 => Some(0),
            Target::Fb2 => Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    /// Image URL; `{bucket}` is replaced with the resolution bucket suffix.
    pub src: String,
    pub extra_scale: f32,
    pub speed: f32,
    pub anchor: [f32; 2],
    pub foreground: Option<Target>,
    pub output: Target,
    pub tracking: Tracking,
}

impl Default for LayerConfig {
    fn default() -> Self {
        let params = LayerParams::default();
        Self {
            src: "assets/bkgd/bkgd-{bucket}.jpg".into(),
            extra_scale: params.extra_scale,
            speed: params.speed,
            anchor: params.anchor,
            foreground: None,
            output: Target::Screen,
            tracking: params.tracking,
        }
    }
}

impl LayerConfig {
    pub fn params(&self) -> LayerParams {
        LayerParams {
            extra_scale: self.extra_scale,
            speed: self.speed,
            anchor: self.anchor,
            tracking: self.tracking,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    pub canvas_id: String,
    pub clear_color: [f32; 4],
    pub image_timeout_ms: u32,
    pub max_frame_delta_ms: f32,
    /// `EnvFilter` directives for the console logger.
    pub log_filter: String,
    /// Rendered in order; a layer may only sample framebuffers written earlier.
    pub layers: Vec<LayerConfig>,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            canvas_id: "screen".into(),
            clear_color: [0.0; 4],
            image_timeout_ms: 10_000,
            max_frame_delta_ms: 250.0,
            log_filter: "info".into(),
            layers: vec![LayerConfig::default()],
        }
    }
}

impl ParallaxConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ParallaxConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_id.trim().is_empty() {
            return Err(ConfigError::invalid("canvas_id must not be empty"));
        }
        if self.layers.is_empty() {
            return Err(ConfigError::invalid("at least one layer is required"));
        }
        if self.layers.len() > MAX_LAYERS {
            return Err(ConfigError::invalid(format!(
                "{} layers configured, at most {MAX_LAYERS} are supported",
                self.layers.len()
            )));
        }
        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::invalid("clear_color components must lie in [0, 1]"));
        }
        if self.image_timeout_ms == 0 {
            return Err(ConfigError::invalid("image_timeout_ms must be positive"));
        }
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0) {
            return Err(ConfigError::invalid("max_frame_delta_ms must be positive"));
        }

        let mut written = [false; 2];
        for (index, layer) in self.layers.iter().enumerate() {
            validate_layer(index, layer, &written)?;
            if let Some(slot) = layer.output.offscreen_index() {
                written[slot] = true;
            }
        }
        Ok(())
    }
}

fn validate_layer(index: usize, layer: &LayerConfig, written: &[bool; 2]) -> Result<(), ConfigError> {
    if layer.src.trim().is_empty() {
        return Err(ConfigError::layer(index, "src must not be empty"));
    }
    if !(layer.extra_scale > 0.0 && layer.extra_scale < 0.5) {
        return Err(ConfigError::layer(
            index,
            format!("extra_scale {} outside (0, 0.5)", layer.extra_scale),
        ));
    }
    if !(layer.speed.is_finite() && layer.speed > 0.0) {
        return Err(ConfigError::layer(index, "speed must be positive"));
    }
    if layer.anchor.iter().any(|a| !(0.0..=1.0).contains(a)) {
        return Err(ConfigError::layer(index, "anchor components must lie in [0, 1]"));
    }
    if let Tracking::Spring { stiffness, damping, .. } = layer.tracking {
        if !(stiffness.is_finite() && stiffness > 0.0) {
            return Err(ConfigError::layer(index, "spring stiffness must be positive"));
        }
        if damping.is_some_and(|c| !(c.is_finite() && c >= 0.0)) {
            return Err(ConfigError::layer(index, "spring damping must not be negative"));
        }
    }
    if let Some(foreground) = layer.foreground {
        let Some(slot) = foreground.offscreen_index() else {
            return Err(ConfigError::layer(index, "foreground must be fb1 or fb2"));
        };
        if foreground == layer.output {
            return Err(ConfigError::layer(
                index,
                "foreground and output are the same framebuffer",
            ));
        }
        if !written[slot] {
            return Err(ConfigError::layer(
                index,
                format!("samples {foreground:?} before any earlier layer renders into it"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ParallaxConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_a_three_layer_stack() {
        let config = ParallaxConfig::from_json(
            r#"{
                "layers": [
                    { "src": "fg.png", "extra_scale": 0.08, "output": "fb1" },
                    { "src": "mid.png", "extra_scale": 0.04, "foreground": "fb1", "output": "fb2" },
                    { "src": "bk-{bucket}.jpg", "foreground": "fb2",
                      "tracking": { "mode": "spring", "stiffness": 0.00005 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.layers[1].speed, 0.9);
        assert_eq!(config.layers[2].output, Target::Screen);
        assert_eq!(config.canvas_id, "screen");
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            ParallaxConfig::from_json(r#"{ "fps": 60 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_sampling_an_unwritten_framebuffer() {
        let err = ParallaxConfig::from_json(r#"{ "layers": [ { "src": "a.jpg", "foreground": "fb1" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Layer { index: 0, .. }), "{err}");
    }

    #[test]
    fn rejects_feedback_loops() {
        let err = ParallaxConfig::from_json(
            r#"{ "layers": [
                { "src": "a.jpg", "output": "fb1" },
                { "src": "b.jpg", "foreground": "fb1", "output": "fb1" }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Layer { index: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_out_of_range_margin() {
        for extra in ["0.0", "0.5", "-0.1"] {
            let json = format!(r#"{{ "layers": [ {{ "src": "a.jpg", "extra_scale": {extra} }} ] }}"#);
            assert!(ParallaxConfig::from_json(&json).is_err(), "extra_scale {extra}");
        }
    }

    #[test]
    fn rejects_too_many_layers() {
        let config = ParallaxConfig {
            layers: vec![LayerConfig::default(); MAX_LAYERS + 1],
            ..ParallaxConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
