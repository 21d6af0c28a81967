//! Parallax background renderer for the landing page.
//!
//! Everything outside `wasm` is plain math and state so it can be tested on
//! the host; the `wasm` module binds it to WebGL and the DOM.

pub mod assets;
pub mod blend;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layer;
pub mod motion;
pub mod shader;
pub mod startup;

pub use config::{LayerConfig, ParallaxConfig, Target};
pub use driver::{Animated, DriverState, RendererState};
pub use error::{ConfigError, RenderError, RenderResult, ShaderStage};
pub use geometry::{cover_fit, CoverFit, Size, TexWindow};
pub use layer::{LayerParams, LayerState};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::assets::AssetBucket;
    use crate::config::{ParallaxConfig, CONFIG_ELEMENT_ID};
    use crate::error::RenderError;

    pub mod context;
    pub mod framebuffers;
    pub mod layer;
    pub mod loader;
    pub mod logging;
    pub mod program;
    pub mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let config = read_config(&document);
        logging::init(&config.log_filter);

        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        // Context, framebuffers and programs need no images; build them now so
        // shader and allocation failures reach the caller.
        let pipeline = match render::Pipeline::new(&canvas, &config) {
            Ok(pipeline) => pipeline,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(%err, "animated background disabled");
                return Ok(());
            }
            Err(err) => {
                tracing::error!(%err, "failed to build render pipeline");
                return Err(err.into());
            }
        };

        let screen = window.screen()?;
        let bucket = AssetBucket::select(
            screen.width()? as f32,
            screen.height()? as f32,
            window.device_pixel_ratio() as f32,
        );
        tracing::info!(bucket = bucket.suffix(), "selected background assets");

        let sources = config
            .layers
            .iter()
            .map(|layer| bucket.resolve(&layer.src))
            .collect();

        loader::load(&window, &document, sources, config.image_timeout_ms, move |images| {
            if let Err(err) = render::start(canvas, pipeline, &config, images) {
                tracing::error!(%err, "failed to start renderer");
            }
        })?;
        Ok(())
    }

    /// Reads the JSON config block, falling back to defaults when it is absent
    /// or invalid.
    fn read_config(document: &web_sys::Document) -> ParallaxConfig {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content())
        else {
            return ParallaxConfig::default();
        };
        match ParallaxConfig::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                logging::init("info");
                tracing::warn!(err = %RenderError::from(err), "ignoring page configuration");
                ParallaxConfig::default()
            }
        }
    }
}
