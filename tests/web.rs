#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

use parallax_wasm::config::Target;
use parallax_wasm::shader::{LAYER_FRAGMENT, LAYER_VERTEX};
use parallax_wasm::wasm::context::GlContext;
use parallax_wasm::wasm::framebuffers::FramebufferSet;
use parallax_wasm::wasm::program::build_program;
use parallax_wasm::wasm::render::Pipeline;
use parallax_wasm::{ParallaxConfig, RenderError, ShaderStage};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_has_layout_size() {
    let canvas = canvas(64, 32);
    let rect = canvas.get_bounding_client_rect();
    assert!(rect.width() > 0.0 && rect.height() > 0.0);
}

#[wasm_bindgen_test]
fn negotiates_some_context() {
    let gl = GlContext::negotiate(&canvas(16, 16)).unwrap();
    assert!(matches!(gl.version(), 1 | 2));
}

#[wasm_bindgen_test]
fn layer_program_links() {
    let gl = GlContext::negotiate(&canvas(16, 16)).unwrap();
    build_program(&gl, LAYER_VERTEX, LAYER_FRAGMENT).unwrap();
}

#[wasm_bindgen_test]
fn broken_fragment_shader_reports_stage() {
    let gl = GlContext::negotiate(&canvas(16, 16)).unwrap();
    let err = build_program(&gl, LAYER_VERTEX, "void main() { gl_FragColor = nope; }").unwrap_err();
    match err {
        RenderError::ShaderCompile { stage, log } => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[wasm_bindgen_test]
fn framebuffers_follow_resize() {
    let gl = GlContext::negotiate(&canvas(16, 16)).unwrap();
    let mut framebuffers = FramebufferSet::new(&gl).unwrap();
    framebuffers.resize(&gl, 320, 200).unwrap();
    assert_eq!(framebuffers.size(), (320, 200));

    framebuffers.resize(&gl, 0, 0).unwrap();
    assert_eq!(framebuffers.size(), (1, 1));

    assert!(framebuffers.framebuffer(Target::Screen).is_none());
    assert!(framebuffers.framebuffer(Target::Fb1).is_some());
    assert_eq!(framebuffers.unit(Target::Fb2), Some(1));
    framebuffers.clear_all(&gl);
}

#[wasm_bindgen_test]
fn pipeline_builds_before_any_image_loads() {
    let config = ParallaxConfig::from_json(
        r#"{ "layers": [
            { "src": "a-{bucket}.jpg", "output": "fb1" },
            { "src": "b-{bucket}.png", "foreground": "fb1" }
        ] }"#,
    )
    .unwrap();
    Pipeline::new(&canvas(32, 32), &config).unwrap();
}
