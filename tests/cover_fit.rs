use parallax_wasm::geometry::TexWindow;
use parallax_wasm::{cover_fit, LayerParams, LayerState, Size};

const CENTER: [f32; 2] = [0.5, 0.5];
const EPS: f32 = 1e-5;

fn viewports() -> Vec<Size> {
    let mut sizes = Vec::new();
    for width in [320.0, 768.0, 1280.0, 1920.0, 2560.0, 3440.0] {
        for height in [240.0, 568.0, 720.0, 1080.0, 1440.0, 2160.0] {
            sizes.push(Size::new(width, height));
        }
    }
    sizes
}

#[test]
fn constraining_axis_spans_the_whole_texture() {
    let image = Size::new(5160.0, 2871.0);
    for viewport in viewports() {
        let bare = cover_fit(image, viewport, 0.0, CENTER);
        let full_u = (bare.window.u0.abs() < EPS) && ((bare.window.u1 - 1.0).abs() < EPS);
        let full_v = (bare.window.v0.abs() < EPS) && ((bare.window.v1 - 1.0).abs() < EPS);
        assert!(full_u || full_v, "{viewport:?} -> {:?}", bare.window);

        // window aspect in texels matches the viewport (no stretching)
        let texel_aspect = bare.window.width() * image.width / (bare.window.height() * image.height);
        assert!((texel_aspect / viewport.aspect() - 1.0).abs() < 1e-4, "{viewport:?}");
    }
}

#[test]
fn margin_keeps_window_inside_unit_square() {
    let image = Size::new(1920.0, 1280.0);
    for extra in [0.01, 0.02, 0.08, 0.2, 0.49] {
        for viewport in viewports() {
            for anchor in [[0.0, 0.0], CENTER, [1.0, 1.0], [0.8, 0.2]] {
                let fit = cover_fit(image, viewport, extra, anchor);
                assert!(TexWindow::UNIT.contains(&fit.window), "{viewport:?} {extra} {anchor:?}");
                let (tx, ty) = fit.travel(extra);
                assert!(fit.window.u0 - tx >= -EPS && fit.window.u1 + tx <= 1.0 + EPS);
                assert!(fit.window.v0 - ty >= -EPS && fit.window.v1 + ty <= 1.0 + EPS);
            }
        }
    }
}

#[test]
fn full_hd_viewport_over_4k_image() {
    let mut layer = LayerState::new(
        Size::new(3840.0, 2160.0),
        LayerParams {
            extra_scale: 0.1,
            ..LayerParams::default()
        },
    );
    layer.scale(Size::new(1920.0, 1080.0));
    assert_eq!(layer.scale_factors(), (1.0, 1.0));
    let window = layer.base_window();
    for (got, want) in [(window.u0, 0.1), (window.u1, 0.9), (window.v0, 0.1), (window.v1, 0.9)] {
        assert!((got - want).abs() < EPS, "{window:?}");
    }
}

#[test]
fn offsets_never_leave_the_margin() {
    let mut layer = LayerState::new(Size::new(2400.0, 1600.0), LayerParams::default());
    layer.scale(Size::new(1366.0, 768.0));
    let base = layer.base_window();
    let mut pointer = [1.0f32, -1.0];
    for frame in 0..20_000 {
        if frame % 97 == 0 {
            pointer = [-pointer[1], pointer[0]];
        }
        let dt = if frame % 500 == 0 { 250.0 } else { 16.7 };
        layer.update(dt, pointer);
        let coords = layer.tex_coords();
        for uv in coords.chunks(2) {
            assert!((-EPS..=1.0 + EPS).contains(&uv[0]), "u={} frame {frame}", uv[0]);
            assert!((-EPS..=1.0 + EPS).contains(&uv[1]), "v={} frame {frame}", uv[1]);
        }
        let [dx, dy] = layer.offset();
        let [tx, ty] = layer.travel();
        assert!(dx.abs() <= tx + EPS && dy.abs() <= ty + EPS);
    }
    assert_eq!(layer.base_window(), base);
}

#[test]
fn still_pointer_keeps_offset_at_rest() {
    let mut layer = LayerState::new(Size::new(1000.0, 1000.0), LayerParams::default());
    layer.scale(Size::new(800.0, 800.0));
    let base = layer.tex_coords();
    for _ in 0..10_000 {
        layer.update(16.0, [0.0, 0.0]);
    }
    assert_eq!(layer.offset(), [0.0, 0.0]);
    assert_eq!(layer.tex_coords(), base);
}
