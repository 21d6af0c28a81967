use parallax_wasm::blend::{accurate_mix, composite};
use parallax_wasm::{DriverState, LayerParams, LayerState, RendererState, Size};

fn layers() -> Vec<LayerState> {
    let mut layers = vec![
        LayerState::new(
            Size::new(2000.0, 1200.0),
            LayerParams {
                extra_scale: 0.08,
                ..LayerParams::default()
            },
        ),
        LayerState::new(Size::new(3000.0, 2000.0), LayerParams::default()),
    ];
    for layer in &mut layers {
        layer.scale(Size::new(1280.0, 800.0));
    }
    layers
}

#[test]
fn hiding_the_tab_rewinds_layers_and_resume_starts_fresh() {
    let mut layers = layers();
    let base: Vec<_> = layers.iter().map(LayerState::tex_coords).collect();
    let mut driver = RendererState::new(0.0, 250.0);

    let mut now = 0.0;
    for _ in 0..120 {
        now += 16.0;
        driver.pointer_mut().record([1.0, 1.0]);
        driver.frame(now, &mut layers);
    }
    assert!(layers[0].offset()[0] > 0.0);

    assert!(driver.suspend(&mut layers));
    assert_eq!(driver.state(), DriverState::Suspended);
    for (layer, base) in layers.iter().zip(&base) {
        assert_eq!(layer.offset(), [0.0, 0.0]);
        assert_eq!(&layer.tex_coords(), base);
    }
    assert_eq!(driver.pointer().position(), [0.0, 0.0]);

    // hidden for five minutes
    assert!(driver.resume(now + 300_000.0));
    let dt = driver.frame(now + 300_016.0, &mut layers);
    assert_eq!(dt, Some(16.0));
    for layer in &layers {
        assert_eq!(layer.offset(), [0.0, 0.0]);
    }
}

#[test]
fn empty_foreground_leaves_background_exact() {
    let bk = [0.2, 0.4, 0.6, 1.0];
    assert_eq!(accurate_mix(bk, [0.0, 0.0, 0.0, 0.0]), bk);
    assert_eq!(composite(bk, None), bk);
}

#[test]
fn opaque_foreground_over_transparent_background_is_foreground() {
    let fg = [0.75, 0.5, 0.25, 1.0];
    assert_eq!(accurate_mix([0.0, 0.0, 0.0, 0.0], fg), fg);
}
