//! CPU reference of the layer compositing done by the fragment shader.

pub type Rgba = [f32; 4];

/// Gamma-2 "over": squares colours, blends, then takes the square root.
///
/// Bright translucent foregrounds stay bright instead of turning muddy as they
/// would with a plain linear mix. Inputs are straight alpha in `[0, 1]`.
pub fn accurate_mix(bk: Rgba, fg: Rgba) -> Rgba {
    let alpha = 1.0 - fg[3];
    let channel = |i: usize| (fg[i] * fg[i] + bk[i] * bk[i] * alpha).sqrt();
    [channel(0), channel(1), channel(2), fg[3] + bk[3] * alpha]
}

/// Output of one layer pass: the background alone, or mixed under a foreground.
pub fn composite(bk: Rgba, fg: Option<Rgba>) -> Rgba {
    match fg {
        Some(fg) => accurate_mix(bk, fg),
        None => bk,
    }
}
