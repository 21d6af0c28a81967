//! GLSL ES 1.00 sources for the layer program; valid under WebGL1 and WebGL2.

pub const ATTR_BACKGROUND: &str = "AtexBk";
pub const ATTR_POSITION: &str = "AtexFg";
pub const UNIFORM_BACKGROUND: &str = "UtexBk";
pub const UNIFORM_FOREGROUND: &str = "UtexFg";
pub const UNIFORM_USE_FOREGROUND: &str = "UuseFg";

/// Positions double as foreground coordinates: clip-space `[-1, 1]` maps onto
/// the framebuffer texture's `[0, 1]`.
pub const LAYER_VERTEX: &str = r"
attribute vec2 AtexBk;
attribute vec2 AtexFg;
varying vec2 VtexBk;
varying vec2 VtexFg;

void main () {
    gl_Position = vec4(AtexFg, 0.0, 1.0);
    VtexBk = AtexBk;
    VtexFg = max(AtexFg, vec2(0.0));
}
";

/// Mirrors [`crate::blend::composite`].
pub const LAYER_FRAGMENT: &str = r"
precision mediump float;
uniform sampler2D UtexBk;
uniform sampler2D UtexFg;
uniform bool UuseFg;
varying vec2 VtexBk;
varying vec2 VtexFg;

vec4 accurate_mix (vec4 bk, vec4 fg) {
    float alpha = 1.0 - fg.a;
    vec3 color = sqrt(fg.rgb * fg.rgb + bk.rgb * bk.rgb * alpha);
    return vec4(color, fg.a + bk.a * alpha);
}

void main () {
    vec4 bk = texture2D(UtexBk, VtexBk);
    if (UuseFg)
        gl_FragColor = accurate_mix(bk, texture2D(UtexFg, VtexFg));
    else
        gl_FragColor = bk;
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_declare_every_bound_name() {
        for name in [ATTR_BACKGROUND, ATTR_POSITION] {
            assert!(LAYER_VERTEX.contains(&format!("attribute vec2 {name};")));
        }
        for name in [UNIFORM_BACKGROUND, UNIFORM_FOREGROUND] {
            assert!(LAYER_FRAGMENT.contains(&format!("uniform sampler2D {name};")));
        }
        assert!(LAYER_FRAGMENT.contains(&format!("uniform bool {UNIFORM_USE_FOREGROUND};")));
    }
}
