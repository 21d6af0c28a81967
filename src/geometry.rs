//! Cover-fit texture windows for the full-screen quad.
//!
//! Texture space is the unit square; `u` runs left to right and `v` runs from
//! the first uploaded image row (top of the picture) downwards.

/// Clip-space positions of the quad, drawn as a triangle strip.
///
/// Vertex order is bottom-right, top-right, bottom-left, top-left and must
/// match [`TexWindow::strip`].
pub const QUAD_POSITIONS: [f32; 8] = [1.0, -1.0, 1.0, 1.0, -1.0, -1.0, -1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Axis-aligned region of texture space, `u0 <= u1` and `v0 <= v1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexWindow {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl TexWindow {
    pub const UNIT: TexWindow = TexWindow {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    pub fn width(&self) -> f32 {
        self.u1 - self.u0
    }

    pub fn height(&self) -> f32 {
        self.v1 - self.v0
    }

    pub fn contains(&self, other: &TexWindow) -> bool {
        other.u0 >= self.u0 && other.u1 <= self.u1 && other.v0 >= self.v0 && other.v1 <= self.v1
    }

    /// Per-vertex texture coordinates for [`QUAD_POSITIONS`], shifted by `(du, dv)`.
    ///
    /// Clip-space bottom samples `v1` because image rows are uploaded top first.
    pub fn strip(&self, du: f32, dv: f32) -> [f32; 8] {
        let (l, r) = (self.u0 + du, self.u1 + du);
        let (b, t) = (self.v0 + dv, self.v1 + dv);
        [r, t, r, b, l, t, l, b]
    }
}

/// Result of fitting an image over a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Fraction of the texture's width visible before the parallax margin is removed.
    pub scale_x: f32,
    /// Fraction of the texture's height visible before the parallax margin is removed.
    pub scale_y: f32,
    /// Visible window after the margin is reserved on every side.
    pub window: TexWindow,
}

impl CoverFit {
    /// Distance each axis may travel from the base window without leaving the texture.
    pub fn travel(&self, extra_scale: f32) -> (f32, f32) {
        (extra_scale * self.scale_x, extra_scale * self.scale_y)
    }
}

/// Fits `image` over `viewport` without letterboxing and reserves `extra_scale`
/// of the visible span on each side for parallax travel.
///
/// The constraining axis spans the whole texture before the margin is taken,
/// the other axis is cropped around `anchor` (0.5 centres it). An empty
/// viewport or image is treated as a perfect aspect match.
pub fn cover_fit(image: Size, viewport: Size, extra_scale: f32, anchor: [f32; 2]) -> CoverFit {
    let (scale_x, scale_y) = if image.is_empty() || viewport.is_empty() {
        (1.0, 1.0)
    } else {
        let image_aspect = image.aspect();
        let view_aspect = viewport.aspect();
        if view_aspect >= image_aspect {
            // Viewport is wider than the picture: fill the width, crop rows.
            (1.0, (image_aspect / view_aspect).min(1.0))
        } else {
            // Viewport is taller: fill the height, crop columns.
            ((view_aspect / image_aspect).min(1.0), 1.0)
        }
    };

    let shrink = 1.0 - 2.0 * extra_scale;
    let (u0, u1) = axis_window(scale_x, shrink, anchor[0]);
    let (v0, v1) = axis_window(scale_y, shrink, anchor[1]);

    CoverFit {
        scale_x,
        scale_y,
        window: TexWindow { u0, v0, u1, v1 },
    }
}

fn axis_window(span: f32, shrink: f32, anchor: f32) -> (f32, f32) {
    let half = span * 0.5;
    let center = half + anchor.clamp(0.0, 1.0) * (1.0 - span);
    let visible = half * shrink;
    ((center - visible).max(0.0), (center + visible).min(1.0))
}
