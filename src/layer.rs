//! Parallax state of one layer, independent of any rendering context.

use crate::driver::Animated;
use crate::geometry::{cover_fit, CoverFit, Size, TexWindow};
use crate::motion::{linear_gain, Spring, Tracking};

/// Base pan speed per millisecond, scaled by a layer's speed and margin.
pub const BASE_VELOCITY: f32 = 0.0005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerParams {
    /// Fraction of the visible span kept off-screen on each side for travel.
    pub extra_scale: f32,
    /// Parallax intensity.
    pub speed: f32,
    pub anchor: [f32; 2],
    pub tracking: Tracking,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            extra_scale: 0.02,
            speed: 0.9,
            anchor: [0.5, 0.5],
            tracking: Tracking::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Follow {
    Linear { offset: [f32; 2] },
    Spring { axes: [Spring; 2], settle: bool },
}

#[derive(Debug, Clone)]
pub struct LayerState {
    image: Size,
    params: LayerParams,
    velocity: [f32; 2],
    fit: Option<CoverFit>,
    follow: Follow,
}

impl LayerState {
    pub fn new(image: Size, params: LayerParams) -> Self {
        let vx = BASE_VELOCITY * params.speed * params.extra_scale;
        let vy = if image.is_empty() {
            vx
        } else {
            vx * image.height / image.width
        };
        let follow = match params.tracking {
            Tracking::Linear => Follow::Linear { offset: [0.0; 2] },
            Tracking::Spring {
                stiffness,
                damping,
                settle,
            } => Follow::Spring {
                axes: [Spring::new(0.0, stiffness, damping); 2],
                settle,
            },
        };
        Self {
            image,
            params,
            velocity: [vx, vy],
            fit: None,
            follow,
        }
    }

    pub fn params(&self) -> &LayerParams {
        &self.params
    }

    pub fn image_size(&self) -> Size {
        self.image
    }

    /// Per-axis velocity multipliers derived from speed, margin and image aspect.
    pub fn velocity_multiplier(&self) -> [f32; 2] {
        self.velocity
    }

    /// Cover-fit scale factors, `(1, 1)` until the first [`scale`](Self::scale).
    pub fn scale_factors(&self) -> (f32, f32) {
        self.fit.map_or((1.0, 1.0), |fit| (fit.scale_x, fit.scale_y))
    }

    /// Window sampled with no parallax offset applied.
    pub fn base_window(&self) -> TexWindow {
        self.fit.map(|fit| fit.window).unwrap_or_default()
    }

    pub fn travel(&self) -> [f32; 2] {
        match self.fit {
            Some(fit) => {
                let (tx, ty) = fit.travel(self.params.extra_scale);
                [tx, ty]
            }
            None => [0.0; 2],
        }
    }

    pub fn offset(&self) -> [f32; 2] {
        match &self.follow {
            Follow::Linear { offset } => *offset,
            Follow::Spring { axes, .. } => [axes[0].value(), axes[1].value()],
        }
    }

    /// Refits the texture window to a new viewport. Offsets are kept, but
    /// clamped to the new travel so the window never leaves the texture.
    pub fn scale(&mut self, viewport: Size) {
        self.fit = Some(cover_fit(
            self.image,
            viewport,
            self.params.extra_scale,
            self.params.anchor,
        ));
        let travel = self.travel();
        match &mut self.follow {
            Follow::Linear { offset } => {
                for axis in 0..2 {
                    let limit = travel[axis].abs();
                    offset[axis] = offset[axis].clamp(-limit, limit);
                }
            }
            Follow::Spring { axes, .. } => {
                for (axis, spring) in axes.iter_mut().enumerate() {
                    spring.clamp(travel[axis]);
                }
            }
        }
    }

    /// Advances the offset toward `pointer * travel` over `dt_ms`.
    pub fn update(&mut self, dt_ms: f32, pointer: [f32; 2]) {
        let travel = self.travel();
        if travel[0] <= 0.0 || travel[1] <= 0.0 {
            return;
        }
        let dt = dt_ms.max(0.0);
        let goal = [
            pointer[0].clamp(-1.0, 1.0) * travel[0],
            pointer[1].clamp(-1.0, 1.0) * travel[1],
        ];

        match &mut self.follow {
            Follow::Linear { offset } => {
                for axis in 0..2 {
                    let rate = self.velocity[axis] / travel[axis];
                    offset[axis] += linear_gain(rate, dt) * (goal[axis] - offset[axis]);
                }
            }
            Follow::Spring { axes, settle } => {
                for (axis, spring) in axes.iter_mut().enumerate() {
                    if *settle && goal[axis] == 0.0 {
                        spring.collapse();
                    } else {
                        spring.set_goal(goal[axis]);
                    }
                    spring.step(dt);
                    spring.clamp(travel[axis]);
                }
            }
        }
    }

    pub fn reset(&mut self) {
        match &mut self.follow {
            Follow::Linear { offset } => *offset = [0.0; 2],
            Follow::Spring { axes, .. } => axes.iter_mut().for_each(|spring| spring.snap(0.0)),
        }
    }

    /// Texture coordinates for the quad: the base window shifted by the offset.
    ///
    /// All zeros until the first [`scale`](Self::scale).
    pub fn tex_coords(&self) -> [f32; 8] {
        match self.fit {
            Some(fit) => {
                let [dx, dy] = self.offset();
                fit.window.strip(dx, dy)
            }
            None => [0.0; 8],
        }
    }
}

impl Animated for LayerState {
    fn advance(&mut self, dt_ms: f32, pointer: [f32; 2]) {
        self.update(dt_ms, pointer);
    }

    fn reset(&mut self) {
        LayerState::reset(self);
    }
}
