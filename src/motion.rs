//! Tracking strategies that move a layer's offset toward the pointer.

use serde::Deserialize;

/// How a layer follows its goal offset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Tracking {
    /// First-order low-pass toward the goal; never overshoots.
    #[default]
    Linear,
    /// Second-order spring/damper. Units are per millisecond; `damping`
    /// defaults to the critical value `2 * sqrt(stiffness)`. With `settle`,
    /// an axis whose goal is the rest position stops there instead of
    /// swinging through it.
    Spring {
        #[serde(default = "default_stiffness")]
        stiffness: f32,
        #[serde(default)]
        damping: Option<f32>,
        #[serde(default)]
        settle: bool,
    },
}

fn default_stiffness() -> f32 {
    DEFAULT_STIFFNESS
}

pub const DEFAULT_STIFFNESS: f32 = 0.000_02;

/// Fraction of the remaining distance a linear tracker covers in one step.
///
/// `rate * dt` is the unclamped step of `offset += rate * (goal - offset) * dt`;
/// capping it at one keeps long frames from overshooting the goal.
pub fn linear_gain(rate: f32, dt_ms: f32) -> f32 {
    (rate * dt_ms).clamp(0.0, 1.0)
}

/// Damped spring integrated with semi-implicit Euler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    goal: f32,
    stiffness: f32,
    damping: f32,
    zeroed: bool,
}

impl Spring {
    pub fn new(value: f32, stiffness: f32, damping: Option<f32>) -> Self {
        let stiffness = stiffness.max(0.0);
        Self {
            value,
            velocity: 0.0,
            goal: value,
            stiffness,
            damping: damping.unwrap_or_else(|| critical_damping(stiffness)),
            zeroed: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_goal(&mut self, goal: f32) {
        self.goal = goal;
        self.zeroed = false;
    }

    /// Drives the value to zero and pins it there once it reaches or crosses
    /// zero, from either side.
    pub fn collapse(&mut self) {
        self.goal = 0.0;
        self.zeroed = true;
    }

    /// Jumps to `value` at rest.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.goal = value;
        self.velocity = 0.0;
        self.zeroed = false;
    }

    pub fn step(&mut self, dt_ms: f32) -> f32 {
        let dt = dt_ms.max(0.0);
        let before = self.value;
        let accel = self.stiffness * (self.goal - self.value) - self.damping * self.velocity;
        self.velocity += accel * dt;
        self.value += self.velocity * dt;

        if self.zeroed && before * self.value <= 0.0 {
            self.value = 0.0;
            self.velocity = 0.0;
        }
        self.value
    }

    /// Keeps the value inside `[-limit, limit]`, stopping it at the wall.
    pub fn clamp(&mut self, limit: f32) {
        let limit = limit.abs();
        if self.value > limit || self.value < -limit {
            self.value = self.value.clamp(-limit, limit);
            self.velocity = 0.0;
        }
    }
}

pub fn critical_damping(stiffness: f32) -> f32 {
    2.0 * stiffness.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_gain_is_capped() {
        assert!((linear_gain(0.01, 16.0) - 0.16).abs() < 1e-6);
        assert_eq!(linear_gain(0.01, 1000.0), 1.0);
        assert_eq!(linear_gain(0.01, -5.0), 0.0);
    }

    #[test]
    fn critically_damped_spring_settles_without_overshoot() {
        let mut spring = Spring::new(0.0, 0.0004, None);
        spring.set_goal(1.0);
        let mut peak: f32 = 0.0;
        for _ in 0..2000 {
            peak = peak.max(spring.step(4.0));
        }
        assert!((spring.value() - 1.0).abs() < 1e-3, "value={}", spring.value());
        assert!(peak < 1.02, "peak={peak}");
    }

    #[test]
    fn underdamped_spring_overshoots() {
        let mut spring = Spring::new(0.0, 0.0004, Some(0.0));
        spring.set_goal(1.0);
        let peak = (0..200).map(|_| spring.step(4.0)).fold(0.0f32, f32::max);
        assert!(peak > 1.5);
    }

    #[test]
    fn collapsed_spring_does_not_bounce_back() {
        let mut spring = Spring::new(1.0, 0.0004, Some(0.0));
        spring.collapse();
        let mut reached = false;
        for _ in 0..500 {
            let value = spring.step(4.0);
            if value == 0.0 {
                reached = true;
            }
            if reached {
                assert_eq!(value, 0.0);
                assert_eq!(spring.velocity, 0.0);
            }
        }
        assert!(reached);
        assert!(spring.zeroed);
    }

    #[test]
    fn collapse_from_below_stops_at_zero() {
        let mut spring = Spring::new(-1.0, 0.0004, Some(0.0));
        spring.collapse();
        for _ in 0..500 {
            let value = spring.step(4.0);
            assert!(value <= 0.0, "value={value}");
        }
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity, 0.0);
    }

    #[test]
    fn new_goal_releases_a_collapsed_spring() {
        let mut spring = Spring::new(0.0, 0.0004, None);
        spring.collapse();
        spring.step(4.0);
        spring.set_goal(1.0);
        assert!(!spring.zeroed);
        for _ in 0..50 {
            spring.step(4.0);
        }
        assert!(spring.value() > 0.0);
    }

    #[test]
    fn clamp_stops_at_the_wall() {
        let mut spring = Spring::new(0.0, 0.01, Some(0.0));
        spring.set_goal(5.0);
        spring.step(16.0);
        spring.clamp(0.5);
        assert_eq!(spring.value(), 0.5);
        assert_eq!(spring.velocity, 0.0);
    }

    #[test]
    fn tracking_deserializes_with_defaults() {
        let linear: Tracking = serde_json::from_str(r#"{"mode":"linear"}"#).unwrap();
        assert_eq!(linear, Tracking::Linear);
        let spring: Tracking = serde_json::from_str(r#"{"mode":"spring"}"#).unwrap();
        assert_eq!(
            spring,
            Tracking::Spring {
                stiffness: DEFAULT_STIFFNESS,
                damping: None,
                settle: false,
            }
        );
        let settling: Tracking =
            serde_json::from_str(r#"{"mode":"spring","settle":true}"#).unwrap();
        assert!(matches!(settling, Tracking::Spring { settle: true, .. }));
    }
}
