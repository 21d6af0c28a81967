//! Frame timing and the Running/Suspended lifecycle of the animation loop.

use crate::input::PointerState;

/// Something the frame loop moves forward every tick.
pub trait Animated {
    fn advance(&mut self, dt_ms: f32, pointer: [f32; 2]);
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Suspended,
}

/// Milliseconds between animation callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    previous: Option<f64>,
    max_delta: f64,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            previous: None,
            max_delta: max_delta_ms.max(0.0),
        }
    }

    pub fn start(&mut self, now: f64) {
        self.previous = Some(now);
    }

    /// Time since the previous tick, clamped to `[0, max_delta]`.
    pub fn tick(&mut self, now: f64) -> f64 {
        let delta = self
            .previous
            .map_or(0.0, |previous| (now - previous).clamp(0.0, self.max_delta));
        self.previous = Some(now);
        delta
    }
}

/// All mutable state shared between the frame callback and event handlers.
#[derive(Debug, Clone)]
pub struct RendererState {
    state: DriverState,
    clock: FrameClock,
    pointer: PointerState,
}

impl RendererState {
    /// A running driver whose first delta is measured from `now`.
    pub fn new(now: f64, max_delta_ms: f64) -> Self {
        let mut clock = FrameClock::new(max_delta_ms);
        clock.start(now);
        Self {
            state: DriverState::Running,
            clock,
            pointer: PointerState::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    /// Runs one tick over `layers` in order. Returns the delta used, or `None`
    /// while suspended.
    pub fn frame<A: Animated>(&mut self, now: f64, layers: &mut [A]) -> Option<f32> {
        if !self.is_running() {
            return None;
        }
        let dt = self.clock.tick(now) as f32;
        let pointer = self.pointer.consume();
        for layer in layers.iter_mut() {
            layer.advance(dt, pointer);
        }
        Some(dt)
    }

    /// Running → Suspended. Zeroes the pointer and resets every layer.
    /// Returns `false` if already suspended.
    pub fn suspend<A: Animated>(&mut self, layers: &mut [A]) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = DriverState::Suspended;
        self.pointer.zero();
        for layer in layers.iter_mut() {
            layer.reset();
        }
        true
    }

    /// Suspended → Running, restarting the clock at `now` so the hidden
    /// interval never reaches a layer. Returns `false` if already running.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = DriverState::Running;
        self.clock.start(now);
        true
    }
}
