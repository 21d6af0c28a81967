//! Mouse and touch input folded into one pointer stream.

use crate::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Mouse,
    Touch(i32),
}

/// A pointer sample in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub contact: Contact,
    pub phase: Phase,
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn mouse(phase: Phase, client_x: f32, client_y: f32) -> Self {
        Self {
            contact: Contact::Mouse,
            phase,
            client_x,
            client_y,
        }
    }

    pub fn touch(id: i32, phase: Phase, client_x: f32, client_y: f32) -> Self {
        Self {
            contact: Contact::Touch(id),
            phase,
            client_x,
            client_y,
        }
    }

    /// Whether this sample carries a position worth following.
    pub fn is_positional(&self) -> bool {
        matches!(self.phase, Phase::Start | Phase::Move)
    }
}

/// Tracks a single touch contact; secondary fingers are ignored.
#[derive(Debug, Default, Clone)]
pub struct ContactFilter {
    active: Option<i32>,
}

impl ContactFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_touch(&self) -> Option<i32> {
        self.active
    }

    pub fn accept(&mut self, event: &PointerEvent) -> bool {
        let id = match event.contact {
            Contact::Mouse => return true,
            Contact::Touch(id) => id,
        };
        match (event.phase, self.active) {
            (Phase::Start, None) => {
                self.active = Some(id);
                true
            }
            (Phase::Start, Some(_)) => false,
            (Phase::Move, active) => active == Some(id),
            (Phase::End | Phase::Cancel, active) if active == Some(id) => {
                self.active = None;
                true
            }
            (Phase::End | Phase::Cancel, _) => false,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Maps client coordinates to `[-1, 1]` around the viewport centre.
///
/// Both axes are mirrored so layers pan away from the pointer.
pub fn normalize(client_x: f32, client_y: f32, viewport: Size) -> [f32; 2] {
    if viewport.is_empty() {
        return [0.0, 0.0];
    }
    let half_w = viewport.width * 0.5;
    let half_h = viewport.height * 0.5;
    [
        (1.0 - client_x / half_w).clamp(-1.0, 1.0),
        (1.0 - client_y / half_h).clamp(-1.0, 1.0),
    ]
}

/// Latest pointer position, accepting at most one sample per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    position: [f32; 2],
    armed: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            armed: true,
        }
    }
}

impl PointerState {
    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Stores a sample unless one was already taken since the last frame.
    pub fn record(&mut self, position: [f32; 2]) -> bool {
        if !self.armed {
            return false;
        }
        self.position = position;
        self.armed = false;
        true
    }

    /// Hands the position to a frame and re-arms sampling.
    pub fn consume(&mut self) -> [f32; 2] {
        self.armed = true;
        self.position
    }

    pub fn zero(&mut self) {
        self.position = [0.0, 0.0];
        self.armed = true;
    }
}
