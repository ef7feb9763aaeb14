//! Raw input to session commands
//!
//! The host captures DOM events; this module only decides what they mean.

use crate::consts::TRUCK_NUDGE;

/// A player command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Arrow key or on-screen button
    NudgeLeft,
    NudgeRight,
    /// Absolute target from a touch drag, percent of width
    MoveTo(f32),
    TogglePause,
}

impl Control {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Control::NudgeLeft),
            "ArrowRight" => Some(Control::NudgeRight),
            " " | "p" | "P" => Some(Control::TogglePause),
            _ => None,
        }
    }

    /// Truck target this command asks for, given the current position
    pub fn truck_target(&self, current: f32) -> Option<f32> {
        match *self {
            Control::NudgeLeft => Some(current - TRUCK_NUDGE),
            Control::NudgeRight => Some(current + TRUCK_NUDGE),
            Control::MoveTo(target) => Some(target),
            Control::TogglePause => None,
        }
    }
}

/// Convert a touch x coordinate to a percentage of the playfield width
pub fn touch_percent(client_x: f32, area_left: f32, area_width: f32) -> Option<f32> {
    if !(area_width > 0.0) {
        return None;
    }
    Some((client_x - area_left) / area_width * 100.0)
}
