//! Pointer-control / hotkey mode and the gesture-to-action table.

use std::fmt;

use serde::Serialize;

use super::classifier::GestureChannel;
use super::debounce::{ActionChannel, Edge};

/// Interpretation applied to the gesture vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    PointerControl,
    Hotkey,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::PointerControl => Mode::Hotkey,
            Mode::Hotkey => Mode::PointerControl,
        }
    }

    /// Which rate-limited action a channel's rising edge triggers in this mode.
    ///
    /// Scrolling in pointer mode is continuous rather than edge-triggered, so
    /// it has no entry here.
    pub fn action_for(self, channel: GestureChannel) -> Option<ActionChannel> {
        use GestureChannel::*;
        match (self, channel) {
            (_, HotToggle) => Some(ActionChannel::ModeToggle),
            (Mode::PointerControl, Pinch) => Some(ActionChannel::Click),
            (Mode::PointerControl, Scroll | Back) => None,
            (Mode::Hotkey, Pinch) => Some(ActionChannel::Copy),
            (Mode::Hotkey, Scroll) => Some(ActionChannel::Paste),
            (Mode::Hotkey, Back) => Some(ActionChannel::Undo),
        }
    }

    /// Human-readable name of what a held gesture means in this mode.
    pub fn label_for(self, channel: GestureChannel) -> &'static str {
        use GestureChannel::*;
        match (self, channel) {
            (_, HotToggle) => "hot-toggling",
            (Mode::PointerControl, Pinch) => "pinching",
            (Mode::PointerControl, Scroll) => "scrolling",
            (Mode::PointerControl, Back) => "idle",
            (Mode::Hotkey, Pinch) => "copying",
            (Mode::Hotkey, Scroll) => "pasting",
            (Mode::Hotkey, Back) => "undoing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::PointerControl => f.write_str("pointer"),
            Mode::Hotkey => f.write_str("hotkey"),
        }
    }
}

/// Owns the mode toggle rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeController;

impl ModeController {
    /// Next mode given the hot-toggle edge fired this frame, if any.
    ///
    /// Only a fired rising edge bound to [`ActionChannel::ModeToggle`] flips
    /// the mode; cooldown gating already happened in the debouncer.
    pub fn apply(&self, mode: Mode, edge: Option<&Edge>) -> Mode {
        match edge {
            Some(edge) if edge.is_rising() && edge.action == Some(ActionChannel::ModeToggle) => {
                mode.toggled()
            }
            _ => mode,
        }
    }
}
