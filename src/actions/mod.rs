//! Actions emitted by the gesture core and the sinks that carry them out.
//!
//! The core only produces [`Action`] values. Sinks turn them into OS input
//! events ([`SystemSink`]), JSON lines ([`JsonSink`]) or an in-memory list
//! ([`RecordingSink`]).

mod sink;
mod system;

use std::fmt;

use serde::Serialize;

use crate::gesture::Mode;

pub use sink::{ActionSink, JsonSink, RecordingSink, SinkError};
pub use system::SystemSink;

/// Editing shortcut triggered in hotkey mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hotkey {
    Copy,
    Paste,
    Undo,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hotkey::Copy => f.write_str("copy"),
            Hotkey::Paste => f.write_str("paste"),
            Hotkey::Undo => f.write_str("undo"),
        }
    }
}

/// One output of a frame, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move the pointer to absolute screen pixels.
    PointerMove { x: u32, y: u32 },
    PointerButtonDown,
    PointerButtonUp,
    /// Positive scrolls up (hand moved up), negative scrolls down.
    Scroll { amount: f64 },
    Hotkey { combo: Hotkey },
    ModeChanged { mode: Mode },
}

impl Action {
    pub fn is_pointer_move(&self) -> bool {
        matches!(self, Action::PointerMove { .. })
    }
}
