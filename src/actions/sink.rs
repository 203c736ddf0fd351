//! The action sink interface and the non-OS sinks.

use std::io::Write;

use super::{Action, Hotkey};
use crate::gesture::Mode;

/// Errors raised while delivering actions.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to simulate {event}")]
    Simulate { event: String },

    #[error("failed to write action: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode action: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Receiver of the actions the core emits.
///
/// `pointer_button_up` must tolerate being called when no button is held.
pub trait ActionSink {
    fn pointer_move(&mut self, x: u32, y: u32) -> Result<(), SinkError>;

    fn pointer_button_down(&mut self) -> Result<(), SinkError>;

    fn pointer_button_up(&mut self) -> Result<(), SinkError>;

    /// Positive amounts scroll up.
    fn scroll(&mut self, amount: f64) -> Result<(), SinkError>;

    fn hotkey(&mut self, combo: Hotkey) -> Result<(), SinkError>;

    /// Mode switches have no OS effect by default.
    fn mode_changed(&mut self, mode: Mode) -> Result<(), SinkError> {
        log::debug!("Sink saw mode change to {}", mode);
        Ok(())
    }

    /// Deliver one action.
    fn apply(&mut self, action: &Action) -> Result<(), SinkError> {
        match *action {
            Action::PointerMove { x, y } => self.pointer_move(x, y),
            Action::PointerButtonDown => self.pointer_button_down(),
            Action::PointerButtonUp => self.pointer_button_up(),
            Action::Scroll { amount } => self.scroll(amount),
            Action::Hotkey { combo } => self.hotkey(combo),
            Action::ModeChanged { mode } => self.mode_changed(mode),
        }
    }

    /// Deliver a frame's actions in order, stopping at the first failure.
    fn apply_all(&mut self, actions: &[Action]) -> Result<(), SinkError> {
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }
}

/// Collects actions in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub actions: Vec<Action>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, predicate: impl Fn(&Action) -> bool) -> usize {
        self.actions.iter().filter(|a| predicate(*a)).count()
    }
}

impl ActionSink for RecordingSink {
    fn pointer_move(&mut self, x: u32, y: u32) -> Result<(), SinkError> {
        self.actions.push(Action::PointerMove { x, y });
        Ok(())
    }

    fn pointer_button_down(&mut self) -> Result<(), SinkError> {
        self.actions.push(Action::PointerButtonDown);
        Ok(())
    }

    fn pointer_button_up(&mut self) -> Result<(), SinkError> {
        self.actions.push(Action::PointerButtonUp);
        Ok(())
    }

    fn scroll(&mut self, amount: f64) -> Result<(), SinkError> {
        self.actions.push(Action::Scroll { amount });
        Ok(())
    }

    fn hotkey(&mut self, combo: Hotkey) -> Result<(), SinkError> {
        self.actions.push(Action::Hotkey { combo });
        Ok(())
    }

    fn mode_changed(&mut self, mode: Mode) -> Result<(), SinkError> {
        self.actions.push(Action::ModeChanged { mode });
        Ok(())
    }
}

/// Writes each action as one JSON object per line.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        JsonSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, action: Action) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &action)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ActionSink for JsonSink<W> {
    fn pointer_move(&mut self, x: u32, y: u32) -> Result<(), SinkError> {
        self.emit(Action::PointerMove { x, y })
    }

    fn pointer_button_down(&mut self) -> Result<(), SinkError> {
        self.emit(Action::PointerButtonDown)
    }

    fn pointer_button_up(&mut self) -> Result<(), SinkError> {
        self.emit(Action::PointerButtonUp)
    }

    fn scroll(&mut self, amount: f64) -> Result<(), SinkError> {
        self.emit(Action::Scroll { amount })
    }

    fn hotkey(&mut self, combo: Hotkey) -> Result<(), SinkError> {
        self.emit(Action::Hotkey { combo })
    }

    fn mode_changed(&mut self, mode: Mode) -> Result<(), SinkError> {
        self.emit(Action::ModeChanged { mode })
    }
}
