//! OS input injection via rdev.
//!
//! On macOS this requires Accessibility permissions, same as global key
//! listening.

use std::thread;
use std::time::Duration;

use rdev::{simulate, Button, EventType, Key};

use super::sink::{ActionSink, SinkError};
use super::Hotkey;

/// Default pause between the key events of a shortcut.
pub const DEFAULT_KEY_DELAY: Duration = Duration::from_millis(10);

/// Sends pointer and keyboard events to the operating system.
pub struct SystemSink {
    key_delay: Duration,
    /// Whether this sink pressed the left button and has not released it yet
    button_down: bool,
    /// Fractional wheel lines not yet sent
    scroll_remainder: f64,
}

impl SystemSink {
    pub fn new(key_delay: Duration) -> Self {
        SystemSink {
            key_delay,
            button_down: false,
            scroll_remainder: 0.0,
        }
    }

    fn send(&self, event: &EventType) -> Result<(), SinkError> {
        simulate(event).map_err(|_| SinkError::Simulate {
            event: format!("{:?}", event),
        })
    }

    /// Split a scroll amount into whole wheel lines, carrying the remainder.
    fn wheel_lines(&mut self, amount: f64) -> i64 {
        let total = self.scroll_remainder + amount;
        let lines = total.trunc();
        self.scroll_remainder = total - lines;
        lines as i64
    }
}

impl Default for SystemSink {
    fn default() -> Self {
        SystemSink::new(DEFAULT_KEY_DELAY)
    }
}

/// Platform shortcut modifier: Command on macOS, Control elsewhere.
fn shortcut_modifier() -> Key {
    if cfg!(target_os = "macos") {
        Key::MetaLeft
    } else {
        Key::ControlLeft
    }
}

fn hotkey_key(combo: Hotkey) -> Key {
    match combo {
        Hotkey::Copy => Key::KeyC,
        Hotkey::Paste => Key::KeyV,
        Hotkey::Undo => Key::KeyZ,
    }
}

impl ActionSink for SystemSink {
    fn pointer_move(&mut self, x: u32, y: u32) -> Result<(), SinkError> {
        self.send(&EventType::MouseMove {
            x: f64::from(x),
            y: f64::from(y),
        })
    }

    fn pointer_button_down(&mut self) -> Result<(), SinkError> {
        self.send(&EventType::ButtonPress(Button::Left))?;
        self.button_down = true;
        Ok(())
    }

    fn pointer_button_up(&mut self) -> Result<(), SinkError> {
        if !self.button_down {
            log::trace!("Ignoring button release, button not held");
            return Ok(());
        }
        self.send(&EventType::ButtonRelease(Button::Left))?;
        self.button_down = false;
        Ok(())
    }

    fn scroll(&mut self, amount: f64) -> Result<(), SinkError> {
        let lines = self.wheel_lines(amount);
        if lines == 0 {
            return Ok(());
        }
        self.send(&EventType::Wheel {
            delta_x: 0,
            delta_y: lines,
        })
    }

    fn hotkey(&mut self, combo: Hotkey) -> Result<(), SinkError> {
        let modifier = shortcut_modifier();
        let key = hotkey_key(combo);
        log::info!("Hotkey: {}", combo);

        self.send(&EventType::KeyPress(modifier))?;
        thread::sleep(self.key_delay);
        // Release the modifier even when the key itself fails.
        let pressed = self
            .send(&EventType::KeyPress(key))
            .and_then(|_| {
                thread::sleep(self.key_delay);
                self.send(&EventType::KeyRelease(key))
            });
        thread::sleep(self.key_delay);
        self.send(&EventType::KeyRelease(modifier))?;
        pressed
    }
}
