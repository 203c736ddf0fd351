//! Per-frame action emission for each mode.

use super::classifier::GestureChannel;
use super::debounce::{ActionChannel, Edge, EdgeDirection};
use super::smoothing::CursorState;
use crate::actions::{Action, Hotkey};

/// Default multiplier from vertical pixel motion to scroll amount.
pub const DEFAULT_SCROLL_SENSITIVITY: f64 = 0.5;

/// Dispatcher memory that survives between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Smoothed Y where the current scroll segment started
    pub scroll_anchor: Option<f64>,
    /// A button-down was emitted without a matching button-up
    pub button_held: bool,
}

/// Turns edges, cursor position and mode into concrete actions.
#[derive(Debug, Clone, Copy)]
pub struct ActionDispatcher {
    scroll_sensitivity: f64,
}

impl ActionDispatcher {
    pub fn new(scroll_sensitivity: f64) -> Self {
        ActionDispatcher { scroll_sensitivity }
    }

    /// Pointer-control frame: scroll or move, then click edges.
    pub fn pointer_frame(
        &self,
        state: &mut PointerState,
        cursor: CursorState,
        scrolling: bool,
        edges: &[Edge],
        actions: &mut Vec<Action>,
    ) {
        if scrolling {
            match state.scroll_anchor {
                None => state.scroll_anchor = Some(cursor.y),
                Some(anchor) => {
                    let amount = (anchor - cursor.y) * self.scroll_sensitivity;
                    if amount != 0.0 {
                        actions.push(Action::Scroll { amount });
                    }
                    state.scroll_anchor = Some(cursor.y);
                }
            }
        } else {
            state.scroll_anchor = None;
            let (x, y) = cursor.pixel();
            actions.push(Action::PointerMove { x, y });
        }

        for edge in edges.iter().filter(|e| e.channel == GestureChannel::Pinch) {
            match edge.direction {
                EdgeDirection::Rising if edge.action == Some(ActionChannel::Click) => {
                    actions.push(Action::PointerButtonDown);
                    state.button_held = true;
                }
                EdgeDirection::Rising => {}
                EdgeDirection::Falling => {
                    actions.push(Action::PointerButtonUp);
                    state.button_held = false;
                }
            }
        }
    }

    /// Hotkey frame: fired rising edges become shortcuts. Nothing pointer
    /// related is emitted.
    pub fn hotkey_frame(&self, state: &mut PointerState, edges: &[Edge], actions: &mut Vec<Action>) {
        state.scroll_anchor = None;
        for edge in edges.iter().filter(|e| e.is_rising()) {
            let combo = match edge.action {
                Some(ActionChannel::Copy) => Hotkey::Copy,
                Some(ActionChannel::Paste) => Hotkey::Paste,
                Some(ActionChannel::Undo) => Hotkey::Undo,
                _ => continue,
            };
            actions.push(Action::Hotkey { combo });
        }
    }

    /// Release a held button, if any. Used on hand loss, on leaving pointer
    /// mode and on shutdown.
    pub fn release(&self, state: &mut PointerState, actions: &mut Vec<Action>) {
        state.scroll_anchor = None;
        if state.button_held {
            actions.push(Action::PointerButtonUp);
            state.button_held = false;
        }
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        ActionDispatcher::new(DEFAULT_SCROLL_SENSITIVITY)
    }
}
