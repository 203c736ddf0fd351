//! Gesture interpretation core.
//!
//! Per frame: landmarks are classified into [`GestureFlags`], debounced into
//! cooldown-gated [`Edge`]s, the index fingertip is smoothed into a
//! [`CursorState`], the hot-toggle edge may flip the [`Mode`], and the
//! [`ActionDispatcher`] emits the frame's actions.
//!
//! All memory lives in [`State`], threaded through [`GestureEngine::tick`].

mod classifier;
mod debounce;
mod dispatch;
mod engine;
mod mode;
mod smoothing;

pub use classifier::{GestureChannel, GestureClassifier, GestureFlags, DEFAULT_PINCH_THRESHOLD};
pub use debounce::{
    ActionChannel, CooldownClock, CooldownSlot, Cooldowns, Edge, EdgeDebouncer, EdgeDirection,
    EdgeState, DEFAULT_ACTION_COOLDOWN, DEFAULT_MODE_TOGGLE_COOLDOWN,
};
pub use dispatch::{ActionDispatcher, PointerState, DEFAULT_SCROLL_SENSITIVITY};
pub use engine::{GestureConfig, GestureEngine, Session, State};
pub use mode::{Mode, ModeController};
pub use smoothing::{CursorSmoother, CursorState, ScreenBounds, DEFAULT_SMOOTHING_FACTOR};
