//! The per-frame state transition.
//!
//! [`GestureEngine::tick`] is a pure function of the previous [`State`], the
//! current landmarks (or their absence) and the current time. [`Session`]
//! wraps one engine and one state for loops that just want actions out.

use std::time::Duration;

use super::classifier::{GestureChannel, GestureClassifier, GestureFlags, DEFAULT_PINCH_THRESHOLD};
use super::debounce::{
    ActionChannel, CooldownClock, Cooldowns, EdgeDebouncer, EdgeState,
    DEFAULT_ACTION_COOLDOWN, DEFAULT_MODE_TOGGLE_COOLDOWN,
};
use super::dispatch::{ActionDispatcher, PointerState, DEFAULT_SCROLL_SENSITIVITY};
use super::mode::{Mode, ModeController};
use super::smoothing::{CursorSmoother, CursorState, ScreenBounds, DEFAULT_SMOOTHING_FACTOR};
use crate::actions::Action;
use crate::landmarks::{Landmark, LandmarkSet};

/// Tunables of the gesture core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub pinch_threshold: f64,
    pub smoothing_factor: f64,
    pub action_cooldown: Duration,
    pub mode_toggle_cooldown: Duration,
    pub scroll_sensitivity: f64,
    pub screen: ScreenBounds,
    /// Flip landmarks horizontally before use, for unmirrored camera images
    pub mirror: bool,
}

impl GestureConfig {
    /// Defaults for a given screen size.
    pub fn for_screen(screen: ScreenBounds) -> Self {
        GestureConfig {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            action_cooldown: DEFAULT_ACTION_COOLDOWN,
            mode_toggle_cooldown: DEFAULT_MODE_TOGGLE_COOLDOWN,
            scroll_sensitivity: DEFAULT_SCROLL_SENSITIVITY,
            screen,
            mirror: false,
        }
    }
}

/// Everything the core remembers between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub edges: EdgeState,
    pub cooldowns: CooldownClock,
    pub cursor: CursorState,
    pub pointer: PointerState,
    pub mode: Mode,
}

impl State {
    /// Fresh state: pointer mode, cursor at screen center, nothing held.
    pub fn new(screen: ScreenBounds) -> Self {
        State {
            edges: EdgeState::default(),
            cooldowns: CooldownClock::default(),
            cursor: CursorState::centered(screen),
            pointer: PointerState::default(),
            mode: Mode::default(),
        }
    }

    pub fn is_button_held(&self) -> bool {
        self.pointer.button_held
    }

    pub fn scroll_anchor(&self) -> Option<f64> {
        self.pointer.scroll_anchor
    }
}

/// Classifier, debouncer, smoother, mode controller and dispatcher wired
/// together.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    config: GestureConfig,
    classifier: GestureClassifier,
    debouncer: EdgeDebouncer,
    smoother: CursorSmoother,
    modes: ModeController,
    dispatcher: ActionDispatcher,
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        GestureEngine {
            config,
            classifier: GestureClassifier::new(config.pinch_threshold),
            debouncer: EdgeDebouncer::new(Cooldowns {
                action: config.action_cooldown,
                mode_toggle: config.mode_toggle_cooldown,
            }),
            smoother: CursorSmoother::new(config.smoothing_factor, config.screen),
            modes: ModeController,
            dispatcher: ActionDispatcher::new(config.scroll_sensitivity),
        }
    }

    pub fn initial_state(&self) -> State {
        State::new(self.config.screen)
    }

    /// Advance one frame. `hand` is `None` when no hand is visible.
    pub fn tick(&self, state: &State, hand: Option<&LandmarkSet>, now: Duration) -> (State, Vec<Action>) {
        let mut next = state.clone();
        let mut actions = Vec::new();

        match hand {
            Some(landmarks) => self.hand_frame(&mut next, landmarks, now, &mut actions),
            None => self.absent_frame(&mut next, &mut actions),
        }

        (next, actions)
    }

    /// Release anything held. Call once when the owning loop stops.
    pub fn release(&self, state: &State) -> (State, Vec<Action>) {
        let mut next = state.clone();
        let mut actions = Vec::new();
        self.dispatcher.release(&mut next.pointer, &mut actions);
        next.edges.reset(GestureChannel::Pinch);
        (next, actions)
    }

    fn hand_frame(&self, state: &mut State, landmarks: &LandmarkSet, now: Duration, actions: &mut Vec<Action>) {
        let mirrored;
        let landmarks = if self.config.mirror {
            mirrored = landmarks.mirrored();
            &mirrored
        } else {
            landmarks
        };

        let flags = self.classifier.classify(landmarks);
        log_active(state.mode, &flags);

        state.cursor = self.smoother.smooth(state.cursor, landmarks.get(Landmark::IndexTip));

        // The toggle goes first so the rest of the frame is read in the new mode.
        let toggle = self.debouncer.observe(
            &mut state.edges,
            &mut state.cooldowns,
            GestureChannel::HotToggle,
            flags.hot_toggling,
            now,
            Some(ActionChannel::ModeToggle),
        );
        let previous = state.mode;
        state.mode = self.modes.apply(previous, toggle.as_ref());
        if state.mode != previous {
            if previous == Mode::PointerControl {
                self.dispatcher.release(&mut state.pointer, actions);
            }
            log::info!("Switched to {} mode", state.mode);
            actions.push(Action::ModeChanged { mode: state.mode });
        }

        let mode = state.mode;
        let edges: Vec<_> = GestureChannel::ACTIONS
            .into_iter()
            .filter_map(|channel| {
                self.debouncer.observe(
                    &mut state.edges,
                    &mut state.cooldowns,
                    channel,
                    flags.get(channel),
                    now,
                    mode.action_for(channel),
                )
            })
            .collect();

        match mode {
            Mode::PointerControl => self.dispatcher.pointer_frame(
                &mut state.pointer,
                state.cursor,
                flags.scrolling,
                &edges,
                actions,
            ),
            Mode::Hotkey => self.dispatcher.hotkey_frame(&mut state.pointer, &edges, actions),
        }
    }

    /// Hand lost: release the button, keep mode and cursor where they are.
    fn absent_frame(&self, state: &mut State, actions: &mut Vec<Action>) {
        if state.pointer.button_held {
            log::debug!("Hand lost while button held, releasing");
        }
        self.dispatcher.release(&mut state.pointer, actions);
        state.edges.reset(GestureChannel::Pinch);
    }
}

fn log_active(mode: Mode, flags: &GestureFlags) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    let active: Vec<&str> = GestureChannel::ALL
        .into_iter()
        .filter(|c| flags.get(*c))
        .map(|c| mode.label_for(c))
        .collect();
    log::trace!("[{}] active: {:?}", mode, active);
}

/// One engine plus the state it threads through, for owning loops.
#[derive(Debug, Clone)]
pub struct Session {
    engine: GestureEngine,
    state: State,
}

impl Session {
    pub fn new(config: GestureConfig) -> Self {
        let engine = GestureEngine::new(config);
        let state = engine.initial_state();
        Session { engine, state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn tick(&mut self, hand: Option<&LandmarkSet>, now: Duration) -> Vec<Action> {
        let (state, actions) = self.engine.tick(&self.state, hand, now);
        self.state = state;
        actions
    }

    /// Force-release a held button before the loop exits.
    pub fn shutdown(&mut self) -> Vec<Action> {
        let (state, actions) = self.engine.release(&self.state);
        self.state = state;
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Hotkey;
    use crate::landmarks::fixtures::{hand_with, open_hand};
    use crate::landmarks::Point;

    const HD: ScreenBounds = ScreenBounds {
        width: 1920,
        height: 1080,
    };

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn touching(channels: &[GestureChannel]) -> LandmarkSet {
        let overrides: Vec<(Landmark, Point)> = channels
            .iter()
            .map(|c| (c.fingertip(), Point::new(0.31, 0.6)))
            .collect();
        hand_with(&overrides)
    }

    fn engine() -> GestureEngine {
        engine_with(GestureConfig::for_screen(HD))
    }

    fn engine_with(config: GestureConfig) -> GestureEngine {
        GestureEngine::new(config)
    }

    #[test]
    fn test_tick_is_pure() {
        let engine = engine();
        let state = engine.initial_state();
        let hand = touching(&[GestureChannel::Pinch]);
        let a = engine.tick(&state, Some(&hand), ms(0));
        let b = engine.tick(&state, Some(&hand), ms(0));
        assert_eq!(a, b);
        assert_eq!(state, engine.initial_state());
    }

    #[test]
    fn test_pinch_clicks_in_pointer_mode() {
        let engine = engine();
        let state = engine.initial_state();
        let (state, actions) = engine.tick(&state, Some(&touching(&[GestureChannel::Pinch])), ms(0));
        assert!(actions[0].is_pointer_move());
        assert_eq!(actions[1], Action::PointerButtonDown);
        assert!(state.is_button_held());

        let (state, actions) = engine.tick(&state, Some(&open_hand()), ms(33));
        assert_eq!(actions[1], Action::PointerButtonUp);
        assert!(!state.is_button_held());
    }

    #[test]
    fn test_toggle_then_copy() {
        let engine = engine();
        let state = engine.initial_state();
        let (state, actions) =
            engine.tick(&state, Some(&touching(&[GestureChannel::HotToggle])), ms(0));
        assert_eq!(actions, vec![Action::ModeChanged { mode: Mode::Hotkey }]);
        assert_eq!(state.mode, Mode::Hotkey);

        let (state, actions) = engine.tick(&state, Some(&open_hand()), ms(100));
        assert!(actions.is_empty());

        let (_, actions) = engine.tick(&state, Some(&touching(&[GestureChannel::Pinch])), ms(300));
        assert_eq!(actions, vec![Action::Hotkey { combo: Hotkey::Copy }]);
    }

    #[test]
    fn test_simultaneous_hotkeys_first_wins() {
        let engine = engine();
        let mut state = engine.initial_state();
        state.mode = Mode::Hotkey;

        let all = touching(&[GestureChannel::Pinch, GestureChannel::Scroll, GestureChannel::Back]);
        let (state, actions) = engine.tick(&state, Some(&all), ms(0));
        assert_eq!(actions, vec![Action::Hotkey { combo: Hotkey::Copy }]);

        // Paste and undo stay suppressed while held, even after the cooldown.
        let (_, actions) = engine.tick(&state, Some(&all), ms(500));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_leaving_pointer_mode_releases_button() {
        let engine = engine();
        let state = engine.initial_state();
        let (state, _) = engine.tick(&state, Some(&touching(&[GestureChannel::Pinch])), ms(0));
        assert!(state.is_button_held());

        let both = touching(&[GestureChannel::Pinch, GestureChannel::HotToggle]);
        let (state, actions) = engine.tick(&state, Some(&both), ms(33));
        assert_eq!(
            actions,
            vec![
                Action::PointerButtonUp,
                Action::ModeChanged { mode: Mode::Hotkey }
            ]
        );
        assert!(!state.is_button_held());
    }

    #[test]
    fn test_absent_hand_freezes_cursor_and_mode() {
        let engine = engine();
        let mut state = engine.initial_state();
        state.mode = Mode::Hotkey;
        state.cursor = CursorState { x: 12.0, y: 34.0 };

        let (next, actions) = engine.tick(&state, None, ms(0));
        assert!(actions.is_empty());
        assert_eq!(next.mode, Mode::Hotkey);
        assert_eq!(next.cursor, state.cursor);
    }

    #[test]
    fn test_scroll_suppresses_move_and_anchors() {
        let engine = engine();
        let state = engine.initial_state();
        let hand = touching(&[GestureChannel::Scroll]);
        let (state, actions) = engine.tick(&state, Some(&hand), ms(0));
        assert!(actions.is_empty());
        assert!(state.scroll_anchor().is_some());
    }

    #[test]
    fn test_mirror_flips_pointer_motion() {
        let mut config = GestureConfig::for_screen(HD);
        config.smoothing_factor = 1.0;
        let hand = hand_with(&[(Landmark::IndexTip, Point::new(0.25, 0.5))]);

        let engine = engine_with(config);
        let (_, plain) = engine.tick(&engine.initial_state(), Some(&hand), ms(0));
        assert_eq!(plain, vec![Action::PointerMove { x: 480, y: 540 }]);

        config.mirror = true;
        let engine = engine_with(config);
        let (_, flipped) = engine.tick(&engine.initial_state(), Some(&hand), ms(0));
        assert_eq!(flipped, vec![Action::PointerMove { x: 1440, y: 540 }]);
    }

    #[test]
    fn test_session_shutdown_releases_once() {
        let mut session = Session::new(GestureConfig::for_screen(HD));
        session.tick(Some(&touching(&[GestureChannel::Pinch])), ms(0));
        assert_eq!(session.shutdown(), vec![Action::PointerButtonUp]);
        assert!(session.shutdown().is_empty());
    }
}
