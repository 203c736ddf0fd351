//! Edge detection and cooldown gating.
//!
//! Turns per-frame gesture booleans into rising/falling edges. Rising edges
//! only fire when the channel is bound to an action and that action's
//! cooldown slot has elapsed; falling edges always fire so a release can never
//! be swallowed.

use std::fmt;
use std::time::Duration;

use super::classifier::GestureChannel;

/// Default cooldown shared by click, copy, paste and undo.
pub const DEFAULT_ACTION_COOLDOWN: Duration = Duration::from_millis(200);

/// Default cooldown between mode toggles.
pub const DEFAULT_MODE_TOGGLE_COOLDOWN: Duration = Duration::from_secs(1);

/// Rate-limited action a gesture edge can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionChannel {
    Click,
    Copy,
    Paste,
    Undo,
    ModeToggle,
}

impl ActionChannel {
    pub fn slot(self) -> CooldownSlot {
        match self {
            ActionChannel::Click
            | ActionChannel::Copy
            | ActionChannel::Paste
            | ActionChannel::Undo => CooldownSlot::FastAction,
            ActionChannel::ModeToggle => CooldownSlot::ModeToggle,
        }
    }
}

impl fmt::Display for ActionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionChannel::Click => "click",
            ActionChannel::Copy => "copy",
            ActionChannel::Paste => "paste",
            ActionChannel::Undo => "undo",
            ActionChannel::ModeToggle => "mode-toggle",
        };
        f.write_str(name)
    }
}

/// Timestamp slot in the [`CooldownClock`]. Actions in one slot share a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CooldownSlot {
    FastAction,
    ModeToggle,
}

impl CooldownSlot {
    fn index(self) -> usize {
        self as usize
    }
}

/// Cooldown durations per slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldowns {
    pub action: Duration,
    pub mode_toggle: Duration,
}

impl Cooldowns {
    pub fn for_slot(&self, slot: CooldownSlot) -> Duration {
        match slot {
            CooldownSlot::FastAction => self.action,
            CooldownSlot::ModeToggle => self.mode_toggle,
        }
    }
}

impl Default for Cooldowns {
    fn default() -> Self {
        Cooldowns {
            action: DEFAULT_ACTION_COOLDOWN,
            mode_toggle: DEFAULT_MODE_TOGGLE_COOLDOWN,
        }
    }
}

/// When each cooldown slot last fired. Unset slots are always ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CooldownClock {
    last_fired: [Option<Duration>; 2],
}

impl CooldownClock {
    pub fn last_fired(&self, slot: CooldownSlot) -> Option<Duration> {
        self.last_fired[slot.index()]
    }

    /// True when strictly more than `cooldown` has passed since the slot fired.
    pub fn is_ready(&self, slot: CooldownSlot, now: Duration, cooldown: Duration) -> bool {
        match self.last_fired(slot) {
            None => true,
            Some(last) => now.saturating_sub(last) > cooldown,
        }
    }

    pub fn mark(&mut self, slot: CooldownSlot, now: Duration) {
        self.last_fired[slot.index()] = Some(now);
    }
}

/// Whether each gesture channel was active in the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeState {
    was_active: [bool; 4],
}

impl EdgeState {
    pub fn was_active(&self, channel: GestureChannel) -> bool {
        self.was_active[channel.slot()]
    }

    pub fn reset(&mut self, channel: GestureChannel) {
        self.was_active[channel.slot()] = false;
    }

    fn record(&mut self, channel: GestureChannel, active: bool) {
        self.was_active[channel.slot()] = active;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Rising,
    Falling,
}

/// A fired transition on one gesture channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub channel: GestureChannel,
    pub direction: EdgeDirection,
    /// Action the channel was bound to when the edge fired, if any.
    pub action: Option<ActionChannel>,
}

impl Edge {
    pub fn is_rising(&self) -> bool {
        self.direction == EdgeDirection::Rising
    }
}

/// Edge detector with per-slot cooldowns.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDebouncer {
    cooldowns: Cooldowns,
}

impl EdgeDebouncer {
    pub fn new(cooldowns: Cooldowns) -> Self {
        EdgeDebouncer { cooldowns }
    }

    /// Feed one channel's flag for the current frame.
    ///
    /// Edge state is always updated. Returns the fired edge, if any: a rising
    /// edge bound to `action` whose slot is ready (the slot is then marked),
    /// or any falling edge.
    pub fn observe(
        &self,
        edges: &mut EdgeState,
        clock: &mut CooldownClock,
        channel: GestureChannel,
        active: bool,
        now: Duration,
        action: Option<ActionChannel>,
    ) -> Option<Edge> {
        let was_active = edges.was_active(channel);
        edges.record(channel, active);

        match (was_active, active) {
            (false, true) => {
                let action = action?;
                let slot = action.slot();
                if !clock.is_ready(slot, now, self.cooldowns.for_slot(slot)) {
                    log::debug!("{} rising edge suppressed by {} cooldown", channel, action);
                    return None;
                }
                clock.mark(slot, now);
                log::debug!("{} rising edge fired {}", channel, action);
                Some(Edge {
                    channel,
                    direction: EdgeDirection::Rising,
                    action: Some(action),
                })
            }
            (true, false) => {
                log::trace!("{} falling edge", channel);
                Some(Edge {
                    channel,
                    direction: EdgeDirection::Falling,
                    action,
                })
            }
            _ => None,
        }
    }
}
