//! Landmark geometry to gesture flags.

use std::fmt;

use crate::landmarks::{Landmark, LandmarkSet};

/// Default thumb-to-fingertip distance below which a pinch is recognized.
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.05;

/// One physical gesture: the thumb tip touching one other fingertip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureChannel {
    /// Thumb + index
    Pinch,
    /// Thumb + middle
    Scroll,
    /// Thumb + ring
    Back,
    /// Thumb + pinky
    HotToggle,
}

impl GestureChannel {
    pub const ALL: [GestureChannel; 4] = [
        GestureChannel::Pinch,
        GestureChannel::Scroll,
        GestureChannel::Back,
        GestureChannel::HotToggle,
    ];

    /// Channels that map to actions, in the order they are evaluated after a
    /// possible mode toggle.
    pub const ACTIONS: [GestureChannel; 3] = [
        GestureChannel::Pinch,
        GestureChannel::Scroll,
        GestureChannel::Back,
    ];

    /// The fingertip the thumb tip is measured against.
    pub fn fingertip(self) -> Landmark {
        match self {
            GestureChannel::Pinch => Landmark::IndexTip,
            GestureChannel::Scroll => Landmark::MiddleTip,
            GestureChannel::Back => Landmark::RingTip,
            GestureChannel::HotToggle => Landmark::PinkyTip,
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GestureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureChannel::Pinch => "pinch",
            GestureChannel::Scroll => "scroll",
            GestureChannel::Back => "back",
            GestureChannel::HotToggle => "hot-toggle",
        };
        f.write_str(name)
    }
}

/// Gesture booleans for a single frame. No memory of earlier frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureFlags {
    pub pinching: bool,
    pub scrolling: bool,
    pub backing: bool,
    pub hot_toggling: bool,
}

impl GestureFlags {
    pub fn get(&self, channel: GestureChannel) -> bool {
        match channel {
            GestureChannel::Pinch => self.pinching,
            GestureChannel::Scroll => self.scrolling,
            GestureChannel::Back => self.backing,
            GestureChannel::HotToggle => self.hot_toggling,
        }
    }

    fn set(&mut self, channel: GestureChannel, active: bool) {
        match channel {
            GestureChannel::Pinch => self.pinching = active,
            GestureChannel::Scroll => self.scrolling = active,
            GestureChannel::Back => self.backing = active,
            GestureChannel::HotToggle => self.hot_toggling = active,
        }
    }
}

/// Derives [`GestureFlags`] from thumb-to-fingertip distances.
#[derive(Debug, Clone, Copy)]
pub struct GestureClassifier {
    threshold: f64,
}

impl GestureClassifier {
    /// Create a classifier with the given pinch threshold (normalized units).
    pub fn new(threshold: f64) -> Self {
        GestureClassifier { threshold }
    }

    /// Classify one frame. A channel is active iff its distance is strictly
    /// below the threshold.
    pub fn classify(&self, landmarks: &LandmarkSet) -> GestureFlags {
        let mut flags = GestureFlags::default();
        for channel in GestureChannel::ALL {
            let distance = landmarks.distance(Landmark::ThumbTip, channel.fingertip());
            flags.set(channel, distance < self.threshold);
        }
        flags
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        GestureClassifier::new(DEFAULT_PINCH_THRESHOLD)
    }
}
