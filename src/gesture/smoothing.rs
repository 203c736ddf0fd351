//! Exponential moving average filter for the pointer position.

use crate::landmarks::Point;

/// Default EMA factor. `1.0` disables smoothing.
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub width: u32,
    pub height: u32,
}

impl ScreenBounds {
    pub fn new(width: u32, height: u32) -> Self {
        ScreenBounds { width, height }
    }

    fn max_x(&self) -> f64 {
        f64::from(self.width.saturating_sub(1))
    }

    fn max_y(&self) -> f64 {
        f64::from(self.height.saturating_sub(1))
    }
}

/// Last smoothed pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
}

impl CursorState {
    /// Screen center, where the pointer starts.
    pub fn centered(bounds: ScreenBounds) -> Self {
        CursorState {
            x: f64::from(bounds.width / 2),
            y: f64::from(bounds.height / 2),
        }
    }

    /// Nearest whole pixel. Always inside the bounds the state was clamped to.
    pub fn pixel(&self) -> (u32, u32) {
        (self.x.round().max(0.0) as u32, self.y.round().max(0.0) as u32)
    }
}

/// First-order IIR low-pass filter over the index fingertip.
#[derive(Debug, Clone, Copy)]
pub struct CursorSmoother {
    alpha: f64,
    bounds: ScreenBounds,
}

impl CursorSmoother {
    pub fn new(alpha: f64, bounds: ScreenBounds) -> Self {
        CursorSmoother { alpha, bounds }
    }

    /// Map a normalized fingertip position to raw screen pixels.
    pub fn target(&self, tip: Point) -> (f64, f64) {
        (
            tip.x * f64::from(self.bounds.width),
            tip.y * f64::from(self.bounds.height),
        )
    }

    /// Move `prev` a fraction `alpha` of the way towards the fingertip,
    /// clamped to the screen.
    pub fn smooth(&self, prev: CursorState, tip: Point) -> CursorState {
        let (raw_x, raw_y) = self.target(tip);
        let x = prev.x + self.alpha * (raw_x - prev.x);
        let y = prev.y + self.alpha * (raw_y - prev.y);
        CursorState {
            x: x.clamp(0.0, self.bounds.max_x()),
            y: y.clamp(0.0, self.bounds.max_y()),
        }
    }
}
