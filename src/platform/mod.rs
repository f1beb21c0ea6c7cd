//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (monotonic timestamps to frame deltas)
//! - Browser bindings for the presentation layer (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::MAX_FRAME_DT;
use crate::sanitize_dt;

/// Turns monotonic frame timestamps (seconds) into deltas.
///
/// The first frame after construction or [`FrameClock::restart`] has no
/// previous timestamp and yields a zero delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self { last: None, max_dt }
    }

    /// Forget the previous timestamp; the next frame is a warm-up frame
    pub fn restart(&mut self) {
        self.last = None;
    }

    /// Delta since the previous frame, clamped to `[0, max_dt]`
    pub fn delta(&mut self, now: f64) -> f64 {
        if !now.is_finite() {
            return 0.0;
        }
        match self.last.replace(now) {
            None => 0.0,
            Some(previous) => sanitize_dt(now - previous).min(self.max_dt),
        }
    }
}
