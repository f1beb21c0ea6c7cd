//! Explicit one-shot timers
//!
//! Timers are plain values decremented by the frame delta, so the simulation
//! never schedules callbacks.

use serde::{Deserialize, Serialize};

use crate::consts::TIMER_EPSILON;

/// A countdown that fires once when its remaining time reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OneShotTimer {
    remaining: Option<f64>,
}

impl OneShotTimer {
    /// An armed timer
    pub fn armed(delay: f64) -> Self {
        Self {
            remaining: Some(delay.max(0.0)),
        }
    }

    /// (Re)arm from zero elapsed time
    pub fn arm(&mut self, delay: f64) {
        self.remaining = Some(delay.max(0.0));
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left before firing, if armed
    pub fn remaining(&self) -> Option<f64> {
        self.remaining
    }

    /// Advance by `dt`. Returns `Some(overshoot)` on the tick the timer fires
    /// (the timer disarms itself), `None` otherwise.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        let remaining = self.remaining.as_mut()?;
        *remaining -= dt;
        if *remaining <= TIMER_EPSILON {
            let overshoot = (-*remaining).max(0.0);
            self.remaining = None;
            Some(overshoot)
        } else {
            None
        }
    }
}
