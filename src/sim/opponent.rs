//! Opponent driving strategies
//!
//! The opponent never brakes or coasts while the race is running: it only
//! accelerates toward its own top speed. Outside `Running` a strategy must not
//! return positive acceleration.

use std::fmt::Debug;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::RngState;
use super::vehicle::RateTable;

/// What a strategy gets to look at each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentView {
    /// Race is in `Running`
    pub running: bool,
    pub engine_on: bool,
    pub speed: f64,
    pub distance: f64,
    pub player_distance: f64,
}

/// Decides the opponent's commanded acceleration (px/s², signed)
pub trait OpponentController: Debug {
    fn commanded_accel(&mut self, view: &OpponentView, rates: &RateTable, dt: f64) -> f64;

    /// Called when a new race session starts
    fn reset(&mut self) {}
}

/// Rate applied outside `Running`: hold with the engine on, roll to a stop with it off
fn idle_rate(view: &OpponentView, rates: &RateTable) -> f64 {
    if view.engine_on {
        0.0
    } else {
        -rates.engine_off_decel
    }
}

/// Constant full throttle once the race starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRatioOpponent;

impl OpponentController for FixedRatioOpponent {
    fn commanded_accel(&mut self, view: &OpponentView, rates: &RateTable, _dt: f64) -> f64 {
        if view.running {
            rates.accel
        } else {
            idle_rate(view, rates)
        }
    }
}

/// Tuning for [`SurgingOpponent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeTuning {
    /// Seconds between throttle re-rolls
    pub interval: f64,
    /// Throttle varies within [1 - jitter, 1]
    pub jitter: f64,
}

impl Default for SurgeTuning {
    fn default() -> Self {
        Self {
            interval: 0.75,
            jitter: 0.35,
        }
    }
}

/// Full-throttle driver whose pedal pressure wobbles, re-rolled every
/// `interval` seconds from a seeded stream
#[derive(Debug, Clone)]
pub struct SurgingOpponent {
    tuning: SurgeTuning,
    rng_state: RngState,
    rng: Pcg32,
    throttle: f64,
    until_reroll: f64,
}

impl SurgingOpponent {
    pub fn new(seed: u64, tuning: SurgeTuning) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            tuning,
            rng: rng_state.to_rng(),
            rng_state,
            throttle: 1.0,
            until_reroll: 0.0,
        }
    }

    /// Draw a new throttle once the re-roll deadline has passed. Deadlines
    /// skipped inside one long tick are dropped without drawing.
    fn reroll_if_due(&mut self) {
        if self.until_reroll > 0.0 {
            return;
        }
        let interval = self.tuning.interval.max(f64::EPSILON);
        let skipped = (-self.until_reroll / interval).floor();
        self.until_reroll += (skipped + 1.0) * interval;
        if self.until_reroll <= 0.0 {
            self.until_reroll = interval;
        }

        let jitter = self.tuning.jitter.clamp(0.0, 1.0);
        self.throttle = 1.0 - self.rng.random::<f64>() * jitter;
    }
}

impl OpponentController for SurgingOpponent {
    fn commanded_accel(&mut self, view: &OpponentView, rates: &RateTable, dt: f64) -> f64 {
        if !view.running {
            return idle_rate(view, rates);
        }
        self.until_reroll -= crate::sanitize_dt(dt);
        self.reroll_if_due();
        rates.accel * self.throttle
    }

    fn reset(&mut self) {
        self.rng = self.rng_state.to_rng();
        self.throttle = 1.0;
        self.until_reroll = 0.0;
    }
}
