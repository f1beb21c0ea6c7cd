//! Vehicle kinematics
//!
//! One-dimensional speed integration. Every rate is derived from a single
//! acceleration value through shared [`RateRatios`], so player and opponent
//! tuning can't drift apart.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sanitize_dt;

/// Ratios tying the braking/coasting/engine-off rates to acceleration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateRatios {
    /// Braking rate = accel * brake_multiplier
    pub brake_multiplier: f64,
    /// Coasting deceleration = accel * coast_fraction
    pub coast_fraction: f64,
    /// Engine-off deceleration = accel * engine_off_fraction
    pub engine_off_fraction: f64,
}

impl Default for RateRatios {
    fn default() -> Self {
        Self {
            brake_multiplier: BRAKE_MULTIPLIER,
            coast_fraction: COAST_FRACTION,
            engine_off_fraction: ENGINE_OFF_FRACTION,
        }
    }
}

/// Per-vehicle rates in px/s²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub accel: f64,
    pub decel: f64,
    pub brake: f64,
    pub engine_off_decel: f64,
}

impl RateTable {
    pub fn from_accel(accel: f64, ratios: &RateRatios) -> Self {
        Self {
            accel,
            decel: accel * ratios.coast_fraction,
            brake: accel * ratios.brake_multiplier,
            engine_off_decel: accel * ratios.engine_off_fraction,
        }
    }

    /// Signed commanded rate for an intent
    pub fn commanded(&self, intent: &InputIntent) -> f64 {
        if intent.braking {
            -self.brake
        } else if intent.engine_on && intent.accelerating {
            self.accel
        } else if intent.engine_on {
            -self.decel
        } else {
            -self.engine_off_decel
        }
    }
}

/// What the driver is asking for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputIntent {
    pub accelerating: bool,
    pub braking: bool,
    pub engine_on: bool,
}

/// A car on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Current speed (px/s), always within [0, max_speed]
    pub speed: f64,
    pub max_speed: f64,
    pub rates: RateTable,
}

impl Vehicle {
    pub fn new(accel: f64, max_speed: f64, ratios: &RateRatios) -> Self {
        Self {
            speed: 0.0,
            max_speed,
            rates: RateTable::from_accel(accel, ratios),
        }
    }

    /// Integrate one tick of driver intent, returning the new speed
    pub fn step(&mut self, intent: &InputIntent, dt: f64) -> f64 {
        let rate = self.rates.commanded(intent);
        self.apply_rate(rate, dt)
    }

    /// Integrate an arbitrary signed rate, returning the new speed
    pub fn apply_rate(&mut self, rate: f64, dt: f64) -> f64 {
        let dt = sanitize_dt(dt);
        self.speed = (self.speed + rate * dt).clamp(0.0, self.max_speed);
        self.speed
    }

    pub fn reset(&mut self) {
        self.speed = 0.0;
    }
}
