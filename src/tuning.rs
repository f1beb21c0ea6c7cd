//! Race balance
//!
//! One authoritative configuration for both cars, the track, the countdown and
//! the audio thresholds. Set once when a session is built; loadable from JSON
//! so balance can be tweaked without a rebuild.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::offset::SmoothingMode;
use crate::sim::opponent::SurgeTuning;
use crate::sim::vehicle::{RateRatios, Vehicle};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("smoothing factor must be in (0, 1) (got {0})")]
    SmoothingFactor(f64),
}

/// Complete race tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Player acceleration (px/s²)
    pub player_accel: f64,
    pub player_max_speed: f64,
    /// Opponent acceleration as a fraction of `player_accel`
    pub opponent_accel_ratio: f64,
    pub opponent_max_speed: f64,
    /// Shared brake/coast/engine-off ratios
    pub ratios: RateRatios,

    /// Track length (px)
    pub race_distance: f64,
    pub smoothing: SmoothingMode,

    pub countdown_start: u8,
    /// Seconds per countdown step
    pub countdown_interval: f64,
    pub return_to_garage_delay: f64,

    /// Race sound threshold; idle loops play below it
    pub race_sound_speed: f64,
    pub idle_b_delay: f64,

    /// Used when the surging opponent is selected
    pub surge: SurgeTuning,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            player_accel: PLAYER_ACCEL_RATE,
            player_max_speed: PLAYER_MAX_SPEED,
            opponent_accel_ratio: OPPONENT_ACCEL_RATIO,
            opponent_max_speed: OPPONENT_MAX_SPEED,
            ratios: RateRatios::default(),
            race_distance: RACE_DISTANCE,
            smoothing: SmoothingMode::default(),
            countdown_start: COUNTDOWN_START,
            countdown_interval: COUNTDOWN_INTERVAL,
            return_to_garage_delay: RETURN_TO_GARAGE_DELAY,
            race_sound_speed: RACE_SOUND_SPEED,
            idle_b_delay: IDLE_B_DELAY,
            surge: SurgeTuning::default(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl RaceConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player_accel", self.player_accel)?;
        positive("player_max_speed", self.player_max_speed)?;
        positive("opponent_accel_ratio", self.opponent_accel_ratio)?;
        positive("opponent_max_speed", self.opponent_max_speed)?;
        positive("ratios.brake_multiplier", self.ratios.brake_multiplier)?;
        positive("ratios.coast_fraction", self.ratios.coast_fraction)?;
        positive("ratios.engine_off_fraction", self.ratios.engine_off_fraction)?;
        positive("race_distance", self.race_distance)?;
        positive("countdown_interval", self.countdown_interval)?;
        positive("return_to_garage_delay", self.return_to_garage_delay)?;
        positive("race_sound_speed", self.race_sound_speed)?;
        positive("idle_b_delay", self.idle_b_delay)?;
        positive("surge.interval", self.surge.interval)?;

        match self.smoothing {
            SmoothingMode::ConstantFactor { factor } => {
                if !(factor > 0.0 && factor < 1.0) {
                    return Err(ConfigError::SmoothingFactor(factor));
                }
            }
            SmoothingMode::FrameRateIndependent { rate } => positive("smoothing.rate", rate)?,
        }
        Ok(())
    }

    pub fn opponent_accel(&self) -> f64 {
        self.player_accel * self.opponent_accel_ratio
    }

    pub fn player_vehicle(&self) -> Vehicle {
        Vehicle::new(self.player_accel, self.player_max_speed, &self.ratios)
    }

    pub fn opponent_vehicle(&self) -> Vehicle {
        Vehicle::new(self.opponent_accel(), self.opponent_max_speed, &self.ratios)
    }
}
