//! Presentation cues derived from the race state
//!
//! Pure functions of speed and scroll. Nothing here feeds back into the race.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal offset of each background layer (px)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParallaxOffsets {
    pub road: f64,
    pub background: f64,
    pub buildings: f64,
    pub mountains: f64,
    pub sun: f64,
}

impl ParallaxOffsets {
    pub fn from_scroll(scroll_distance: f64) -> Self {
        Self {
            road: scroll_distance * ROAD_SPEED_FACTOR,
            background: scroll_distance * BACKGROUND_SPEED_FACTOR,
            buildings: scroll_distance * BUILDING_SPEED_FACTOR,
            mountains: scroll_distance * MOUNTAIN_SPEED_FACTOR,
            sun: scroll_distance * SUN_SPEED_FACTOR,
        }
    }
}

/// Seconds per wheel revolution, `None` when the wheels look still
pub fn wheel_spin_period(speed: f64) -> Option<f64> {
    if speed > WHEEL_SPIN_MIN_SPEED {
        Some((1.0 / (speed * 0.05)).max(0.05))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarCues {
    pub wheel_spin_period: Option<f64>,
    /// Road dust behind the rear wheel
    pub dust: bool,
}

impl CarCues {
    fn new(speed: f64, paused: bool) -> Self {
        Self {
            wheel_spin_period: wheel_spin_period(speed),
            dust: !paused && speed > DUST_MIN_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualCues {
    /// Layers follow the player's scroll
    pub parallax: ParallaxOffsets,
    pub player: CarCues,
    pub opponent: CarCues,
    /// Exhaust smoke from an idling player car
    pub idle_smoke: bool,
}

impl VisualCues {
    pub fn compute(
        player_speed: f64,
        opponent_speed: f64,
        player_scroll: f64,
        engine_on: bool,
        paused: bool,
    ) -> Self {
        Self {
            parallax: ParallaxOffsets::from_scroll(player_scroll),
            player: CarCues::new(player_speed, paused),
            opponent: CarCues::new(opponent_speed, paused),
            idle_smoke: !paused && engine_on && player_speed < IDLE_SMOKE_MAX_SPEED,
        }
    }
}
