//! NeoRacer - A side-scrolling drag racer
//!
//! Core modules:
//! - `sim`: Race simulation (kinematics, scrolling, countdown, outcome)
//! - `audio`: Engine audio gating and the sink capability
//! - `tuning`: Data-driven race balance
//! - `settings`: Player preferences
//! - `platform`: Frame clock and browser bindings

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioDriver, AudioGateState, AudioSink, EngineAudioGate};
pub use settings::Settings;
pub use tuning::{ConfigError, RaceConfig};

/// Race configuration defaults
pub mod consts {
    /// Player acceleration (px/s²)
    pub const PLAYER_ACCEL_RATE: f64 = 150.0;
    /// Player top speed (px/s)
    pub const PLAYER_MAX_SPEED: f64 = 400.0;
    /// Opponent top speed (px/s) - a touch below the player so a clean run wins
    pub const OPPONENT_MAX_SPEED: f64 = 380.0;
    /// Opponent acceleration as a fraction of the player's
    pub const OPPONENT_ACCEL_RATIO: f64 = 0.8;

    /// Braking rate as a multiple of acceleration
    pub const BRAKE_MULTIPLIER: f64 = 2.0;
    /// Coasting deceleration as a fraction of acceleration
    pub const COAST_FRACTION: f64 = 1.0 / 3.0;
    /// Engine-off deceleration as a fraction of acceleration
    pub const ENGINE_OFF_FRACTION: f64 = 1.0;

    /// Total track length in pixels
    pub const RACE_DISTANCE: f64 = 120_000.0;

    /// Per-frame lerp factor for the visual relative offset
    pub const OFFSET_SMOOTHING_FACTOR: f64 = 0.1;

    /// Countdown starts here and drops by one per interval
    pub const COUNTDOWN_START: u8 = 3;
    pub const COUNTDOWN_INTERVAL: f64 = 1.0;

    /// Seconds in `Finished` before the garage takes over
    pub const RETURN_TO_GARAGE_DELAY: f64 = 5.0;

    /// Speed at which the race sound kicks in and idle loops stop
    pub const RACE_SOUND_SPEED: f64 = 110.0;
    /// Continuous low-speed time before the second idle loop joins
    pub const IDLE_B_DELAY: f64 = 2.0;

    /// Exhaust smoke only below this speed (engine on)
    pub const IDLE_SMOKE_MAX_SPEED: f64 = 60.0;
    /// Road dust only above this speed
    pub const DUST_MIN_SPEED: f64 = 10.0;
    /// Wheels look stopped below this speed
    pub const WHEEL_SPIN_MIN_SPEED: f64 = 5.0;

    /// Largest frame delta fed to the simulation (backgrounded tabs)
    pub const MAX_FRAME_DT: f64 = 0.25;

    /// Slack for comparing accumulated float time against a deadline
    pub const TIMER_EPSILON: f64 = 1e-9;

    /// Parallax layer speed factors relative to the road
    pub const ROAD_SPEED_FACTOR: f64 = 1.0;
    pub const BACKGROUND_SPEED_FACTOR: f64 = 0.3;
    pub const BUILDING_SPEED_FACTOR: f64 = 0.25;
    pub const MOUNTAIN_SPEED_FACTOR: f64 = 0.1;
    pub const SUN_SPEED_FACTOR: f64 = 0.05;
}

/// Sanitize a frame delta: negative, NaN and infinite deltas count as zero
#[inline]
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
