//! Per-frame simulation tick
//!
//! Core race loop. The order of the steps below is load-bearing: the finish
//! line is checked against positions integrated from this tick's speeds.

use super::state::{RaceSession, TickInput};
use crate::sanitize_dt;

/// Advance the race by `dt` seconds
pub fn tick(session: &mut RaceSession, input: &TickInput, dt: f64) {
    let dt = sanitize_dt(dt);

    // Handle pause toggle
    if input.pause {
        session.toggle_pause();
    }

    if session.paused {
        // Physics frozen; the gate still needs to hear about the pause
        let gate_input = session.gate_input();
        session.audio_state = session.audio.update(&gate_input, dt);
        return;
    }

    // 1. Commanded rates
    let intent = session.player_intent(input);
    let view = session.opponent_view();
    let opponent_rate =
        session
            .opponent_ai
            .commanded_accel(&view, &session.opponent.vehicle.rates, dt);

    // 2. Kinematics
    let player_speed = session.player.vehicle.step(&intent, dt);
    let opponent_speed = session.opponent.vehicle.apply_rate(opponent_rate, dt);

    // 3. Scroll
    session.player.position.step(player_speed, dt);
    session.opponent.position.step(opponent_speed, dt);

    // 4 + 5. Relative offset from the new speeds, then the visual follower
    session.offset.integrate(player_speed, opponent_speed, dt);
    session.offset.smooth(&session.config.smoothing, dt);

    // 6. Race transitions on the new positions
    let player_distance = session.player.distance();
    let opponent_distance = session.opponent.distance();
    session
        .race
        .advance(dt, player_distance, opponent_distance, &mut session.events);

    // 7. Audio
    let gate_input = session.gate_input();
    session.audio_state = session.audio.update(&gate_input, dt);
}
