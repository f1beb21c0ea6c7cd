//! Race state machine
//!
//! Idle → Countdown(3..1) → Running → Finished(Win | Lose). Switching the
//! engine off drops back to Idle from anywhere.

use serde::{Deserialize, Serialize};

use super::timer::OneShotTimer;
use crate::tuning::RaceConfig;

/// Result of a finished race, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RaceState {
    /// Engine off, nothing scheduled
    #[default]
    Idle,
    /// Seconds left before the start
    Countdown(u8),
    /// Race on
    Running,
    /// Someone crossed the line
    Finished(Outcome),
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceEvent {
    EngineStarted,
    EngineStopped,
    Countdown(u8),
    RaceStarted,
    Finished(Outcome),
    ReturnToGarage,
    Paused,
    Resumed,
}

/// Decide the outcome for one evaluation. Both cars over the line in the same
/// tick goes to the strictly longer distance; a dead heat is a loss.
pub fn resolve_finish(player: f64, opponent: f64, race_distance: f64) -> Option<Outcome> {
    match (player >= race_distance, opponent >= race_distance) {
        (false, false) => None,
        (true, false) => Some(Outcome::Win),
        (false, true) => Some(Outcome::Lose),
        (true, true) if player > opponent => Some(Outcome::Win),
        (true, true) => Some(Outcome::Lose),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceStateMachine {
    state: RaceState,
    countdown_timer: OneShotTimer,
    return_timer: OneShotTimer,
    /// Player brakes on every tick after the finish
    auto_brake: bool,
    return_to_garage: bool,
    countdown_start: u8,
    countdown_interval: f64,
    race_distance: f64,
    return_delay: f64,
}

impl RaceStateMachine {
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            state: RaceState::Idle,
            countdown_timer: OneShotTimer::default(),
            return_timer: OneShotTimer::default(),
            auto_brake: false,
            return_to_garage: false,
            countdown_start: config.countdown_start,
            countdown_interval: config.countdown_interval,
            race_distance: config.race_distance,
            return_delay: config.return_to_garage_delay,
        }
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RaceState::Running
    }

    pub fn auto_brake(&self) -> bool {
        self.auto_brake
    }

    pub fn return_to_garage(&self) -> bool {
        self.return_to_garage
    }

    /// Engine switched on: begin a fresh countdown
    pub fn start_countdown(&mut self, events: &mut Vec<RaceEvent>) {
        self.clear_flags();
        self.state = RaceState::Countdown(self.countdown_start);
        events.push(RaceEvent::Countdown(self.countdown_start));
        log::info!("Countdown started from {}", self.countdown_start);

        if self.countdown_start == 0 {
            self.begin_race(events);
        } else {
            self.countdown_timer.arm(self.countdown_interval);
        }
    }

    /// Engine switched off: cancel everything and go back to Idle
    pub fn stop(&mut self) {
        if self.state != RaceState::Idle {
            log::info!("Race reset from {:?}", self.state);
        }
        self.clear_flags();
        self.state = RaceState::Idle;
    }

    /// Drop the countdown by one. Returns false (and does nothing) when no
    /// countdown is active.
    pub fn countdown_tick(&mut self, events: &mut Vec<RaceEvent>) -> bool {
        let RaceState::Countdown(n) = self.state else {
            log::debug!("Countdown tick ignored in {:?}", self.state);
            return false;
        };

        let next = n.saturating_sub(1);
        self.state = RaceState::Countdown(next);
        events.push(RaceEvent::Countdown(next));
        if next == 0 {
            self.begin_race(events);
        }
        true
    }

    /// Advance timers and check the finish line against the latest distances
    pub fn advance(
        &mut self,
        dt: f64,
        player_distance: f64,
        opponent_distance: f64,
        events: &mut Vec<RaceEvent>,
    ) {
        match self.state {
            RaceState::Idle => {}
            RaceState::Countdown(_) => self.advance_countdown(dt, events),
            RaceState::Running => {
                if let Some(outcome) =
                    resolve_finish(player_distance, opponent_distance, self.race_distance)
                {
                    self.finish(outcome, events);
                }
            }
            RaceState::Finished(_) => {
                if self.return_timer.advance(dt).is_some() {
                    self.return_to_garage = true;
                    events.push(RaceEvent::ReturnToGarage);
                    log::info!("Returning to garage");
                }
            }
        }
    }

    fn advance_countdown(&mut self, dt: f64, events: &mut Vec<RaceEvent>) {
        let mut fired = self.countdown_timer.advance(dt);
        while let Some(overshoot) = fired {
            self.countdown_tick(events);
            if !matches!(self.state, RaceState::Countdown(_)) {
                break;
            }
            self.countdown_timer.arm(self.countdown_interval);
            // A long frame can cover more than one second
            fired = self.countdown_timer.advance(overshoot);
        }
    }

    fn begin_race(&mut self, events: &mut Vec<RaceEvent>) {
        self.countdown_timer.cancel();
        self.state = RaceState::Running;
        events.push(RaceEvent::RaceStarted);
        log::info!("Race started");
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<RaceEvent>) {
        self.state = RaceState::Finished(outcome);
        self.auto_brake = true;
        self.return_timer.arm(self.return_delay);
        events.push(RaceEvent::Finished(outcome));
        log::info!("Race finished: {:?}", outcome);
    }

    fn clear_flags(&mut self) {
        self.countdown_timer.cancel();
        self.return_timer.cancel();
        self.auto_brake = false;
        self.return_to_garage = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RaceStateMachine {
        RaceStateMachine::new(&RaceConfig {
            race_distance: 20_000.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_countdown_sequence() {
        let mut race = machine();
        let mut events = Vec::new();
        assert_eq!(race.state(), RaceState::Idle);

        race.start_countdown(&mut events);
        assert_eq!(race.state(), RaceState::Countdown(3));

        let mut seen = vec![race.state()];
        for _ in 0..30 {
            race.advance(0.1, 0.0, 0.0, &mut events);
            if seen.last() != Some(&race.state()) {
                seen.push(race.state());
            }
        }
        assert_eq!(
            seen,
            vec![
                RaceState::Countdown(3),
                RaceState::Countdown(2),
                RaceState::Countdown(1),
                RaceState::Running,
            ]
        );
        // Countdown(0) is reported as an event, then Running the same tick
        assert_eq!(
            events,
            vec![
                RaceEvent::Countdown(3),
                RaceEvent::Countdown(2),
                RaceEvent::Countdown(1),
                RaceEvent::Countdown(0),
                RaceEvent::RaceStarted,
            ]
        );
    }

    #[test]
    fn test_long_frame_covers_several_seconds() {
        let mut race = machine();
        let mut events = Vec::new();
        race.start_countdown(&mut events);
        race.advance(2.5, 0.0, 0.0, &mut events);
        assert_eq!(race.state(), RaceState::Countdown(1));
        race.advance(0.5, 0.0, 0.0, &mut events);
        assert!(race.is_running());
    }

    #[test]
    fn test_countdown_tick_without_countdown_is_noop() {
        let mut race = machine();
        let mut events = Vec::new();
        assert!(!race.countdown_tick(&mut events));
        assert_eq!(race.state(), RaceState::Idle);
        assert!(events.is_empty());
    }

    #[test]
    fn test_resolve_finish() {
        assert_eq!(resolve_finish(19_999.0, 15_000.0, 20_000.0), None);
        assert_eq!(resolve_finish(20_000.0, 15_000.0, 20_000.0), Some(Outcome::Win));
        assert_eq!(resolve_finish(15_000.0, 20_001.0, 20_000.0), Some(Outcome::Lose));
        assert_eq!(resolve_finish(20_010.0, 20_005.0, 20_000.0), Some(Outcome::Win));
        assert_eq!(resolve_finish(20_005.0, 20_010.0, 20_000.0), Some(Outcome::Lose));
        assert_eq!(resolve_finish(20_005.0, 20_005.0, 20_000.0), Some(Outcome::Lose));
    }

    #[test]
    fn test_finish_sets_auto_brake_and_return_timer() {
        let mut race = machine();
        let mut events = Vec::new();
        race.start_countdown(&mut events);
        race.advance(3.0, 0.0, 0.0, &mut events);
        assert!(race.is_running());

        race.advance(0.1, 20_000.0, 15_000.0, &mut events);
        assert_eq!(race.state(), RaceState::Finished(Outcome::Win));
        assert!(race.auto_brake());
        assert!(!race.return_to_garage());

        events.clear();
        for _ in 0..49 {
            race.advance(0.1, 20_100.0, 15_100.0, &mut events);
        }
        assert!(!race.return_to_garage());
        race.advance(0.1, 20_100.0, 15_100.0, &mut events);
        assert!(race.return_to_garage());
        assert_eq!(events, vec![RaceEvent::ReturnToGarage]);

        // Fires once
        race.advance(1.0, 20_100.0, 15_100.0, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(race.state(), RaceState::Finished(Outcome::Win));
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut race = machine();
        let mut events = Vec::new();
        race.start_countdown(&mut events);
        race.advance(3.0, 0.0, 0.0, &mut events);
        race.advance(0.1, 0.0, 25_000.0, &mut events);
        assert_eq!(race.state(), RaceState::Finished(Outcome::Lose));

        race.stop();
        assert_eq!(race.state(), RaceState::Idle);
        assert!(!race.auto_brake());
        assert!(!race.return_to_garage());
    }

    #[test]
    fn test_zero_countdown_starts_immediately() {
        let mut race = RaceStateMachine::new(&RaceConfig {
            countdown_start: 0,
            ..Default::default()
        });
        let mut events = Vec::new();
        race.start_countdown(&mut events);
        assert!(race.is_running());
    }
}
