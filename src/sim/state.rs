//! Race session state and core simulation types
//!
//! Everything one race owns lives here: both cars, the relative offset, the
//! race state machine and the audio gate.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cues::VisualCues;
use super::offset::RelativeOffset;
use super::opponent::{FixedRatioOpponent, OpponentController, OpponentView};
use super::race::{RaceEvent, RaceState, RaceStateMachine};
use super::scroll::WorldPosition;
use super::vehicle::{InputIntent, Vehicle};
use crate::audio::{AudioGateState, EngineAudioGate, GateInput};
use crate::tuning::RaceConfig;

/// Input for a single tick, set by the UI layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Gas pedal held
    pub accelerating: bool,
    /// Brake pedal held
    pub braking: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Result of an engine toggle request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineToggle {
    /// Engine on, countdown running
    Started,
    /// Engine off, race reset
    Stopped,
    /// Car still rolling; nothing changed
    Rejected { speed: f64 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// A car and where it is on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub vehicle: Vehicle,
    pub position: WorldPosition,
}

impl Car {
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            position: WorldPosition::default(),
        }
    }

    pub fn speed(&self) -> f64 {
        self.vehicle.speed
    }

    pub fn distance(&self) -> f64 {
        self.position.distance_traveled()
    }

    pub fn reset(&mut self) {
        self.vehicle.reset();
        self.position.reset();
    }
}

/// Read-only view of one tick for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub player_speed: f64,
    pub opponent_speed: f64,
    pub player_distance: f64,
    pub opponent_distance: f64,
    pub player_scroll: f64,
    pub opponent_scroll: f64,
    pub target_relative_offset: f64,
    pub visual_relative_offset: f64,
    pub race_state: RaceState,
    pub engine_on: bool,
    pub paused: bool,
    pub auto_brake: bool,
    pub return_to_garage: bool,
    pub audio_gate: AudioGateState,
    pub cues: VisualCues,
}

/// One race session
#[derive(Debug)]
pub struct RaceSession {
    pub config: RaceConfig,
    pub player: Car,
    pub opponent: Car,
    pub offset: RelativeOffset,
    pub race: RaceStateMachine,
    pub audio: EngineAudioGate,
    /// Gate output from the latest tick
    pub audio_state: AudioGateState,
    pub engine_on: bool,
    pub paused: bool,
    pub muted: bool,
    pub(crate) opponent_ai: Box<dyn OpponentController>,
    pub(crate) events: Vec<RaceEvent>,
}

impl RaceSession {
    /// New session with the default opponent
    pub fn new(config: RaceConfig) -> Self {
        Self::with_opponent(config, Box::new(FixedRatioOpponent))
    }

    pub fn with_opponent(config: RaceConfig, opponent_ai: Box<dyn OpponentController>) -> Self {
        Self {
            player: Car::new(config.player_vehicle()),
            opponent: Car::new(config.opponent_vehicle()),
            offset: RelativeOffset::default(),
            race: RaceStateMachine::new(&config),
            audio: EngineAudioGate::new(config.race_sound_speed, config.idle_b_delay),
            audio_state: AudioGateState::default(),
            engine_on: false,
            paused: false,
            muted: false,
            opponent_ai,
            events: Vec::new(),
            config,
        }
    }

    pub fn race_state(&self) -> RaceState {
        self.race.state()
    }

    /// Switch the engine on or off. Both directions need the player stopped.
    pub fn toggle_engine(&mut self) -> EngineToggle {
        let speed = self.player.speed();
        if speed > 0.0 {
            log::debug!("Engine toggle rejected at speed {:.1}", speed);
            return EngineToggle::Rejected { speed };
        }

        if self.engine_on {
            self.engine_on = false;
            self.paused = false;
            self.race.stop();
            self.events.push(RaceEvent::EngineStopped);
            log::info!("Engine off");
            EngineToggle::Stopped
        } else {
            self.engine_on = true;
            self.reset_course();
            self.events.push(RaceEvent::EngineStarted);
            log::info!("Engine on");
            self.race.start_countdown(&mut self.events);
            EngineToggle::Started
        }
    }

    /// Flip the pause flag. Pausing needs the engine running.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.paused = false;
            self.events.push(RaceEvent::Resumed);
            log::info!("Resumed");
        } else if self.engine_on {
            self.paused = true;
            self.events.push(RaceEvent::Paused);
            log::info!("Paused");
        } else {
            log::debug!("Pause ignored with engine off");
        }
    }

    /// Kinematics intent for the player this tick, after the finish-line override
    pub fn player_intent(&self, input: &TickInput) -> InputIntent {
        if self.race.auto_brake() {
            InputIntent {
                accelerating: false,
                braking: true,
                engine_on: self.engine_on,
            }
        } else {
            InputIntent {
                accelerating: input.accelerating,
                braking: input.braking,
                engine_on: self.engine_on,
            }
        }
    }

    pub fn opponent_view(&self) -> OpponentView {
        OpponentView {
            running: self.race.is_running(),
            engine_on: self.engine_on,
            speed: self.opponent.speed(),
            distance: self.opponent.distance(),
            player_distance: self.player.distance(),
        }
    }

    pub fn gate_input(&self) -> GateInput {
        GateInput {
            speed: self.player.speed(),
            engine_on: self.engine_on,
            paused: self.paused,
            muted: self.muted,
        }
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            player_speed: self.player.speed(),
            opponent_speed: self.opponent.speed(),
            player_distance: self.player.distance(),
            opponent_distance: self.opponent.distance(),
            player_scroll: self.player.position.scroll_distance,
            opponent_scroll: self.opponent.position.scroll_distance,
            target_relative_offset: self.offset.target,
            visual_relative_offset: self.offset.visual,
            race_state: self.race.state(),
            engine_on: self.engine_on,
            paused: self.paused,
            auto_brake: self.race.auto_brake(),
            return_to_garage: self.race.return_to_garage(),
            audio_gate: self.audio_state,
            cues: VisualCues::compute(
                self.player.speed(),
                self.opponent.speed(),
                self.player.position.scroll_distance,
                self.engine_on,
                self.paused,
            ),
        }
    }

    /// Leave the race screen: engine off, everything back to zero
    pub fn abandon(&mut self) {
        self.engine_on = false;
        self.paused = false;
        self.race.stop();
        self.reset_course();
        self.events.clear();
        log::info!("Race session abandoned");
    }

    /// Events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Zero both cars, the offset and the audio gate for a fresh start
    fn reset_course(&mut self) {
        self.player.reset();
        self.opponent.reset();
        self.offset.reset();
        self.audio.reset();
        self.audio_state = AudioGateState::default();
        self.opponent_ai.reset();
    }
}
