//! Engine audio gating
//!
//! Decides which engine sounds should be active from the per-tick race state.
//! Playback itself belongs to an [`AudioSink`] supplied by the platform; the
//! simulation never owns audio resources.

use serde::{Deserialize, Serialize};

use crate::consts::{IDLE_B_DELAY, RACE_SOUND_SPEED};
use crate::sim::timer::OneShotTimer;

/// Looping engine sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineLoop {
    /// Idle loop, starts with the engine
    IdleA,
    /// Second idle loop layered in after a sustained idle
    IdleB,
}

/// Sounds that play once per trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneShotCue {
    /// Engine roar when the car gets up to speed
    RaceSound,
}

/// What the gate looks at each tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateInput {
    pub speed: f64,
    pub engine_on: bool,
    pub paused: bool,
    pub muted: bool,
}

/// Which sounds should be active this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioGateState {
    pub idle_a: bool,
    pub idle_b: bool,
    /// True only on the tick the race sound fires
    pub race_once: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineAudioGate {
    race_sound_speed: f64,
    idle_b_delay: f64,
    /// Race sound already played in the current high-speed phase
    race_sound_fired: bool,
    idle_b_timer: OneShotTimer,
    idle_b_on: bool,
    /// Inside a continuous engine-on, low-speed, audible stretch
    low_phase: bool,
}

impl Default for EngineAudioGate {
    fn default() -> Self {
        Self::new(RACE_SOUND_SPEED, IDLE_B_DELAY)
    }
}

impl EngineAudioGate {
    pub fn new(race_sound_speed: f64, idle_b_delay: f64) -> Self {
        Self {
            race_sound_speed,
            idle_b_delay,
            race_sound_fired: false,
            idle_b_timer: OneShotTimer::default(),
            idle_b_on: false,
            low_phase: false,
        }
    }

    pub fn race_sound_fired(&self) -> bool {
        self.race_sound_fired
    }

    /// Evaluate the decision table for one tick
    pub fn update(&mut self, input: &GateInput, dt: f64) -> AudioGateState {
        if !input.engine_on {
            self.race_sound_fired = false;
            self.leave_low_phase();
            return AudioGateState::default();
        }

        if input.muted || input.paused {
            // Latch survives a pause; the idle timer does not
            self.leave_low_phase();
            return AudioGateState::default();
        }

        if input.speed < self.race_sound_speed {
            self.race_sound_fired = false;
            if !self.low_phase {
                self.low_phase = true;
                self.idle_b_timer.arm(self.idle_b_delay);
            } else if self.idle_b_timer.advance(dt).is_some() {
                log::debug!("Second idle loop engaged");
                self.idle_b_on = true;
            }
            return AudioGateState {
                idle_a: true,
                idle_b: self.idle_b_on,
                race_once: false,
            };
        }

        self.leave_low_phase();
        let race_once = !self.race_sound_fired;
        self.race_sound_fired = true;
        AudioGateState {
            idle_a: false,
            idle_b: false,
            race_once,
        }
    }

    pub fn reset(&mut self) {
        self.race_sound_fired = false;
        self.leave_low_phase();
    }

    fn leave_low_phase(&mut self) {
        self.low_phase = false;
        self.idle_b_on = false;
        self.idle_b_timer.cancel();
    }
}

/// Playback capability provided by the platform
pub trait AudioSink {
    fn start_loop(&mut self, which: EngineLoop, volume: f32);
    fn stop_loop(&mut self, which: EngineLoop);
    fn play_once(&mut self, cue: OneShotCue, volume: f32);
}

/// Turns gate states into sink calls, only on changes
#[derive(Debug, Clone, Default)]
pub struct AudioDriver {
    previous: AudioGateState,
    volume: f32,
}

impl AudioDriver {
    pub fn new(volume: f32) -> Self {
        Self {
            previous: AudioGateState::default(),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn apply(&mut self, gate: &AudioGateState, sink: &mut dyn AudioSink) {
        let volume = self.volume;
        let loops = [
            (EngineLoop::IdleA, self.previous.idle_a, gate.idle_a),
            (EngineLoop::IdleB, self.previous.idle_b, gate.idle_b),
        ];
        for (which, was, is) in loops {
            match (was, is) {
                (false, true) => sink.start_loop(which, volume),
                (true, false) => sink.stop_loop(which),
                _ => {}
            }
        }
        if gate.race_once {
            sink.play_once(OneShotCue::RaceSound, volume);
        }
        self.previous = *gate;
    }
}

/// A sink call, for platforms that hand playback to another runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AudioCommand {
    Start { which: EngineLoop, volume: f32 },
    Stop { which: EngineLoop },
    Play { cue: OneShotCue, volume: f32 },
}

/// Sink that queues calls until drained
#[derive(Debug, Clone, Default)]
pub struct CommandQueueSink {
    commands: Vec<AudioCommand>,
}

impl CommandQueueSink {
    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl AudioSink for CommandQueueSink {
    fn start_loop(&mut self, which: EngineLoop, volume: f32) {
        self.commands.push(AudioCommand::Start { which, volume });
    }

    fn stop_loop(&mut self, which: EngineLoop) {
        self.commands.push(AudioCommand::Stop { which });
    }

    fn play_once(&mut self, cue: OneShotCue, volume: f32) {
        self.commands.push(AudioCommand::Play { cue, volume });
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn start_loop(&mut self, which: EngineLoop, volume: f32) {
        log::info!("audio: start {:?} at {:.2}", which, volume);
    }

    fn stop_loop(&mut self, which: EngineLoop) {
        log::info!("audio: stop {:?}", which);
    }

    fn play_once(&mut self, cue: OneShotCue, volume: f32) {
        log::info!("audio: play {:?} at {:.2}", cue, volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(speed: f64) -> GateInput {
        GateInput {
            speed,
            engine_on: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_off_is_silent() {
        let mut gate = EngineAudioGate::default();
        let out = gate.update(&GateInput::default(), 0.1);
        assert_eq!(out, AudioGateState::default());
    }

    #[test]
    fn test_idle_b_joins_after_two_seconds() {
        let mut gate = EngineAudioGate::default();
        let first = gate.update(&on(50.0), 0.0);
        assert!(first.idle_a);
        assert!(!first.idle_b);

        for i in 1..=25 {
            let out = gate.update(&on(50.0), 0.1);
            assert!(out.idle_a);
            assert!(!out.race_once);
            assert_eq!(out.idle_b, i >= 20, "tick {}", i);
        }
    }

    #[test]
    fn test_high_speed_cancels_idle_b_timer() {
        let mut gate = EngineAudioGate::default();
        gate.update(&on(50.0), 0.0);
        for _ in 0..15 {
            gate.update(&on(50.0), 0.1);
        }
        // Brief burst over the threshold
        gate.update(&on(120.0), 0.1);

        // No partial credit: the timer restarts from zero
        gate.update(&on(50.0), 0.1);
        for _ in 0..19 {
            assert!(!gate.update(&on(50.0), 0.1).idle_b);
        }
        assert!(gate.update(&on(50.0), 0.1).idle_b);
    }

    #[test]
    fn test_race_sound_fires_once_per_phase() {
        let mut gate = EngineAudioGate::default();
        let first = gate.update(&on(110.0), 0.1);
        assert!(first.race_once);
        assert!(!first.idle_a);
        for _ in 0..10 {
            assert!(!gate.update(&on(200.0), 0.1).race_once);
        }

        // Dropping below the threshold re-arms it
        gate.update(&on(80.0), 0.1);
        assert!(gate.update(&on(150.0), 0.1).race_once);
    }

    #[test]
    fn test_muted_or_paused_silences_everything() {
        let mut gate = EngineAudioGate::default();
        let muted = GateInput {
            muted: true,
            ..on(50.0)
        };
        assert_eq!(gate.update(&muted, 0.1), AudioGateState::default());

        let paused = GateInput {
            paused: true,
            ..on(200.0)
        };
        assert_eq!(gate.update(&paused, 0.1), AudioGateState::default());
        assert!(!gate.race_sound_fired());
    }

    #[test]
    fn test_pause_keeps_race_latch() {
        let mut gate = EngineAudioGate::default();
        assert!(gate.update(&on(200.0), 0.1).race_once);
        let paused = GateInput {
            paused: true,
            ..on(200.0)
        };
        gate.update(&paused, 0.1);
        assert!(!gate.update(&on(200.0), 0.1).race_once);
    }

    #[test]
    fn test_driver_only_calls_on_edges() {
        let mut driver = AudioDriver::new(0.5);
        let mut sink = CommandQueueSink::default();
        let idle = AudioGateState {
            idle_a: true,
            ..Default::default()
        };
        driver.apply(&idle, &mut sink);
        driver.apply(&idle, &mut sink);
        driver.apply(
            &AudioGateState {
                race_once: true,
                ..Default::default()
            },
            &mut sink,
        );
        driver.apply(&AudioGateState::default(), &mut sink);
        assert_eq!(
            sink.drain(),
            vec![
                AudioCommand::Start {
                    which: EngineLoop::IdleA,
                    volume: 0.5
                },
                AudioCommand::Stop {
                    which: EngineLoop::IdleA
                },
                AudioCommand::Play {
                    cue: OneShotCue::RaceSound,
                    volume: 0.5
                },
            ]
        );
        assert!(sink.drain().is_empty());
    }
}
