//! Frame driver
//!
//! Owns a [`RaceSession`] plus everything the host loop would otherwise
//! juggle: the frame clock, held inputs, one-shot inputs, focus and the
//! audio edge detector. Hosts call [`RaceDriver::frame`] once per display
//! frame with a monotonic timestamp.

use serde::Serialize;

use super::race::RaceEvent;
use super::state::{EngineToggle, RaceSession, RaceSnapshot, TickInput};
use super::tick::tick;
use crate::audio::{AudioCommand, AudioDriver, AudioGateState, AudioSink, CommandQueueSink};
use crate::platform::FrameClock;
use crate::settings::Settings;
use crate::tuning::RaceConfig;

/// Everything a host needs to present one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub snapshot: RaceSnapshot,
    pub events: Vec<RaceEvent>,
    pub audio: Vec<AudioCommand>,
}

#[derive(Debug)]
pub struct RaceDriver {
    session: RaceSession,
    clock: FrameClock,
    input: TickInput,
    settings: Settings,
    audio: AudioDriver,
    focused: bool,
}

impl RaceDriver {
    pub fn new(config: RaceConfig, settings: Settings) -> Self {
        Self::with_session(RaceSession::new(config), settings)
    }

    pub fn with_session(mut session: RaceSession, settings: Settings) -> Self {
        session.muted = settings.effective_mute(true);
        Self {
            session,
            clock: FrameClock::default(),
            input: TickInput::default(),
            audio: AudioDriver::new(settings.effective_sfx_volume()),
            settings,
            focused: true,
        }
    }

    pub fn session(&self) -> &RaceSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_accelerating(&mut self, held: bool) {
        self.input.accelerating = held;
    }

    pub fn set_braking(&mut self, held: bool) {
        self.input.braking = held;
    }

    /// Queue a pause toggle for the next frame
    pub fn request_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn toggle_engine(&mut self) -> EngineToggle {
        let result = self.session.toggle_engine();
        if result == EngineToggle::Started {
            // First frame of a new race is a warm-up frame
            self.clock.restart();
        }
        result
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.set_volume(self.settings.effective_sfx_volume());
        self.session.muted = self.settings.effective_mute(self.focused);
    }

    /// Window focus changed. Losing focus pauses a running engine.
    pub fn set_focused(&mut self, focused: bool) {
        if !focused && self.focused && self.session.engine_on && !self.session.paused {
            self.input.pause = true;
            log::info!("Auto-paused (window blur)");
        }
        self.focused = focused;
        self.session.muted = self.settings.effective_mute(focused);
    }

    /// Advance to `now` (seconds) and push audio changes to `sink`
    pub fn frame(&mut self, now: f64, sink: &mut dyn AudioSink) -> RaceSnapshot {
        let dt = self.clock.delta(now);
        tick(&mut self.session, &self.input, dt);

        // Clear one-shot inputs after processing
        self.input.pause = false;

        self.audio.apply(&self.session.audio_state, sink);
        self.session.snapshot()
    }

    /// [`RaceDriver::frame`] for hosts that take audio as data
    pub fn frame_output(&mut self, now: f64, sink: &mut CommandQueueSink) -> FrameOutput {
        let snapshot = self.frame(now, sink);
        FrameOutput {
            snapshot,
            events: self.session.drain_events(),
            audio: sink.drain(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        self.session.drain_events()
    }

    /// Leave the race screen and silence everything
    pub fn leave(&mut self, sink: &mut dyn AudioSink) {
        self.session.abandon();
        self.clock.restart();
        self.input = TickInput::default();
        self.audio.apply(&AudioGateState::default(), sink);
    }
}
