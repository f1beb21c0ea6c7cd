//! Race simulation module
//!
//! All race logic lives here. This module must stay pure:
//! - Time only enters through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Fixed step order inside a tick
//! - No rendering or platform dependencies

pub mod cues;
pub mod driver;
pub mod offset;
pub mod opponent;
pub mod race;
pub mod scroll;
pub mod state;
pub mod tick;
pub mod timer;
pub mod vehicle;

pub use cues::{CarCues, ParallaxOffsets, VisualCues};
pub use driver::{FrameOutput, RaceDriver};
pub use offset::{RelativeOffset, SmoothingMode};
pub use opponent::{
    FixedRatioOpponent, OpponentController, OpponentView, SurgeTuning, SurgingOpponent,
};
pub use race::{Outcome, RaceEvent, RaceState, RaceStateMachine, resolve_finish};
pub use scroll::WorldPosition;
pub use state::{Car, EngineToggle, RaceSession, RaceSnapshot, TickInput};
pub use tick::tick;
pub use timer::OneShotTimer;
pub use vehicle::{InputIntent, RateRatios, RateTable, Vehicle};
