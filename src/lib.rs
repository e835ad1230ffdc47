//! Rules engine for social-deduction games of the werewolf family.
//!
//! The crate is a pure engine: it owns the phase sequence, the information
//! partition between players, and every rule resolution, while all actual
//! decision making is delegated to [`players::DecisionProvider`]
//! implementations supplied by the caller. [`runner::GameRunner`] ties the
//! pieces together and plays one game to completion.

pub mod channels;
pub mod enums;
pub mod errors;
pub mod game;
pub mod night;
pub mod phases;
pub mod players;
pub mod roles;
pub mod runner;
pub mod transcript;
pub mod vote;

pub use channels::{ChannelManager, Message, Visibility, SYSTEM_SPEAKER};
pub use enums::{DeathCause, NightActionKind, Team};
pub use errors::{GameError, GameResult};
pub use game::{GameConfig, GameState, Player};
pub use phases::{Phase, PhaseMachine, PhaseState};
pub use roles::{Role, RoleRegistry};
pub use runner::GameRunner;
pub use transcript::{GameSummary, LogSink, NullSink, TranscriptSink};
