use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the werewolf engine
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("role pool size ({roles}) does not match player count ({players})")]
    RoleCountMismatch { roles: usize, players: usize },

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("illegal phase transition: {details}")]
    IllegalTransition { details: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("decision provider failed for {player}: {message}")]
    Provider { player: String, message: String },
}

/// Result type alias for engine operations
pub type GameResult<T> = Result<T, GameError>;

/// Helper methods for creating common errors
impl GameError {
    pub fn illegal_transition(details: impl Into<String>) -> Self {
        Self::IllegalTransition {
            details: details.into(),
        }
    }

    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    pub fn provider(player: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            player: player.into(),
            message: message.into(),
        }
    }
}
