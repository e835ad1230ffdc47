use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Village,
    Werewolf,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Village => write!(f, "village"),
            Team::Werewolf => write!(f, "werewolf"),
        }
    }
}

/// The one night action a role may carry. At most one per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightActionKind {
    Kill,
    Investigate,
    Protect,
    SaveOrPoison,
    RevengeKill,
}

/// Why a player died. Night resolution only ever produces `Attacked` or
/// `Poisoned`; the day pipeline adds `Voted` and `Revenge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Attacked,
    Poisoned,
    Voted,
    Revenge,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::Attacked => write!(f, "werewolf attack"),
            DeathCause::Poisoned => write!(f, "mysterious poisoning"),
            DeathCause::Voted => write!(f, "village vote"),
            DeathCause::Revenge => write!(f, "hunter's revenge"),
        }
    }
}
