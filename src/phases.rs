use serde::{Deserialize, Serialize};

use crate::errors::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Night,
    DayAnnouncement,
    DayDiscussion,
    DayVote,
    GameOver,
}

/// Phase tag plus the round and discussion sub-round counters. Carries no
/// roster knowledge and performs no I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: Phase,
    /// Night/day number, 1-based. 0 only during setup.
    pub round: u32,
    /// Discussion sub-round within a day, 1-based. 0 outside discussion.
    pub discussion_round: u32,
}

impl PhaseState {
    pub fn label(&self) -> String {
        match self.phase {
            Phase::Setup => "setup".to_string(),
            Phase::Night => format!("night_{}", self.round),
            Phase::DayAnnouncement => format!("day_{}_announcement", self.round),
            Phase::DayDiscussion => format!("day_{}_discussion", self.round),
            Phase::DayVote => format!("day_{}_vote", self.round),
            Phase::GameOver => "game_over".to_string(),
        }
    }
}

/// The authoritative phase sequencer:
/// `Setup -> Night(r) -> DayAnnouncement(r) -> DayDiscussion(r, 1..=d)
///  -> DayVote(r) -> Night(r+1) -> ... -> GameOver`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMachine {
    state: PhaseState,
    discussion_rounds: u32,
}

impl PhaseMachine {
    pub fn new(discussion_rounds: u32) -> Self {
        PhaseMachine {
            state: PhaseState {
                phase: Phase::Setup,
                round: 0,
                discussion_round: 0,
            },
            discussion_rounds,
        }
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    /// `Setup -> Night(1)`. Fails anywhere else.
    pub fn start(&mut self) -> GameResult<&PhaseState> {
        if self.state.phase != Phase::Setup {
            return Err(GameError::illegal_transition(format!(
                "cannot start from {}",
                self.state.label()
            )));
        }
        self.state = PhaseState {
            phase: Phase::Night,
            round: 1,
            discussion_round: 0,
        };
        Ok(&self.state)
    }

    /// Advances one step along the legal transition table. `GameOver` is
    /// absorbing: further advances are no-ops. Advancing an unstarted
    /// machine is a programming error.
    pub fn advance(&mut self) -> GameResult<&PhaseState> {
        let PhaseState {
            phase,
            round,
            discussion_round,
        } = self.state;

        self.state = match phase {
            Phase::Setup => {
                return Err(GameError::illegal_transition(
                    "cannot advance before start",
                ))
            }
            Phase::Night => PhaseState {
                phase: Phase::DayAnnouncement,
                round,
                discussion_round: 0,
            },
            Phase::DayAnnouncement => PhaseState {
                phase: Phase::DayDiscussion,
                round,
                discussion_round: 1,
            },
            Phase::DayDiscussion => {
                if discussion_round < self.discussion_rounds {
                    PhaseState {
                        phase: Phase::DayDiscussion,
                        round,
                        discussion_round: discussion_round + 1,
                    }
                } else {
                    PhaseState {
                        phase: Phase::DayVote,
                        round,
                        discussion_round: 0,
                    }
                }
            }
            Phase::DayVote => PhaseState {
                phase: Phase::Night,
                round: round + 1,
                discussion_round: 0,
            },
            Phase::GameOver => self.state,
        };
        Ok(&self.state)
    }

    /// Any state -> `GameOver`. Signaled by the orchestrator when the win
    /// condition is met.
    pub fn finish(&mut self) -> &PhaseState {
        self.state = PhaseState {
            phase: Phase::GameOver,
            round: self.state.round,
            discussion_round: 0,
        };
        &self.state
    }
}
