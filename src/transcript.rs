use serde::{Deserialize, Serialize};

use crate::channels::Message;
use crate::enums::{DeathCause, Team};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub role: String,
    pub team: Team,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub winner: Team,
    pub roster: Vec<PlayerRecord>,
}

/// Write-only sink for externally observable game events, received in call
/// order. The engine never reads it back; sink failures are the sink's own
/// concern, so the methods are infallible from the engine's point of view.
pub trait TranscriptSink: Send {
    fn phase_started(&mut self, _phase: &str) {}

    fn message(&mut self, _message: &Message) {}

    fn night_action(
        &mut self,
        _phase: &str,
        _role: &str,
        _actor: &str,
        _action: &str,
        _target: &str,
        _result: Option<&str>,
    ) {
    }

    fn death(&mut self, _phase: &str, _name: &str, _cause: DeathCause, _role: &str) {}

    fn vote_tally(&mut self, _phase: &str, _votes: &[(String, String)], _eliminated: Option<&str>) {
    }

    fn game_over(&mut self, _summary: &GameSummary) {}
}

/// Discards every event.
pub struct NullSink;

impl TranscriptSink for NullSink {}

/// Routes every event to the `log` facade.
pub struct LogSink;

impl TranscriptSink for LogSink {
    fn phase_started(&mut self, phase: &str) {
        log::info!("--- {phase} ---");
    }

    fn message(&mut self, message: &Message) {
        log::info!(
            "[{}] {} ({:?}): {}",
            message.phase,
            message.speaker,
            message.visibility,
            message.content
        );
    }

    fn night_action(
        &mut self,
        phase: &str,
        role: &str,
        actor: &str,
        action: &str,
        target: &str,
        result: Option<&str>,
    ) {
        match result {
            Some(result) => log::info!("[{phase}] {role} {actor}: {action} {target} -> {result}"),
            None => log::info!("[{phase}] {role} {actor}: {action} {target}"),
        }
    }

    fn death(&mut self, phase: &str, name: &str, cause: DeathCause, role: &str) {
        log::info!("[{phase}] {name} died ({cause}); they were a {role}");
    }

    fn vote_tally(&mut self, phase: &str, votes: &[(String, String)], eliminated: Option<&str>) {
        for (voter, candidate) in votes {
            log::info!("[{phase}] {voter} voted for {candidate}");
        }
        match eliminated {
            Some(name) => log::info!("[{phase}] eliminated: {name}"),
            None => log::info!("[{phase}] vote tied, nobody eliminated"),
        }
    }

    fn game_over(&mut self, summary: &GameSummary) {
        log::info!("winner: {} team", summary.winner);
        for record in &summary.roster {
            log::info!(
                "  {} - {} ({}) {}",
                record.name,
                record.role,
                record.team,
                if record.alive { "alive" } else { "dead" }
            );
        }
    }
}
