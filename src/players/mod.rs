// Players module - decision-provider implementations
//
// The engine requests every external decision through the
// `DecisionProvider` trait; the production implementation is an LLM
// client, the ones here are offline substitutes.

use async_trait::async_trait;

use crate::channels::Message;
use crate::errors::GameResult;

pub mod random;
pub mod scripted;

pub use self::random::RandomProvider;
pub use self::scripted::ScriptedProvider;

/// Which decision is being requested. Providers may use it to pick a
/// prompt; the engine uses it only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Discussion,
    WolfDiscussion,
    WolfVote,
    Vote,
    Investigate,
    Protect,
    Potions,
    Revenge,
}

/// Everything a provider is entitled to see when making one decision.
/// `history` is the requesting player's own observation log, so the
/// information partition holds by construction.
#[derive(Debug)]
pub struct DecisionRequest<'a> {
    pub player: &'a str,
    pub phase: &'a str,
    pub kind: DecisionKind,
    pub living: &'a [String],
    pub candidates: &'a [String],
    pub history: &'a [Message],
}

/// The potion role's night decision: two independent optional choices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PotionDecision {
    pub heal: Option<String>,
    pub poison: Option<String>,
}

/// One decision source per player. Implementations are I/O-bound in
/// production (an LLM call), hence async. A failure here is fatal to the
/// game; the engine does not retry.
#[async_trait]
pub trait DecisionProvider: Send {
    /// Free-text utterance (day discussion, pack night discussion).
    async fn speak(&mut self, request: &DecisionRequest<'_>) -> GameResult<String>;

    /// Raw text naming one candidate. The engine validates the response
    /// against the candidate set and substitutes a deterministic default
    /// when it does not parse, so a malformed answer never aborts a game.
    async fn choose(&mut self, request: &DecisionRequest<'_>) -> GameResult<String>;

    /// The potion role's decision. `victim` is tonight's attack target,
    /// known to the provider only when the heal is actually on offer.
    async fn use_potions(
        &mut self,
        request: &DecisionRequest<'_>,
        victim: Option<&str>,
        can_heal: bool,
        can_poison: bool,
    ) -> GameResult<PotionDecision>;
}

/// Parses a raw response into a member of the candidate set: exact match
/// first (case-insensitive), then containment anywhere in the response.
/// Returns `None` when nothing matches; the caller applies the default
/// policy.
pub fn extract_choice(response: &str, candidates: &[String]) -> Option<String> {
    let normalized = response.trim().to_lowercase();

    for candidate in candidates {
        if candidate.to_lowercase() == normalized {
            return Some(candidate.clone());
        }
    }
    for candidate in candidates {
        if normalized.contains(&candidate.to_lowercase()) {
            return Some(candidate.clone());
        }
    }
    None
}
