use async_trait::async_trait;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

use super::{DecisionProvider, DecisionRequest, PotionDecision};
use crate::errors::{GameError, GameResult};

const UTTERANCES: [&str; 5] = [
    "I'm watching everyone carefully.",
    "Something about last night doesn't add up.",
    "I have no strong reads yet.",
    "We should think about who has been quiet.",
    "I'll go along with the group for now.",
];

/// Picks uniformly from the candidate set. Useful for simulations and as a
/// load-bearing baseline opponent.
pub struct RandomProvider {
    rng: XorShiftRng,
}

impl RandomProvider {
    pub fn new() -> Self {
        RandomProvider {
            rng: XorShiftRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomProvider {
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionProvider for RandomProvider {
    async fn speak(&mut self, _request: &DecisionRequest<'_>) -> GameResult<String> {
        let line = UTTERANCES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("...");
        Ok(line.to_string())
    }

    async fn choose(&mut self, request: &DecisionRequest<'_>) -> GameResult<String> {
        request
            .candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| GameError::provider(request.player, "no candidates to choose from"))
    }

    async fn use_potions(
        &mut self,
        request: &DecisionRequest<'_>,
        victim: Option<&str>,
        can_heal: bool,
        can_poison: bool,
    ) -> GameResult<PotionDecision> {
        let mut decision = PotionDecision::default();
        if can_heal && self.rng.gen_bool(0.5) {
            decision.heal = victim.map(String::from);
        }
        if can_poison && decision.heal.is_none() && self.rng.gen_bool(0.25) {
            decision.poison = request.candidates.choose(&mut self.rng).cloned();
        }
        Ok(decision)
    }
}
