use async_trait::async_trait;
use std::collections::VecDeque;

use super::{DecisionProvider, DecisionRequest, PotionDecision};
use crate::errors::GameResult;

/// Replays queued responses in order. When a queue runs dry the provider
/// degrades gracefully: a placeholder utterance, an empty choice (which
/// the engine corrects to the default candidate), or no potion use.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    speeches: VecDeque<String>,
    choices: VecDeque<String>,
    potions: VecDeque<PotionDecision>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choices<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut provider = Self::new();
        for choice in choices {
            provider.choices.push_back(choice.into());
        }
        provider
    }

    pub fn queue_speech(&mut self, speech: impl Into<String>) -> &mut Self {
        self.speeches.push_back(speech.into());
        self
    }

    pub fn queue_choice(&mut self, choice: impl Into<String>) -> &mut Self {
        self.choices.push_back(choice.into());
        self
    }

    pub fn queue_potions(&mut self, decision: PotionDecision) -> &mut Self {
        self.potions.push_back(decision);
        self
    }
}

#[async_trait]
impl DecisionProvider for ScriptedProvider {
    async fn speak(&mut self, _request: &DecisionRequest<'_>) -> GameResult<String> {
        Ok(self
            .speeches
            .pop_front()
            .unwrap_or_else(|| "...".to_string()))
    }

    async fn choose(&mut self, _request: &DecisionRequest<'_>) -> GameResult<String> {
        Ok(self.choices.pop_front().unwrap_or_default())
    }

    async fn use_potions(
        &mut self,
        _request: &DecisionRequest<'_>,
        _victim: Option<&str>,
        _can_heal: bool,
        _can_poison: bool,
    ) -> GameResult<PotionDecision> {
        Ok(self.potions.pop_front().unwrap_or_default())
    }
}
