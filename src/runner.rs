use itertools::Itertools;
use rand::Rng;
use std::collections::HashMap;

use crate::channels::{ChannelManager, Message, Visibility, SYSTEM_SPEAKER};
use crate::enums::{DeathCause, NightActionKind, Team};
use crate::errors::{GameError, GameResult};
use crate::game::{GameConfig, GameState};
use crate::night::{self, NightActions, NightResolution};
use crate::phases::{Phase, PhaseMachine};
use crate::players::{
    extract_choice, DecisionKind, DecisionProvider, DecisionRequest, PotionDecision,
};
use crate::roles::RoleRegistry;
use crate::transcript::{GameSummary, PlayerRecord, TranscriptSink};
use crate::vote::VoteTally;

/// Drives one game end to end: sequences phases, requests every external
/// decision in a fixed order, feeds the results into the resolution
/// engines, and emits externally observable events.
///
/// One logical task per game; the only suspension points are the provider
/// awaits, so abandoning the future at any of them leaves all recorded
/// history valid (deaths are final once applied, unresolved phases are
/// simply dropped).
pub struct GameRunner {
    state: GameState,
    phases: PhaseMachine,
    channels: ChannelManager,
    providers: HashMap<String, Box<dyn DecisionProvider>>,
    sink: Box<dyn TranscriptSink>,
}

impl GameRunner {
    /// Deals roles from the configuration and wires up the runner.
    pub fn new(
        config: &GameConfig,
        registry: &RoleRegistry,
        providers: HashMap<String, Box<dyn DecisionProvider>>,
        sink: Box<dyn TranscriptSink>,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        let state = GameState::setup(config, registry, rng)?;
        Self::from_state(state, config.discussion_rounds, providers, sink)
    }

    /// Wires up the runner around a pre-assigned roster.
    pub fn from_state(
        state: GameState,
        discussion_rounds: u32,
        providers: HashMap<String, Box<dyn DecisionProvider>>,
        sink: Box<dyn TranscriptSink>,
    ) -> GameResult<Self> {
        if discussion_rounds == 0 {
            return Err(GameError::invalid_config(
                "discussion_rounds must be at least 1",
            ));
        }
        for player in &state.players {
            if !providers.contains_key(&player.name) {
                return Err(GameError::invalid_config(format!(
                    "no decision provider for {}",
                    player.name
                )));
            }
        }
        Ok(GameRunner {
            state,
            phases: PhaseMachine::new(discussion_rounds),
            channels: ChannelManager::new(),
            providers,
            sink,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn channels(&self) -> &ChannelManager {
        &self.channels
    }

    pub fn winner(&self) -> Option<Team> {
        self.state.winner
    }

    /// Round counter at the current point of play.
    pub fn rounds(&self) -> u32 {
        self.phases.state().round
    }

    /// Runs the game to completion and returns the winning team.
    pub async fn run(&mut self) -> GameResult<Team> {
        self.announce_pack();
        self.phases.start()?;

        loop {
            match self.phases.state().phase {
                Phase::Night => {
                    let resolution = self.run_night().await?;
                    self.phases.advance()?;
                    self.run_announcement(resolution).await?;
                    if self.record_win() {
                        break;
                    }
                    self.phases.advance()?;
                }
                Phase::DayDiscussion => {
                    self.run_discussion().await?;
                    self.phases.advance()?;
                }
                Phase::DayVote => {
                    self.run_vote().await?;
                    if self.record_win() {
                        break;
                    }
                    self.phases.advance()?;
                }
                Phase::GameOver => break,
                Phase::Setup | Phase::DayAnnouncement => {
                    return Err(GameError::illegal_transition(format!(
                        "orchestrator stalled in {}",
                        self.label()
                    )));
                }
            }
        }

        let winner = self
            .state
            .winner
            .ok_or_else(|| GameError::illegal_transition("game over without a winner"))?;
        let summary = self.summary(winner);
        self.sink.game_over(&summary);
        Ok(winner)
    }

    /// Night sequence, in fixed role order: pack discussion, pack kill
    /// vote, investigation, protection, potions, then the pure resolution
    /// fold. Later roles may depend on earlier outcomes (the potion holder
    /// is told tonight's victim), hence the ordering.
    async fn run_night(&mut self) -> GameResult<NightResolution> {
        let label = self.label();
        let round = self.phases.state().round;
        self.sink.phase_started(&label);
        self.broadcast_system(format!("Night {round} falls. The village sleeps..."));

        let mut actions = NightActions::default();

        // Pack coordination and kill vote.
        let wolves = self.state.alive_team_names(Team::Werewolf);
        let prey: Vec<String> = self
            .state
            .alive_players()
            .filter(|p| p.role.team != Team::Werewolf)
            .map(|p| p.name.clone())
            .collect();
        if !wolves.is_empty() && !prey.is_empty() {
            for wolf in &wolves {
                let text = self.ask_speech(wolf, DecisionKind::WolfDiscussion, &prey).await?;
                self.publish(wolf, text, Visibility::Team(Team::Werewolf));
            }
            let mut votes = Vec::new();
            for wolf in &wolves {
                if let Some(choice) = self.ask_choice(wolf, DecisionKind::WolfVote, &prey).await? {
                    self.sink
                        .night_action(&label, "Werewolf", wolf, "kill-vote", &choice, None);
                    votes.push(choice);
                }
            }
            actions.attack = night::tally_attack_votes(&votes);
            if let Some(target) = &actions.attack {
                self.sink
                    .night_action(&label, "Werewolf", "Pack", "kill", target, None);
            }
        }

        // Investigation. Result is delivered as an addressed message, so
        // only the investigator ever observes it.
        let seer = self
            .state
            .first_alive_with_action(NightActionKind::Investigate)
            .map(|p| p.name.clone());
        if let Some(seer) = seer {
            let candidates: Vec<String> = self
                .state
                .alive_names()
                .into_iter()
                .filter(|n| *n != seer)
                .collect();
            if let Some(target) = self
                .ask_choice(&seer, DecisionKind::Investigate, &candidates)
                .await?
            {
                let is_wolf = self
                    .state
                    .player(&target)
                    .map(|p| p.role.team == Team::Werewolf)
                    .unwrap_or(false);
                let verdict = if is_wolf { "a WEREWOLF" } else { "NOT a werewolf" };
                self.publish(
                    SYSTEM_SPEAKER,
                    format!("Night {round} investigation: {target} is {verdict}."),
                    Visibility::Addressed(seer.clone()),
                );
                self.sink
                    .night_action(&label, "Seer", &seer, "investigate", &target, Some(verdict));
            }
        }

        // Protection. The previous night's target is excluded from the
        // candidate set before the provider is asked.
        let doctor = self
            .state
            .first_alive_with_action(NightActionKind::Protect)
            .map(|p| (p.name.clone(), p.last_protected.clone()));
        if let Some((doctor, last_protected)) = doctor {
            let candidates: Vec<String> = self
                .state
                .alive_names()
                .into_iter()
                .filter(|n| last_protected.as_deref() != Some(n.as_str()))
                .collect();
            if let Some(target) = self
                .ask_choice(&doctor, DecisionKind::Protect, &candidates)
                .await?
            {
                if let Some(player) = self.state.player_mut(&doctor) {
                    player.last_protected = Some(target.clone());
                }
                self.sink
                    .night_action(&label, "Doctor", &doctor, "protect", &target, None);
                actions.protect = Some(target);
            }
        }

        // Potions. The heal is offered only while the potion is unused and
        // there is a victim to save; the poison only while unused. A used
        // potion is consumed for the rest of the game.
        let witch = self
            .state
            .first_alive_with_action(NightActionKind::SaveOrPoison)
            .map(|p| (p.name.clone(), p.has_heal_potion, p.has_poison_potion));
        if let Some((witch, heal_available, poison_available)) = witch {
            let can_heal = heal_available && actions.attack.is_some();
            let can_poison = poison_available;
            if can_heal || can_poison {
                let candidates: Vec<String> = self
                    .state
                    .alive_names()
                    .into_iter()
                    .filter(|n| *n != witch)
                    .collect();
                let victim = if can_heal { actions.attack.as_deref() } else { None };
                let decision = self
                    .ask_potions(&witch, &candidates, victim, can_heal, can_poison)
                    .await?;
                if let Some(heal) = decision.heal {
                    if can_heal && actions.attack.as_deref() == Some(heal.as_str()) {
                        if let Some(player) = self.state.player_mut(&witch) {
                            player.has_heal_potion = false;
                        }
                        self.sink
                            .night_action(&label, "Witch", &witch, "save", &heal, None);
                        actions.heal = Some(heal);
                    } else {
                        log::warn!("{witch} tried to heal {heal}, who is not tonight's victim; ignoring");
                    }
                }
                if let Some(poison) = decision.poison {
                    if can_poison && candidates.contains(&poison) {
                        if let Some(player) = self.state.player_mut(&witch) {
                            player.has_poison_potion = false;
                        }
                        self.sink
                            .night_action(&label, "Witch", &witch, "poison", &poison, None);
                        actions.poison = Some(poison);
                    } else {
                        log::warn!("{witch} tried to poison {poison}, who is not a legal target; ignoring");
                    }
                }
            }
        }

        Ok(night::resolve(&actions))
    }

    /// Applies the night's deaths, reveals roles, and runs any revenge
    /// capability triggered by a death.
    async fn run_announcement(&mut self, resolution: NightResolution) -> GameResult<()> {
        let label = self.label();
        self.sink.phase_started(&label);

        if resolution.deaths.is_empty() {
            self.broadcast_system(
                "The village wakes to find everyone alive. The night was peaceful.".to_string(),
            );
            return Ok(());
        }

        for (name, cause) in resolution.deaths {
            let role = match self.state.kill(&name) {
                Some(role) => role,
                None => continue,
            };
            self.broadcast_system(format!(
                "{name} was found dead this morning ({cause}). They were a {}.",
                role.name
            ));
            self.sink.death(&label, &name, cause, &role.name);
            if role.night_action == Some(NightActionKind::RevengeKill) {
                self.run_revenge(&name, &label).await?;
            }
        }
        Ok(())
    }

    async fn run_discussion(&mut self) -> GameResult<()> {
        let label = self.label();
        self.sink.phase_started(&label);
        let round = self.phases.state().discussion_round;
        self.broadcast_system(format!("Discussion round {round} begins."));

        for name in self.state.alive_names() {
            let text = self.ask_speech(&name, DecisionKind::Discussion, &[]).await?;
            self.publish(&name, text, Visibility::Everyone);
        }
        Ok(())
    }

    async fn run_vote(&mut self) -> GameResult<()> {
        let label = self.label();
        self.sink.phase_started(&label);
        self.broadcast_system("Time to vote! Who should be eliminated?".to_string());

        let voters = self.state.alive_names();
        let mut tally = VoteTally::new();
        for voter in &voters {
            let candidates: Vec<String> = voters.iter().filter(|n| *n != voter).cloned().collect();
            if let Some(choice) = self.ask_choice(voter, DecisionKind::Vote, &candidates).await? {
                self.publish(voter, format!("I vote for {choice}."), Visibility::Everyone);
                tally.record(voter.clone(), choice);
            }
        }

        let eliminated = tally.resolve();
        self.sink.vote_tally(&label, tally.votes(), eliminated.as_deref());

        match eliminated {
            Some(name) => {
                if let Some(role) = self.state.kill(&name) {
                    self.broadcast_system(format!(
                        "The village has decided. {name} is eliminated. They were a {}.",
                        role.name
                    ));
                    self.sink.death(&label, &name, DeathCause::Voted, &role.name);
                    if role.night_action == Some(NightActionKind::RevengeKill) {
                        self.run_revenge(&name, &label).await?;
                    }
                }
            }
            None => {
                self.broadcast_system("The vote is tied. No one is eliminated today.".to_string())
            }
        }
        Ok(())
    }

    /// One follow-on straight removal: no nullification applies and no
    /// further revenge chains off it.
    async fn run_revenge(&mut self, hunter: &str, label: &str) -> GameResult<()> {
        let candidates = self.state.alive_names();
        if candidates.is_empty() {
            return Ok(());
        }
        let target = match self.ask_choice(hunter, DecisionKind::Revenge, &candidates).await? {
            Some(target) => target,
            None => return Ok(()),
        };
        if let Some(role) = self.state.kill(&target) {
            self.broadcast_system(format!(
                "The Hunter takes {target} with them! {target} was a {}.",
                role.name
            ));
            self.sink.death(label, &target, DeathCause::Revenge, &role.name);
        }
        Ok(())
    }

    /// Tells the pack who they are, on the team channel, before night one.
    fn announce_pack(&mut self) {
        let wolves = self.state.alive_team_names(Team::Werewolf);
        if wolves.is_empty() {
            return;
        }
        let roster = wolves.iter().join(", ");
        self.publish(
            SYSTEM_SPEAKER,
            format!("The werewolf pack: {roster}."),
            Visibility::Team(Team::Werewolf),
        );
    }

    /// Records the winner and signals the phase machine when a team has
    /// won. Called after every death-causing event, never mid-resolution.
    fn record_win(&mut self) -> bool {
        if self.state.check_winner().is_some() {
            self.phases.finish();
            true
        } else {
            false
        }
    }

    fn label(&self) -> String {
        self.phases.state().label()
    }

    fn publish(&mut self, speaker: &str, content: String, visibility: Visibility) {
        let phase = self.label();
        let message = Message::new(speaker, content, phase, visibility);
        let stored = self.channels.publish(message, &mut self.state.players);
        self.sink.message(stored);
    }

    fn broadcast_system(&mut self, content: String) {
        self.publish(SYSTEM_SPEAKER, content, Visibility::Everyone);
    }

    async fn ask_speech(
        &mut self,
        name: &str,
        kind: DecisionKind,
        candidates: &[String],
    ) -> GameResult<String> {
        let phase = self.label();
        let living = self.state.alive_names();
        let history: &[Message] = match self.state.player(name) {
            Some(player) => &player.observed,
            None => &[],
        };
        let provider = self
            .providers
            .get_mut(name)
            .ok_or_else(|| GameError::provider(name, "no decision provider registered"))?;
        let request = DecisionRequest {
            player: name,
            phase: &phase,
            kind,
            living: &living,
            candidates,
            history,
        };
        provider.speak(&request).await
    }

    /// Requests one choice and validates it against the candidate set. An
    /// unparseable response is corrected to the first legal candidate and
    /// logged; it never aborts the game. `None` only when there are no
    /// candidates at all.
    async fn ask_choice(
        &mut self,
        name: &str,
        kind: DecisionKind,
        candidates: &[String],
    ) -> GameResult<Option<String>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let phase = self.label();
        let living = self.state.alive_names();
        let history: &[Message] = match self.state.player(name) {
            Some(player) => &player.observed,
            None => &[],
        };
        let provider = self
            .providers
            .get_mut(name)
            .ok_or_else(|| GameError::provider(name, "no decision provider registered"))?;
        let request = DecisionRequest {
            player: name,
            phase: &phase,
            kind,
            living: &living,
            candidates,
            history,
        };
        let raw = provider.choose(&request).await?;
        match extract_choice(&raw, candidates) {
            Some(choice) => Ok(Some(choice)),
            None => {
                let fallback = candidates[0].clone();
                log::warn!(
                    "invalid {kind:?} decision from {name} ({raw:?}); defaulting to {fallback}"
                );
                Ok(Some(fallback))
            }
        }
    }

    async fn ask_potions(
        &mut self,
        name: &str,
        candidates: &[String],
        victim: Option<&str>,
        can_heal: bool,
        can_poison: bool,
    ) -> GameResult<PotionDecision> {
        let phase = self.label();
        let living = self.state.alive_names();
        let history: &[Message] = match self.state.player(name) {
            Some(player) => &player.observed,
            None => &[],
        };
        let provider = self
            .providers
            .get_mut(name)
            .ok_or_else(|| GameError::provider(name, "no decision provider registered"))?;
        let request = DecisionRequest {
            player: name,
            phase: &phase,
            kind: DecisionKind::Potions,
            living: &living,
            candidates,
            history,
        };
        provider.use_potions(&request, victim, can_heal, can_poison).await
    }

    fn summary(&self, winner: Team) -> GameSummary {
        GameSummary {
            winner,
            roster: self
                .state
                .players
                .iter()
                .map(|p| PlayerRecord {
                    name: p.name.clone(),
                    role: p.role.name.clone(),
                    team: p.role.team,
                    alive: p.alive,
                })
                .collect(),
        }
    }
}
