use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

use crate::channels::Message;
use crate::enums::{NightActionKind, Team};
use crate::errors::{GameError, GameResult};
use crate::roles::{Role, RoleRegistry};

/// External game configuration: roster, per-role counts, and the number of
/// discussion sub-rounds per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: Vec<String>,
    pub role_distribution: BTreeMap<String, usize>,
    pub discussion_rounds: u32,
}

impl GameConfig {
    pub fn validate(&self) -> GameResult<()> {
        if self.discussion_rounds == 0 {
            return Err(GameError::invalid_config(
                "discussion_rounds must be at least 1",
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.players {
            if !seen.insert(name.as_str()) {
                return Err(GameError::invalid_config(format!(
                    "duplicate player name: {name}"
                )));
            }
        }
        Ok(())
    }
}

/// A participant in one game. The role is assigned once and never
/// reassigned; `alive` only ever transitions to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub alive: bool,
    /// One-shot consumable grants; only meaningful for the potion role.
    pub has_heal_potion: bool,
    pub has_poison_potion: bool,
    /// Last protection target, to forbid repeating it the next night.
    pub last_protected: Option<String>,
    /// This player's private observation log: every message delivered to
    /// them, and nothing they were not entitled to see.
    pub observed: Vec<Message>,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Player {
            name: name.into(),
            role,
            alive: true,
            has_heal_potion: true,
            has_poison_potion: true,
            last_protected: None,
            observed: Vec::new(),
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// The authoritative aggregate for one game: the ordered roster (insertion
/// order is turn order) and the winner, set exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: String,
    pub players: Vec<Player>,
    pub winner: Option<Team>,
}

impl GameState {
    /// Builds the role pool from the configuration, fails if the pool size
    /// disagrees with the roster size, then shuffles and deals one role
    /// per player.
    pub fn setup(
        config: &GameConfig,
        registry: &RoleRegistry,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        config.validate()?;

        let mut pool: Vec<Role> = Vec::new();
        for (role_name, count) in &config.role_distribution {
            let role = registry.get(role_name)?;
            pool.extend(std::iter::repeat(role.clone()).take(*count));
        }

        if pool.len() != config.players.len() {
            return Err(GameError::RoleCountMismatch {
                roles: pool.len(),
                players: config.players.len(),
            });
        }

        pool.shuffle(rng);

        let players = config
            .players
            .iter()
            .zip(pool)
            .map(|(name, role)| Player::new(name.clone(), role))
            .collect();

        Ok(GameState {
            id: Uuid::new_v4().to_string(),
            players,
            winner: None,
        })
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn alive_names(&self) -> Vec<String> {
        self.alive_players().map(|p| p.name.clone()).collect()
    }

    pub fn alive_team_names(&self, team: Team) -> Vec<String> {
        self.alive_players()
            .filter(|p| p.role.team == team)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.alive_players().filter(|p| p.role.team == team).count()
    }

    /// First living holder of the given night action, by stable insertion
    /// order. The explicit selection rule keeps behavior reproducible.
    pub fn first_alive_with_action(&self, kind: NightActionKind) -> Option<&Player> {
        self.alive_players()
            .find(|p| p.role.night_action == Some(kind))
    }

    /// Marks the player dead and reveals their role. Returns `None` if the
    /// player is unknown or already dead; a player never dies twice.
    pub fn kill(&mut self, name: &str) -> Option<Role> {
        let player = self.players.iter_mut().find(|p| p.name == name)?;
        if !player.alive {
            return None;
        }
        player.kill();
        Some(player.role.clone())
    }

    /// Applies the win predicate to the live population counts and records
    /// the winner. Once set, the winner is terminal.
    pub fn check_winner(&mut self) -> Option<Team> {
        if self.winner.is_some() {
            return self.winner;
        }
        self.winner = evaluate_winner(
            self.alive_count(Team::Werewolf),
            self.alive_count(Team::Village),
        );
        self.winner
    }
}

/// Pure win predicate over team population counts.
pub fn evaluate_winner(werewolves: usize, villagers: usize) -> Option<Team> {
    if werewolves == 0 {
        Some(Team::Village)
    } else if werewolves >= villagers {
        Some(Team::Werewolf)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn six_player_config() -> GameConfig {
        GameConfig {
            players: ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            role_distribution: BTreeMap::from([
                ("Werewolf".to_string(), 2),
                ("Seer".to_string(), 1),
                ("Doctor".to_string(), 1),
                ("Villager".to_string(), 2),
            ]),
            discussion_rounds: 3,
        }
    }

    #[test]
    fn test_setup_assigns_a_permutation_of_the_pool() {
        let registry = RoleRegistry::standard();
        let mut rng = XorShiftRng::seed_from_u64(7);
        let state = GameState::setup(&six_player_config(), &registry, &mut rng).unwrap();

        assert_eq!(state.players.len(), 6);
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for player in &state.players {
            *counts.entry(player.role.name.as_str()).or_default() += 1;
            assert!(player.alive);
        }
        assert_eq!(counts.get("Werewolf"), Some(&2));
        assert_eq!(counts.get("Seer"), Some(&1));
        assert_eq!(counts.get("Doctor"), Some(&1));
        assert_eq!(counts.get("Villager"), Some(&2));
    }

    #[test]
    fn test_setup_rejects_role_count_mismatch() {
        let registry = RoleRegistry::standard();
        let mut config = six_player_config();
        config.players.push("Grace".to_string());
        let mut rng = XorShiftRng::seed_from_u64(7);
        assert_eq!(
            GameState::setup(&config, &registry, &mut rng),
            Err(GameError::RoleCountMismatch {
                roles: 6,
                players: 7
            })
        );
    }

    #[test]
    fn test_setup_rejects_unknown_role() {
        let registry = RoleRegistry::standard();
        let mut config = six_player_config();
        config.role_distribution.remove("Villager");
        config.role_distribution.insert("Jester".to_string(), 2);
        let mut rng = XorShiftRng::seed_from_u64(7);
        assert_eq!(
            GameState::setup(&config, &registry, &mut rng),
            Err(GameError::UnknownRole("Jester".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicates_and_zero_rounds() {
        let mut config = six_player_config();
        config.players[1] = "Alice".to_string();
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));

        let mut config = six_player_config();
        config.discussion_rounds = 0;
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_evaluate_winner() {
        assert_eq!(evaluate_winner(0, 4), Some(Team::Village));
        assert_eq!(evaluate_winner(2, 2), Some(Team::Werewolf));
        assert_eq!(evaluate_winner(3, 2), Some(Team::Werewolf));
        assert_eq!(evaluate_winner(2, 3), None);
        assert_eq!(evaluate_winner(0, 0), Some(Team::Village));
    }

    #[test]
    fn test_kill_is_irreversible_and_at_most_once() {
        let registry = RoleRegistry::standard();
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut state = GameState::setup(&six_player_config(), &registry, &mut rng).unwrap();

        let revealed = state.kill("Alice");
        assert!(revealed.is_some());
        assert!(!state.player("Alice").unwrap().alive);
        assert_eq!(state.kill("Alice"), None);
        assert_eq!(state.kill("Nobody"), None);
    }

    #[test]
    fn test_winner_is_set_exactly_once() {
        let registry = RoleRegistry::standard();
        let mut rng = XorShiftRng::seed_from_u64(7);
        let mut state = GameState::setup(&six_player_config(), &registry, &mut rng).unwrap();

        assert_eq!(state.check_winner(), None);
        for name in state.alive_team_names(Team::Werewolf) {
            state.kill(&name);
        }
        assert_eq!(state.check_winner(), Some(Team::Village));
        // Terminal even if the population changes afterwards.
        for name in state.alive_names() {
            state.kill(&name);
        }
        assert_eq!(state.check_winner(), Some(Team::Village));
    }
}
