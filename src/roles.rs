use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{NightActionKind, Team};
use crate::errors::{GameError, GameResult};

/// An immutable role identity. Roles never mutate and are looked up by
/// name from a registry built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub team: Team,
    pub night_action: Option<NightActionKind>,
    pub description: String,
}

impl Role {
    fn new(
        name: &str,
        team: Team,
        night_action: Option<NightActionKind>,
        description: &str,
    ) -> Self {
        Role {
            name: name.to_string(),
            team,
            night_action,
            description: description.to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Read-only catalog of the roles available to a game. Constructed once,
/// never mutated afterwards; share it by reference or behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRegistry {
    roles: Vec<Role>,
}

impl RoleRegistry {
    /// The standard six-role catalog.
    pub fn standard() -> Self {
        RoleRegistry {
            roles: vec![
                Role::new(
                    "Villager",
                    Team::Village,
                    None,
                    "A regular villager with no special abilities. Use your wits to identify the werewolves.",
                ),
                Role::new(
                    "Werewolf",
                    Team::Werewolf,
                    Some(NightActionKind::Kill),
                    "A werewolf who hunts villagers at night. Coordinate with your pack to eliminate the village.",
                ),
                Role::new(
                    "Seer",
                    Team::Village,
                    Some(NightActionKind::Investigate),
                    "A villager with the ability to see the true nature of one player each night.",
                ),
                Role::new(
                    "Doctor",
                    Team::Village,
                    Some(NightActionKind::Protect),
                    "A villager who can protect one player from death each night.",
                ),
                Role::new(
                    "Hunter",
                    Team::Village,
                    Some(NightActionKind::RevengeKill),
                    "When killed, the Hunter can take one other player with them.",
                ),
                Role::new(
                    "Witch",
                    Team::Village,
                    Some(NightActionKind::SaveOrPoison),
                    "Has one healing potion and one poison potion to use throughout the game.",
                ),
            ],
        }
    }

    pub fn get(&self, name: &str) -> GameResult<&Role> {
        self.roles
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| GameError::UnknownRole(name.to_string()))
    }

    pub fn all_of_team(&self, team: Team) -> Vec<&Role> {
        self.roles.iter().filter(|r| r.team == team).collect()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_role() {
        let registry = RoleRegistry::standard();
        let wolf = registry.get("Werewolf").unwrap();
        assert_eq!(wolf.team, Team::Werewolf);
        assert_eq!(wolf.night_action, Some(NightActionKind::Kill));
    }

    #[test]
    fn test_get_unknown_role_fails() {
        let registry = RoleRegistry::standard();
        assert_eq!(
            registry.get("Jester"),
            Err(GameError::UnknownRole("Jester".to_string()))
        );
    }

    #[test]
    fn test_team_partition() {
        let registry = RoleRegistry::standard();
        let wolves = registry.all_of_team(Team::Werewolf);
        let village = registry.all_of_team(Team::Village);
        assert_eq!(wolves.len(), 1);
        assert_eq!(village.len(), 5);
        assert_eq!(wolves.len() + village.len(), registry.roles().len());
    }

    #[test]
    fn test_at_most_one_night_action() {
        let registry = RoleRegistry::standard();
        assert_eq!(registry.get("Villager").unwrap().night_action, None);
        assert_eq!(
            registry.get("Witch").unwrap().night_action,
            Some(NightActionKind::SaveOrPoison)
        );
    }
}
