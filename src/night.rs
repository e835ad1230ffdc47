use serde::{Deserialize, Serialize};

use crate::enums::DeathCause;

/// The night's pre-validated structured choices. Ephemeral: built fresh
/// each night and discarded once resolved. Constraint enforcement (doctor
/// repeat-target, potion availability, candidate membership) happens
/// upstream, so this engine only ever sees legal targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NightActions {
    pub attack: Option<String>,
    pub protect: Option<String>,
    pub heal: Option<String>,
    pub poison: Option<String>,
}

/// Deaths produced by one night, each player at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NightResolution {
    pub deaths: Vec<(String, DeathCause)>,
}

/// Folds the attacker pack's kill votes into a single target: highest raw
/// count wins, and an exact tie goes to the first-submitted candidate
/// among those tied. Returns `None` when no votes were cast.
pub fn tally_attack_votes(votes: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for vote in votes {
        match counts.iter_mut().find(|(name, _)| *name == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote, 1)),
        }
    }
    // Stable sort keeps first-submission order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.first().map(|(name, _)| (*name).to_string())
}

/// Deterministic, order-independent fold of the night's effects:
/// - the attack is nullified when either the protect or the heal names the
///   same player (independent mechanisms, either suffices);
/// - the poison resolves independently and is never nullified;
/// - a player dies at most once; on an attack/poison collision the single
///   death is attributed to the poison.
pub fn resolve(actions: &NightActions) -> NightResolution {
    let mut deaths: Vec<(String, DeathCause)> = Vec::new();

    if let Some(target) = &actions.attack {
        let nullified = actions.protect.as_deref() == Some(target.as_str())
            || actions.heal.as_deref() == Some(target.as_str());
        if !nullified {
            deaths.push((target.clone(), DeathCause::Attacked));
        }
    }

    if let Some(target) = &actions.poison {
        match deaths.iter_mut().find(|(name, _)| name == target) {
            Some(existing) => existing.1 = DeathCause::Poisoned,
            None => deaths.push((target.clone(), DeathCause::Poisoned)),
        }
    }

    NightResolution { deaths }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(
        attack: Option<&str>,
        protect: Option<&str>,
        heal: Option<&str>,
        poison: Option<&str>,
    ) -> NightActions {
        NightActions {
            attack: attack.map(String::from),
            protect: protect.map(String::from),
            heal: heal.map(String::from),
            poison: poison.map(String::from),
        }
    }

    #[test]
    fn test_tally_majority_wins() {
        let votes: Vec<String> = ["Bob", "Alice", "Bob"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tally_attack_votes(&votes), Some("Bob".to_string()));
    }

    #[test]
    fn test_tally_tie_goes_to_first_submitted() {
        let votes: Vec<String> = ["Alice", "Bob"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tally_attack_votes(&votes), Some("Alice".to_string()));
    }

    #[test]
    fn test_tally_no_votes() {
        assert_eq!(tally_attack_votes(&[]), None);
    }

    #[test]
    fn test_unopposed_attack_kills() {
        let resolution = resolve(&actions(Some("Erin"), None, None, None));
        assert_eq!(
            resolution.deaths,
            vec![("Erin".to_string(), DeathCause::Attacked)]
        );
    }

    #[test]
    fn test_protect_nullifies_attack() {
        let resolution = resolve(&actions(Some("Erin"), Some("Erin"), None, None));
        assert!(resolution.deaths.is_empty());
    }

    #[test]
    fn test_heal_nullifies_attack() {
        let resolution = resolve(&actions(Some("Erin"), None, Some("Erin"), None));
        assert!(resolution.deaths.is_empty());
    }

    #[test]
    fn test_protecting_someone_else_does_not_help() {
        let resolution = resolve(&actions(Some("Erin"), Some("Frank"), None, None));
        assert_eq!(
            resolution.deaths,
            vec![("Erin".to_string(), DeathCause::Attacked)]
        );
    }

    #[test]
    fn test_poison_is_independent_of_protection() {
        let resolution = resolve(&actions(Some("Erin"), Some("Erin"), None, Some("Frank")));
        assert_eq!(
            resolution.deaths,
            vec![("Frank".to_string(), DeathCause::Poisoned)]
        );
    }

    #[test]
    fn test_attack_and_poison_on_same_target_records_one_poisoned_death() {
        let resolution = resolve(&actions(Some("Erin"), None, None, Some("Erin")));
        assert_eq!(
            resolution.deaths,
            vec![("Erin".to_string(), DeathCause::Poisoned)]
        );
    }

    #[test]
    fn test_two_independent_deaths() {
        let resolution = resolve(&actions(Some("Erin"), None, None, Some("Dave")));
        assert_eq!(
            resolution.deaths,
            vec![
                ("Erin".to_string(), DeathCause::Attacked),
                ("Dave".to_string(), DeathCause::Poisoned),
            ]
        );
    }
}
