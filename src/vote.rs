use serde::{Deserialize, Serialize};

/// Per-voting-phase record of who voted for whom, in submission order.
/// Ephemeral: created fresh each vote phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    votes: Vec<(String, String)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, voter: impl Into<String>, candidate: impl Into<String>) {
        self.votes.push((voter.into(), candidate.into()));
    }

    /// `(voter, candidate)` pairs in submission order.
    pub fn votes(&self) -> &[(String, String)] {
        &self.votes
    }

    /// Vote counts per candidate, in first-seen order.
    pub fn counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for (_, candidate) in &self.votes {
            match counts.iter_mut().find(|(name, _)| name == candidate) {
                Some((_, count)) => *count += 1,
                None => counts.push((candidate.clone(), 1)),
            }
        }
        counts
    }

    /// The eliminated candidate, if any. Elimination requires the top
    /// count to strictly exceed the runner-up count; an exact tie at the
    /// top eliminates nobody.
    pub fn resolve(&self) -> Option<String> {
        let mut ranked = self.counts();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        match ranked.as_slice() {
            [] => None,
            [(only, _)] => Some(only.clone()),
            [(top, top_count), (_, second_count), ..] => {
                if top_count > second_count {
                    Some(top.clone())
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(pairs: &[(&str, &str)]) -> VoteTally {
        let mut tally = VoteTally::new();
        for (voter, candidate) in pairs {
            tally.record(*voter, *candidate);
        }
        tally
    }

    #[test]
    fn test_clear_majority_eliminates() {
        let tally = tally(&[
            ("Alice", "Bob"),
            ("Carol", "Bob"),
            ("Dave", "Bob"),
            ("Erin", "Alice"),
            ("Bob", "Alice"),
        ]);
        assert_eq!(tally.resolve(), Some("Bob".to_string()));
    }

    #[test]
    fn test_exact_tie_eliminates_nobody() {
        let tally = tally(&[
            ("Alice", "Bob"),
            ("Carol", "Bob"),
            ("Bob", "Alice"),
            ("Dave", "Alice"),
        ]);
        assert_eq!(tally.resolve(), None);
    }

    #[test]
    fn test_single_candidate_is_eliminated() {
        let tally = tally(&[("Alice", "Bob"), ("Carol", "Bob"), ("Dave", "Bob")]);
        assert_eq!(tally.resolve(), Some("Bob".to_string()));
    }

    #[test]
    fn test_empty_tally() {
        assert_eq!(VoteTally::new().resolve(), None);
    }

    #[test]
    fn test_counts_keep_first_seen_order() {
        let tally = tally(&[("Alice", "Bob"), ("Bob", "Carol"), ("Dave", "Bob")]);
        assert_eq!(
            tally.counts(),
            vec![("Bob".to_string(), 2), ("Carol".to_string(), 1)]
        );
    }
}
