use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::Team;
use crate::game::Player;

/// Reserved speaker name for engine-originated announcements.
pub const SYSTEM_SPEAKER: &str = "SYSTEM";

/// Who is entitled to observe a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Delivered to every living player.
    Everyone,
    /// Delivered only to living members of one team.
    Team(Team),
    /// Delivered only to one named recipient.
    Addressed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub speaker: String,
    pub content: String,
    pub phase: String,
    pub visibility: Visibility,
}

impl Message {
    pub fn new(
        speaker: impl Into<String>,
        content: impl Into<String>,
        phase: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Message {
            id: Uuid::new_v4(),
            speaker: speaker.into(),
            content: content.into(),
            phase: phase.into(),
            visibility,
        }
    }

    pub fn system(content: impl Into<String>, phase: impl Into<String>) -> Self {
        Message::new(SYSTEM_SPEAKER, content, phase, Visibility::Everyone)
    }
}

/// Routes every published message to the exact set of players entitled to
/// see it. The public record and each player's observation log are
/// append-only; nothing is ever retracted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelManager {
    log: Vec<Message>,
}

impl ChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the message to the public record and delivers it to every
    /// candidate recipient that is alive and covered by the message's
    /// visibility class. Entitlement is evaluated at delivery time, so a
    /// player who dies mid-phase keeps everything delivered before death
    /// and receives nothing afterwards.
    pub fn publish(&mut self, message: Message, players: &mut [Player]) -> &Message {
        for player in players.iter_mut() {
            if player.alive && Self::entitled(&message.visibility, player) {
                player.observed.push(message.clone());
            }
        }
        self.log.push(message);
        self.log.last().expect("log is non-empty after push")
    }

    fn entitled(visibility: &Visibility, player: &Player) -> bool {
        match visibility {
            Visibility::Everyone => true,
            Visibility::Team(team) => player.role.team == *team,
            Visibility::Addressed(name) => player.name == *name,
        }
    }

    /// The full public record, in publication order.
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    pub fn messages_in_phase(&self, phase: &str) -> Vec<&Message> {
        self.log.iter().filter(|m| m.phase == phase).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleRegistry;

    fn roster() -> Vec<Player> {
        let registry = RoleRegistry::standard();
        vec![
            Player::new("Alice", registry.get("Werewolf").unwrap().clone()),
            Player::new("Bob", registry.get("Werewolf").unwrap().clone()),
            Player::new("Carol", registry.get("Seer").unwrap().clone()),
            Player::new("Dave", registry.get("Villager").unwrap().clone()),
        ]
    }

    #[test]
    fn test_everyone_delivers_to_all_living() {
        let mut channels = ChannelManager::new();
        let mut players = roster();
        players[3].kill();

        channels.publish(Message::system("The sun rises.", "day_1_announcement"), &mut players);

        assert_eq!(players[0].observed.len(), 1);
        assert_eq!(players[1].observed.len(), 1);
        assert_eq!(players[2].observed.len(), 1);
        assert!(players[3].observed.is_empty());
        assert_eq!(channels.log().len(), 1);
    }

    #[test]
    fn test_team_restricted_never_leaks() {
        let mut channels = ChannelManager::new();
        let mut players = roster();

        let msg = Message::new(
            "Alice",
            "Let's take Dave tonight.",
            "night_1",
            Visibility::Team(Team::Werewolf),
        );
        channels.publish(msg, &mut players);

        assert_eq!(players[0].observed.len(), 1);
        assert_eq!(players[1].observed.len(), 1);
        assert!(players[2].observed.is_empty());
        assert!(players[3].observed.is_empty());
    }

    #[test]
    fn test_addressed_reaches_only_recipient() {
        let mut channels = ChannelManager::new();
        let mut players = roster();

        let msg = Message::new(
            SYSTEM_SPEAKER,
            "Alice is a WEREWOLF.",
            "night_1",
            Visibility::Addressed("Carol".to_string()),
        );
        channels.publish(msg, &mut players);

        assert!(players[0].observed.is_empty());
        assert_eq!(players[2].observed.len(), 1);
        assert_eq!(players[2].observed[0].content, "Alice is a WEREWOLF.");
    }

    #[test]
    fn test_dead_player_keeps_earlier_deliveries() {
        let mut channels = ChannelManager::new();
        let mut players = roster();

        channels.publish(Message::system("Round one.", "day_1_discussion"), &mut players);
        players[3].kill();
        channels.publish(Message::system("Round two.", "day_1_discussion"), &mut players);

        assert_eq!(players[3].observed.len(), 1);
        assert_eq!(players[3].observed[0].content, "Round one.");
        assert_eq!(channels.messages_in_phase("day_1_discussion").len(), 2);
    }
}
