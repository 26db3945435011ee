//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - small fixture adventures as JSON and as loaded worlds
//! - a fixed `sample_character`
//! - `TestHarness` for scripted sessions backed by an in-memory repository

use crate::content::{parse_adventure, ContentError};
use crate::headless::HeadlessGame;
use crate::persist::{MemoryRepository, Repository};
use crate::session::{GameSession, SessionError};
use crate::world::{
    AbilityScores, BarrierId, Character, CharacterClass, GameState, HitPoints, Race, RoomId, World,
};
use std::sync::Arc;

/// `start` and `end`, joined north/south.
pub fn two_room_adventure() -> &'static str {
    r#"{
        "title": "Two Rooms",
        "startingRoomId": "start",
        "rooms": [
            {
                "id": "start",
                "name": "Start",
                "description": "A bare stone room where everything begins.",
                "exits": { "north": "end" }
            },
            {
                "id": "end",
                "name": "End",
                "description": "A quiet room at the far side of things.",
                "exits": { "south": "start" }
            }
        ]
    }"#
}

/// A cellar holding a brass lamp and an old barrel, below a yard.
pub fn cellar_adventure() -> &'static str {
    r#"{
        "title": "The Cellar",
        "startingRoomId": "cellar",
        "rooms": [
            {
                "id": "cellar",
                "name": "Cellar",
                "description": "Damp stone walls sweat in the dark.",
                "exits": { "up": "yard" },
                "items": ["brass-lamp"],
                "features": [
                    {
                        "name": "old barrel",
                        "description": "It smells of vinegar.",
                        "keywords": ["barrel", "cask"]
                    }
                ]
            },
            {
                "id": "yard",
                "name": "Yard",
                "description": "A muddy yard behind the inn.",
                "exits": { "down": "cellar" },
                "items": ["rope"]
            }
        ],
        "items": [
            { "id": "brass-lamp", "name": "brass lamp", "description": "A dented brass lamp." },
            { "id": "rope", "name": "coil of rope", "description": "Thirty feet of hemp." }
        ]
    }"#
}

/// An antechamber with a rusty key and a vault behind a locked iron door.
pub fn barrier_adventure() -> &'static str {
    r#"{
        "title": "The Vault",
        "startingRoomId": "antechamber",
        "rooms": [
            {
                "id": "antechamber",
                "name": "Antechamber",
                "description": "Dust lies thick on the flagstones.",
                "exits": {
                    "north": { "destination": "vault", "barrier": "iron-door" }
                },
                "items": ["rusty-key"]
            },
            {
                "id": "vault",
                "name": "Vault",
                "description": "Shelves of forgotten treasure.",
                "exits": { "south": "antechamber" },
                "items": ["idol"]
            }
        ],
        "items": [
            { "id": "rusty-key", "name": "rusty key", "description": "Flaked with orange rust." },
            { "id": "idol", "name": "golden idol", "description": "It watches you." }
        ],
        "barriers": [
            {
                "id": "iron-door",
                "name": "iron door",
                "description": "A heavy iron door blocks the way north.",
                "blockedMessage": "The iron door is locked tight.",
                "unlockItemId": "rusty-key",
                "unlockMessage": "The key turns with a grinding screech."
            }
        ]
    }"#
}

pub fn two_room_world() -> Result<World, ContentError> {
    parse_adventure(two_room_adventure(), "two-rooms")
}

pub fn cellar_world() -> Result<World, ContentError> {
    parse_adventure(cellar_adventure(), "cellar")
}

pub fn barrier_world() -> Result<World, ContentError> {
    parse_adventure(barrier_adventure(), "vault")
}

/// A level 1 human rogue with fixed scores.
pub fn sample_character(name: &str) -> Character {
    Character {
        name: name.to_string(),
        race: Race::Human,
        class: CharacterClass::Rogue,
        level: 1,
        experience: 0,
        ability_scores: AbilityScores::new(10, 15, 12, 13, 11, 8),
        hit_points: HitPoints::new(8),
    }
}

/// Test harness for scripted sessions.
pub struct TestHarness {
    pub game: HeadlessGame,
    pub repository: Arc<MemoryRepository>,
}

impl TestHarness {
    /// A session in `world` with auto-save into memory.
    pub fn new(world: World) -> Result<Self, SessionError> {
        let state = GameState::new("fixture", world, sample_character("Test Hero"));
        let repository = Arc::new(MemoryRepository::new());
        let shared: Arc<dyn Repository> = repository.clone();
        let session = GameSession::with_state(state, Some(shared))?;
        Ok(Self {
            game: HeadlessGame::new(session),
            repository,
        })
    }

    pub fn two_rooms() -> Result<Self, SessionError> {
        Self::new(two_room_world()?)
    }

    pub fn cellar() -> Result<Self, SessionError> {
        Self::new(cellar_world()?)
    }

    pub fn barrier() -> Result<Self, SessionError> {
        Self::new(barrier_world()?)
    }

    /// Send one line and return the reply text.
    pub async fn input(&mut self, text: &str) -> Result<String, SessionError> {
        Ok(self.game.send(text).await?.text)
    }

    /// Send lines in order and return every reply.
    pub async fn run(&mut self, inputs: &[&str]) -> Result<Vec<String>, SessionError> {
        let turns = self.game.run(inputs.iter().copied()).await?;
        Ok(turns.into_iter().map(|turn| turn.text).collect())
    }

    pub fn state(&self) -> &GameState {
        self.game.session().state()
    }

    /// Id of the room the player is in.
    pub fn location(&self) -> &str {
        self.state().player.location.as_str()
    }

    pub fn inventory(&self) -> Vec<String> {
        self.state().player.inventory_names()
    }

    /// Item names in a room, in display order. Empty for unknown rooms.
    pub fn room_items(&self, room_id: &str) -> Vec<String> {
        self.state()
            .world
            .room(&RoomId::new(room_id))
            .map(|room| room.items.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn barrier_unlocked(&self, barrier_id: &str) -> bool {
        self.state()
            .world
            .barrier(&BarrierId::new(barrier_id))
            .map(|b| !b.is_locked())
            .unwrap_or(false)
    }

    pub async fn save_count(&self) -> usize {
        self.repository.save_count().await
    }

    /// All replies so far, in order.
    pub fn outputs(&self) -> Vec<&str> {
        self.game
            .transcript()
            .iter()
            .map(|entry| entry.output.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_load() {
        assert_eq!(two_room_world().unwrap().rooms.len(), 2);
        assert_eq!(cellar_world().unwrap().title, "The Cellar");
        assert_eq!(barrier_world().unwrap().barriers.len(), 1);
    }

    #[tokio::test]
    async fn test_harness_tracks_state() {
        let mut harness = TestHarness::cellar().unwrap();
        let reply = harness.input("take brass lamp").await.unwrap();
        assert_eq!(reply, "You pick up the brass lamp.");
        assert_eq!(harness.inventory(), vec!["brass lamp"]);
        assert!(harness.room_items("cellar").is_empty());
        assert_eq!(harness.save_count().await, 1);
        assert_eq!(harness.outputs(), vec!["You pick up the brass lamp."]);
    }
}
