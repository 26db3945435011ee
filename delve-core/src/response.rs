//! Typed handler responses.

use crate::dispatch::EngineError;
use crate::world::{BarrierId, Direction, Room, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rejected command. The `Display` text is the sentence shown to the player;
/// state is never changed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("There is no exit to the {0}.")]
    NoExit(Direction),

    /// Carries the barrier's own blocked message.
    #[error("{0}")]
    Blocked(String),

    #[error("There is no '{0}' here.")]
    ItemNotHere(String),

    #[error("You are not carrying '{0}'.")]
    NotCarrying(String),

    #[error("You don't see '{0}' here.")]
    NotSeen(String),

    #[error("You don't have '{0}'.")]
    NotHeld(String),

    #[error("There is nothing to use that on.")]
    NothingToUseOn,

    #[error("The {0} is already unlocked.")]
    AlreadyUnlocked(String),

    #[error("The {item} doesn't work on the {barrier}.")]
    WrongItem { item: String, barrier: String },
}

/// Everything the player can see from where they stand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub name: String,
    pub description: String,
    /// Descriptions of locked barriers on this room's exits.
    pub barriers: Vec<String>,
    pub items: Vec<String>,
    /// Alphabetical.
    pub exits: Vec<String>,
}

impl RoomView {
    /// Build the view of `room`. Fails only if an exit names a barrier the
    /// world does not contain.
    pub fn describe(room: &Room, world: &World) -> Result<Self, EngineError> {
        let mut seen: Vec<&BarrierId> = Vec::new();
        let mut barriers: Vec<String> = Vec::new();
        for exit in room.exits.values() {
            let Some(barrier_id) = &exit.barrier else {
                continue;
            };
            let barrier = world
                .barrier(barrier_id)
                .ok_or_else(|| EngineError::UnknownBarrier(barrier_id.clone()))?;
            if barrier.is_locked() && !seen.contains(&barrier_id) {
                seen.push(barrier_id);
                barriers.push(barrier.description.clone());
            }
        }

        Ok(Self {
            name: room.name.clone(),
            description: room.description.clone(),
            barriers,
            items: room.items.iter().map(|i| i.name.clone()).collect(),
            exits: room.exit_names().into_iter().map(String::from).collect(),
        })
    }
}

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The current room, in answer to `look`.
    Room(RoomView),
    /// The room the player just walked into.
    Moved(RoomView),
    PickedUp { item: String },
    Dropped { item: String },
    Inventory(Vec<String>),
    Examined { name: String, description: String },
    Unlocked { barrier: String, message: String },
    Rejected(CommandError),
    /// Terminal: the session ends after this response.
    Goodbye,
}

impl Response {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Response::Goodbye)
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Response::Rejected(_))
    }
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Response::Rejected(err)
    }
}
