use super::current_room;
use crate::dispatch::{misrouted, EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::response::{CommandError, Response, RoomView};
use crate::world::GameState;
use async_trait::async_trait;

/// Describe the current room.
pub fn look(state: &GameState) -> Result<Response, EngineError> {
    let room = current_room(state)?;
    Ok(Response::Room(RoomView::describe(room, &state.world)?))
}

/// Inspect something: carried items first, then room items, then scenery.
pub fn examine(state: &GameState, target: &str) -> Result<Response, EngineError> {
    let room = current_room(state)?;

    let found = state
        .player
        .find_item(target)
        .or_else(|| room.find_item(target))
        .map(|item| (&item.name, &item.description))
        .or_else(|| {
            room.find_feature(target)
                .map(|feature| (&feature.name, &feature.description))
        });

    Ok(match found {
        Some((name, description)) => Response::Examined {
            name: name.clone(),
            description: description.clone(),
        },
        None => CommandError::NotSeen(target.to_string()).into(),
    })
}

pub struct LookHandler;

#[async_trait]
impl Handler for LookHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Look
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Look => look(state),
            other => Err(misrouted(RequestKind::Look, other)),
        }
    }
}

pub struct ExamineHandler;

#[async_trait]
impl Handler for ExamineHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Examine
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Examine { target } => examine(state, target),
            other => Err(misrouted(RequestKind::Examine, other)),
        }
    }
}
