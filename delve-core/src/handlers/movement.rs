use super::current_room;
use crate::dispatch::{misrouted, EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::response::{CommandError, Response, RoomView};
use crate::world::{Direction, GameState};
use async_trait::async_trait;

/// Walk through the exit facing `direction`, unless it is missing or barred.
pub fn go(state: &mut GameState, direction: Direction) -> Result<Response, EngineError> {
    let room = current_room(state)?;
    let Some(exit) = room.exit(direction) else {
        return Ok(CommandError::NoExit(direction).into());
    };

    if let Some(barrier_id) = &exit.barrier {
        let barrier = state
            .world
            .barrier(barrier_id)
            .ok_or_else(|| EngineError::UnknownBarrier(barrier_id.clone()))?;
        if barrier.is_locked() {
            return Ok(CommandError::Blocked(barrier.blocked_message.clone()).into());
        }
    }

    let destination = exit.destination.clone();
    let view = {
        let room = state
            .world
            .room(&destination)
            .ok_or_else(|| EngineError::UnknownRoom(destination.clone()))?;
        RoomView::describe(room, &state.world)?
    };

    tracing::debug!(from = %state.player.location, to = %destination, "player moved");
    state.player.location = destination;
    Ok(Response::Moved(view))
}

pub struct MoveHandler;

#[async_trait]
impl Handler for MoveHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Move
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Move { direction } => go(state, *direction),
            other => Err(misrouted(RequestKind::Move, other)),
        }
    }
}
