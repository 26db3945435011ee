use super::current_room;
use crate::dispatch::{misrouted, EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::response::{CommandError, Response};
use crate::world::{Barrier, BarrierId, GameState};
use async_trait::async_trait;

/// Use a carried item, on a named barrier or on the first locked one in reach.
pub fn use_item(
    state: &mut GameState,
    item_query: &str,
    target: Option<&str>,
) -> Result<Response, EngineError> {
    let Some(item) = state.player.find_item(item_query) else {
        return Ok(CommandError::NotHeld(item_query.to_string()).into());
    };
    let item_id = item.id.clone();
    let item_name = item.name.clone();

    let barrier_id = match target {
        Some(target) => match find_barrier(state, |b| b.matches(target))? {
            Some(id) => id,
            None => return Ok(CommandError::NotSeen(target.to_string()).into()),
        },
        None => match find_barrier(state, |b| b.is_locked())? {
            Some(id) => id,
            None => return Ok(CommandError::NothingToUseOn.into()),
        },
    };

    let barrier = state
        .world
        .barrier_mut(&barrier_id)
        .ok_or_else(|| EngineError::UnknownBarrier(barrier_id.clone()))?;

    if !barrier.is_locked() {
        return Ok(CommandError::AlreadyUnlocked(barrier.name.clone()).into());
    }
    if barrier.unlock_item != item_id {
        return Ok(CommandError::WrongItem {
            item: item_name,
            barrier: barrier.name.clone(),
        }
        .into());
    }

    barrier.unlock();
    tracing::debug!(barrier = %barrier.id, item = %item_id, "barrier unlocked");
    Ok(Response::Unlocked {
        barrier: barrier.name.clone(),
        message: barrier.unlock_message.clone(),
    })
}

/// First barrier on the current room's exits (in direction order) that
/// satisfies `predicate`.
fn find_barrier(
    state: &GameState,
    predicate: impl Fn(&Barrier) -> bool,
) -> Result<Option<BarrierId>, EngineError> {
    let room = current_room(state)?;
    for barrier_id in room.exits.values().filter_map(|exit| exit.barrier.as_ref()) {
        let barrier = state
            .world
            .barrier(barrier_id)
            .ok_or_else(|| EngineError::UnknownBarrier(barrier_id.clone()))?;
        if predicate(barrier) {
            return Ok(Some(barrier_id.clone()));
        }
    }
    Ok(None)
}

pub struct UseHandler;

#[async_trait]
impl Handler for UseHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Use
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Use { item, target } => use_item(state, item, target.as_deref()),
            other => Err(misrouted(RequestKind::Use, other)),
        }
    }
}
