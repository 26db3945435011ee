use crate::dispatch::{misrouted, EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::response::{CommandError, Response};
use crate::world::GameState;
use async_trait::async_trait;

/// Move an item from the current room into the player's pack.
pub fn take(state: &mut GameState, query: &str) -> Result<Response, EngineError> {
    let room = state
        .world
        .room_mut(&state.player.location)
        .ok_or_else(|| EngineError::UnknownRoom(state.player.location.clone()))?;

    let Some(item) = room.remove_item(query) else {
        return Ok(CommandError::ItemNotHere(query.to_string()).into());
    };

    let name = item.name.clone();
    state.player.inventory.push(item);
    Ok(Response::PickedUp { item: name })
}

/// Move an item from the player's pack into the current room.
pub fn drop(state: &mut GameState, query: &str) -> Result<Response, EngineError> {
    let room = state
        .world
        .room_mut(&state.player.location)
        .ok_or_else(|| EngineError::UnknownRoom(state.player.location.clone()))?;

    let Some(item) = state.player.remove_item(query) else {
        return Ok(CommandError::NotCarrying(query.to_string()).into());
    };

    let name = item.name.clone();
    room.add_item(item);
    Ok(Response::Dropped { item: name })
}

pub fn inventory(state: &GameState) -> Response {
    Response::Inventory(state.player.inventory_names())
}

pub struct TakeHandler;

#[async_trait]
impl Handler for TakeHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Take
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Take { item } => take(state, item),
            other => Err(misrouted(RequestKind::Take, other)),
        }
    }
}

pub struct DropHandler;

#[async_trait]
impl Handler for DropHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Drop
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Drop { item } => drop(state, item),
            other => Err(misrouted(RequestKind::Drop, other)),
        }
    }
}

pub struct InventoryHandler;

#[async_trait]
impl Handler for InventoryHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Inventory
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Inventory => Ok(inventory(state)),
            other => Err(misrouted(RequestKind::Inventory, other)),
        }
    }
}
