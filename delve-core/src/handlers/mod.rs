//! One handler per request kind.
//!
//! Each handler is a thin [`Handler`] impl over a plain function of
//! `(&mut GameState, args) -> Result<Response, EngineError>`. Player mistakes
//! come back as [`Response::Rejected`]; `EngineError` is reserved for state
//! that should be impossible after content validation.

mod inventory;
mod look;
mod movement;
mod unlock;

pub use inventory::{drop, inventory, take, DropHandler, InventoryHandler, TakeHandler};
pub use look::{examine, look, ExamineHandler, LookHandler};
pub use movement::{go, MoveHandler};
pub use unlock::{use_item, UseHandler};

use crate::autosave::AutoSave;
use crate::dispatch::{misrouted, DispatchError, Dispatcher, EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::persist::Repository;
use crate::response::Response;
use crate::world::{GameState, Room};
use async_trait::async_trait;
use std::sync::Arc;

/// The room the player stands in.
pub(crate) fn current_room(state: &GameState) -> Result<&Room, EngineError> {
    state
        .current_room()
        .ok_or_else(|| EngineError::UnknownRoom(state.player.location.clone()))
}

/// Ends the session.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    fn kind(&self) -> RequestKind {
        RequestKind::Quit
    }

    async fn handle(
        &self,
        _state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        match request {
            Request::Quit => Ok(Response::Goodbye),
            other => Err(misrouted(RequestKind::Quit, other)),
        }
    }
}

/// Wire every handler. With a repository, the state-changing handlers
/// (move, take, drop, use) are wrapped in [`AutoSave`].
pub fn standard_dispatcher(
    repository: Option<Arc<dyn Repository>>,
) -> Result<Dispatcher, DispatchError> {
    let mut builder = Dispatcher::builder();
    builder
        .register(LookHandler)
        .register(InventoryHandler)
        .register(ExamineHandler)
        .register(QuitHandler);

    match repository {
        Some(repository) => {
            builder
                .register(AutoSave::new(MoveHandler, repository.clone()))
                .register(AutoSave::new(TakeHandler, repository.clone()))
                .register(AutoSave::new(DropHandler, repository.clone()))
                .register(AutoSave::new(UseHandler, repository));
        }
        None => {
            builder
                .register(MoveHandler)
                .register(TakeHandler)
                .register(DropHandler)
                .register(UseHandler);
        }
    }

    builder.build()
}
