//! Request dispatch.
//!
//! Routes each [`Request`] to the single [`Handler`] registered for its
//! [`RequestKind`]. The registry is checked for completeness when it is
//! built, so a missing handler fails at startup instead of mid-session.

use crate::parser::{Request, RequestKind};
use crate::response::Response;
use crate::world::{BarrierId, GameState, RoomId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Internal failures. These point at broken content or wiring, never at
/// player input.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Room '{0}' does not exist in this world")]
    UnknownRoom(RoomId),

    #[error("Barrier '{0}' does not exist in this world")]
    UnknownBarrier(BarrierId),

    #[error("The {handler} handler received a {request} request")]
    Misrouted {
        handler: RequestKind,
        request: RequestKind,
    },

    #[error("No handler is registered for {0} requests")]
    Unrouted(RequestKind),
}

/// Wiring failures detected while building a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No handler registered for {0} requests")]
    MissingHandler(RequestKind),
}

/// Handles exactly one kind of request.
#[async_trait]
pub trait Handler: Send + Sync {
    /// The request kind this handler is registered under.
    fn kind(&self) -> RequestKind;

    /// Apply the request to the game state and describe the outcome.
    async fn handle(&self, state: &mut GameState, request: &Request)
        -> Result<Response, EngineError>;
}

/// Error for a handler that was given a request of another kind.
pub fn misrouted(handler: RequestKind, request: &Request) -> EngineError {
    EngineError::Misrouted {
        handler,
        request: request.kind(),
    }
}

/// Collects handlers before the completeness check.
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<RequestKind, Arc<dyn Handler>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own kind, replacing any earlier one.
    pub fn register<H: Handler + 'static>(&mut self, handler: H) -> &mut Self {
        self.handlers.insert(handler.kind(), Arc::new(handler));
        self
    }

    /// Finish wiring. Every request kind must have a handler.
    pub fn build(&mut self) -> Result<Dispatcher, DispatchError> {
        if let Some(missing) = RequestKind::all()
            .into_iter()
            .find(|kind| !self.handlers.contains_key(kind))
        {
            return Err(DispatchError::MissingHandler(missing));
        }

        Ok(Dispatcher {
            handlers: std::mem::take(&mut self.handlers),
        })
    }
}

/// Kind-keyed handler registry.
pub struct Dispatcher {
    handlers: HashMap<RequestKind, Arc<dyn Handler>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("Dispatcher")
            .field("handlers", &kinds)
            .finish()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Route a request to its handler.
    pub async fn send(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        let kind = request.kind();
        let handler = self
            .handlers
            .get(&kind)
            .ok_or(EngineError::Unrouted(kind))?;

        tracing::debug!(session = %state.session_id, request = ?request, "dispatching");
        handler.handle(state, request).await
    }
}
