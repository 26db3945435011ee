//! Auto-save decorator.

use crate::dispatch::{EngineError, Handler};
use crate::parser::{Request, RequestKind};
use crate::persist::Repository;
use crate::response::Response;
use crate::world::GameState;
use async_trait::async_trait;
use std::sync::Arc;

/// Wraps a handler and saves the game state after every successful call.
///
/// The save runs strictly after the inner handler has produced its
/// response, and is skipped entirely when the handler fails. A failed save
/// is logged and otherwise ignored: the player still gets the response and
/// the in-memory state is untouched.
pub struct AutoSave<H> {
    inner: H,
    repository: Arc<dyn Repository>,
}

impl<H: Handler> AutoSave<H> {
    pub fn new(inner: H, repository: Arc<dyn Repository>) -> Self {
        Self { inner, repository }
    }
}

#[async_trait]
impl<H: Handler> Handler for AutoSave<H> {
    fn kind(&self) -> RequestKind {
        self.inner.kind()
    }

    async fn handle(
        &self,
        state: &mut GameState,
        request: &Request,
    ) -> Result<Response, EngineError> {
        let response = self.inner.handle(state, request).await?;

        if let Err(e) = self.repository.save(state).await {
            tracing::warn!(
                session = %state.session_id,
                request = %request.kind(),
                error = %e,
                "auto-save failed, continuing without saving"
            );
        }

        Ok(response)
    }
}
