//! GameSession - the primary public API for playing an adventure.
//!
//! Wraps the parser, dispatcher, game state and persistence into one object
//! that takes a line of player input and returns the text to show.

use crate::content::{AdventureLibrary, ContentError};
use crate::dispatch::{DispatchError, Dispatcher, EngineError};
use crate::format::render;
use crate::handlers::{self, current_room};
use crate::parser::{Parser, VerbTable};
use crate::persist::{JsonFileRepository, PersistError, Repository};
use crate::response::RoomView;
use crate::world::{Character, GameState, SessionId};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors from GameSession operations. None of these are caused by what
/// the player typed; those come back as ordinary turn text.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Wiring error: {0}")]
    Wiring(#[from] DispatchError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Configuration for creating or resuming a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding `<adventure-id>.json` files.
    pub adventures_dir: PathBuf,

    /// Directory holding `<session-id>.json` saves.
    pub saves_dir: PathBuf,

    /// Save after every state-changing command.
    pub autosave: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            adventures_dir: PathBuf::from("adventures"),
            saves_dir: PathBuf::from("saves"),
            autosave: true,
        }
    }

    pub fn with_adventures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.adventures_dir = dir.into();
        self
    }

    pub fn with_saves_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.saves_dir = dir.into();
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn library(&self) -> AdventureLibrary {
        AdventureLibrary::new(&self.adventures_dir)
    }

    /// The save store, or `None` when auto-save is off.
    pub fn repository(&self) -> Option<Arc<dyn Repository>> {
        self.autosave
            .then(|| Arc::new(JsonFileRepository::new(&self.saves_dir)) as Arc<dyn Repository>)
    }
}

/// Text produced by one player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub text: String,
    /// The session ended with this turn.
    pub finished: bool,
}

/// A running game.
pub struct GameSession {
    state: GameState,
    parser: Parser,
    dispatcher: Dispatcher,
    repository: Option<Arc<dyn Repository>>,
    finished: bool,
}

impl GameSession {
    /// Wrap an existing state. The dispatcher is wired here, so a missing
    /// handler surfaces before the first turn.
    pub fn with_state(
        state: GameState,
        repository: Option<Arc<dyn Repository>>,
    ) -> Result<Self, SessionError> {
        let dispatcher = handlers::standard_dispatcher(repository.clone())?;
        Ok(Self {
            state,
            parser: Parser::new(VerbTable::standard()),
            dispatcher,
            repository,
            finished: false,
        })
    }

    /// Start a new session in a library adventure.
    pub async fn start(
        config: &SessionConfig,
        adventure_id: &str,
        character: Character,
    ) -> Result<Self, SessionError> {
        let world = config.library().load(adventure_id).await?;
        let state = GameState::new(adventure_id, world, character);
        tracing::info!(
            session = %state.session_id,
            adventure = adventure_id,
            character = %state.player.character.name,
            "session started"
        );

        let session = Self::with_state(state, config.repository())?;
        session.checkpoint().await;
        Ok(session)
    }

    /// Resume a saved session from the configured save directory.
    pub async fn resume(config: &SessionConfig, session_id: SessionId) -> Result<Self, SessionError> {
        let state = JsonFileRepository::new(&config.saves_dir)
            .load(session_id)
            .await?;
        tracing::info!(session = %session_id, adventure = %state.adventure_id, "session resumed");
        Self::with_state(state, config.repository())
    }

    /// Process one line of player input.
    pub async fn player_action(&mut self, input: &str) -> Result<Turn, SessionError> {
        if self.finished {
            return Ok(Turn {
                text: "The adventure is over.".to_string(),
                finished: true,
            });
        }

        let request = match self.parser.parse(input) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(input, error = %e, "parse error");
                return Ok(Turn {
                    text: e.to_string(),
                    finished: false,
                });
            }
        };

        let response = self.dispatcher.send(&mut self.state, &request).await?;
        let finished = response.is_terminal();
        if finished {
            self.finished = true;
            tracing::info!(session = %self.state.session_id, "session ended");
        }

        Ok(Turn {
            text: render(&response),
            finished,
        })
    }

    /// The current room, rendered as for `look`, without going through the
    /// dispatcher.
    pub fn describe_current_room(&self) -> Result<String, SessionError> {
        let room = current_room(&self.state)?;
        let view = RoomView::describe(room, &self.state.world)?;
        Ok(crate::format::render_room(&view))
    }

    /// Save now, if a repository is configured.
    pub async fn save(&self) -> Result<(), SessionError> {
        if let Some(repository) = &self.repository {
            repository.save(&self.state).await?;
        }
        Ok(())
    }

    /// Save, logging instead of failing.
    async fn checkpoint(&self) {
        if let Err(e) = self.save().await {
            tracing::warn!(session = %self.state.session_id, error = %e, "initial save failed");
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session_id(&self) -> SessionId {
        self.state.session_id
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn adventure_title(&self) -> &str {
        &self.state.world.title
    }

    pub fn player_name(&self) -> &str {
        &self.state.player.character.name
    }

    pub fn character(&self) -> &Character {
        &self.state.player.character
    }

    /// Name of the room the player is in, or its id if the room is missing.
    pub fn current_room_name(&self) -> &str {
        self.state
            .current_room()
            .map(|room| room.name.as_str())
            .unwrap_or_else(|| self.state.player.location.as_str())
    }

    pub fn inventory(&self) -> Vec<String> {
        self.state.player.inventory_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryRepository;
    use crate::testing::{cellar_world, sample_character};

    fn session() -> (GameSession, Arc<MemoryRepository>) {
        let repository = Arc::new(MemoryRepository::new());
        let state = GameState::new("cellar", cellar_world().unwrap(), sample_character("Tess"));
        let shared: Arc<dyn Repository> = repository.clone();
        (GameSession::with_state(state, Some(shared)).unwrap(), repository)
    }

    #[tokio::test]
    async fn test_parse_errors_are_turn_text() {
        let (mut session, _) = session();
        let turn = session.player_action("dance").await.unwrap();
        assert_eq!(turn.text, "I don't understand 'dance'.");
        assert!(!turn.finished);
    }

    #[tokio::test]
    async fn test_quit_finishes_session() {
        let (mut session, _) = session();
        let turn = session.player_action("q").await.unwrap();
        assert_eq!(
            turn,
            Turn {
                text: "Goodbye!".to_string(),
                finished: true
            }
        );
        assert!(session.is_finished());
        assert!(session.player_action("look").await.unwrap().finished);
    }

    #[tokio::test]
    async fn test_describe_current_room_does_not_save() {
        let (session, repository) = session();
        let text = session.describe_current_room().unwrap();
        assert!(text.starts_with("Cellar\n"));
        assert_eq!(repository.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_queries() {
        let (mut session, _) = session();
        session.player_action("take lamp").await.unwrap();
        assert!(session.inventory().is_empty());
        session.player_action("take brass lamp").await.unwrap();
        assert_eq!(session.inventory(), vec!["brass lamp"]);
        assert_eq!(session.current_room_name(), "Cellar");
        assert_eq!(session.player_name(), "Tess");
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .with_adventures_dir("content")
            .with_saves_dir("/tmp/delve")
            .with_autosave(false);
        assert_eq!(config.adventures_dir, PathBuf::from("content"));
        assert_eq!(config.saves_dir, PathBuf::from("/tmp/delve"));
        assert!(config.repository().is_none());
        assert!(SessionConfig::default().repository().is_some());
    }
}
