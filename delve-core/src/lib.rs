//! Text adventure engine.
//!
//! This crate provides:
//! - A room/item/barrier world model loaded and validated from JSON
//! - A verb-table command parser producing typed requests
//! - A kind-keyed dispatcher with one handler per request
//! - Character creation, session persistence and auto-save
//!
//! # Quick Start
//!
//! ```ignore
//! use delve_core::{CharacterCreation, GameSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut creation = CharacterCreation::new();
//!     for line in ["rogue", "halfling", "roll", "Pip"] {
//!         creation.process_input(line);
//!     }
//!     let character = creation.into_character().ok_or("incomplete character")?;
//!
//!     let config = SessionConfig::new().with_adventures_dir("adventures");
//!     let mut session = GameSession::start(&config, "cellar", character).await?;
//!
//!     println!("{}", session.describe_current_room()?);
//!     let turn = session.player_action("take brass lamp").await?;
//!     println!("{}", turn.text);
//!     Ok(())
//! }
//! ```

pub mod autosave;
pub mod character;
pub mod content;
pub mod dice;
pub mod dispatch;
pub mod format;
pub mod handlers;
pub mod headless;
pub mod lobby;
pub mod parser;
pub mod persist;
pub mod response;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use character::{CharacterCreation, CreationState};
pub use content::{AdventureLibrary, AdventureSummary, ContentError};
pub use dispatch::{DispatchError, Dispatcher, EngineError, Handler};
pub use headless::{HeadlessGame, TranscriptEntry};
pub use lobby::{lobby_prompt, parse_lobby_choice, LobbyChoice};
pub use parser::{ParseError, Parser, Request, RequestKind, VerbTable};
pub use persist::{JsonFileRepository, MemoryRepository, PersistError, Repository};
pub use response::{CommandError, Response, RoomView};
pub use session::{GameSession, SessionConfig, SessionError, Turn};
pub use testing::TestHarness;
pub use world::{Character, Direction, GameState, SessionId, World};
