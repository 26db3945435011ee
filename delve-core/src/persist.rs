//! Session persistence.
//!
//! One document per session, keyed by [`SessionId`]. Each document carries
//! the whole [`GameState`] (player sheet, every room's items and every
//! barrier's lock state) so a session can be resumed exactly where it left
//! off. Two stores implement [`Repository`]: JSON files on disk and an
//! in-memory map used by tests.

use crate::world::{GameState, SessionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("No saved session with id {0}")]
    NotFound(SessionId),
}

/// Current save document version.
const SAVE_VERSION: u32 = 1;

/// A saved session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// The complete session state.
    pub state: GameState,

    pub metadata: SaveMetadata,
}

/// Summary fields readable without loading the full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub session_id: SessionId,
    pub character_name: String,
    pub adventure_id: String,
    pub adventure_title: String,
    /// Name of the room the player is standing in.
    pub location: String,
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGame {
    pub fn new(state: GameState) -> Self {
        let saved_at = timestamp_now();
        let location = state
            .current_room()
            .map(|room| room.name.clone())
            .unwrap_or_else(|| state.player.location.to_string());
        let metadata = SaveMetadata {
            session_id: state.session_id,
            character_name: state.player.character.name.clone(),
            adventure_id: state.adventure_id.clone(),
            adventure_title: state.world.title.clone(),
            location,
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            state,
            metadata,
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(content)?;
        check_version(saved.version)?;
        Ok(saved)
    }

    /// Write to `path` through a sibling temp file, so a crash mid-write
    /// never leaves a truncated save behind.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = self.to_json()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Read a save's metadata without deserializing the world.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;
        check_version(partial.version)?;
        Ok(partial.metadata)
    }
}

fn check_version(found: u32) -> Result<(), PersistError> {
    if found != SAVE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    Ok(())
}

/// Storage for session documents.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Insert or replace the document for `state.session_id`.
    async fn save(&self, state: &GameState) -> Result<(), PersistError>;

    async fn load(&self, session_id: SessionId) -> Result<GameState, PersistError>;
}

/// `<session-id>.json` documents in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, session_id: SessionId) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }
}

#[async_trait]
impl Repository for JsonFileRepository {
    async fn save(&self, state: &GameState) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(state.session_id);
        SavedGame::new(state.clone()).save_json(&path).await?;
        tracing::debug!(session = %state.session_id, path = %path.display(), "session saved");
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<GameState, PersistError> {
        let path = self.path_for(session_id);
        if !fs::try_exists(&path).await? {
            return Err(PersistError::NotFound(session_id));
        }
        let saved = SavedGame::load_json(&path).await?;
        tracing::info!(session = %session_id, "session loaded");
        Ok(saved.state)
    }
}

/// Keeps serialized documents in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: Mutex<HashMap<SessionId, String>>,
    saves: Mutex<usize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }

    pub async fn contains(&self, session_id: SessionId) -> bool {
        self.documents.lock().await.contains_key(&session_id)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn save(&self, state: &GameState) -> Result<(), PersistError> {
        let document = SavedGame::new(state.clone()).to_json()?;
        self.documents.lock().await.insert(state.session_id, document);
        *self.saves.lock().await += 1;
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<GameState, PersistError> {
        let documents = self.documents.lock().await;
        let document = documents
            .get(&session_id)
            .ok_or(PersistError::NotFound(session_id))?;
        Ok(SavedGame::from_json(document)?.state)
    }
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    pub path: PathBuf,
    pub metadata: SaveMetadata,
}

/// List saved sessions in `dir`, most recent first. Unreadable files are
/// skipped; a missing directory is an empty list.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let dir = dir.as_ref();
    if !fs::try_exists(dir).await? {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match SavedGame::peek_metadata(&path).await {
                Ok(metadata) => saves.push(SaveInfo { path, metadata }),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping save file");
                }
            }
        }
    }

    saves.sort_by(|a, b| {
        b.metadata
            .saved_at
            .cmp(&a.metadata.saved_at)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(saves)
}

/// Seconds since the Unix epoch, zero-padded so it sorts as text.
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:012}", now.as_secs())
}
