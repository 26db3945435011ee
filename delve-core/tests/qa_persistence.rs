//! QA tests for saving and resuming sessions on disk.

use delve_core::persist::{list_saves, JsonFileRepository, PersistError};
use delve_core::session::{GameSession, SessionConfig, SessionError};
use delve_core::testing::{barrier_adventure, cellar_adventure, sample_character};
use delve_core::world::{BarrierId, RoomId, SessionId};
use tempfile::TempDir;

/// A temp directory with `adventures/` holding the fixtures and an empty
/// place for saves.
fn setup() -> (TempDir, SessionConfig) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let adventures = dir.path().join("adventures");
    std::fs::create_dir_all(&adventures).expect("Failed to create adventures dir");
    std::fs::write(adventures.join("cellar.json"), cellar_adventure()).expect("write cellar");
    std::fs::write(adventures.join("vault.json"), barrier_adventure()).expect("write vault");

    let config = SessionConfig::new()
        .with_adventures_dir(adventures)
        .with_saves_dir(dir.path().join("saves"));
    (dir, config)
}

#[tokio::test]
async fn test_start_writes_initial_save() {
    let (_dir, config) = setup();
    let session = GameSession::start(&config, "cellar", sample_character("Tess"))
        .await
        .expect("Failed to start");

    let path = JsonFileRepository::new(&config.saves_dir).path_for(session.session_id());
    assert!(path.exists());
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(format!("{}.json", session.session_id()).as_str())
    );
    assert_eq!(session.adventure_title(), "The Cellar");
}

#[tokio::test]
async fn test_resume_restores_state() {
    let (_dir, config) = setup();
    let mut session = GameSession::start(&config, "vault", sample_character("Tess"))
        .await
        .expect("Failed to start");
    let id = session.session_id();

    for line in ["take rusty key", "use rusty key on iron door", "north"] {
        session.player_action(line).await.expect("Failed to act");
    }
    drop(session);

    let resumed = GameSession::resume(&config, id)
        .await
        .expect("Failed to resume");
    assert_eq!(resumed.session_id(), id);
    assert_eq!(resumed.current_room_name(), "Vault");
    assert_eq!(resumed.inventory(), vec!["rusty key"]);
    assert_eq!(resumed.player_name(), "Tess");
    let door = resumed
        .state()
        .world
        .barrier(&BarrierId::new("iron-door"))
        .expect("door exists");
    assert!(!door.is_locked());
    assert!(resumed
        .state()
        .world
        .room(&RoomId::new("antechamber"))
        .expect("antechamber exists")
        .items
        .is_empty());
}

#[tokio::test]
async fn test_resumed_session_keeps_saving() {
    let (_dir, config) = setup();
    let session = GameSession::start(&config, "cellar", sample_character("Tess"))
        .await
        .expect("Failed to start");
    let id = session.session_id();
    drop(session);

    let mut resumed = GameSession::resume(&config, id)
        .await
        .expect("Failed to resume");
    resumed
        .player_action("take brass lamp")
        .await
        .expect("Failed to act");
    drop(resumed);

    let again = GameSession::resume(&config, id)
        .await
        .expect("Failed to resume");
    assert_eq!(again.inventory(), vec!["brass lamp"]);
}

#[tokio::test]
async fn test_list_saves_reports_metadata() {
    let (_dir, config) = setup();
    let mut session = GameSession::start(&config, "cellar", sample_character("Tess"))
        .await
        .expect("Failed to start");
    session.player_action("up").await.expect("Failed to act");

    let saves = list_saves(&config.saves_dir).await.expect("Failed to list");
    assert_eq!(saves.len(), 1);
    let metadata = &saves[0].metadata;
    assert_eq!(metadata.session_id, session.session_id());
    assert_eq!(metadata.character_name, "Tess");
    assert_eq!(metadata.adventure_id, "cellar");
    assert_eq!(metadata.adventure_title, "The Cellar");
    assert_eq!(metadata.location, "Yard");
}

#[tokio::test]
async fn test_list_saves_missing_dir_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let saves = list_saves(dir.path().join("nowhere"))
        .await
        .expect("Failed to list");
    assert!(saves.is_empty());
}

#[tokio::test]
async fn test_resume_unknown_session() {
    let (_dir, config) = setup();
    let missing = SessionId::new();
    let result = GameSession::resume(&config, missing).await;
    assert!(matches!(
        result,
        Err(SessionError::Persist(PersistError::NotFound(id))) if id == missing
    ));
}

#[tokio::test]
async fn test_autosave_off_writes_nothing() {
    let (_dir, config) = setup();
    let config = config.with_autosave(false);
    let mut session = GameSession::start(&config, "cellar", sample_character("Tess"))
        .await
        .expect("Failed to start");
    session
        .player_action("take brass lamp")
        .await
        .expect("Failed to act");

    assert!(!config.saves_dir.exists());
    assert!(list_saves(&config.saves_dir)
        .await
        .expect("Failed to list")
        .is_empty());
}

#[tokio::test]
async fn test_start_unknown_adventure() {
    let (_dir, config) = setup();
    let result = GameSession::start(&config, "atlantis", sample_character("Tess")).await;
    assert!(matches!(result, Err(SessionError::Content(_))));
    assert!(!config.saves_dir.exists());
}
