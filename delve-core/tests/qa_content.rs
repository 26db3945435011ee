//! QA tests for the adventure library and the bundled adventures.

use delve_core::content::{parse_adventure, AdventureLibrary, ContentError};
use delve_core::testing::{barrier_adventure, two_room_adventure};
use std::path::PathBuf;
use tempfile::TempDir;

fn bundled() -> AdventureLibrary {
    AdventureLibrary::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../adventures"))
}

#[tokio::test]
async fn test_library_lists_valid_and_skips_broken() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("two.json"), two_room_adventure()).expect("write two");
    std::fs::write(dir.path().join("vault.json"), barrier_adventure()).expect("write vault");
    std::fs::write(dir.path().join("broken.json"), "{ not json").expect("write broken");
    std::fs::write(dir.path().join("notes.txt"), "not an adventure").expect("write notes");

    let library = AdventureLibrary::new(dir.path());
    let listed = library.list().await.expect("Failed to list");
    let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["two", "vault"]);
    assert_eq!(listed[0].title, "Two Rooms");
    assert_eq!(listed[1].title, "The Vault");

    let world = library.load("vault").await.expect("Failed to load");
    assert_eq!(world.starting_room.as_str(), "antechamber");

    assert!(matches!(
        library.load("broken").await,
        Err(ContentError::Json(_))
    ));
}

#[tokio::test]
async fn test_every_listed_adventure_loads() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("two.json"), two_room_adventure()).expect("write two");
    std::fs::write(dir.path().join("crypt.v2.json"), two_room_adventure()).expect("write crypt");
    std::fs::write(dir.path().join("old vault.json"), barrier_adventure()).expect("write vault");

    let library = AdventureLibrary::new(dir.path());
    let listed = library.list().await.expect("Failed to list");
    let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["two"]);

    for adventure in &listed {
        library
            .load(&adventure.id)
            .await
            .unwrap_or_else(|e| panic!("listed adventure {} failed to load: {e}", adventure.id));
    }
}

#[tokio::test]
async fn test_library_unknown_adventure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let library = AdventureLibrary::new(dir.path());

    for id in ["missing", "../etc/passwd", ""] {
        match library.load(id).await {
            Err(ContentError::UnknownAdventure(name)) => assert_eq!(name, id),
            other => panic!("expected UnknownAdventure for {id:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_library_missing_directory() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let library = AdventureLibrary::new(dir.path().join("nowhere"));
    assert!(matches!(library.list().await, Err(ContentError::Io { .. })));
}

#[test]
fn test_invalid_worlds_are_rejected() {
    let unreachable = r#"{
        "startingRoomId": "a",
        "rooms": [
            { "id": "a", "name": "A" },
            { "id": "b", "name": "B", "exits": { "north": "a" } }
        ]
    }"#;
    match parse_adventure(unreachable, "t") {
        Err(ContentError::UnreachableRooms(rooms)) => assert_eq!(rooms, vec!["b"]),
        other => panic!("expected UnreachableRooms, got {other:?}"),
    }

    let dangling = r#"{
        "startingRoomId": "a",
        "rooms": [ { "id": "a", "name": "A", "exits": { "east": "nowhere" } } ]
    }"#;
    assert!(matches!(
        parse_adventure(dangling, "t"),
        Err(ContentError::DanglingExit { .. })
    ));

    let no_start = r#"{ "startingRoomId": "z", "rooms": [ { "id": "a", "name": "A" } ] }"#;
    assert!(matches!(
        parse_adventure(no_start, "t"),
        Err(ContentError::MissingStartingRoom(_))
    ));
}

#[tokio::test]
async fn test_bundled_adventures_load() {
    let library = bundled();
    let listed = library.list().await.expect("Failed to list bundled adventures");
    assert!(listed.len() >= 2);

    for adventure in &listed {
        let world = library
            .load(&adventure.id)
            .await
            .unwrap_or_else(|e| panic!("{} failed to load: {e}", adventure.id));
        assert!(world.room(&world.starting_room).is_some());
    }
    assert!(listed.iter().any(|a| a.id == "cellar"));
}

#[tokio::test]
async fn test_bundled_adventure_has_a_barrier() {
    let world = bundled()
        .load("lighthouse")
        .await
        .expect("Failed to load lighthouse");
    assert!(!world.barriers.is_empty());
    assert!(world.barriers.values().all(|b| b.is_locked()));
}
