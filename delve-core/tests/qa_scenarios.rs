//! QA tests for scripted play-throughs.
//!
//! Each test drives a real session (parser, dispatcher, handlers, formatter,
//! auto-save into memory) through the `TestHarness` and checks both the
//! replies and the resulting game state.

use delve_core::parser::{Parser, Request, VerbTable};
use delve_core::testing::TestHarness;
use delve_core::world::Direction;

fn count_room_views(outputs: &[&str], room_name: &str) -> usize {
    outputs
        .iter()
        .filter(|output| output.lines().next() == Some(room_name))
        .count()
}

// =============================================================================
// TWO ROOMS
// =============================================================================

#[tokio::test]
async fn test_walk_there_and_back() {
    let mut harness = TestHarness::two_rooms().expect("Failed to build harness");

    let replies = harness
        .run(&["look", "go north", "look", "go south", "quit"])
        .await
        .expect("Failed to run script");

    assert_eq!(replies.len(), 5);
    assert_eq!(harness.location(), "start");
    assert_eq!(replies[4], "Goodbye!");

    let outputs = harness.outputs();
    // Initial look and the return trip.
    assert_eq!(count_room_views(&outputs, "Start"), 2);
    let start_description = "A bare stone room where everything begins.";
    assert_eq!(
        outputs.iter().filter(|o| o.contains(start_description)).count(),
        2
    );
    // Moving echoes the destination, so End is shown on arrival and on look.
    assert_eq!(count_room_views(&outputs, "End"), 2);
}

#[tokio::test]
async fn test_no_exit_is_a_no_op() {
    let mut harness = TestHarness::two_rooms().expect("Failed to build harness");

    for direction in ["east", "west", "up", "down", "south"] {
        let reply = harness
            .input(&format!("go {direction}"))
            .await
            .expect("Failed to send");
        assert_eq!(reply, format!("There is no exit to the {direction}."));
        assert!(reply.contains("no exit"));
        assert_eq!(harness.location(), "start");
    }
}

#[tokio::test]
async fn test_quit_ends_script_early() {
    let mut harness = TestHarness::two_rooms().expect("Failed to build harness");
    let replies = harness
        .run(&["quit", "go north"])
        .await
        .expect("Failed to run script");
    assert_eq!(replies, vec!["Goodbye!"]);
    assert_eq!(harness.location(), "start");
}

// =============================================================================
// CELLAR
// =============================================================================

#[tokio::test]
async fn test_take_and_drop_lamp() {
    let mut harness = TestHarness::cellar().expect("Failed to build harness");

    let replies = harness
        .run(&["take brass lamp", "inventory", "drop brass lamp", "look"])
        .await
        .expect("Failed to run script");

    assert_eq!(replies[0], "You pick up the brass lamp.");
    assert_eq!(replies[1], "You are carrying: brass lamp.");
    assert_eq!(replies[2], "You drop the brass lamp.");
    assert!(replies[3].contains("You see: brass lamp."));

    assert!(harness.inventory().is_empty());
    assert_eq!(harness.room_items("cellar"), vec!["brass lamp"]);
    assert_eq!(
        harness.input("inventory").await.expect("Failed to send"),
        "You are not carrying anything."
    );
}

#[tokio::test]
async fn test_item_names_ignore_case() {
    let mut harness = TestHarness::cellar().expect("Failed to build harness");
    assert_eq!(
        harness.input("TAKE BRASS LAMP").await.expect("Failed to send"),
        "You pick up the brass lamp."
    );
    assert_eq!(
        harness.input("drop Brass Lamp").await.expect("Failed to send"),
        "You drop the brass lamp."
    );
}

#[tokio::test]
async fn test_carry_lamp_upstairs() {
    let mut harness = TestHarness::cellar().expect("Failed to build harness");
    harness
        .run(&["take lamp", "take brass lamp", "u", "drop brass lamp", "get rope"])
        .await
        .expect("Failed to run script");

    assert_eq!(harness.location(), "yard");
    assert!(harness.room_items("cellar").is_empty());
    assert_eq!(harness.room_items("yard"), vec!["brass lamp"]);
    assert_eq!(harness.inventory(), vec!["coil of rope"]);
    assert_eq!(harness.outputs()[0], "There is no 'lamp' here.");
}

#[tokio::test]
async fn test_examine_search_order() {
    let mut harness = TestHarness::cellar().expect("Failed to build harness");
    let replies = harness
        .run(&["x cask", "look at the brass lamp", "examine dragon"])
        .await
        .expect("Failed to run script");
    assert_eq!(
        replies,
        vec![
            "It smells of vinegar.",
            "A dented brass lamp.",
            "You don't see 'dragon' here.",
        ]
    );
}

// =============================================================================
// BARRIER
// =============================================================================

#[tokio::test]
async fn test_unlock_iron_door() {
    let mut harness = TestHarness::barrier().expect("Failed to build harness");

    let blocked = harness.input("go north").await.expect("Failed to send");
    assert_eq!(blocked, "The iron door is locked tight.");
    assert_eq!(harness.location(), "antechamber");

    let replies = harness
        .run(&["take rusty-key", "use rusty key on iron door", "go north"])
        .await
        .expect("Failed to run script");

    assert_eq!(replies[0], "You pick up the rusty key.");
    assert_eq!(replies[1], "The key turns with a grinding screech.");
    assert!(replies[2].starts_with("Vault\n"));
    assert_eq!(harness.location(), "vault");
    assert!(harness.barrier_unlocked("iron-door"));
}

#[tokio::test]
async fn test_barrier_description_shown_only_while_locked() {
    let mut harness = TestHarness::barrier().expect("Failed to build harness");
    let door = "A heavy iron door blocks the way north.";

    assert!(harness.input("look").await.expect("Failed to send").contains(door));
    harness
        .run(&["take rusty key", "use rusty key"])
        .await
        .expect("Failed to run script");
    assert!(!harness.input("look").await.expect("Failed to send").contains(door));
}

#[tokio::test]
async fn test_use_rejections() {
    let mut harness = TestHarness::barrier().expect("Failed to build harness");

    let replies = harness
        .run(&[
            "use rusty key",
            "take rusty key",
            "use rusty key on window",
            "use rusty key on iron door",
            "use rusty key on iron door",
            "n",
            "use rusty key",
        ])
        .await
        .expect("Failed to run script");

    assert_eq!(
        replies,
        vec![
            "You don't have 'rusty key'.",
            "You pick up the rusty key.",
            "You don't see 'window' here.",
            "The key turns with a grinding screech.",
            "The iron door is already unlocked.",
            replies[5].as_str(),
            "There is nothing to use that on.",
        ]
    );
    assert!(replies[5].starts_with("Vault"));
}

// =============================================================================
// AUTO-SAVE AND PARSER
// =============================================================================

#[tokio::test]
async fn test_only_state_changes_are_saved() {
    let mut harness = TestHarness::barrier().expect("Failed to build harness");
    harness
        .run(&["look", "inventory", "x key", "dance", "take rusty key", "go north"])
        .await
        .expect("Failed to run script");
    // take and the (blocked) move
    assert_eq!(harness.save_count().await, 2);
}

#[test]
fn test_parser_aliases() {
    let parser = Parser::new(VerbTable::standard());
    assert_eq!(
        parser.parse("l").expect("parse l").kind(),
        parser.parse("look").expect("parse look").kind()
    );
    assert_eq!(
        parser.parse("n").expect("parse n"),
        parser.parse("go north").expect("parse go north")
    );
    assert_eq!(
        parser.parse("go north").expect("parse go north"),
        Request::Move {
            direction: Direction::North
        }
    );
}

#[tokio::test]
async fn test_parse_errors_do_not_change_state() {
    let mut harness = TestHarness::cellar().expect("Failed to build harness");
    let replies = harness
        .run(&["", "fly north", "go", "go sideways", "take"])
        .await
        .expect("Failed to run script");
    assert_eq!(
        replies,
        vec![
            "Please enter a command.",
            "I don't understand 'fly'.",
            "Go where?",
            "'sideways' is not a direction.",
            "Take what?",
        ]
    );
    assert_eq!(harness.location(), "cellar");
    assert_eq!(harness.save_count().await, 0);
}
