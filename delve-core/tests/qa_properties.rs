//! Property tests for handler invariants.

use delve_core::format::render;
use delve_core::handlers::{drop, go, take, use_item};
use delve_core::parser::{Parser, VerbTable};
use delve_core::response::{CommandError, Response};
use delve_core::testing::sample_character;
use delve_core::world::{
    Barrier, BarrierId, Direction, Exit, GameState, Item, ItemId, Room, RoomId, World,
};
use proptest::prelude::*;
use proptest::sample::{subsequence, Index};
use std::collections::BTreeSet;

fn world_with(rooms: Vec<Room>, barriers: Vec<Barrier>) -> World {
    let starting_room = rooms[0].id.clone();
    World {
        title: "Generated".to_string(),
        rooms: rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
        barriers: barriers.into_iter().map(|b| (b.id.clone(), b)).collect(),
        starting_room,
    }
}

/// Flip the case of characters where the mask says so.
fn scramble_case(text: &str, mask: &[bool]) -> String {
    text.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

fn item_set(items: &[Item]) -> BTreeSet<String> {
    items.iter().map(|i| i.id.as_str().to_string()).collect()
}

proptest! {
    #[test]
    fn take_then_drop_restores_room_and_pack(
        names in prop::collection::btree_set("[a-z]{3,8}( [a-z]{3,8})?", 1..6),
        pick in any::<Index>(),
        mask in prop::collection::vec(any::<bool>(), 1..16),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut room = Room::new("room", "Room");
        for (i, name) in names.iter().enumerate() {
            room = room.with_item(Item::new(format!("item-{i}"), name.clone(), ""));
        }
        let mut state = GameState::new("prop", world_with(vec![room], vec![]), sample_character("Prop"));
        let room_id = RoomId::new("room");
        let before = item_set(&state.world.room(&room_id).unwrap().items);

        let name = scramble_case(pick.get::<String>(&names), &mask);
        let taken = take(&mut state, &name).unwrap();
        prop_assert!(matches!(taken, Response::PickedUp { .. }), "take failed for {name:?}");
        let dropped = drop(&mut state, &name).unwrap();
        prop_assert!(matches!(dropped, Response::Dropped { .. }), "drop failed for {name:?}");

        prop_assert_eq!(item_set(&state.world.room(&room_id).unwrap().items), before);
        prop_assert!(state.player.inventory.is_empty());
    }

    #[test]
    fn move_without_exit_keeps_location(
        exits in subsequence(Direction::all().to_vec(), 0..=6),
    ) {
        let mut room = Room::new("here", "Here");
        for direction in &exits {
            room = room.with_exit(*direction, Exit::to("there"));
        }
        let there = Room::new("there", "There");
        let mut state = GameState::new("prop", world_with(vec![room, there], vec![]), sample_character("Prop"));

        for direction in Direction::all() {
            if exits.contains(&direction) {
                continue;
            }
            let response = go(&mut state, direction).unwrap();
            prop_assert_eq!(&response, &Response::Rejected(CommandError::NoExit(direction)));
            prop_assert!(render(&response).contains("no exit"));
            prop_assert_eq!(state.player.location.as_str(), "here");
        }
    }

    #[test]
    fn use_unlocks_only_with_matching_locked_barrier(
        use_key in any::<bool>(),
        initially_unlocked in any::<bool>(),
    ) {
        let hall = Room::new("hall", "Hall")
            .with_exit(Direction::North, Exit::to("vault").gated_by("gate"));
        let vault = Room::new("vault", "Vault");
        let gate = Barrier {
            id: BarrierId::new("gate"),
            name: "gate".to_string(),
            description: "A gate.".to_string(),
            blocked_message: "The gate is shut.".to_string(),
            unlock_item: ItemId::new("key"),
            unlock_message: "The gate swings open.".to_string(),
            unlocked: initially_unlocked,
        };
        let mut state = GameState::new("prop", world_with(vec![hall, vault], vec![gate]), sample_character("Prop"));
        state.player.inventory.push(Item::new("key", "key", ""));
        state.player.inventory.push(Item::new("spoon", "spoon", ""));

        let item = if use_key { "key" } else { "spoon" };
        let response = use_item(&mut state, item, Some("gate")).unwrap();
        let unlocked = !state.world.barrier(&BarrierId::new("gate")).unwrap().is_locked();

        prop_assert_eq!(unlocked, initially_unlocked || use_key);
        prop_assert_eq!(
            matches!(response, Response::Unlocked { .. }),
            use_key && !initially_unlocked
        );
        if initially_unlocked {
            prop_assert_eq!(response, Response::Rejected(CommandError::AlreadyUnlocked("gate".to_string())));
        }

        if unlocked {
            let again = use_item(&mut state, "key", Some("gate")).unwrap();
            prop_assert_eq!(again, Response::Rejected(CommandError::AlreadyUnlocked("gate".to_string())));
            prop_assert!(!state.world.barrier(&BarrierId::new("gate")).unwrap().is_locked());
        }
    }

    #[test]
    fn item_lookup_ignores_case(mask in prop::collection::vec(any::<bool>(), 1..16)) {
        let room = Room::new("room", "Room").with_item(Item::new("lamp", "brass lamp", ""));
        let mut state = GameState::new("prop", world_with(vec![room], vec![]), sample_character("Prop"));
        let query = scramble_case("brass lamp", &mask);
        prop_assert_eq!(
            take(&mut state, &query).unwrap(),
            Response::PickedUp { item: "brass lamp".to_string() }
        );
    }

    #[test]
    fn parser_never_panics(input in any::<String>()) {
        let parser = Parser::new(VerbTable::standard());
        let _ = parser.parse(&input);
    }
}

