//! Response formatting.
//!
//! Turns a [`Response`] into the text the player reads. Every rejection
//! renders as a single sentence.

use crate::response::{Response, RoomView};

/// Render a response as player-facing text.
pub fn render(response: &Response) -> String {
    match response {
        Response::Room(view) | Response::Moved(view) => render_room(view),
        Response::PickedUp { item } => format!("You pick up the {item}."),
        Response::Dropped { item } => format!("You drop the {item}."),
        Response::Inventory(items) => render_inventory(items),
        Response::Examined { name, description } => {
            if description.trim().is_empty() {
                format!("You see nothing special about the {name}.")
            } else {
                description.clone()
            }
        }
        Response::Unlocked { message, .. } => message.clone(),
        Response::Rejected(err) => err.to_string(),
        Response::Goodbye => "Goodbye!".to_string(),
    }
}

/// Room name on its own line, then description, barriers, items and exits.
pub fn render_room(view: &RoomView) -> String {
    let mut lines = vec![view.name.clone()];

    if !view.description.is_empty() {
        lines.push(view.description.clone());
    }
    lines.extend(view.barriers.iter().cloned());

    if !view.items.is_empty() {
        lines.push(format!("You see: {}.", view.items.join(", ")));
    }

    if view.exits.is_empty() {
        lines.push("There are no obvious exits.".to_string());
    } else {
        lines.push(format!("Exits: {}.", view.exits.join(", ")));
    }

    lines.join("\n")
}

fn render_inventory(items: &[String]) -> String {
    if items.is_empty() {
        "You are not carrying anything.".to_string()
    } else {
        format!("You are carrying: {}.", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::CommandError;

    fn cellar() -> RoomView {
        RoomView {
            name: "Cellar".to_string(),
            description: "Damp stone walls.".to_string(),
            barriers: vec!["A trapdoor is bolted shut overhead.".to_string()],
            items: vec!["brass lamp".to_string(), "rope".to_string()],
            exits: vec!["north".to_string(), "up".to_string()],
        }
    }

    #[test]
    fn test_render_room() {
        assert_eq!(
            render(&Response::Room(cellar())),
            "Cellar\n\
             Damp stone walls.\n\
             A trapdoor is bolted shut overhead.\n\
             You see: brass lamp, rope.\n\
             Exits: north, up."
        );
    }

    #[test]
    fn test_render_bare_room() {
        let view = RoomView {
            name: "Closet".to_string(),
            description: String::new(),
            barriers: vec![],
            items: vec![],
            exits: vec![],
        };
        assert_eq!(
            render(&Response::Moved(view)),
            "Closet\nThere are no obvious exits."
        );
    }

    #[test]
    fn test_render_inventory() {
        assert_eq!(
            render(&Response::Inventory(vec![])),
            "You are not carrying anything."
        );
        assert_eq!(
            render(&Response::Inventory(vec![
                "brass lamp".to_string(),
                "rusty key".to_string()
            ])),
            "You are carrying: brass lamp, rusty key."
        );
    }

    #[test]
    fn test_render_simple_responses() {
        assert_eq!(
            render(&Response::PickedUp {
                item: "brass lamp".to_string()
            }),
            "You pick up the brass lamp."
        );
        assert_eq!(
            render(&Response::Dropped {
                item: "brass lamp".to_string()
            }),
            "You drop the brass lamp."
        );
        assert_eq!(render(&Response::Goodbye), "Goodbye!");
        assert_eq!(
            render(&Response::Rejected(CommandError::NotHeld("key".to_string()))),
            "You don't have 'key'."
        );
        assert_eq!(
            render(&Response::Examined {
                name: "pebble".to_string(),
                description: " ".to_string()
            }),
            "You see nothing special about the pebble."
        );
    }
}
