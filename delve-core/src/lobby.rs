//! Adventure selection and login.
//!
//! After character creation the player either picks an adventure from the
//! library (by list number or id) or resumes a saved session by id.

use crate::content::AdventureSummary;
use crate::world::SessionId;

/// What the player asked for in the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyChoice {
    Start(String),
    Resume(SessionId),
}

/// Parse a lobby command against the listed adventures.
///
/// Errors are re-prompt messages for the player.
pub fn parse_lobby_choice(
    input: &str,
    adventures: &[AdventureSummary],
) -> Result<LobbyChoice, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Choose an adventure by number or id.".to_string());
    }

    let mut words = input.split_whitespace();
    if let Some(verb) = words.next() {
        if verb.eq_ignore_ascii_case("resume") || verb.eq_ignore_ascii_case("login") {
            let Some(id) = words.next() else {
                return Err(format!("Usage: {} <session-id>", verb.to_lowercase()));
            };
            return id
                .parse::<SessionId>()
                .map(LobbyChoice::Resume)
                .map_err(|_| format!("'{id}' is not a session id."));
        }
    }

    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| adventures.get(i))
            .map(|a| LobbyChoice::Start(a.id.clone()))
            .ok_or_else(|| format!("There is no adventure number {n}."));
    }

    adventures
        .iter()
        .find(|a| a.id.eq_ignore_ascii_case(input) || a.title.eq_ignore_ascii_case(input))
        .map(|a| LobbyChoice::Start(a.id.clone()))
        .ok_or_else(|| format!("There is no adventure called '{input}'."))
}

/// The adventure menu.
pub fn lobby_prompt(adventures: &[AdventureSummary]) -> String {
    if adventures.is_empty() {
        return "No adventures found. Type 'resume <session-id>' to continue a saved game."
            .to_string();
    }

    let mut lines = vec!["Choose an adventure:".to_string()];
    for (i, adventure) in adventures.iter().enumerate() {
        match &adventure.summary {
            Some(summary) => lines.push(format!("  {}. {} - {}", i + 1, adventure.title, summary)),
            None => lines.push(format!("  {}. {}", i + 1, adventure.title)),
        }
    }
    lines.push("Or type 'resume <session-id>' to continue a saved game.".to_string());
    lines.join("\n")
}
