//! Command parsing.
//!
//! Turns a line of player input into a typed [`Request`]. The leading word
//! is looked up in a [`VerbTable`] (built once at startup and handed to the
//! [`Parser`]) whose entries construct the request from the remaining words.

use crate::world::Direction;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A typed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Look,
    Move { direction: Direction },
    Take { item: String },
    Drop { item: String },
    Inventory,
    Examine { target: String },
    Use { item: String, target: Option<String> },
    Quit,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Look => RequestKind::Look,
            Request::Move { .. } => RequestKind::Move,
            Request::Take { .. } => RequestKind::Take,
            Request::Drop { .. } => RequestKind::Drop,
            Request::Inventory => RequestKind::Inventory,
            Request::Examine { .. } => RequestKind::Examine,
            Request::Use { .. } => RequestKind::Use,
            Request::Quit => RequestKind::Quit,
        }
    }
}

/// The closed set of request types; the dispatcher routes on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestKind {
    Look,
    Move,
    Take,
    Drop,
    Inventory,
    Examine,
    Use,
    Quit,
}

impl RequestKind {
    pub fn all() -> [RequestKind; 8] {
        [
            RequestKind::Look,
            RequestKind::Move,
            RequestKind::Take,
            RequestKind::Drop,
            RequestKind::Inventory,
            RequestKind::Examine,
            RequestKind::Use,
            RequestKind::Quit,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Look => "look",
            RequestKind::Move => "move",
            RequestKind::Take => "take",
            RequestKind::Drop => "drop",
            RequestKind::Inventory => "inventory",
            RequestKind::Examine => "examine",
            RequestKind::Use => "use",
            RequestKind::Quit => "quit",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Input that could not be turned into a request. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Builds a request from the verb that matched and the words after it.
pub type Constructor = fn(verb: &str, rest: &[&str]) -> Result<Request, String>;

/// Verb (and alias) to request constructor lookup.
#[derive(Clone, Default)]
pub struct VerbTable {
    verbs: HashMap<String, Constructor>,
}

impl fmt::Debug for VerbTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerbTable")
            .field("verbs", &self.verbs())
            .finish()
    }
}

impl VerbTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a verb. Verbs are matched case-insensitively.
    pub fn register(&mut self, verb: &str, constructor: Constructor) -> &mut Self {
        self.verbs.insert(verb.to_lowercase(), constructor);
        self
    }

    /// The full command vocabulary.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table
            .register("look", look)
            .register("l", look)
            .register("go", go)
            .register("walk", go)
            .register("move", go)
            .register("take", take)
            .register("get", take)
            .register("grab", take)
            .register("drop", drop)
            .register("inventory", inventory)
            .register("inv", inventory)
            .register("i", inventory)
            .register("examine", examine)
            .register("inspect", examine)
            .register("x", examine)
            .register("use", use_item)
            .register("quit", quit)
            .register("exit", quit)
            .register("q", quit);

        for direction in Direction::all() {
            table
                .register(direction.name(), bare_direction)
                .register(direction.abbreviation(), bare_direction);
        }
        table
    }

    pub fn get(&self, verb: &str) -> Option<Constructor> {
        self.verbs.get(&verb.to_lowercase()).copied()
    }

    /// Registered verbs in alphabetical order.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.verbs.keys().map(|v| v.as_str()).collect();
        verbs.sort_unstable();
        verbs
    }
}

/// Free text to [`Request`] parser.
#[derive(Debug, Clone)]
pub struct Parser {
    table: VerbTable,
}

impl Parser {
    pub fn new(table: VerbTable) -> Self {
        Self { table }
    }

    pub fn parse(&self, input: &str) -> Result<Request, ParseError> {
        let normalized = input.trim().to_lowercase();
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let Some((verb, rest)) = tokens.split_first() else {
            return Err(ParseError("Please enter a command.".to_string()));
        };

        let constructor = self
            .table
            .get(verb)
            .ok_or_else(|| ParseError(format!("I don't understand '{verb}'.")))?;

        constructor(verb, rest).map_err(ParseError)
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// Join the words of a noun phrase, dropping a leading article.
fn noun_phrase(words: &[&str]) -> String {
    let words = match words.first() {
        Some(&"the") | Some(&"a") | Some(&"an") => &words[1..],
        _ => words,
    };
    words.join(" ")
}

fn look(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    let target = match rest.first() {
        None => return Ok(Request::Look),
        Some(&"at") => noun_phrase(&rest[1..]),
        Some(_) => noun_phrase(rest),
    };
    if target.is_empty() {
        return Err("Look at what?".to_string());
    }
    Ok(Request::Examine { target })
}

fn go(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    if rest.is_empty() {
        return Err("Go where?".to_string());
    }
    let word = noun_phrase(rest);
    Direction::from_word(&word)
        .map(|direction| Request::Move { direction })
        .ok_or_else(|| format!("'{word}' is not a direction."))
}

fn bare_direction(verb: &str, _rest: &[&str]) -> Result<Request, String> {
    Direction::from_word(verb)
        .map(|direction| Request::Move { direction })
        .ok_or_else(|| format!("'{verb}' is not a direction."))
}

fn take(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    let item = noun_phrase(rest);
    if item.is_empty() {
        return Err("Take what?".to_string());
    }
    Ok(Request::Take { item })
}

fn drop(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    let item = noun_phrase(rest);
    if item.is_empty() {
        return Err("Drop what?".to_string());
    }
    Ok(Request::Drop { item })
}

fn inventory(_verb: &str, _rest: &[&str]) -> Result<Request, String> {
    Ok(Request::Inventory)
}

fn examine(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    let target = noun_phrase(rest);
    if target.is_empty() {
        return Err("Examine what?".to_string());
    }
    Ok(Request::Examine { target })
}

/// `use <item>` or `use <item> on <target>`.
fn use_item(_verb: &str, rest: &[&str]) -> Result<Request, String> {
    match rest.iter().position(|w| *w == "on") {
        None => {
            let item = noun_phrase(rest);
            if item.is_empty() {
                return Err("Use what?".to_string());
            }
            Ok(Request::Use { item, target: None })
        }
        Some(split) => {
            let item = noun_phrase(&rest[..split]);
            if item.is_empty() {
                return Err("Use what?".to_string());
            }
            let target = noun_phrase(&rest[split + 1..]);
            if target.is_empty() {
                return Err(format!("Use the {item} on what?"));
            }
            Ok(Request::Use {
                item,
                target: Some(target),
            })
        }
    }
}

fn quit(_verb: &str, _rest: &[&str]) -> Result<Request, String> {
    Ok(Request::Quit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Request, ParseError> {
        Parser::new(VerbTable::standard()).parse(input)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            parse("   ").unwrap_err(),
            ParseError("Please enter a command.".to_string())
        );
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(
            parse("Dance wildly").unwrap_err().to_string(),
            "I don't understand 'dance'."
        );
    }

    #[test]
    fn test_look_aliases() {
        assert_eq!(parse("l").unwrap(), parse("look").unwrap());
        assert_eq!(parse("LOOK").unwrap().kind(), RequestKind::Look);
    }

    #[test]
    fn test_direction_shortcuts_match_go() {
        let expected = Request::Move {
            direction: Direction::North,
        };
        assert_eq!(parse("n").unwrap(), expected);
        assert_eq!(parse("north").unwrap(), expected);
        assert_eq!(parse("go north").unwrap(), expected);
        assert_eq!(parse("walk N").unwrap(), expected);
    }

    #[test]
    fn test_go_errors() {
        assert_eq!(parse("go").unwrap_err().to_string(), "Go where?");
        assert_eq!(
            parse("go sideways").unwrap_err().to_string(),
            "'sideways' is not a direction."
        );
    }

    #[test]
    fn test_multi_word_nouns_are_joined() {
        assert_eq!(
            parse("take   Brass   Lantern").unwrap(),
            Request::Take {
                item: "brass lantern".to_string()
            }
        );
        assert_eq!(
            parse("drop the brass lantern").unwrap(),
            Request::Drop {
                item: "brass lantern".to_string()
            }
        );
    }

    #[test]
    fn test_noun_required() {
        assert_eq!(parse("take").unwrap_err().to_string(), "Take what?");
        assert_eq!(parse("drop").unwrap_err().to_string(), "Drop what?");
        assert_eq!(parse("x").unwrap_err().to_string(), "Examine what?");
        assert_eq!(parse("use").unwrap_err().to_string(), "Use what?");
    }

    #[test]
    fn test_inventory_and_examine_aliases() {
        assert_eq!(parse("i").unwrap(), Request::Inventory);
        assert_eq!(parse("inv").unwrap(), Request::Inventory);
        let expected = Request::Examine {
            target: "barrel".to_string(),
        };
        assert_eq!(parse("x barrel").unwrap(), expected);
        assert_eq!(parse("inspect barrel").unwrap(), expected);
        assert_eq!(parse("look at the barrel").unwrap(), expected);
    }

    #[test]
    fn test_use_on() {
        assert_eq!(
            parse("use rusty key on iron door").unwrap(),
            Request::Use {
                item: "rusty key".to_string(),
                target: Some("iron door".to_string()),
            }
        );
        assert_eq!(
            parse("use the key").unwrap(),
            Request::Use {
                item: "key".to_string(),
                target: None,
            }
        );
        assert_eq!(
            parse("use key on").unwrap_err().to_string(),
            "Use the key on what?"
        );
        assert_eq!(parse("use on door").unwrap_err().to_string(), "Use what?");
    }

    #[test]
    fn test_quit_aliases() {
        for input in ["quit", "q", "exit"] {
            assert_eq!(parse(input).unwrap(), Request::Quit);
        }
    }

    #[test]
    fn test_custom_table() {
        let mut table = VerbTable::new();
        table.register("Peer", look);
        let parser = Parser::new(table);
        assert_eq!(parser.parse("peer").unwrap(), Request::Look);
        assert!(parser.parse("look").is_err());
    }
}
