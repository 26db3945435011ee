//! Headless game interface for programmatic use.
//!
//! Drives a [`GameSession`] without a terminal and records every exchange.
//! Used by scripted runs and by the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use delve_core::headless::HeadlessGame;
//! use delve_core::session::SessionConfig;
//! use delve_core::testing::sample_character;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new().with_autosave(false);
//!     let mut game = HeadlessGame::start(&config, "cellar", sample_character("Tess")).await?;
//!
//!     let reply = game.send("take brass lamp").await?;
//!     println!("{}", reply.text);
//!     println!("Carrying: {:?}", game.session().inventory());
//!     Ok(())
//! }
//! ```

use crate::session::{GameSession, SessionConfig, SessionError, Turn};
use crate::world::{Character, SessionId};

/// A game controlled line by line from code.
pub struct HeadlessGame {
    session: GameSession,
    transcript: Vec<TranscriptEntry>,
}

/// One exchange in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub input: String,
    pub output: String,
    /// 1-based.
    pub turn: usize,
}

impl HeadlessGame {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            transcript: Vec::new(),
        }
    }

    pub async fn start(
        config: &SessionConfig,
        adventure_id: &str,
        character: Character,
    ) -> Result<Self, SessionError> {
        Ok(Self::new(
            GameSession::start(config, adventure_id, character).await?,
        ))
    }

    pub async fn resume(config: &SessionConfig, session_id: SessionId) -> Result<Self, SessionError> {
        Ok(Self::new(GameSession::resume(config, session_id).await?))
    }

    /// Send one line of input and record the exchange.
    pub async fn send(&mut self, input: &str) -> Result<Turn, SessionError> {
        let turn = self.session.player_action(input).await?;
        self.transcript.push(TranscriptEntry {
            input: input.to_string(),
            output: turn.text.clone(),
            turn: self.transcript.len() + 1,
        });
        Ok(turn)
    }

    /// Send inputs in order, stopping early once the session ends.
    pub async fn run<I, S>(&mut self, inputs: I) -> Result<Vec<Turn>, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut turns = Vec::new();
        for input in inputs {
            let turn = self.send(input.as_ref()).await?;
            let finished = turn.finished;
            turns.push(turn);
            if finished {
                break;
            }
        }
        Ok(turns)
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// All outputs joined, one exchange per block.
    pub fn transcript_text(&self) -> String {
        self.transcript
            .iter()
            .map(|entry| format!("> {}\n{}", entry.input, entry.output))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn last_response(&self) -> Option<&str> {
        self.transcript.last().map(|entry| entry.output.as_str())
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_character, two_room_world};
    use crate::world::GameState;

    fn game() -> HeadlessGame {
        let state = GameState::new("two", two_room_world().unwrap(), sample_character("Tess"));
        HeadlessGame::new(GameSession::with_state(state, None).unwrap())
    }

    #[tokio::test]
    async fn test_transcript_records_turns() {
        let mut game = game();
        game.send("look").await.unwrap();
        game.send("jump").await.unwrap();

        assert_eq!(game.turn_count(), 2);
        assert_eq!(game.transcript()[1].turn, 2);
        assert_eq!(game.last_response(), Some("I don't understand 'jump'."));
        assert!(game.transcript_text().starts_with("> look\nStart"));
    }

    #[tokio::test]
    async fn test_run_stops_at_quit() {
        let mut game = game();
        let turns = game.run(["n", "quit", "s"]).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert!(turns[1].finished);
        assert_eq!(game.session().current_room_name(), "End");
    }
}
