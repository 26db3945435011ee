//! The three phases every front-end walks through: character creation,
//! the adventure lobby, then play.

use delve_core::dice::DiceExpression;
use delve_core::persist::PersistError;
use delve_core::{
    lobby_prompt, parse_lobby_choice, AdventureSummary, Character, CharacterCreation, GameSession,
    LobbyChoice, SessionConfig, SessionError,
};

/// Where the player is in the flow.
pub enum Phase {
    Creating(CharacterCreation),
    Lobby(Character),
    Playing(GameSession),
}

/// Text produced by one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// The adventure ended with this line.
    pub finished: bool,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finished: false,
        }
    }
}

pub struct GameFlow {
    config: SessionConfig,
    adventures: Vec<AdventureSummary>,
    phase: Phase,
}

impl GameFlow {
    /// Read the adventure list and begin character creation.
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let adventures = config.library().list().await?;
        tracing::info!(
            dir = %config.adventures_dir.display(),
            count = adventures.len(),
            "adventure library ready"
        );
        Ok(Self {
            config,
            adventures,
            phase: Phase::Creating(CharacterCreation::new()),
        })
    }

    /// The first prompt to show.
    pub fn opening(&self) -> String {
        match &self.phase {
            Phase::Creating(creation) => creation.prompt(),
            Phase::Lobby(_) => lobby_prompt(&self.adventures),
            Phase::Playing(session) => session
                .describe_current_room()
                .unwrap_or_else(|e| e.to_string()),
        }
    }

    /// Feed one line to whichever phase is active.
    ///
    /// Player mistakes come back as reply text. Errors are content or
    /// engine failures that should end the program.
    pub async fn input(&mut self, line: &str) -> Result<Reply, SessionError> {
        match &mut self.phase {
            Phase::Creating(creation) => {
                let mut text = creation.process_input(line);
                if let Some(character) = creation.character().cloned() {
                    text.push_str("\n\n");
                    text.push_str(&lobby_prompt(&self.adventures));
                    self.phase = Phase::Lobby(character);
                }
                Ok(Reply::message(text))
            }
            Phase::Lobby(character) => {
                let choice = match parse_lobby_choice(line, &self.adventures) {
                    Ok(choice) => choice,
                    Err(message) => return Ok(Reply::message(message)),
                };

                let session = match choice {
                    LobbyChoice::Start(id) => {
                        GameSession::start(&self.config, &id, character.clone()).await?
                    }
                    LobbyChoice::Resume(id) => match GameSession::resume(&self.config, id).await {
                        Ok(session) => session,
                        Err(SessionError::Persist(PersistError::NotFound(id))) => {
                            return Ok(Reply::message(format!("There is no saved game {id}.")));
                        }
                        Err(e) => return Err(e),
                    },
                };

                let text = format!(
                    "{}\nSession {}\n\n{}",
                    session.adventure_title(),
                    session.session_id(),
                    session.describe_current_room()?
                );
                self.phase = Phase::Playing(session);
                Ok(Reply::message(text))
            }
            Phase::Playing(session) => {
                let turn = session.player_action(line).await?;
                Ok(Reply {
                    text: turn.text,
                    finished: turn.finished,
                })
            }
        }
    }

    /// Save the running session now.
    pub async fn save(&self) -> Result<bool, SessionError> {
        match &self.phase {
            Phase::Playing(session) if self.config.autosave => {
                session.save().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.phase {
            Phase::Playing(session) => Some(session),
            _ => None,
        }
    }

    /// The finished character, once creation is done.
    pub fn character(&self) -> Option<&Character> {
        match &self.phase {
            Phase::Creating(creation) => creation.character(),
            Phase::Lobby(character) => Some(character),
            Phase::Playing(session) => Some(session.character()),
        }
    }

    pub fn phase_name(&self) -> &'static str {
        match &self.phase {
            Phase::Creating(_) => "CREATE",
            Phase::Lobby(_) => "LOBBY",
            Phase::Playing(_) => "PLAY",
        }
    }

    /// Summary shown by `#status`.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Phase: {}", self.phase_name())];
        if let Some(character) = self.character() {
            lines.push(format!(
                "Character: {} ({} {})",
                character.name, character.race, character.class
            ));
            lines.push(format!(
                "HP: {}/{}",
                character.hit_points.current, character.hit_points.maximum
            ));
        }
        if let Some(session) = self.session() {
            lines.push(format!("Adventure: {}", session.adventure_title()));
            lines.push(format!("Session: {}", session.session_id()));
            lines.push(format!("Location: {}", session.current_room_name()));
            let inventory = session.inventory();
            if inventory.is_empty() {
                lines.push("Carrying: nothing".to_string());
            } else {
                lines.push(format!("Carrying: {}", inventory.join(", ")));
            }
        }
        lines
    }
}

/// Roll a dice expression typed as `#roll 2d6+1`.
pub fn roll_dice(notation: &str) -> String {
    match notation.parse::<DiceExpression>() {
        Ok(expression) => format!("{expression}: {}", expression.roll()),
        Err(e) => e.to_string(),
    }
}
