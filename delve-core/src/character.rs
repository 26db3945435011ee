//! Character creation.
//!
//! A small state machine driven one line of input at a time:
//! class, then race, then a hit point roll, then a name. Ability scores are
//! rolled once, up front, as six independent 3d6 sums. States only ever
//! advance; unrecognized input re-prompts in place.

use crate::dice::{DiceExpression, DieType, RollResult};
use crate::world::{Ability, AbilityScores, Character, CharacterClass, HitPoints, Race};
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9 ]+$").expect("valid regex");
}

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 24;

/// Where a creation workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationState {
    PendingClassSelection,
    PendingRaceSelection,
    PendingHitPoints,
    PendingCharacterName,
    Complete,
}

/// Reasons a character name is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Names must be between 2 and 24 characters long.")]
    Length,
    #[error("Names cannot start or end with a space.")]
    Whitespace,
    #[error("Names may only contain letters, digits and spaces.")]
    Characters,
}

/// Check a proposed character name.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(NameError::Length);
    }
    if name.trim() != name {
        return Err(NameError::Whitespace);
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(NameError::Characters);
    }
    Ok(())
}

/// Interactive character creation.
#[derive(Debug, Clone)]
pub struct CharacterCreation {
    state: CreationState,
    ability_rolls: Vec<RollResult>,
    ability_scores: AbilityScores,
    class: Option<CharacterClass>,
    race: Option<Race>,
    hit_point_roll: Option<RollResult>,
    character: Option<Character>,
}

impl Default for CharacterCreation {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterCreation {
    /// Start a new workflow, rolling ability scores with the thread RNG.
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    /// Start a new workflow with a specific RNG (useful for testing).
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let three_d6 = DiceExpression::new(3, DieType::D6);
        let ability_rolls: Vec<RollResult> =
            (0..6).map(|_| three_d6.roll_with_rng(rng)).collect();

        let mut ability_scores = AbilityScores::default();
        for (ability, roll) in Ability::all().into_iter().zip(&ability_rolls) {
            ability_scores.set(ability, roll.total.clamp(3, 18) as u8);
        }

        Self {
            state: CreationState::PendingClassSelection,
            ability_rolls,
            ability_scores,
            class: None,
            race: None,
            hit_point_roll: None,
            character: None,
        }
    }

    pub fn state(&self) -> CreationState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == CreationState::Complete
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    /// The six 3d6 rolls, in ability order.
    pub fn ability_rolls(&self) -> &[RollResult] {
        &self.ability_rolls
    }

    pub fn class(&self) -> Option<CharacterClass> {
        self.class
    }

    pub fn race(&self) -> Option<Race> {
        self.race
    }

    pub fn hit_point_roll(&self) -> Option<&RollResult> {
        self.hit_point_roll.as_ref()
    }

    /// The finished character, once complete.
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn into_character(self) -> Option<Character> {
        self.character
    }

    /// What to ask the player for in the current state.
    pub fn prompt(&self) -> String {
        match self.state {
            CreationState::PendingClassSelection => {
                let mut lines = vec![format!("Your ability scores: {}", self.scores_line())];
                lines.push("Choose a class:".to_string());
                for (i, class) in CharacterClass::all().iter().enumerate() {
                    lines.push(format!("  {}. {} - {}", i + 1, class.name(), class.description()));
                }
                lines.join("\n")
            }
            CreationState::PendingRaceSelection => {
                let mut lines = vec!["Choose a race:".to_string()];
                for (i, race) in Race::all().iter().enumerate() {
                    lines.push(format!("  {}. {}", i + 1, race.name()));
                }
                lines.join("\n")
            }
            CreationState::PendingHitPoints => format!(
                "Press Enter (or type 'roll') to roll your hit points ({}).",
                self.hit_point_dice()
            ),
            CreationState::PendingCharacterName => "What is your character's name?".to_string(),
            CreationState::Complete => "Your character is complete.".to_string(),
        }
    }

    /// Feed one line of input using the thread RNG.
    pub fn process_input(&mut self, input: &str) -> String {
        self.process_input_with_rng(input, &mut rand::thread_rng())
    }

    /// Feed one line of input. Returns feedback followed by the next prompt.
    pub fn process_input_with_rng<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> String {
        match self.state {
            CreationState::PendingClassSelection => {
                match select(CharacterClass::all(), input, |c| c.name()) {
                    Some(class) => {
                        self.class = Some(class);
                        self.state = CreationState::PendingRaceSelection;
                        format!("You are a {}.\n\n{}", class.name(), self.prompt())
                    }
                    None => format!("'{}' is not a class.\n\n{}", input.trim(), self.prompt()),
                }
            }
            CreationState::PendingRaceSelection => {
                match select(Race::all(), input, |r| r.name()) {
                    Some(race) => {
                        self.race = Some(race);
                        self.state = CreationState::PendingHitPoints;
                        format!("You are a {}.\n\n{}", race.name(), self.prompt())
                    }
                    None => format!("'{}' is not a race.\n\n{}", input.trim(), self.prompt()),
                }
            }
            CreationState::PendingHitPoints => {
                let input = input.trim();
                if !input.is_empty() && !input.eq_ignore_ascii_case("roll") {
                    return self.prompt();
                }
                let roll = self.hit_point_dice().roll_with_rng(rng);
                let message = format!("Hit points: {roll}.\n\n");
                self.hit_point_roll = Some(roll);
                self.state = CreationState::PendingCharacterName;
                message + &self.prompt()
            }
            CreationState::PendingCharacterName => match validate_name(input) {
                Ok(()) => self.finish(input),
                Err(e) => format!("{e}\n\n{}", self.prompt()),
            },
            CreationState::Complete => self.prompt(),
        }
    }

    /// One class hit die plus the Constitution modifier.
    fn hit_point_dice(&self) -> DiceExpression {
        let die = self.class.map(|c| c.hit_die()).unwrap_or(DieType::D8);
        DiceExpression::new(1, die)
            .with_modifier(self.ability_scores.modifier(Ability::Constitution))
    }

    fn finish(&mut self, name: &str) -> String {
        let (Some(class), Some(race), Some(roll)) =
            (self.class, self.race, self.hit_point_roll.as_ref())
        else {
            return self.prompt();
        };

        let character = Character {
            name: name.to_string(),
            race,
            class,
            level: 1,
            experience: 0,
            ability_scores: self.ability_scores.clone(),
            hit_points: HitPoints::new(roll.total.max(1)),
        };
        let message = format!(
            "Welcome, {}, {} {}. HP {}, {}.",
            character.name,
            race.name(),
            class.name(),
            character.hit_points.maximum,
            self.scores_line()
        );
        tracing::info!(name = %character.name, race = %race, class = %class, "character created");

        self.character = Some(character);
        self.state = CreationState::Complete;
        message
    }

    fn scores_line(&self) -> String {
        Ability::all()
            .iter()
            .map(|a| format!("{} {}", a.abbreviation(), self.ability_scores.get(*a)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pick an option by 1-based number or by name, case-insensitively.
fn select<T: Copy>(options: &[T], input: &str, name: impl Fn(&T) -> &'static str) -> Option<T> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options
        .iter()
        .find(|o| name(*o).eq_ignore_ascii_case(input))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn creation() -> (CharacterCreation, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        (CharacterCreation::with_rng(&mut rng), rng)
    }

    #[test]
    fn test_ability_scores_are_3d6() {
        let (creation, _) = creation();
        assert_eq!(creation.ability_rolls().len(), 6);
        for (ability, roll) in Ability::all().into_iter().zip(creation.ability_rolls()) {
            assert_eq!(roll.rolls.len(), 3);
            assert_eq!(creation.ability_scores().get(ability) as i32, roll.total);
            assert!((3..=18).contains(&roll.total));
        }
    }

    #[test]
    fn test_full_flow() {
        let (mut creation, mut rng) = creation();
        assert_eq!(creation.state(), CreationState::PendingClassSelection);

        creation.process_input_with_rng("rogue", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingRaceSelection);

        creation.process_input_with_rng("3", &mut rng);
        assert_eq!(creation.race(), Some(Race::Dwarf));
        assert_eq!(creation.state(), CreationState::PendingHitPoints);

        creation.process_input_with_rng("", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingCharacterName);
        let con = creation.ability_scores().modifier(Ability::Constitution);
        let roll = creation.hit_point_roll().unwrap();
        assert_eq!(roll.expression.modifier, con);
        assert!((1 + con..=8 + con).contains(&roll.total));
        let hp = roll.total.max(1);

        let message = creation.process_input_with_rng("Brom Ironfoot", &mut rng);
        assert!(message.starts_with("Welcome, Brom Ironfoot"));
        assert!(creation.is_complete());

        let character = creation.into_character().unwrap();
        assert_eq!(character.class, CharacterClass::Rogue);
        assert_eq!(character.hit_points.maximum, hp);
        assert_eq!(character.hit_points.current, hp);
        assert_eq!(character.level, 1);
    }

    #[test]
    fn test_unrecognized_selection_reprompts() {
        let (mut creation, mut rng) = creation();
        let reply = creation.process_input_with_rng("wizard", &mut rng);
        assert!(reply.starts_with("'wizard' is not a class."));
        assert_eq!(creation.state(), CreationState::PendingClassSelection);

        creation.process_input_with_rng("1", &mut rng);
        creation.process_input_with_rng("0", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingRaceSelection);
        creation.process_input_with_rng("9", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingRaceSelection);
    }

    #[test]
    fn test_hit_points_need_roll_or_enter() {
        let (mut creation, mut rng) = creation();
        creation.process_input_with_rng("1", &mut rng);
        creation.process_input_with_rng("elf", &mut rng);
        creation.process_input_with_rng("twenty please", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingHitPoints);
        creation.process_input_with_rng("ROLL", &mut rng);
        assert_eq!(creation.state(), CreationState::PendingCharacterName);
    }

    #[test]
    fn test_hit_point_prompt_shows_constitution() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut creation = CharacterCreation::with_rng(&mut rng);
        creation.process_input_with_rng("1", &mut rng);
        creation.process_input_with_rng("1", &mut rng);
        let expected = DiceExpression::new(1, DieType::D8)
            .with_modifier(creation.ability_scores().modifier(Ability::Constitution));
        assert!(creation.prompt().contains(&format!("({expected})")));
    }

    #[test]
    fn test_invalid_name_reprompts() {
        let (mut creation, mut rng) = creation();
        for input in ["1", "human", ""] {
            creation.process_input_with_rng(input, &mut rng);
        }
        let reply = creation.process_input_with_rng("X", &mut rng);
        assert!(reply.starts_with("Names must be between 2 and 24"));
        assert_eq!(creation.state(), CreationState::PendingCharacterName);
        assert!(creation.character().is_none());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Al"), Ok(()));
        assert_eq!(validate_name("Sir Reginald the 3rd"), Ok(()));
        assert_eq!(validate_name("A"), Err(NameError::Length));
        assert_eq!(validate_name(&"a".repeat(25)), Err(NameError::Length));
        assert_eq!(validate_name(" Al"), Err(NameError::Whitespace));
        assert_eq!(validate_name("Al "), Err(NameError::Whitespace));
        assert_eq!(validate_name("Al-Khwarizmi"), Err(NameError::Characters));
    }

    #[test]
    fn test_complete_ignores_input() {
        let (mut creation, mut rng) = creation();
        for input in ["1", "1", "roll", "Tess"] {
            creation.process_input_with_rng(input, &mut rng);
        }
        assert!(creation.is_complete());
        creation.process_input_with_rng("2", &mut rng);
        assert_eq!(creation.character().unwrap().name, "Tess");
    }
}
