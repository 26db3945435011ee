//! Dice rolling.
//!
//! Covers the plain `NdS+M` expressions character creation needs, with an
//! injectable RNG so rolls can be made deterministic in tests.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
}

/// Standard polyhedral die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A dice expression: `count` dice of one type plus a flat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: u32,
    pub die_type: DieType,
    pub modifier: i32,
}

impl DiceExpression {
    pub fn new(count: u32, die_type: DieType) -> Self {
        Self {
            count,
            die_type,
            modifier: 0,
        }
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Parse `NdS`, `NdS+M` or `NdS-M`. A missing count means one die.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let invalid = || DiceError::InvalidNotation(notation.clone());
        let d_pos = notation.find('d').ok_or_else(invalid)?;

        let count = match &notation[..d_pos] {
            "" => 1,
            count => count.parse::<u32>().map_err(|_| invalid())?,
        };
        if count == 0 {
            return Err(DiceError::NoDice);
        }

        let rest = &notation[d_pos + 1..];
        let (sides, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let value: i32 = rest[pos + 1..].parse().map_err(|_| invalid())?;
                let sign = if rest[pos..].starts_with('-') { -1 } else { 1 };
                (&rest[..pos], sign * value)
            }
            None => (rest, 0),
        };

        let sides: u32 = sides.parse().map_err(|_| invalid())?;
        let die_type = DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;

        Ok(Self {
            count,
            die_type,
            modifier,
        })
    }

    /// Roll using the thread-local RNG.
    pub fn roll(&self) -> RollResult {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.die_type.sides()))
            .collect();
        let dice_total: i32 = rolls.iter().map(|&r| r as i32).sum();

        RollResult {
            expression: *self,
            rolls,
            total: dice_total + self.modifier,
        }
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die_type)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

/// Result of rolling a dice expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub expression: DiceExpression,
    pub rolls: Vec<u32>,
    pub total: i32,
}

impl RollResult {
    /// Format the individual dice for display, e.g. `[3, 5, 6]`.
    pub fn dice_display(&self) -> String {
        let rolls: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        let dice = format!("[{}]", rolls.join(", "));
        match self.expression.modifier {
            0 => dice,
            m if m > 0 => format!("{dice} + {m}"),
            m => format!("{dice} - {}", m.abs()),
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}
