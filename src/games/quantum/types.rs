//! Core value types for quantum tic-tac-toe: marks and superposed moves.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Player mark.
///
/// X always opens the game; Y answers (and is the seat the bot plays).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Player X (moves first).
    X,
    /// Player Y (moves second).
    Y,
}

impl Mark {
    /// Returns the opponent mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::Y,
            Mark::Y => Mark::X,
        }
    }

    /// Upper-case label used in messages ("X" / "Y").
    pub fn label(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::Y => "Y",
        }
    }
}

/// A superposed move: a mark tagged with the round it was placed in.
///
/// Both halves of a double move carry the same value, which is what links
/// two cells together. The textual token is the mark followed by the round,
/// e.g. `x3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{}{}", mark, round)]
pub struct Move {
    /// Who placed the move.
    pub mark: Mark,
    /// Round in which the move was placed (starts at 1).
    pub round: u32,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, round: u32) -> Self {
        Self { mark, round }
    }

    /// Returns the mark of this move.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Returns the round of this move.
    pub fn round(&self) -> u32 {
        self.round
    }
}

/// A move token that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid move token '{}': expected a mark (x/y) followed by a round number", token)]
pub struct ParseTokenError {
    /// The offending input.
    pub token: String,
}

impl ParseTokenError {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl FromStr for Move {
    type Err = ParseTokenError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let first = chars.next().ok_or_else(|| ParseTokenError::new(s))?;
        let mark = Mark::from_str(&first.to_string()).map_err(|_| ParseTokenError::new(s))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseTokenError::new(s));
        }
        let round: u32 = digits.parse().map_err(|_| ParseTokenError::new(s))?;
        if round == 0 {
            return Err(ParseTokenError::new(s));
        }
        Ok(Move::new(mark, round))
    }
}
