//! Turn phases and game outcomes.
//!
//! The turn engine stores its state as plain flags; `Phase` is the view of
//! those flags that callers match on.

use super::types::Mark;
use serde::{Deserialize, Serialize};

/// Where the turn engine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first half of a double move.
    AwaitingFirstHalfMove,
    /// Waiting for the second half of a double move.
    AwaitingSecondHalfMove,
    /// The last double move closed a cycle; someone must pick a collapse.
    AwaitingCollapseChoice,
    /// The game is over.
    Finished,
}

impl Phase {
    /// Returns true if the engine accepts a half-move in this phase.
    pub fn accepts_move(self) -> bool {
        matches!(
            self,
            Phase::AwaitingFirstHalfMove | Phase::AwaitingSecondHalfMove
        )
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A player completed a line.
    Winner(Mark),
    /// No line and at most one cell left undetermined.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "Player {} wins", mark.label()),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
