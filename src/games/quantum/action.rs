//! Actions and their failure modes.
//!
//! A half-move is just a cell index; the only structured action is the
//! collapse instruction `"<tile>,<move>"`, which is also the one textual
//! format the engine accepts from a human.

use super::phases::Phase;
use super::types::{Mark, Move};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Which cell to collapse and which of its moves it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, derive_new::new)]
#[display("{},{}", index, token)]
pub struct CollapseInstruction {
    /// Entangled cell the choice is made on.
    pub index: usize,
    /// Move the cell resolves to.
    pub token: Move,
}

impl FromStr for CollapseInstruction {
    type Err = InvalidCollapseError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidCollapseError::Malformed(s.to_string());
        let (tile, token) = s.split_once(',').ok_or_else(malformed)?;
        let index = tile.trim().parse::<usize>().map_err(|_| malformed())?;
        let token = token.trim().parse::<Move>().map_err(|_| malformed())?;
        Ok(Self { index, token })
    }
}

/// A half-move that cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidMoveError {
    /// Index outside 0-8.
    #[display("Tiles are numbered from 0 to 8 (got {})", _0)]
    OutOfRange(usize),

    /// The target cell already collapsed.
    #[display("Tile {} has already collapsed", _0)]
    Collapsed(usize),

    /// Second half of a double move aimed at the first half's cell.
    #[display("Both halves of a move cannot go on tile {}", _0)]
    SameTile(usize),

    /// The game is waiting for something other than a move.
    #[display("The game is not waiting for a move ({:?})", _0)]
    NotAwaitingMove(Phase),

    /// The double move belongs to the other seat.
    #[display("It is player {}'s turn", _0.label())]
    NotYourTurn(Mark),

    /// Not enough uncollapsed tiles left for a double move.
    #[display("No free tile left to move on")]
    NoFreeTile,
}

impl std::error::Error for InvalidMoveError {}

/// A collapse that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidCollapseError {
    /// The tile is not part of the current entanglement.
    #[display("You can only collapse tiles marked with * (tile {})", _0)]
    NotEntangled(usize),

    /// The move is not shared with another entangled tile.
    #[display("Cannot collapse tile {} to {}: choose a move that sits on two entangled tiles", index, token)]
    NotShared {
        /// Requested tile.
        index: usize,
        /// Requested move.
        token: Move,
    },

    /// The instruction text could not be parsed.
    #[display("Collapse instruction '{}' must look like <tile>,<move> (e.g. 1,x3)", _0)]
    Malformed(String),

    /// The other seat picks this collapse.
    #[display("Player {} chooses this collapse", _0.label())]
    NotYourChoice(Mark),

    /// There is no entanglement waiting to be collapsed.
    #[display("There is nothing to collapse right now")]
    NotAwaitingCollapse,
}

impl std::error::Error for InvalidCollapseError {}

/// Unknown opponent mode token.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("You must choose bot type between none/easy/hard (got '{}')", token)]
pub struct BotTypeError {
    /// The rejected token.
    pub token: String,
}

/// The bot gave up looking for a legal collapse.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("No legal collapse found after {} attempts", attempts)]
pub struct NoLegalCollapseFound {
    /// Number of samples drawn before giving up.
    pub attempts: u32,
}

/// Any failure surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum GameError {
    /// Rejected half-move.
    #[display("{}", _0)]
    InvalidMove(InvalidMoveError),
    /// Rejected collapse.
    #[display("{}", _0)]
    InvalidCollapse(InvalidCollapseError),
    /// Rejected opponent mode.
    #[display("{}", _0)]
    BotType(BotTypeError),
    /// Bot could not find a collapse.
    #[display("{}", _0)]
    NoLegalCollapse(NoLegalCollapseFound),
}

impl std::error::Error for GameError {}
