//! Quantum tic-tac-toe.
//!
//! Each turn places the same move on two cells at once. When those links
//! close a cycle the cycle must collapse, resolving every cell on it (and
//! everything hanging off it) to a single definite move.

mod action;
mod board;
mod bot;
mod cell;
mod game;
mod phases;
pub mod rules;
mod types;

pub use action::{
    BotTypeError, CollapseInstruction, GameError, InvalidCollapseError, InvalidMoveError,
    NoLegalCollapseFound,
};
pub use board::Board;
pub use bot::{BOT_MARK, Bot, BotMode, DEFAULT_MAX_COLLAPSE_ATTEMPTS};
pub use cell::Cell;
pub use game::Game;
pub use phases::{Outcome, Phase};
pub use rules::{Verdict, WinOption};
pub use types::{Mark, Move, ParseTokenError};
