//! Win detection over collapsed cells.

use super::super::types::{Mark, Move};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The eight lines, in the order they are scanned.
///
/// The order matters: when several lines tie on the earliest round, the
/// last one scanned decides the game.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 3, 6],
    [0, 4, 8],
    [1, 4, 7],
    [2, 5, 8],
    [3, 4, 5],
    [6, 7, 8],
    [2, 4, 6],
];

/// A completed line and the move that completed it earliest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct WinOption {
    /// Mark of the line with the lowest round among its three cells.
    pub token: Move,
    /// The line's cell indices.
    pub line: [usize; 3],
}

/// Result of checking the board for an end of game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// A player owns a completed line.
    Winner {
        /// Winning mark.
        mark: Mark,
        /// Winning line.
        line: [usize; 3],
    },
    /// No line, and at most one cell is still undetermined.
    Draw,
    /// Play continues.
    Undecided,
}

impl Verdict {
    /// Winning mark, if any.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Verdict::Winner { mark, .. } => Some(*mark),
            _ => None,
        }
    }

    /// Winning line, empty when there is no winner.
    pub fn line(&self) -> &[usize] {
        match self {
            Verdict::Winner { line, .. } => line,
            _ => &[],
        }
    }
}

/// Lists every line whose three cells collapsed to the same mark.
#[instrument]
pub fn win_options(analysis: &[Option<Move>; 9]) -> Vec<WinOption> {
    LINES
        .iter()
        .filter_map(|&line| {
            let [a, b, c] = line.map(|i| analysis[i]);
            let (a, b, c) = (a?, b?, c?);
            if a.mark == b.mark && b.mark == c.mark {
                let round = a.round.min(b.round).min(c.round);
                Some(WinOption::new(Move::new(a.mark, round), line))
            } else {
                None
            }
        })
        .collect()
}

/// Decides the game from the analysed board.
///
/// With several completed lines the earliest round wins; on a tie at that
/// round the last line in scan order is kept.
#[instrument]
pub fn verdict(analysis: &[Option<Move>; 9]) -> Verdict {
    let options = win_options(analysis);
    let undetermined = analysis.iter().filter(|cell| cell.is_none()).count();

    let Some(min_round) = options.iter().map(|opt| opt.token.round).min() else {
        return if undetermined <= 1 {
            Verdict::Draw
        } else {
            Verdict::Undecided
        };
    };

    match options
        .iter()
        .filter(|opt| opt.token.round == min_round)
        .next_back()
    {
        Some(best) => Verdict::Winner {
            mark: best.token.mark,
            line: best.line,
        },
        None => Verdict::Undecided,
    }
}
