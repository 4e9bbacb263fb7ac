//! Turn engine: sequences double moves, entanglement and collapse.

use super::action::{CollapseInstruction, InvalidCollapseError, InvalidMoveError};
use super::board::Board;
use super::phases::{Outcome, Phase};
use super::rules::Verdict;
use super::types::{Mark, Move};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, instrument, warn};

/// One quantum tic-tac-toe game.
///
/// The engine keeps its phase as flags mirroring the turn loop: `basic`
/// while moves are being placed, `entanglement` while a collapse is owed,
/// and `first_move` to tell the halves of a double move apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    entanglement: bool,
    basic: bool,
    first_move: bool,
    last_tile: Option<usize>,
    last_move: Option<Move>,
    finished: bool,
    result: Option<Outcome>,
    counter: u32,
}

impl Game {
    /// Creates a game on a fresh board.
    #[instrument]
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    /// Creates a game around an existing board.
    #[instrument(skip(board))]
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            entanglement: false,
            basic: true,
            first_move: true,
            last_tile: None,
            last_move: None,
            finished: false,
            result: None,
            counter: 1,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board.
    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// True while a collapse is owed.
    pub fn entanglement(&self) -> bool {
        self.entanglement
    }

    /// True while moves are being placed.
    pub fn basic(&self) -> bool {
        self.basic
    }

    /// True if the next half-move is the first of a double move.
    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    /// Sets whether the next half-move is the first of a double move.
    pub fn set_first_move(&mut self, first: bool) {
        self.first_move = first;
    }

    /// Index of the most recently written cell.
    pub fn last_tile(&self) -> Option<usize> {
        self.last_tile
    }

    /// Records the most recently written cell.
    pub fn set_last_tile(&mut self, index: usize) {
        self.last_tile = Some(index);
    }

    /// The most recently completed double move.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Records the most recently completed double move.
    pub fn set_last_move(&mut self, mv: Move) {
        self.last_move = Some(mv);
    }

    /// True once a winner or a draw was found.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Marks the game as finished.
    pub fn set_finished(&mut self) {
        self.finished = true;
    }

    /// How the game ended, if it did.
    pub fn game_result(&self) -> Option<Outcome> {
        self.result
    }

    /// Current round number.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Advances the round number.
    pub fn increase_counter(&mut self) {
        self.counter += 1;
    }

    /// Current phase, derived from the flags.
    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.entanglement {
            Phase::AwaitingCollapseChoice
        } else if self.first_move {
            Phase::AwaitingFirstHalfMove
        } else {
            Phase::AwaitingSecondHalfMove
        }
    }

    /// The move the next half-move will place.
    ///
    /// Marks alternate by double move: whoever did not make the last one.
    pub fn whos_move(&self) -> Move {
        let mark = match self.last_move {
            Some(last) if last.mark == Mark::X => Mark::Y,
            _ => Mark::X,
        };
        Move::new(mark, self.counter)
    }

    /// The mark that picks the collapse: the opponent of the last mover.
    pub fn collapse_chooser(&self) -> Mark {
        match self.last_move {
            Some(last) if last.mark == Mark::Y => Mark::X,
            _ => Mark::Y,
        }
    }

    /// Places the next move on `index` and records it as the last tile.
    ///
    /// Only validates the target; phase bookkeeping is done by [`Game::play`].
    #[instrument(skip(self))]
    pub fn make_move(&mut self, index: usize) -> Result<usize, InvalidMoveError> {
        let cell = self
            .board
            .tile(index)
            .ok_or(InvalidMoveError::OutOfRange(index))?;
        if cell.is_collapsed() {
            warn!(index, "Move on a collapsed tile");
            return Err(InvalidMoveError::Collapsed(index));
        }
        if !self.first_move && self.last_tile == Some(index) {
            warn!(index, "Second half on the same tile");
            return Err(InvalidMoveError::SameTile(index));
        }

        let mv = self.whos_move();
        self.board.tiles_mut()[index].set_move_on_tile(mv);
        self.last_tile = Some(index);
        debug!(index, %mv, "Move placed");
        Ok(index)
    }

    /// Plays one half of a double move.
    ///
    /// After the second half the double move is recorded, the round advances
    /// and the board is checked for a new entanglement.
    #[instrument(skip(self))]
    pub fn play(&mut self, index: usize) -> Result<Phase, InvalidMoveError> {
        let phase = self.phase();
        if !phase.accepts_move() {
            return Err(InvalidMoveError::NotAwaitingMove(phase));
        }

        self.make_move(index)?;
        if self.first_move {
            self.first_move = false;
        } else {
            self.last_move = Some(self.whos_move());
            self.counter += 1;
            self.first_move = true;
            self.game_entanglement();
        }
        Ok(self.phase())
    }

    /// Checks whether the last double move closed a cycle.
    ///
    /// Starting from the other cell holding the last move, follows shared
    /// moves cell to cell. Every cell passed through joins the entanglement;
    /// reaching the last written cell closes the cycle. Without a cycle the
    /// entanglement set is emptied again.
    #[instrument(skip(self))]
    pub fn is_entanglement(&mut self) -> bool {
        let (Some(last_tile), Some(last_move)) = (self.last_tile, self.last_move) else {
            return false;
        };

        let starts: Vec<usize> = self
            .board
            .tiles()
            .iter()
            .enumerate()
            .filter(|(i, cell)| *i != last_tile && cell.contains(last_move))
            .map(|(i, _)| i)
            .collect();

        for start in starts {
            if self.walk_chain(start, last_move, last_tile) {
                self.entanglement = true;
                info!(tiles = ?self.board.entangl_tiles(), "Entanglement detected");
                return true;
            }
        }

        self.board.reset_entangl_tiles();
        false
    }

    /// Breadth-first walk over shared moves from `start` looking for `target`.
    fn walk_chain(&mut self, start: usize, via: Move, target: usize) -> bool {
        let mut visited: HashSet<Move> = HashSet::from([via]);
        let mut frontier: VecDeque<(usize, Move)> = VecDeque::new();

        let others: Vec<Move> = self.board.tiles()[start]
            .array()
            .iter()
            .copied()
            .filter(|mv| *mv != via)
            .collect();
        if others.is_empty() {
            return false;
        }
        self.board.add_entangl_tile(start);
        for mv in others {
            if visited.insert(mv) {
                frontier.push_back((start, mv));
            }
        }

        while let Some((from, link)) = frontier.pop_front() {
            let hits: Vec<usize> = self
                .board
                .tiles()
                .iter()
                .enumerate()
                .filter(|(i, cell)| *i != from && cell.contains(link))
                .map(|(i, _)| i)
                .collect();

            for index in hits {
                if index == target {
                    self.board.add_entangl_tile(index);
                    return true;
                }
                let next: Vec<Move> = self.board.tiles()[index]
                    .array()
                    .iter()
                    .copied()
                    .filter(|mv| *mv != link)
                    .collect();
                if next.is_empty() {
                    continue;
                }
                self.board.add_entangl_tile(index);
                for mv in next {
                    if visited.insert(mv) {
                        frontier.push_back((index, mv));
                    }
                }
            }
        }
        false
    }

    /// Runs entanglement detection and switches phase accordingly.
    #[instrument(skip(self))]
    pub fn game_entanglement(&mut self) {
        if self.is_entanglement() {
            self.entanglement = true;
            self.basic = false;
        } else {
            self.entanglement = false;
            self.basic = true;
        }
    }

    /// Parses and applies a collapse instruction such as `"1,x3"`.
    #[instrument(skip(self))]
    pub fn game_collapse(&mut self, instruction: &str) -> Result<CollapseInstruction, InvalidCollapseError> {
        let instruction: CollapseInstruction = instruction.parse()?;
        self.apply_collapse(instruction)?;
        Ok(instruction)
    }

    /// Applies a collapse and returns to move placement.
    #[instrument(skip(self))]
    pub fn apply_collapse(&mut self, instruction: CollapseInstruction) -> Result<(), InvalidCollapseError> {
        if !self.entanglement {
            return Err(InvalidCollapseError::NotAwaitingCollapse);
        }
        self.board.collapse(instruction.index, instruction.token)?;
        self.board.reset_entangl_tiles();
        self.entanglement = false;
        self.basic = true;
        Ok(())
    }

    /// Checks for a winner or a draw and records the result.
    #[instrument(skip(self))]
    pub fn is_game_end(&mut self) -> bool {
        let outcome = match self.board.is_winner() {
            Verdict::Winner { mark, .. } => Outcome::Winner(mark),
            Verdict::Draw => Outcome::Draw,
            Verdict::Undecided => {
                self.finished = false;
                return false;
            }
        };
        info!(%outcome, "Game finished");
        self.result = Some(outcome);
        self.finished = true;
        true
    }

    /// Resets every field and clears all cells.
    #[instrument(skip(self))]
    pub fn clear_game(&mut self) {
        self.board.clear();
        self.entanglement = false;
        self.basic = true;
        self.first_move = true;
        self.last_tile = None;
        self.last_move = None;
        self.finished = false;
        self.result = None;
        self.counter = 1;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
