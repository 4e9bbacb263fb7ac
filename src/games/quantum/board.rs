//! The 3x3 quantum board: cells, the entanglement set and collapse.

use super::action::InvalidCollapseError;
use super::cell::Cell;
use super::rules::{self, Verdict, WinOption};
use super::types::Move;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, instrument, warn};

/// Nine cells in row-major order plus the cells of the current entanglement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    tiles: [Cell; 9],
    /// Entangled cell indices, in the order they were found.
    entangl_tiles: Vec<usize>,
}

impl Board {
    /// Creates a board of nine empty cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from prepared cells with nothing entangled.
    pub fn from_tiles(mut tiles: [Cell; 9]) -> Self {
        for cell in &mut tiles {
            cell.set_is_entanglement(false);
        }
        Self {
            tiles,
            entangl_tiles: Vec::new(),
        }
    }

    /// All cells, row-major.
    pub fn tiles(&self) -> &[Cell; 9] {
        &self.tiles
    }

    /// Mutable access to the cells.
    pub(crate) fn tiles_mut(&mut self) -> &mut [Cell; 9] {
        &mut self.tiles
    }

    /// The cell at `index`, if it exists.
    pub fn tile(&self, index: usize) -> Option<&Cell> {
        self.tiles.get(index)
    }

    /// Indices of entangled cells, in discovery order.
    pub fn entangl_tiles(&self) -> &[usize] {
        &self.entangl_tiles
    }

    /// Adds a cell to the entanglement and flags it. Already tracked cells are ignored.
    #[instrument(skip(self))]
    pub fn add_entangl_tile(&mut self, index: usize) {
        let Some(cell) = self.tiles.get_mut(index) else {
            warn!(index, "Ignoring entanglement of a tile outside the board");
            return;
        };
        cell.set_is_entanglement(true);
        if !self.entangl_tiles.contains(&index) {
            self.entangl_tiles.push(index);
        }
    }

    /// Clears the entanglement set and the flags of every tracked cell.
    #[instrument(skip(self))]
    pub fn reset_entangl_tiles(&mut self) {
        for index in self.entangl_tiles.drain(..) {
            self.tiles[index].set_is_entanglement(false);
        }
    }

    /// Returns true if `candidate` also sits on another entangled cell.
    ///
    /// Fails if `index` is not part of the entanglement.
    #[instrument(skip(self))]
    pub fn could_collapse(&self, index: usize, candidate: Move) -> Result<bool, InvalidCollapseError> {
        if !self.entangl_tiles.contains(&index) {
            return Err(InvalidCollapseError::NotEntangled(index));
        }
        Ok(self
            .entangl_tiles
            .iter()
            .filter(|&&other| other != index)
            .any(|&other| self.tiles[other].contains(candidate)))
    }

    /// Resolves `index` to `candidate` and propagates through every linked cell.
    ///
    /// Each move eliminated from a cell resolves every cell still holding it,
    /// which in turn eliminates the other moves there. The worklist is keyed
    /// by move value so cyclic links are visited once.
    #[instrument(skip(self))]
    pub fn collapse(&mut self, index: usize, candidate: Move) -> Result<(), InvalidCollapseError> {
        if !self.could_collapse(index, candidate)? {
            return Err(InvalidCollapseError::NotShared {
                index,
                token: candidate,
            });
        }

        let mut seen: HashSet<Move> = HashSet::from([candidate]);
        let mut queue: VecDeque<Move> = VecDeque::new();

        let target = &mut self.tiles[index];
        for &mv in target.array() {
            if seen.insert(mv) {
                queue.push_back(mv);
            }
        }
        target.set_collapsed(candidate);
        debug!(index, %candidate, "Collapsed chosen tile");

        while let Some(eliminated) = queue.pop_front() {
            for (i, cell) in self.tiles.iter_mut().enumerate() {
                if !cell.contains(eliminated) {
                    continue;
                }
                for &mv in cell.array() {
                    if seen.insert(mv) {
                        queue.push_back(mv);
                    }
                }
                cell.set_collapsed(eliminated);
                debug!(index = i, resolved = %eliminated, "Collapse propagated");
            }
        }

        info!(index, %candidate, "Collapse complete");
        Ok(())
    }

    /// Resolved move of every cell, `None` where the cell is still undetermined.
    pub fn analyse_board(&self) -> [Option<Move>; 9] {
        std::array::from_fn(|i| self.tiles[i].resolved())
    }

    /// Completed lines on an analysed board.
    pub fn win_options(&self, analysis: &[Option<Move>; 9]) -> Vec<WinOption> {
        rules::win_options(analysis)
    }

    /// Checks the board for a winner or a draw.
    #[instrument(skip(self))]
    pub fn is_winner(&self) -> Verdict {
        let verdict = rules::verdict(&self.analyse_board());
        debug!(?verdict, "Board evaluated");
        verdict
    }

    /// Returns every cell to its initial state and forgets the entanglement.
    pub fn clear(&mut self) {
        for cell in &mut self.tiles {
            cell.clear_tile();
        }
        self.entangl_tiles.clear();
    }
}
