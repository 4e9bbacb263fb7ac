//! A single board position holding superposed moves.

use super::types::Move;
use tracing::instrument;

/// One of the nine board positions.
///
/// Until it collapses a cell holds the provisional moves placed on it, in
/// placement order. A collapsed cell holds its resolved move three times, so
/// `array()[0]` is always "the" mark of a collapsed cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    moves: Vec<Move>,
    entangled: bool,
    collapsed: bool,
}

impl Cell {
    /// Creates an empty, uncollapsed, unentangled cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves placed on this cell, in insertion order.
    pub fn array(&self) -> &[Move] {
        &self.moves
    }

    /// Returns true if the cell holds `mv`.
    pub fn contains(&self, mv: Move) -> bool {
        self.moves.contains(&mv)
    }

    /// Returns true if no move has been placed here.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns true if the cell is part of the current entanglement.
    pub fn is_entanglement(&self) -> bool {
        self.entangled
    }

    /// Returns true if the cell resolved to a definite move.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// The resolved move of a collapsed cell.
    pub fn resolved(&self) -> Option<Move> {
        if self.collapsed {
            self.moves.first().copied()
        } else {
            None
        }
    }

    /// Appends a move. No deduplication.
    #[instrument(skip(self))]
    pub fn set_move_on_tile(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Removes every occurrence of `mv`.
    #[instrument(skip(self))]
    pub fn remove_move(&mut self, mv: Move) {
        self.moves.retain(|m| *m != mv);
    }

    /// Resolves the cell to `mv`.
    #[instrument(skip(self))]
    pub fn set_collapsed(&mut self, mv: Move) {
        self.collapsed = true;
        self.moves = vec![mv; 3];
    }

    /// Flags the cell as (not) part of the current entanglement.
    pub fn set_is_entanglement(&mut self, entangled: bool) {
        self.entangled = entangled;
    }

    /// Returns the cell to its initial state.
    pub fn clear_tile(&mut self) {
        self.moves.clear();
        self.collapsed = false;
        self.entangled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::Mark;
    use super::*;

    #[test]
    fn test_new_cell_is_blank() {
        let cell = Cell::new();
        assert!(cell.array().is_empty());
        assert!(!cell.is_collapsed());
        assert!(!cell.is_entanglement());
        assert_eq!(cell.resolved(), None);
    }

    #[test]
    fn test_set_collapsed_triples_move() {
        let mut cell = Cell::new();
        let x1 = Move::new(Mark::X, 1);
        cell.set_move_on_tile(x1);
        cell.set_move_on_tile(Move::new(Mark::Y, 2));
        cell.set_collapsed(x1);
        assert_eq!(cell.array(), &[x1, x1, x1]);
        assert!(cell.is_collapsed());
        assert_eq!(cell.resolved(), Some(x1));
    }

    #[test]
    fn test_moves_keep_insertion_order() {
        let mut cell = Cell::new();
        let y2 = Move::new(Mark::Y, 2);
        let x1 = Move::new(Mark::X, 1);
        cell.set_move_on_tile(y2);
        cell.set_move_on_tile(x1);
        cell.set_move_on_tile(y2);
        assert_eq!(cell.array(), &[y2, x1, y2]);
    }

    #[test]
    fn test_remove_move_drops_all_occurrences() {
        let mut cell = Cell::new();
        let x1 = Move::new(Mark::X, 1);
        let y2 = Move::new(Mark::Y, 2);
        cell.set_move_on_tile(x1);
        cell.set_move_on_tile(y2);
        cell.set_move_on_tile(x1);
        cell.remove_move(x1);
        assert_eq!(cell.array(), &[y2]);
        cell.remove_move(Move::new(Mark::X, 9));
        assert_eq!(cell.array(), &[y2]);
    }

    #[test]
    fn test_clear_tile() {
        let mut cell = Cell::new();
        cell.set_move_on_tile(Move::new(Mark::X, 1));
        cell.set_is_entanglement(true);
        cell.set_collapsed(Move::new(Mark::X, 1));
        cell.clear_tile();
        assert_eq!(cell, Cell::new());
    }
}
