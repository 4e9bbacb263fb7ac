//! Tests for the quantum board: collapse, entanglement set and win checks.

use quantum_tictactoe::{Board, Cell, InvalidCollapseError, Mark, Move, Verdict};

fn mv(token: &str) -> Move {
    token.parse().unwrap()
}

/// Board with the given moves placed, nothing collapsed.
fn board_with(placements: &[(usize, &str)]) -> Board {
    let mut tiles: [Cell; 9] = Default::default();
    for &(index, token) in placements {
        tiles[index].set_move_on_tile(mv(token));
    }
    Board::from_tiles(tiles)
}

/// Board whose listed cells are already resolved.
fn collapsed_board(resolved: &[(usize, &str)]) -> Board {
    let mut tiles: [Cell; 9] = Default::default();
    for &(index, token) in resolved {
        tiles[index].set_collapsed(mv(token));
    }
    Board::from_tiles(tiles)
}

#[test]
fn test_collapsed_row_wins() {
    let board = collapsed_board(&[(0, "x1"), (1, "x3"), (2, "x5")]);

    let verdict = board.is_winner();
    assert_eq!(verdict.mark(), Some(Mark::X));
    assert_eq!(verdict.line(), &[0, 1, 2]);
}

#[test]
fn test_collapse_shared_pair() {
    let mut board = board_with(&[(1, "x1"), (2, "x1"), (1, "y2"), (2, "y2")]);
    board.add_entangl_tile(1);
    board.add_entangl_tile(2);

    board.collapse(1, mv("x1")).unwrap();

    assert!(board.tiles()[1].is_collapsed());
    assert!(board.tiles()[2].is_collapsed());
    assert_eq!(board.tiles()[1].resolved(), Some(mv("x1")));
    assert_eq!(board.tiles()[2].resolved(), Some(mv("y2")));
}

#[test]
fn test_collapse_without_shared_move_is_rejected() {
    let mut board = board_with(&[(1, "x1")]);
    board.add_entangl_tile(1);
    board.add_entangl_tile(2);

    assert_eq!(board.could_collapse(1, mv("x1")), Ok(false));
    assert!(matches!(
        board.collapse(1, mv("x1")),
        Err(InvalidCollapseError::NotShared { index: 1, .. })
    ));
    assert!(!board.tiles()[1].is_collapsed());
}

#[test]
fn test_could_collapse_outside_entanglement() {
    let mut board = Board::new();
    board.add_entangl_tile(4);
    assert_eq!(
        board.could_collapse(3, mv("x1")),
        Err(InvalidCollapseError::NotEntangled(3))
    );
}

#[test]
fn test_collapse_reaches_chain_beyond_cycle() {
    // Cycle 3-4 (x1, y2) with a tail 4-7 (x3) and 7-8 (y4).
    let mut board = board_with(&[
        (3, "x1"),
        (4, "x1"),
        (3, "y2"),
        (4, "y2"),
        (4, "x3"),
        (7, "x3"),
        (7, "y4"),
        (8, "y4"),
    ]);
    board.add_entangl_tile(3);
    board.add_entangl_tile(4);

    board.collapse(3, mv("y2")).unwrap();

    assert_eq!(board.tiles()[3].resolved(), Some(mv("y2")));
    assert_eq!(board.tiles()[4].resolved(), Some(mv("x1")));
    assert_eq!(board.tiles()[7].resolved(), Some(mv("x3")));
    assert_eq!(board.tiles()[8].resolved(), Some(mv("y4")));
    assert!(board.tiles()[0].is_empty());
}

#[test]
fn test_earliest_line_wins() {
    // Both players complete a column; X's holds the earlier round.
    let board = collapsed_board(&[
        (0, "x1"),
        (3, "x3"),
        (6, "x5"),
        (2, "y2"),
        (5, "y4"),
        (8, "y6"),
    ]);
    assert_eq!(
        board.is_winner(),
        Verdict::Winner {
            mark: Mark::X,
            line: [0, 3, 6]
        }
    );
}

#[test]
fn test_full_board_without_line_is_draw() {
    let layout = ["x1", "y2", "x3", "x5", "y4", "y6", "y8", "x7", "x9"];
    let resolved: Vec<(usize, &str)> = layout.into_iter().enumerate().collect();
    assert_eq!(collapsed_board(&resolved).is_winner(), Verdict::Draw);
}

#[test]
fn test_two_open_cells_is_undecided() {
    let layout = ["x1", "y2", "x3", "x5", "y4", "y6", "y8"];
    let resolved: Vec<(usize, &str)> = layout.into_iter().enumerate().collect();
    assert_eq!(collapsed_board(&resolved).is_winner(), Verdict::Undecided);
}
