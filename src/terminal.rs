//! Text rendering of the board for terminal play.

use crate::games::quantum::{Board, Cell};

const TILE_WIDTH: usize = 24;
const RULE_WIDTH: usize = 78;

/// Text shown inside one tile: `*` for entangled tiles, then its moves.
pub fn tile_label(cell: &Cell) -> String {
    let moves: Vec<String> = cell.array().iter().map(ToString::to_string).collect();
    let marker = if cell.is_entanglement() { "*" } else { "" };
    format!("{}{}", marker, moves.join(", "))
}

/// Formats the board as three rows of centred tiles separated by rules.
pub fn render_board(board: &Board) -> String {
    let mut display = String::new();
    for (row, cells) in board.tiles().chunks(3).enumerate() {
        let labels: Vec<String> = cells
            .iter()
            .map(|cell| format!("{:^width$}", tile_label(cell), width = TILE_WIDTH))
            .collect();
        display.push_str(&labels.join(" | "));
        display.push('\n');
        if row < 2 {
            display.push_str(&"-".repeat(RULE_WIDTH));
        }
        display.push('\n');
    }
    display
}
