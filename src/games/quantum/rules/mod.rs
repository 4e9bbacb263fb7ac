//! Game rules for quantum tic-tac-toe.
//!
//! Rules are decomposed into separate modules for clarity.

pub mod win;

pub use win::{LINES, Verdict, WinOption, verdict, win_options};
