//! Quantum tic-tac-toe library.
//!
//! Every move is placed on two cells at once. When those links close a
//! cycle, the player who did not close it chooses how the cycle collapses
//! into classical marks.
//!
//! # Architecture
//!
//! - **Games**: board, turn engine, win rules and the computer opponent
//! - **Session**: drives whole turns, including the bot's replies
//! - **Config**: TOML settings for the opponent
//! - **Terminal**: text rendering of the board
//!
//! # Example
//!
//! ```
//! use quantum_tictactoe::{Game, Phase};
//!
//! let mut game = Game::new();
//! game.play(0)?;
//! assert_eq!(game.play(4)?, Phase::AwaitingFirstHalfMove);
//! # Ok::<(), quantum_tictactoe::InvalidMoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod session;
mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigStage, GameConfig};

// Crate-level exports - Session management
pub use session::{GameSession, SessionError, SessionId, SessionManager, TurnEvent};

// Crate-level exports - Rendering
pub use terminal::{render_board, tile_label};

// Crate-level exports - Game types
pub use games::quantum::{
    BOT_MARK, Board, Bot, BotMode, BotTypeError, Cell, CollapseInstruction,
    DEFAULT_MAX_COLLAPSE_ATTEMPTS, Game, GameError, InvalidCollapseError, InvalidMoveError, Mark,
    Move, NoLegalCollapseFound, Outcome, ParseTokenError, Phase, Verdict, WinOption,
};

// Crate-level exports - Win rules
pub use games::quantum::rules::{LINES, verdict, win_options};
