//! Command-line interface for quantum_tictactoe.

use clap::Parser;
use std::path::PathBuf;

/// Quantum tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "quantum_tictactoe")]
#[command(about = "Quantum tic-tac-toe against a friend or a bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Opponent: none (two humans), easy or hard
    #[arg(short, long)]
    pub bot: Option<String>,

    /// Seed for the bot, for reproducible games
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
