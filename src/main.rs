//! Quantum tic-tac-toe - terminal game
//!
//! Reads half-moves and collapse instructions from stdin.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use quantum_tictactoe::{Bot, GameConfig, GameSession, Phase, TurnEvent, render_board};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mode = config.bot_mode()?;
    let bot = Bot::with_mode(mode, *config.seed())
        .with_max_collapse_attempts(*config.max_collapse_attempts());

    info!(%mode, "Starting game");
    let session = GameSession::new("terminal".to_string(), bot);
    run_game(session, io::stdin().lock(), io::stdout().lock())
}

/// Reads the config file if one was given and applies the command-line overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    Ok(config.with_overrides(cli.bot.clone(), cli.seed))
}

/// Plays until the game ends or input runs out.
fn run_game(mut session: GameSession, input: impl BufRead, mut out: impl Write) -> Result<()> {
    write!(out, "{}", render_board(session.game.board()))?;
    prompt(&session, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if matches!(line, "q" | "quit" | "exit") {
            info!("Player quit");
            break;
        }
        if session.awaits_bot() {
            debug!("Retrying the bot's decision");
            for event in &session.resume() {
                report(event, &mut out)?;
            }
            write!(out, "{}", render_board(session.game.board()))?;
            if session.game.phase() == Phase::Finished {
                break;
            }
            prompt(&session, &mut out)?;
            continue;
        }
        if line.is_empty() {
            prompt(&session, &mut out)?;
            continue;
        }

        let result = match session.game.phase() {
            Phase::AwaitingCollapseChoice => session.collapse(line),
            _ => match line.parse::<usize>() {
                Ok(index) => session.play(index),
                Err(_) => {
                    writeln!(out, "Enter a tile number from 0 to 8")?;
                    prompt(&session, &mut out)?;
                    continue;
                }
            },
        };

        match result {
            Ok(events) => {
                debug!(count = events.len(), "Turn settled");
                for event in &events {
                    report(event, &mut out)?;
                }
                write!(out, "{}", render_board(session.game.board()))?;
            }
            Err(e) => {
                warn!(error = %e, input = line, "Rejected input");
                writeln!(out, "{}", e)?;
            }
        }

        if session.game.phase() == Phase::Finished {
            break;
        }
        prompt(&session, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

fn report(event: &TurnEvent, out: &mut impl Write) -> io::Result<()> {
    match event {
        TurnEvent::Entangled { tiles } => writeln!(out, "Entanglement on tiles {:?}", tiles),
        TurnEvent::BotMoved { first, second } => {
            writeln!(out, "Bot played tiles {} and {}", first, second)
        }
        TurnEvent::BotCollapsed(instruction) => writeln!(out, "Bot collapsed {}", instruction),
        TurnEvent::BotFailed(e) => writeln!(out, "Bot is stuck: {}", e),
        TurnEvent::Finished(outcome) => writeln!(out, "{}", outcome),
    }
}

fn prompt(session: &GameSession, out: &mut impl Write) -> io::Result<()> {
    let game = &session.game;
    if session.awaits_bot() {
        write!(out, "Press Enter to let the bot try again: ")?;
        return out.flush();
    }
    match game.phase() {
        Phase::AwaitingFirstHalfMove | Phase::AwaitingSecondHalfMove => {
            let next = game.whos_move();
            write!(out, "Player {}, place {} (0-8): ", next.mark.label(), next)?;
        }
        Phase::AwaitingCollapseChoice => {
            write!(
                out,
                "Player {}, collapse a tile marked with * (e.g. 1,x3): ",
                game.collapse_chooser().label()
            )?;
        }
        Phase::Finished => {}
    }
    out.flush()
}
