//! Computer opponent.
//!
//! The bot plays only through the public turn engine: its half-moves go
//! through [`Game::play`] and its collapse choices are checked with
//! [`Board::could_collapse`](super::board::Board::could_collapse).

use super::action::{BotTypeError, CollapseInstruction, InvalidMoveError, NoLegalCollapseFound};
use super::game::Game;
use super::phases::Phase;
use super::types::Mark;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Default number of samples the bot draws before giving up on a collapse.
pub const DEFAULT_MAX_COLLAPSE_ATTEMPTS: u32 = 1000;

/// The seat the bot plays.
pub const BOT_MARK: Mark = Mark::Y;

/// Opponent strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    /// No bot: both seats are human.
    None,
    /// Uniformly random cells.
    Easy,
    /// Random first half; second half prefers empty cells, then cells
    /// holding only the bot's own moves.
    Hard,
}

impl FromStr for BotMode {
    type Err = BotTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(BotMode::None),
            "easy" => Ok(BotMode::Easy),
            "hard" => Ok(BotMode::Hard),
            other => Err(BotTypeError {
                token: other.to_string(),
            }),
        }
    }
}

/// Random opponent with a seedable generator.
#[derive(Debug, Clone)]
pub struct Bot {
    mode: BotMode,
    rng: ChaCha8Rng,
    max_collapse_attempts: u32,
}

impl Bot {
    /// Creates a bot from a mode token (`none`, `easy` or `hard`).
    ///
    /// Without a seed the generator is seeded randomly.
    #[instrument]
    pub fn new(mode: &str, seed: Option<u64>) -> Result<Self, BotTypeError> {
        let mode = mode.parse::<BotMode>().inspect_err(|e| warn!(%e, "Rejected bot mode"))?;
        Ok(Self::with_mode(mode, seed))
    }

    /// Creates a bot for an already parsed mode.
    #[instrument]
    pub fn with_mode(mode: BotMode, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        debug!(%mode, seed, "Bot created");
        Self {
            mode,
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_collapse_attempts: DEFAULT_MAX_COLLAPSE_ATTEMPTS,
        }
    }

    /// Caps the number of collapse samples.
    pub fn with_max_collapse_attempts(mut self, attempts: u32) -> Self {
        self.max_collapse_attempts = attempts.max(1);
        self
    }

    /// The bot's strategy.
    pub fn mode(&self) -> BotMode {
        self.mode
    }

    /// True unless the mode is `none`.
    pub fn is_active(&self) -> bool {
        self.mode != BotMode::None
    }

    /// True if the double move being played is the bot's.
    pub fn controls_move(&self, game: &Game) -> bool {
        self.is_active() && game.phase().accepts_move() && game.whos_move().mark == BOT_MARK
    }

    /// True if the pending collapse is the bot's to choose.
    pub fn controls_collapse(&self, game: &Game) -> bool {
        self.is_active()
            && game.phase() == Phase::AwaitingCollapseChoice
            && game.collapse_chooser() == BOT_MARK
    }

    /// Uncollapsed cells holding nothing but the mover's own moves.
    pub fn tiles_y(&self, game: &Game) -> Vec<usize> {
        let own = game.whos_move().mark;
        game.board()
            .tiles()
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_collapsed() && cell.array().iter().all(|mv| mv.mark == own))
            .map(|(i, _)| i)
            .collect()
    }

    /// Plays a full double move and returns the two cells chosen.
    ///
    /// Returns `None` when the mode is `none`.
    #[instrument(skip(self, game), fields(mode = %self.mode))]
    pub fn make_move(&mut self, game: &mut Game) -> Result<Option<(usize, usize)>, InvalidMoveError> {
        if !self.is_active() {
            return Ok(None);
        }

        let mut available: Vec<usize> = (0..9)
            .filter(|&i| !game.board().tiles()[i].is_collapsed())
            .collect();
        if available.len() < 2 {
            warn!(free = available.len(), "Not enough free tiles for a double move");
            return Err(InvalidMoveError::NoFreeTile);
        }

        let first = self.choose_move(&available, game)?;
        available.retain(|&i| i != first);

        let second = match self.mode {
            BotMode::Hard => {
                let empty: Vec<usize> = available
                    .iter()
                    .copied()
                    .filter(|&i| game.board().tiles()[i].is_empty())
                    .collect();
                let own: Vec<usize> = self
                    .tiles_y(game)
                    .into_iter()
                    .filter(|i| available.contains(i))
                    .collect();
                let pool = if !empty.is_empty() {
                    empty
                } else if !own.is_empty() {
                    own
                } else {
                    available
                };
                self.choose_move(&pool, game)?
            }
            _ => self.choose_move(&available, game)?,
        };

        info!(first, second, "Bot moved");
        Ok(Some((first, second)))
    }

    /// Picks a cell uniformly from `candidates` and plays it.
    fn choose_move(&mut self, candidates: &[usize], game: &mut Game) -> Result<usize, InvalidMoveError> {
        let index = *candidates
            .choose(&mut self.rng)
            .ok_or(InvalidMoveError::NoFreeTile)?;
        game.play(index)?;
        Ok(index)
    }

    /// Samples entangled cells and their moves until a legal collapse turns up.
    ///
    /// Returns `None` when the mode is `none`.
    #[instrument(skip(self, game), fields(mode = %self.mode))]
    pub fn collapse(&mut self, game: &Game) -> Result<Option<CollapseInstruction>, NoLegalCollapseFound> {
        if !self.is_active() {
            return Ok(None);
        }

        let board = game.board();
        let entangled = board.entangl_tiles();
        if entangled.is_empty() {
            warn!("Asked to collapse without an entanglement");
            return Err(NoLegalCollapseFound { attempts: 0 });
        }

        for attempt in 1..=self.max_collapse_attempts {
            let Some(&index) = entangled.choose(&mut self.rng) else {
                break;
            };
            let Some(&token) = board.tiles()[index].array().choose(&mut self.rng) else {
                continue;
            };
            if matches!(board.could_collapse(index, token), Ok(true)) {
                let instruction = CollapseInstruction::new(index, token);
                info!(%instruction, attempt, "Bot chose collapse");
                return Ok(Some(instruction));
            }
        }

        warn!(attempts = self.max_collapse_attempts, "Bot found no legal collapse");
        Err(NoLegalCollapseFound {
            attempts: self.max_collapse_attempts,
        })
    }
}
