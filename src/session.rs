//! Game sessions: one game plus its opponent, driven turn by turn.
//!
//! A turn is not one call on [`Game`]: a half-move may complete a double
//! move, detect an entanglement, hand the collapse to the bot and end the
//! game. [`GameSession`] runs that whole sequence, and [`SessionManager`]
//! holds each session behind its own lock for the duration of it.

use crate::games::quantum::{
    BOT_MARK, Bot, CollapseInstruction, Game, GameError, InvalidCollapseError, InvalidMoveError,
    Outcome, Phase,
};
use derive_more::{Display, From};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Something that happened on the board besides the caller's own action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The last double move closed a cycle.
    Entangled {
        /// Cells of the entanglement.
        tiles: Vec<usize>,
    },
    /// The bot placed its double move.
    BotMoved {
        /// First half.
        first: usize,
        /// Second half.
        second: usize,
    },
    /// The bot picked the collapse.
    BotCollapsed(CollapseInstruction),
    /// The bot could not make its decision; [`GameSession::resume`] retries it.
    BotFailed(GameError),
    /// The game ended.
    Finished(Outcome),
}

/// A game together with its opponent.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// The game state.
    pub game: Game,
    /// The opponent (mode `none` for two humans).
    pub bot: Bot,
}

impl GameSession {
    /// Creates a new session.
    #[instrument(skip(bot), fields(mode = %bot.mode()))]
    pub fn new(id: SessionId, bot: Bot) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game: Game::new(),
            bot,
        }
    }

    /// Plays a human half-move, then whatever the bot owes in response.
    ///
    /// An error means nothing was played. Once the half-move is accepted the
    /// call succeeds; a bot that gets stuck afterwards is reported as
    /// [`TurnEvent::BotFailed`].
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play(&mut self, index: usize) -> Result<Vec<TurnEvent>, GameError> {
        if self.bot.controls_move(&self.game) {
            warn!(index, "Human tried to move on the bot's turn");
            return Err(InvalidMoveError::NotYourTurn(BOT_MARK).into());
        }
        let phase = self.game.play(index)?;
        debug!(index, ?phase, "Human half-move played");
        Ok(self.settle())
    }

    /// Applies a human collapse instruction, then whatever the bot owes.
    ///
    /// Rejected when the collapse is the bot's to choose.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn collapse(&mut self, instruction: &str) -> Result<Vec<TurnEvent>, GameError> {
        if self.bot.controls_collapse(&self.game) {
            warn!(instruction, "Human tried to collapse for the bot");
            return Err(InvalidCollapseError::NotYourChoice(BOT_MARK).into());
        }
        self.game.game_collapse(instruction)?;
        Ok(self.settle())
    }

    /// True while the bot owes the current decision.
    pub fn awaits_bot(&self) -> bool {
        self.bot.controls_move(&self.game) || self.bot.controls_collapse(&self.game)
    }

    /// Gives the bot another go at a decision it failed.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn resume(&mut self) -> Vec<TurnEvent> {
        self.settle()
    }

    /// Resets the game, keeping the opponent.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn restart(&mut self) {
        self.game.clear_game();
    }

    /// Advances the game until a human decision is needed, the bot gets
    /// stuck, or the game ends.
    fn settle(&mut self) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        loop {
            match self.game.phase() {
                Phase::Finished | Phase::AwaitingSecondHalfMove => break,
                Phase::AwaitingCollapseChoice => {
                    events.push(TurnEvent::Entangled {
                        tiles: self.game.board().entangl_tiles().to_vec(),
                    });
                    if !self.bot.controls_collapse(&self.game) {
                        break;
                    }
                    let failure: GameError = match self.bot.collapse(&self.game) {
                        Ok(Some(instruction)) => match self.game.apply_collapse(instruction) {
                            Ok(()) => {
                                events.push(TurnEvent::BotCollapsed(instruction));
                                continue;
                            }
                            Err(e) => e.into(),
                        },
                        Ok(None) => break,
                        Err(e) => e.into(),
                    };
                    warn!(error = %failure, "Bot failed to collapse");
                    events.push(TurnEvent::BotFailed(failure));
                    break;
                }
                Phase::AwaitingFirstHalfMove => {
                    if self.game.is_game_end() {
                        if let Some(outcome) = self.game.game_result() {
                            events.push(TurnEvent::Finished(outcome));
                        }
                        break;
                    }
                    if !self.bot.controls_move(&self.game) {
                        break;
                    }
                    match self.bot.make_move(&mut self.game) {
                        Ok(Some((first, second))) => {
                            events.push(TurnEvent::BotMoved { first, second })
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!(error = %e, "Bot failed to move");
                            events.push(TurnEvent::BotFailed(e.into()));
                            break;
                        }
                    }
                }
            }
        }
        events
    }
}

/// Session management failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum SessionError {
    /// No session with that ID.
    #[display("Session '{}' not found", _0)]
    NotFound(SessionId),
    /// A session with that ID already exists.
    #[display("Session '{}' already exists", _0)]
    AlreadyExists(SessionId),
    /// A previous holder of the lock panicked.
    #[display("Session lock poisoned")]
    Poisoned,
    /// The game rejected the action.
    #[display("{}", _0)]
    #[from]
    Game(GameError),
}

impl std::error::Error for SessionError {}

/// Manages all game sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    /// Creates a session with an opponent of the given mode.
    ///
    /// An unknown mode leaves the manager untouched.
    #[instrument(skip(self))]
    pub fn create_session(
        &self,
        id: SessionId,
        mode: &str,
        seed: Option<u64>,
    ) -> Result<SessionId, SessionError> {
        let bot = Bot::new(mode, seed).map_err(GameError::from)?;
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;

        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }

        let session = GameSession::new(id.clone(), bot);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Runs `f` with exclusive access to one session.
    ///
    /// The session stays locked for the whole closure, so a full turn
    /// (move, entanglement check, collapse, win check) is never interleaved
    /// with another caller's.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        let session = {
            let sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
            sessions.get(id).cloned().ok_or_else(|| {
                debug!(session_id = id, "Session not found");
                SessionError::NotFound(id.to_string())
            })?
        };
        let mut guard = session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// Plays a half-move in a session.
    #[instrument(skip(self))]
    pub fn play(&self, id: &str, index: usize) -> Result<Vec<TurnEvent>, SessionError> {
        Ok(self.with_session(id, |session| session.play(index))??)
    }

    /// Applies a collapse instruction in a session.
    #[instrument(skip(self))]
    pub fn collapse(&self, id: &str, instruction: &str) -> Result<Vec<TurnEvent>, SessionError> {
        Ok(self.with_session(id, |session| session.collapse(instruction))??)
    }

    /// Lets the bot of a session retry a failed decision.
    #[instrument(skip(self))]
    pub fn resume(&self, id: &str) -> Result<Vec<TurnEvent>, SessionError> {
        self.with_session(id, GameSession::resume)
    }

    /// Copy of a session's game.
    #[instrument(skip(self))]
    pub fn snapshot(&self, id: &str) -> Result<Game, SessionError> {
        self.with_session(id, |session| session.game.clone())
    }

    /// Drops a session.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        sessions
            .remove(id)
            .map(|_| info!(session_id = id, "Removed session"))
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Result<Vec<SessionId>, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }
}
