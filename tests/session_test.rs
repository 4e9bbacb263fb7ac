//! Tests for sessions and the session manager.

use quantum_tictactoe::{
    Bot, BotMode, Game, GameError, GameSession, InvalidCollapseError, InvalidMoveError, Mark, Phase,
    SessionError, SessionManager, TurnEvent,
};
use std::thread;

/// Picks the human's next input: a legal collapse or the lowest free tile.
fn human_action(game: &Game) -> Action {
    let board = game.board();
    if game.phase() == Phase::AwaitingCollapseChoice {
        for &index in board.entangl_tiles() {
            for &token in board.tiles()[index].array() {
                if board.could_collapse(index, token) == Ok(true) {
                    return Action::Collapse(format!("{},{}", index, token));
                }
            }
        }
        panic!("no legal collapse on {board:?}");
    }
    let index = (0..9)
        .find(|&i| !board.tiles()[i].is_collapsed() && (game.is_first_move() || game.last_tile() != Some(i)))
        .unwrap();
    Action::Play(index)
}

enum Action {
    Play(usize),
    Collapse(String),
}

#[test]
fn test_create_and_list_sessions() {
    let manager = SessionManager::new();
    manager.create_session("b".to_string(), "none", None).unwrap();
    manager.create_session("a".to_string(), "easy", Some(1)).unwrap();
    assert_eq!(manager.list_sessions().unwrap(), vec!["a".to_string(), "b".to_string()]);

    assert_eq!(
        manager.create_session("a".to_string(), "none", None),
        Err(SessionError::AlreadyExists("a".to_string()))
    );

    manager.remove_session("a").unwrap();
    assert_eq!(manager.list_sessions().unwrap(), vec!["b".to_string()]);
    assert!(matches!(manager.remove_session("a"), Err(SessionError::NotFound(_))));
}

#[test]
fn test_unknown_bot_creates_nothing() {
    let manager = SessionManager::new();
    let err = manager.create_session("s".to_string(), "bogus", None).unwrap_err();
    assert!(matches!(err, SessionError::Game(GameError::BotType(_))));
    assert!(manager.list_sessions().unwrap().is_empty());
}

#[test]
fn test_bot_answers_human_move() {
    let manager = SessionManager::new();
    manager.create_session("s".to_string(), "easy", Some(5)).unwrap();

    assert!(manager.play("s", 0).unwrap().is_empty());
    let events = manager.play("s", 1).unwrap();
    assert!(events.iter().any(|e| matches!(e, TurnEvent::BotMoved { .. })));

    let game = manager.snapshot("s").unwrap();
    assert_eq!(game.last_move().map(|m| m.mark), Some(Mark::Y));
    assert_eq!(game.counter(), 3);
}

#[test]
fn test_human_cannot_move_for_bot() {
    let mut session = GameSession::new("s".to_string(), Bot::with_mode(BotMode::Easy, Some(2)));
    session.game.play(0).unwrap();
    session.game.play(1).unwrap();
    let before = session.game.clone();
    assert_eq!(
        session.play(4),
        Err(GameError::InvalidMove(InvalidMoveError::NotYourTurn(Mark::Y)))
    );
    assert_eq!(session.game, before);
}

/// Two humans place x1 on 1-2 and y2 on 1-3, then `bot` takes seat Y.
///
/// X playing 1 then 2 closes a cycle whose collapse Y chooses.
fn session_before_cycle(bot: Bot) -> GameSession {
    let mut session = GameSession::new("s".to_string(), Bot::with_mode(BotMode::None, None));
    for index in [1, 2, 1, 3] {
        session.play(index).unwrap();
    }
    session.bot = bot;
    session
}

#[test]
fn test_human_cannot_collapse_for_bot() {
    let mut session = GameSession::new("s".to_string(), Bot::with_mode(BotMode::None, None));
    for index in [1, 2, 1, 3, 1, 2] {
        session.play(index).unwrap();
    }
    assert_eq!(session.game.collapse_chooser(), Mark::Y);
    session.bot = Bot::with_mode(BotMode::Hard, Some(4));
    let before = session.game.clone();

    assert_eq!(
        session.collapse("2,x1"),
        Err(GameError::InvalidCollapse(InvalidCollapseError::NotYourChoice(Mark::Y)))
    );
    assert_eq!(session.game, before);
    assert!(session.awaits_bot());

    let events = session.resume();
    assert!(events.iter().any(|e| matches!(e, TurnEvent::BotCollapsed(_))));
    assert!(session.game.board().tiles()[2].is_collapsed());
    assert!(!session.awaits_bot());
}

#[test]
fn test_stuck_bot_keeps_human_move() {
    let mut stuck = 0;
    for seed in 0..40 {
        let bot = Bot::with_mode(BotMode::Hard, Some(seed)).with_max_collapse_attempts(1);
        let mut session = session_before_cycle(bot);
        assert!(session.play(1).unwrap().is_empty());
        let events = session.play(2).unwrap();
        if !events.iter().any(|e| matches!(e, TurnEvent::BotFailed(GameError::NoLegalCollapse(_)))) {
            continue;
        }
        stuck += 1;

        assert_eq!(session.game.phase(), Phase::AwaitingCollapseChoice);
        assert_eq!(session.game.last_move(), Some("x3".parse().unwrap()));
        assert!(session.game.board().tiles()[2].contains("x3".parse().unwrap()));
        assert!(session.awaits_bot());
        assert!(session.collapse("2,x1").is_err());

        let mut retries = 0;
        while session.awaits_bot() && retries < 50 {
            session.resume();
            retries += 1;
        }
        assert!(!session.awaits_bot(), "seed {seed}: bot still stuck after {retries} retries");
        assert!(session.game.board().tiles()[2].is_collapsed());
    }
    assert!(stuck > 0, "a single collapse attempt never failed");
}

#[test]
fn test_resume_unknown_session() {
    let manager = SessionManager::new();
    assert!(matches!(manager.resume("nope"), Err(SessionError::NotFound(_))));
}

#[test]
fn test_two_humans_entangle_and_collapse() {
    let mut session = GameSession::new("s".to_string(), Bot::with_mode(BotMode::None, None));
    session.play(1).unwrap();
    session.play(2).unwrap();
    session.play(2).unwrap();
    let events = session.play(1).unwrap();
    assert!(matches!(&events[..], [TurnEvent::Entangled { tiles }] if tiles.len() == 2));

    assert!(session.collapse("1,x1").unwrap().is_empty());
    assert!(session.game.board().tiles()[1].is_collapsed());
    assert_eq!(session.game.phase(), Phase::AwaitingFirstHalfMove);
}

#[test]
fn test_game_against_bot_finishes() {
    for (mode, seed) in [("easy", 3), ("hard", 4), ("hard", 17)] {
        let manager = SessionManager::new();
        manager.create_session("s".to_string(), mode, Some(seed)).unwrap();

        let mut outcome = None;
        for _ in 0..200 {
            let game = manager.snapshot("s").unwrap();
            if game.phase() == Phase::Finished {
                break;
            }
            let events = match human_action(&game) {
                Action::Play(index) => manager.play("s", index).unwrap(),
                Action::Collapse(instruction) => manager.collapse("s", &instruction).unwrap(),
            };
            outcome = events.iter().find_map(|e| match e {
                TurnEvent::Finished(outcome) => Some(*outcome),
                _ => None,
            }).or(outcome);
        }

        let game = manager.snapshot("s").unwrap();
        assert_eq!(game.phase(), Phase::Finished, "{mode} game with seed {seed} did not end");
        assert_eq!(outcome, game.game_result());
    }
}

#[test]
fn test_sessions_are_independent_across_threads() {
    let manager = SessionManager::new();
    for id in ["a", "b", "c", "d"] {
        manager.create_session(id.to_string(), "none", None).unwrap();
    }

    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .enumerate()
        .map(|(n, id)| {
            let manager = manager.clone();
            thread::spawn(move || {
                manager.play(id, n).unwrap();
                manager.play(id, n + 1).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for (n, id) in ["a", "b", "c", "d"].into_iter().enumerate() {
        let game = manager.snapshot(id).unwrap();
        assert_eq!(game.counter(), 2);
        assert!(game.board().tiles()[n].contains("x1".parse().unwrap()));
        assert!(game.board().tiles()[n + 1].contains("x1".parse().unwrap()));
    }
}
