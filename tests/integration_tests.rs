//! Integration tests for the session driver and main-loop plumbing

use crossterm::event::KeyCode;
use jatc::core::{Board, BoardConfig, GameError, ScriptedPieces, Session, SimpleRng};
use jatc::input::InputHandler;
use jatc::types::{Cell, GameAction, GameEvent, Phase, PieceKind};

fn session_of(letters: &str, level: u32) -> Session<ScriptedPieces> {
    let board = Board::new(BoardConfig::default(), ScriptedPieces::parse(letters).unwrap()).unwrap();
    Session::new(board, level)
}

#[test]
fn test_game_lifecycle() {
    let mut session = session_of("T", 1);
    assert_eq!(session.board().phase(), Phase::NotStarted);
    assert_eq!(session.apply(GameAction::RotateCw), Err(GameError::NotStarted));

    session.apply(GameAction::NewGame).unwrap();
    assert!(session.board().running());
    assert!(!session.board().paused());
    assert!(session.board().current().is_some());

    session.apply(GameAction::Pause).unwrap();
    assert!(session.board().paused());
    assert!(session.board().running());
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed: u32| {
        let board = Board::new(BoardConfig::default(), SimpleRng::new(seed)).unwrap();
        let mut session = Session::new(board, 5);
        session.start().unwrap();
        let mut kinds = Vec::new();
        for _ in 0..400 {
            session.advance(50).unwrap();
            if let Some(piece) = session.board().current() {
                kinds.push(piece.kind());
            }
        }
        (kinds, session.board().snapshot())
    };
    assert_eq!(play(99), play(99));
}

#[test]
fn test_session_levels_up_and_speeds_gravity() {
    let mut session = session_of("I", 1);
    session.start().unwrap();
    for row in 11..=20 {
        for col in 1..=9 {
            session.board_mut().grid_mut().set(row, col, Cell::Block(PieceKind::L));
        }
    }

    let mut events = Vec::new();
    for _ in 0..200 {
        let piece = session.board().current().unwrap();
        if piece.row() == 0 && piece.col() == 4 {
            for _ in 0..4 {
                session.apply(GameAction::MoveRight).unwrap();
            }
        }
        events.extend(session.advance(500).unwrap());
        if session.board().lines() >= 10 {
            break;
        }
    }

    assert_eq!(session.board().lines(), 10);
    assert_eq!(session.board().score(), 4900);
    assert_eq!(session.board().speed_level(), 2);
    assert_eq!(session.gravity().interval_ms(), 400);
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::RowsCleared { .. }))
            .count(),
        3
    );
}

#[test]
fn test_session_reports_game_over_once() {
    let mut session = session_of("O", 10);
    session.start().unwrap();

    let mut game_overs = 0;
    for _ in 0..1_000 {
        let events = session.advance(16).unwrap();
        game_overs += events.iter().filter(|e| **e == GameEvent::GameOver).count();
    }
    assert_eq!(game_overs, 1);
    assert!(!session.board().running());
    assert_eq!(session.apply(GameAction::MoveLeft).unwrap(), None);

    session.apply(GameAction::NewGame).unwrap();
    assert!(session.board().running());
    assert_eq!(session.board().speed_level(), 10);
    assert_eq!(session.board().lines(), 0);
}

#[test]
fn test_elapsed_time_excludes_pauses() {
    let mut session = session_of("S", 1);
    session.start().unwrap();
    session.advance(1_000).unwrap();
    session.apply(GameAction::Pause).unwrap();
    session.advance(60_000).unwrap();
    session.apply(GameAction::Pause).unwrap();
    session.advance(250).unwrap();
    assert_eq!(session.board().elapsed_ms(), 1_250);

    session.apply(GameAction::NewGame).unwrap();
    assert_eq!(session.board().elapsed_ms(), 0);
}

#[test]
fn test_held_key_repeats_drive_the_piece() {
    let mut session = session_of("T", 1);
    session.start().unwrap();
    let mut input = InputHandler::new()
        .with_key_release_timeout_ms(10_000)
        .with_repeat_delay_ms(0);

    let first = input.handle_key_press(KeyCode::Right).unwrap();
    session.apply(first).unwrap();
    for action in input.update(300) {
        session.apply(action).unwrap();
    }
    // T spans matrix cols 1-3: col 7 puts it against the right wall, so the
    // third repeat is rejected.
    assert_eq!(session.board().current().unwrap().col(), 7);
    for action in input.update(1_000) {
        session.apply(action).unwrap();
    }
    assert_eq!(session.board().current().unwrap().col(), 7);

    input.handle_key_release(KeyCode::Right);
    assert!(input.update(1_000).is_empty());
}
