//! Integration tests for the key -> cursor -> session loop

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tui_match3::core::{LevelConfig, LevelSession, SessionEvent, SwapError};
use tui_match3::input::{handle_key_event, should_quit, BoardCursor, CursorOutcome};
use tui_match3::types::{Coord, GameAction, SessionStatus, TileKind};

fn session() -> LevelSession {
    let config = LevelConfig::new(8, 8, 10)
        .with_kinds(&[TileKind::Red, TileKind::Green, TileKind::Blue, TileKind::Yellow])
        .with_objective(TileKind::Green, 500)
        .with_seed(12345);
    LevelSession::load_level(config).unwrap()
}

fn direction(from: Coord, to: Coord) -> KeyCode {
    match (to.row - from.row, to.col - from.col) {
        (-1, 0) => KeyCode::Up,
        (1, 0) => KeyCode::Down,
        (0, -1) => KeyCode::Left,
        _ => KeyCode::Right,
    }
}

/// Feed a key through the mapper and cursor; commit any swap it requests
fn press(session: &mut LevelSession, cursor: &mut BoardCursor, code: KeyCode) -> CursorOutcome {
    let action = handle_key_event(KeyEvent::from(code)).unwrap();
    let outcome = cursor.apply(action);
    if let CursorOutcome::SwapRequested(from, to) = outcome {
        session.attempt_swap(from, to).unwrap();
    }
    outcome
}

#[test]
fn test_select_then_direction_commits_swap() {
    let mut session = session();
    let mut cursor = BoardCursor::new(8, 8);
    let (from, to) = session.hint().unwrap();

    cursor.set_position(from);
    assert_eq!(
        press(&mut session, &mut cursor, KeyCode::Char(' ')),
        CursorOutcome::Selected(from)
    );
    assert_eq!(
        press(&mut session, &mut cursor, direction(from, to)),
        CursorOutcome::SwapRequested(from, to)
    );
    assert_eq!(session.moves_remaining(), 9);
    assert_eq!(session.swaps_committed(), 1);
    assert_eq!(cursor.selected(), None);
    assert_eq!(cursor.position(), to);

    let events = session.take_events();
    assert_eq!(events.first(), Some(&SessionEvent::ComboChanged { depth: 1 }));
}

#[test]
fn test_select_twice_on_neighbor_commits_swap() {
    let mut session = session();
    let mut cursor = BoardCursor::new(8, 8);
    let (from, to) = session.hint().unwrap();

    cursor.set_position(from);
    cursor.apply(GameAction::Select);
    cursor.set_position(to);
    assert_eq!(
        press(&mut session, &mut cursor, KeyCode::Enter),
        CursorOutcome::SwapRequested(from, to)
    );
    assert_eq!(session.moves_remaining(), 9);
}

#[test]
fn test_cancel_and_reselect_do_not_swap() {
    let mut session = session();
    let mut cursor = BoardCursor::new(8, 8);
    let start = cursor.position();

    press(&mut session, &mut cursor, KeyCode::Char(' '));
    assert_eq!(press(&mut session, &mut cursor, KeyCode::Esc), CursorOutcome::Deselected);
    press(&mut session, &mut cursor, KeyCode::Char(' '));
    assert_eq!(
        press(&mut session, &mut cursor, KeyCode::Char(' ')),
        CursorOutcome::Deselected
    );
    assert_eq!(cursor.position(), start);
    assert_eq!(session.moves_remaining(), 10);
}

#[test]
fn test_illegal_request_is_rejected_without_cost() {
    let mut session = session();
    let moves = session.moves_remaining();
    let legal = tui_match3::core::deadlock::valid_moves(&mut session.grid().clone());

    // Find a neighbor pair the engine will refuse.
    let grid = session.grid().clone();
    let illegal = grid
        .coords()
        .map(|a| (a, a.offset(0, 1)))
        .find(|&(a, b)| grid.in_bounds(b) && !legal.contains(&(a, b)))
        .unwrap();

    let outcome = session.attempt_swap(illegal.0, illegal.1).unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.rejection, Some(SwapError::NoResultingMatch));
    assert_eq!(session.moves_remaining(), moves);
}

#[test]
fn test_pause_key_round_trip() {
    let mut session = session();
    let action = handle_key_event(KeyEvent::from(KeyCode::Char('p'))).unwrap();
    assert_eq!(action, GameAction::Pause);
    session.toggle_pause();
    assert_eq!(session.status(), SessionStatus::Paused);
    session.toggle_pause();
    assert_eq!(session.status(), SessionStatus::Active);
}

#[test]
fn test_quit_keys() {
    assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
    assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('q'))), None);
}

#[test]
fn test_play_until_out_of_moves() {
    let mut session = session();
    let mut cursor = BoardCursor::new(8, 8);
    while session.status() == SessionStatus::Active {
        let (from, to) = session.hint().unwrap();
        cursor.set_position(from);
        cursor.apply(GameAction::Select);
        press(&mut session, &mut cursor, direction(from, to));
    }
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.moves_remaining(), 0);
    assert_eq!(session.summary().moves_used, 10);
    assert!(session.score() > 0);
}
