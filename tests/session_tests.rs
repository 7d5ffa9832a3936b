//! Level session lifecycle: moves, objectives, timers, deadlocks

use tui_match3::core::deadlock::valid_moves;
use tui_match3::core::{
    find_valid_move, has_any_valid_move, reshuffle, scan, ConfigError, Grid, LevelConfig,
    LevelSession, SessionError, SessionEvent, SwapError, TileBag,
};
use tui_match3::types::{Coord, LossReason, SessionStatus, TileKind};

fn four_kinds() -> [TileKind; 4] {
    [TileKind::Red, TileKind::Green, TileKind::Blue, TileKind::Yellow]
}

fn long_level(moves: u32) -> LevelConfig {
    LevelConfig::new(8, 8, moves)
        .with_kinds(&four_kinds())
        .with_objective(TileKind::Red, 100_000)
        .with_seed(11)
}

#[test]
fn test_load_level_starts_settled_and_playable() {
    for seed in [1, 2, 3, 77, 4096] {
        let mut session = LevelSession::load_level(long_level(10).with_seed(seed)).unwrap();
        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(session.grid().count_empty(), 0);
        assert!(scan(session.grid()).is_empty(), "seed {} starts with a match", seed);
        assert!(session.hint().is_some());
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves_remaining(), 10);
        assert_eq!(session.seed(), seed);
    }
}

#[test]
fn test_new_session_is_idle_until_started() {
    let mut session = LevelSession::new(long_level(5)).unwrap();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.hint(), None);
    let outcome = session.attempt_swap(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
    assert_eq!(outcome.rejection, Some(SwapError::NotPlayable));

    session.start().unwrap();
    assert_eq!(session.status(), SessionStatus::Active);
    let grid = session.grid().clone();
    session.start().unwrap();
    assert_eq!(session.grid(), &grid);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = LevelSession::load_level(long_level(6)).unwrap();
    let mut b = LevelSession::load_level(long_level(6)).unwrap();
    assert_eq!(a.grid(), b.grid());
    while a.status() == SessionStatus::Active {
        let (from, to) = a.hint().unwrap();
        let oa = a.attempt_swap(from, to).unwrap();
        let ob = b.attempt_swap(from, to).unwrap();
        assert_eq!(oa, ob);
        assert_eq!(a.grid(), b.grid());
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_rejected_swap_changes_nothing() {
    let mut session = LevelSession::load_level(long_level(5)).unwrap();
    session.take_events();
    let before = session.snapshot();

    let outcome = session.attempt_swap(Coord::new(0, 0), Coord::new(2, 2)).unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.rejection, Some(SwapError::NotAdjacent));
    assert!(outcome.cascade.is_empty());

    let outcome = session.attempt_swap(Coord::new(0, 7), Coord::new(0, 8)).unwrap();
    assert_eq!(outcome.rejection, Some(SwapError::OutOfBounds));

    assert_eq!(session.snapshot(), before);
    assert!(session.take_events().is_empty());
}

#[test]
fn test_running_out_of_moves_loses() {
    let mut session = LevelSession::load_level(long_level(3)).unwrap();
    for expected_left in [2, 1, 0] {
        let (from, to) = session.hint().unwrap();
        let outcome = session.attempt_swap(from, to).unwrap();
        assert!(outcome.accepted);
        assert!(outcome.cascade.total_score > 0);
        assert_eq!(session.moves_remaining(), expected_left);
    }
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.loss_reason(), Some(LossReason::OutOfMoves));

    let events = session.take_events();
    assert_eq!(
        events.last(),
        Some(&SessionEvent::LevelLost(LossReason::OutOfMoves))
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);

    let before = session.snapshot();
    let any_move = valid_moves(&mut session.grid().clone()).first().copied();
    if let Some((from, to)) = any_move {
        let outcome = session.attempt_swap(from, to).unwrap();
        assert_eq!(outcome.rejection, Some(SwapError::NotPlayable));
    }
    assert_eq!(session.snapshot(), before);
    assert!(!session.tick(10_000));
}

#[test]
fn test_completing_objectives_wins() {
    let config = LevelConfig::new(8, 8, 200)
        .with_kinds(&[TileKind::Red, TileKind::Green, TileKind::Blue])
        .with_objective(TileKind::Red, 3)
        .with_seed(5);
    let mut session = LevelSession::load_level(config).unwrap();
    while session.status() == SessionStatus::Active {
        let (from, to) = session.hint().unwrap();
        session.attempt_swap(from, to).unwrap();
    }
    assert_eq!(session.status(), SessionStatus::Won);
    assert!(session.objectives_complete());
    assert_eq!(session.loss_reason(), None);

    let events = session.take_events();
    let Some(SessionEvent::LevelWon(summary)) = events.last() else {
        panic!("expected a win event, got {:?}", events.last());
    };
    assert_eq!(summary.score, session.score());
    assert_eq!(summary.moves_used + summary.moves_remaining, 200);
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::MatchResolved { .. })));
}

#[test]
fn test_objective_progress_counts_cleared_tiles() {
    let mut session = LevelSession::load_level(long_level(20)).unwrap();
    let mut collected = 0;
    for _ in 0..5 {
        let (from, to) = session.hint().unwrap();
        let outcome = session.attempt_swap(from, to).unwrap();
        collected += outcome.cascade.collected_of(TileKind::Red);
    }
    assert_eq!(session.objectives()[0].current, collected);
    assert_eq!(session.objectives()[0].remaining(), 100_000 - collected);
}

#[test]
fn test_combo_depth_tracks_cascades() {
    let mut session = LevelSession::load_level(long_level(25)).unwrap();
    let mut deepest = 0;
    while session.status() == SessionStatus::Active {
        let (from, to) = session.hint().unwrap();
        let outcome = session.attempt_swap(from, to).unwrap();
        assert_eq!(session.combo_depth(), outcome.cascade.max_combo_depth);
        assert!(session.combo_depth() >= 1);
        deepest = deepest.max(session.combo_depth());
    }
    assert_eq!(session.max_combo_depth(), deepest);
}

#[test]
fn test_level_timer_expires() {
    let config = long_level(10).with_time_limit_ms(1_000);
    let mut session = LevelSession::load_level(config).unwrap();
    assert!(!session.tick(400));
    assert_eq!(session.time_remaining_ms(), Some(600));

    assert!(session.pause());
    assert!(!session.tick(5_000));
    assert_eq!(session.time_remaining_ms(), Some(600));
    let outcome = session.attempt_swap(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
    assert_eq!(outcome.rejection, Some(SwapError::NotPlayable));
    assert!(session.resume());

    assert!(session.tick(600));
    assert_eq!(session.status(), SessionStatus::Lost);
    assert_eq!(session.loss_reason(), Some(LossReason::LevelTimeExpired));
}

#[test]
fn test_move_timer_resets_on_swap() {
    let config = long_level(10).with_move_time_limit_ms(500);
    let mut session = LevelSession::load_level(config).unwrap();
    assert!(!session.tick(300));
    assert_eq!(session.step_time_remaining_ms(), Some(200));

    let (from, to) = session.hint().unwrap();
    session.attempt_swap(from, to).unwrap();
    assert_eq!(session.step_time_remaining_ms(), Some(500));

    assert!(session.tick(500));
    assert_eq!(session.loss_reason(), Some(LossReason::MoveTimeExpired));
}

#[test]
fn test_restart_replays_the_same_board() {
    let fresh = LevelSession::load_level(long_level(10)).unwrap();
    let mut session = LevelSession::load_level(long_level(10)).unwrap();
    let (from, to) = session.hint().unwrap();
    session.attempt_swap(from, to).unwrap();

    session.restart().unwrap();
    assert_eq!(session.episode_id(), 1);
    assert_eq!(session.grid(), fresh.grid());
    assert_eq!(session.moves_remaining(), 10);
    assert_eq!(session.score(), 0);
    assert_eq!(session.swaps_committed(), 0);
    assert_eq!(session.status(), SessionStatus::Active);
}

#[test]
fn test_invalid_levels_are_rejected() {
    let negative = LevelConfig::new(8, 8, 10).with_objective(TileKind::Red, -1);
    assert_eq!(
        LevelSession::load_level(negative).err(),
        Some(SessionError::Config(ConfigError::ObjectiveCountNotPositive {
            kind: TileKind::Red,
            required: -1,
        }))
    );

    let empty = LevelConfig::new(8, 8, 10);
    assert_eq!(
        LevelSession::new(empty).err(),
        Some(SessionError::Config(ConfigError::NoObjectives))
    );

    let tiny = LevelConfig::new(2, 8, 10).with_objective(TileKind::Red, 5);
    let err = LevelSession::new(tiny).err().unwrap();
    assert_eq!(err.code(), "invalid_dimensions");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_reshuffle_repairs_deadlocked_board() {
    let mut grid = Grid::from_ascii(&["RGBR", "BRGB", "GBRG", "RGBR"]);
    assert!(!has_any_valid_move(&mut grid));
    assert_eq!(find_valid_move(&mut grid), None);

    let ids: Vec<_> = grid.cells().iter().flatten().map(|t| t.id).collect();
    let mut bag = TileBag::new(&four_kinds(), 8);
    let attempts = reshuffle(&mut grid, &mut bag).unwrap();
    assert!(attempts >= 1);
    assert!(has_any_valid_move(&mut grid));
    assert!(scan(&grid).is_empty());
    let after: Vec<_> = grid.cells().iter().flatten().map(|t| t.id).collect();
    assert_eq!(ids, after);
}

#[test]
fn test_hint_is_always_a_legal_move() {
    let mut session = LevelSession::load_level(long_level(15)).unwrap();
    while session.status() == SessionStatus::Active {
        let (from, to) = session.hint().unwrap();
        let legal = valid_moves(&mut session.grid().clone());
        assert!(legal.contains(&(from, to)));
        session.attempt_swap(from, to).unwrap();
    }
    assert!(session.hint().is_none());
}
