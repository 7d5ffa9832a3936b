//! Core match-3 engine - pure, deterministic, and testable
//!
//! This crate holds every board rule and the level state machine. It has
//! **no dependencies** on UI, terminal or I/O, so the same engine drives the
//! terminal game, the tests and the benchmarks.
//!
//! - **Deterministic**: a seed fixes the initial board and every refill
//! - **Synchronous**: a committed swap cascades to quiescence before
//!   [`LevelSession::attempt_swap`] returns
//! - **Replayable**: each cascade pass records board frames, so front-ends can
//!   animate without re-running rules
//!
//! # Module Structure
//!
//! - [`grid`]: rows x cols cell array with swap, gravity and id allocation
//! - [`matcher`]: run detection and shape classification
//! - [`specials`]: which matches create special tiles, what activations clear
//! - [`cascade`]: clear / activate / gravity / refill loop with scoring
//! - [`validator`]: speculative swap validation
//! - [`deadlock`]: legal-move search, reshuffle, board generation
//! - [`scoring`]: shape scores and the combo curve
//! - [`rng`]: seeded tile bag
//! - [`level`]: level configuration and objectives
//! - [`session`]: the [`LevelSession`] state machine
//! - [`events`], [`snapshot`]: what front-ends consume
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{LevelConfig, LevelSession};
//! use tui_match3_types::{SessionStatus, TileKind};
//!
//! let config = LevelConfig::new(8, 8, 10)
//!     .with_kinds(&[TileKind::Red, TileKind::Green, TileKind::Blue, TileKind::Yellow])
//!     .with_objective(TileKind::Red, 30)
//!     .with_seed(2024);
//! let mut session = LevelSession::load_level(config).unwrap();
//! assert_eq!(session.status(), SessionStatus::Active);
//!
//! let (from, to) = session.hint().expect("fresh boards always have a move");
//! let outcome = session.attempt_swap(from, to).unwrap();
//! assert!(outcome.accepted);
//! assert_eq!(session.moves_remaining(), 9);
//! assert!(session.score() > 0);
//! ```
//!
//! # Timing
//!
//! The core has no clock. Front-ends call
//! [`LevelSession::tick`](session::LevelSession::tick) with elapsed time to run
//! the optional level and per-move timers.

pub mod cascade;
pub mod deadlock;
pub mod events;
pub mod grid;
pub mod level;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod specials;
pub mod validator;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use cascade::{resolve_from, resolve_swap, CascadeResult, CascadeStep, SwapContext};
pub use deadlock::{find_valid_move, has_any_valid_move, reshuffle, DeadlockUnrecoverable};
pub use events::{LevelSummary, SessionEvent};
pub use grid::{Grid, GridError};
pub use level::{ConfigError, LevelConfig, Objective, ObjectiveSpec};
pub use matcher::{scan, scan_at, MatchGroup};
pub use rng::{SimpleRng, TileBag};
pub use scoring::{base_score, combo_multiplier};
pub use session::{LevelSession, SessionError, SwapOutcome};
pub use snapshot::SessionSnapshot;
pub use specials::{combine, PairEffect, SpecialRules};
pub use validator::{validate_swap, SwapError, SwapKind};
