//! Level session - the state machine front-ends talk to
//!
//! ```text
//! Idle --start--> Active <--pause/resume--> Paused
//!                   |
//!                   +--> Won | Lost   (terminal)
//! ```
//!
//! The session owns the grid, the tile bag and every counter. A committed
//! swap runs the whole cascade before `attempt_swap` returns, so the board
//! is settled whenever the session can be observed.

use std::fmt;

use log::{debug, info, warn};

use crate::cascade::{resolve_swap, CascadeResult, SwapContext};
use crate::deadlock::{
    find_valid_move, generate, has_any_valid_move, reshuffle, DeadlockUnrecoverable,
};
use crate::events::{LevelSummary, SessionEvent};
use crate::grid::Grid;
use crate::level::{ConfigError, LevelConfig, Objective};
use crate::rng::TileBag;
use crate::snapshot::SessionSnapshot;
use crate::specials::SpecialRules;
use crate::types::{Coord, LossReason, SessionStatus};
use crate::validator::{validate_swap, SwapError};

/// Seed used when the level does not fix one
pub const FALLBACK_SEED: u32 = 12345;

/// Failures that end (or prevent) a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    Config(ConfigError),
    DeadlockUnrecoverable { attempts: u32 },
}

impl SessionError {
    pub fn code(self) -> &'static str {
        match self {
            SessionError::Config(err) => err.code(),
            SessionError::DeadlockUnrecoverable { .. } => "deadlock_unrecoverable",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Config(err) => write!(f, "invalid level: {}", err),
            SessionError::DeadlockUnrecoverable { attempts } => write!(
                f,
                "board stayed deadlocked after {} reshuffle attempts",
                attempts
            ),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Config(err) => Some(err),
            SessionError::DeadlockUnrecoverable { .. } => None,
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Config(err)
    }
}

impl From<DeadlockUnrecoverable> for SessionError {
    fn from(err: DeadlockUnrecoverable) -> Self {
        SessionError::DeadlockUnrecoverable {
            attempts: err.attempts,
        }
    }
}

/// Result of one `attempt_swap` call
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub accepted: bool,
    pub rejection: Option<SwapError>,
    /// Empty when the swap was rejected
    pub cascade: CascadeResult,
    /// Status after the swap
    pub status: SessionStatus,
}

impl SwapOutcome {
    fn rejected(err: SwapError, status: SessionStatus) -> Self {
        Self {
            accepted: false,
            rejection: Some(err),
            cascade: CascadeResult::default(),
            status,
        }
    }
}

/// One play-through of a level
#[derive(Debug, Clone)]
pub struct LevelSession {
    config: LevelConfig,
    grid: Grid,
    bag: TileBag,
    rules: SpecialRules,
    objectives: Vec<Objective>,
    seed: u32,
    status: SessionStatus,
    loss_reason: Option<LossReason>,
    moves_remaining: u32,
    score: u32,
    /// Depth reached by the most recent cascade
    combo_depth: u32,
    max_combo_depth: u32,
    time_remaining_ms: Option<u32>,
    step_time_remaining_ms: Option<u32>,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    swaps_committed: u32,
    reshuffles: u32,
    events: Vec<SessionEvent>,
}

impl LevelSession {
    /// Validate `config` and build an idle session with an empty board
    pub fn new(config: LevelConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let seed = config.seed.unwrap_or(FALLBACK_SEED);
        Ok(Self {
            grid: Grid::new(config.rows, config.cols),
            bag: TileBag::new(&config.kinds, seed),
            rules: SpecialRules::new(config.specials),
            objectives: config.objectives(),
            seed,
            status: SessionStatus::Idle,
            loss_reason: None,
            moves_remaining: config.moves,
            score: 0,
            combo_depth: 0,
            max_combo_depth: 0,
            time_remaining_ms: config.time_limit_ms,
            step_time_remaining_ms: config.move_time_limit_ms,
            episode_id: 0,
            swaps_committed: 0,
            reshuffles: 0,
            events: Vec::new(),
            config,
        })
    }

    /// Build and start a session in one call
    pub fn load_level(config: LevelConfig) -> Result<Self, SessionError> {
        let mut session = Self::new(config)?;
        session.start()?;
        Ok(session)
    }

    /// Generate the board and start play. No-op unless idle.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Idle {
            return Ok(());
        }
        let attempts = generate(&mut self.grid, &mut self.bag)?;
        self.status = SessionStatus::Active;
        debug!(
            "level started: {}x{}, {} moves, seed {}, episode {}, {} generation attempts",
            self.grid.rows(),
            self.grid.cols(),
            self.moves_remaining,
            self.seed,
            self.episode_id,
            attempts
        );
        Ok(())
    }

    /// Same level, same seed, fresh counters
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let episode_id = self.episode_id.wrapping_add(1);
        let mut fresh = Self::new(self.config.clone())?;
        fresh.episode_id = episode_id;
        fresh.start()?;
        *self = fresh;
        Ok(())
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn time_remaining_ms(&self) -> Option<u32> {
        self.time_remaining_ms
    }

    pub fn step_time_remaining_ms(&self) -> Option<u32> {
        self.step_time_remaining_ms
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn loss_reason(&self) -> Option<LossReason> {
        self.loss_reason
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo_depth(&self) -> u32 {
        self.combo_depth
    }

    pub fn max_combo_depth(&self) -> u32 {
        self.max_combo_depth
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn swaps_committed(&self) -> u32 {
        self.swaps_committed
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    pub fn objectives_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_complete)
    }

    /// Take every event queued since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            score: self.score,
            moves_used: self.config.moves.saturating_sub(self.moves_remaining),
            moves_remaining: self.moves_remaining,
            max_combo_depth: self.max_combo_depth,
            reshuffles: self.reshuffles,
            episode_id: self.episode_id,
        }
    }

    /// Try to swap two tiles. Rejections leave the session untouched; an
    /// `Err` is only returned when the board cannot be made playable again.
    pub fn attempt_swap(&mut self, from: Coord, to: Coord) -> Result<SwapOutcome, SessionError> {
        if self.status != SessionStatus::Active {
            return Ok(SwapOutcome::rejected(SwapError::NotPlayable, self.status));
        }
        if let Err(err) = validate_swap(&mut self.grid, from, to) {
            return Ok(SwapOutcome::rejected(err, self.status));
        }
        if let Err(err) = self.grid.swap(from, to) {
            return Ok(SwapOutcome::rejected(err.into(), self.status));
        }

        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.swaps_committed = self.swaps_committed.saturating_add(1);
        debug!(
            "swap ({},{}) <-> ({},{}) accepted, {} moves left",
            from.row, from.col, to.row, to.col, self.moves_remaining
        );

        let cascade = resolve_swap(
            &mut self.grid,
            &mut self.bag,
            &self.rules,
            Some(SwapContext { from, to }),
        );
        self.apply_cascade(&cascade);
        self.step_time_remaining_ms = self.config.move_time_limit_ms;

        if self.objectives_complete() {
            self.win();
        } else if self.moves_remaining == 0 {
            self.lose(LossReason::OutOfMoves);
        } else {
            self.ensure_playable()?;
        }

        Ok(SwapOutcome {
            accepted: true,
            rejection: None,
            cascade,
            status: self.status,
        })
    }

    fn apply_cascade(&mut self, cascade: &CascadeResult) {
        self.score = self.score.saturating_add(cascade.total_score);
        for objective in &mut self.objectives {
            objective.add(cascade.collected_of(objective.kind));
        }
        self.combo_depth = cascade.max_combo_depth;
        self.max_combo_depth = self.max_combo_depth.max(cascade.max_combo_depth);

        for step in &cascade.steps {
            self.events
                .push(SessionEvent::ComboChanged { depth: step.depth });
            for scored in &step.groups {
                self.events.push(SessionEvent::MatchResolved {
                    group: scored.group.clone(),
                    score: scored.score,
                });
            }
            for activation in &step.activations {
                self.events.push(SessionEvent::SpecialActivated {
                    kind: activation.kind,
                    partner: activation.partner,
                    cells: activation.cells.clone(),
                });
            }
        }
        debug!(
            "cascade settled: {} passes, {} points, score {}",
            cascade.iterations(),
            cascade.total_score,
            self.score
        );
    }

    /// Reshuffle if the settled board has no legal move
    fn ensure_playable(&mut self) -> Result<(), SessionError> {
        if has_any_valid_move(&mut self.grid) {
            return Ok(());
        }
        let attempts = reshuffle(&mut self.grid, &mut self.bag)?;
        self.reshuffles = self.reshuffles.saturating_add(1);
        warn!("board deadlocked, reshuffled in {} attempts", attempts);
        self.events.push(SessionEvent::Reshuffled);
        Ok(())
    }

    fn win(&mut self) {
        self.status = SessionStatus::Won;
        self.step_time_remaining_ms = None;
        let summary = self.summary();
        info!(
            "level won: score {}, {} moves used, max combo {}",
            summary.score, summary.moves_used, summary.max_combo_depth
        );
        self.events.push(SessionEvent::LevelWon(summary));
    }

    fn lose(&mut self, reason: LossReason) {
        self.status = SessionStatus::Lost;
        self.loss_reason = Some(reason);
        info!("level lost ({}): score {}", reason.as_str(), self.score);
        self.events.push(SessionEvent::LevelLost(reason));
    }

    /// Advance the level timers. Returns true when the level ended.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }

        if let Some(left) = self.time_remaining_ms.as_mut() {
            *left = left.saturating_sub(elapsed_ms);
            if *left == 0 {
                self.lose(LossReason::LevelTimeExpired);
                return true;
            }
        }
        if let Some(left) = self.step_time_remaining_ms.as_mut() {
            *left = left.saturating_sub(elapsed_ms);
            if *left == 0 {
                self.lose(LossReason::MoveTimeExpired);
                return true;
            }
        }
        false
    }

    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.status = SessionStatus::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.status = SessionStatus::Active;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            SessionStatus::Active => self.pause(),
            SessionStatus::Paused => self.resume(),
            _ => false,
        }
    }

    /// A legal swap, if the level is in play
    pub fn hint(&mut self) -> Option<(Coord, Coord)> {
        if self.status != SessionStatus::Active {
            return None;
        }
        find_valid_move(&mut self.grid)
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.rows = self.grid.rows();
        out.cols = self.grid.cols();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.objectives.clear();
        out.objectives.extend_from_slice(&self.objectives);
        out.moves_remaining = self.moves_remaining;
        out.time_remaining_ms = self.time_remaining_ms;
        out.step_time_remaining_ms = self.step_time_remaining_ms;
        out.status = self.status;
        out.loss_reason = self.loss_reason;
        out.score = self.score;
        out.combo_depth = self.combo_depth;
        out.max_combo_depth = self.max_combo_depth;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.swaps_committed = self.swaps_committed;
        out.reshuffles = self.reshuffles;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
