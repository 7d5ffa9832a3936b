use crate::level::Objective;
use crate::types::{Cell, Coord, LossReason, SessionStatus};

/// Read-only copy of everything a front-end draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub rows: u8,
    pub cols: u8,
    /// Row-major cells
    pub cells: Vec<Cell>,
    pub objectives: Vec<Objective>,
    pub moves_remaining: u32,
    pub time_remaining_ms: Option<u32>,
    pub step_time_remaining_ms: Option<u32>,
    pub status: SessionStatus,
    pub loss_reason: Option<LossReason>,
    pub score: u32,
    pub combo_depth: u32,
    pub max_combo_depth: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub swaps_committed: u32,
    pub reshuffles: u32,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.cells.clear();
        self.objectives.clear();
        self.moves_remaining = 0;
        self.time_remaining_ms = None;
        self.step_time_remaining_ms = None;
        self.status = SessionStatus::Idle;
        self.loss_reason = None;
        self.score = 0;
        self.combo_depth = 0;
        self.max_combo_depth = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.swaps_committed = 0;
        self.reshuffles = 0;
    }

    pub fn cell(&self, at: Coord) -> Cell {
        if at.row < 0 || at.col < 0 || at.row as u8 >= self.rows || at.col as u8 >= self.cols {
            return None;
        }
        let idx = at.row as usize * self.cols as usize + at.col as usize;
        self.cells.get(idx).copied().flatten()
    }

    pub fn playable(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn objectives_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_complete)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            objectives: Vec::new(),
            moves_remaining: 0,
            time_remaining_ms: None,
            step_time_remaining_ms: None,
            status: SessionStatus::Idle,
            loss_reason: None,
            score: 0,
            combo_depth: 0,
            max_combo_depth: 0,
            episode_id: 0,
            seed: 0,
            swaps_committed: 0,
            reshuffles: 0,
        }
    }
}
