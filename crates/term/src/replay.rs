//! Cascade replay: plays back the frames a cascade recorded.
//!
//! The engine resolves a swap instantly; this sequencer shows each pass for
//! `step_ms` (first half: cleared cells highlighted on the post-clear board,
//! second half: the board after gravity and refill). Front-ends drop input
//! while a replay is running.

use crate::core::CascadeResult;
use crate::types::{Cell, Coord, CASCADE_STEP_MS, REJECT_FLASH_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReplayStep {
    depth: u32,
    cleared: Vec<Coord>,
    after_clear: Vec<Cell>,
    settled: Vec<Cell>,
}

/// Which half of a pass is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPhase {
    Clearing,
    Settling,
}

/// What to draw instead of the live board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayFrame<'a> {
    pub depth: u32,
    pub phase: ReplayPhase,
    pub cells: &'a [Cell],
    /// Cells to highlight (empty while settling)
    pub highlight: &'a [Coord],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReplay {
    steps: Vec<ReplayStep>,
    step_ms: u32,
    elapsed_ms: u32,
}

impl Default for CascadeReplay {
    fn default() -> Self {
        Self::idle()
    }
}

impl CascadeReplay {
    /// A replay with nothing to show
    pub fn idle() -> Self {
        Self {
            steps: Vec::new(),
            step_ms: CASCADE_STEP_MS,
            elapsed_ms: 0,
        }
    }

    pub fn new(cascade: &CascadeResult) -> Self {
        Self::with_step_ms(cascade, CASCADE_STEP_MS)
    }

    pub fn with_step_ms(cascade: &CascadeResult, step_ms: u32) -> Self {
        let steps = cascade
            .steps
            .iter()
            .map(|s| ReplayStep {
                depth: s.depth,
                cleared: s.cleared.clone(),
                after_clear: s.after_clear.clone(),
                settled: s.settled.clone(),
            })
            .collect();
        Self {
            steps,
            step_ms: step_ms.max(2),
            elapsed_ms: 0,
        }
    }

    pub fn total_ms(&self) -> u32 {
        self.step_ms.saturating_mul(self.steps.len() as u32)
    }

    pub fn is_active(&self) -> bool {
        self.elapsed_ms < self.total_ms()
    }

    /// Advance the clock. Returns true while frames remain.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms).min(self.total_ms());
        self.is_active()
    }

    /// Jump to the end
    pub fn skip(&mut self) {
        self.elapsed_ms = self.total_ms();
    }

    pub fn current(&self) -> Option<ReplayFrame<'_>> {
        if !self.is_active() {
            return None;
        }
        let index = (self.elapsed_ms / self.step_ms) as usize;
        let step = self.steps.get(index)?;
        let into = self.elapsed_ms % self.step_ms;
        let frame = if into < self.step_ms / 2 {
            ReplayFrame {
                depth: step.depth,
                phase: ReplayPhase::Clearing,
                cells: &step.after_clear,
                highlight: &step.cleared,
            }
        } else {
            ReplayFrame {
                depth: step.depth,
                phase: ReplayPhase::Settling,
                cells: &step.settled,
                highlight: &[],
            }
        };
        Some(frame)
    }
}

/// Countdown for a short visual cue (e.g. a rejected swap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flash {
    remaining_ms: u32,
    cells: Option<(Coord, Coord)>,
}

impl Flash {
    pub fn trigger(&mut self, a: Coord, b: Coord) {
        self.remaining_ms = REJECT_FLASH_MS;
        self.cells = Some((a, b));
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.cells = None;
        }
    }

    pub fn cells(&self) -> Option<(Coord, Coord)> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{resolve_from, Grid, SpecialRules, TileBag};
    use crate::types::TileKind;

    fn cascade() -> CascadeResult {
        let mut grid = Grid::from_ascii(&["GBY", "BYG", "RRR"]);
        let mut bag = TileBag::new(&TileKind::ALL, 42);
        resolve_from(&mut grid, &mut bag, &SpecialRules::default())
    }

    #[test]
    fn test_idle_has_no_frames() {
        let replay = CascadeReplay::idle();
        assert!(!replay.is_active());
        assert!(replay.current().is_none());
    }

    #[test]
    fn test_phases_follow_clock() {
        let result = cascade();
        let mut replay = CascadeReplay::with_step_ms(&result, 100);
        assert_eq!(replay.total_ms(), 100 * result.steps.len() as u32);

        let frame = replay.current().unwrap();
        assert_eq!(frame.phase, ReplayPhase::Clearing);
        assert_eq!(frame.depth, 1);
        assert_eq!(frame.highlight.len(), 3);
        assert_eq!(frame.cells, &result.steps[0].after_clear[..]);

        replay.tick(60);
        let frame = replay.current().unwrap();
        assert_eq!(frame.phase, ReplayPhase::Settling);
        assert!(frame.highlight.is_empty());
        assert_eq!(frame.cells, &result.steps[0].settled[..]);

        replay.skip();
        assert!(!replay.is_active());
        assert!(!replay.tick(16));
    }

    #[test]
    fn test_flash_expires() {
        let mut flash = Flash::default();
        flash.trigger(Coord::new(0, 0), Coord::new(0, 1));
        assert!(flash.cells().is_some());
        flash.tick(REJECT_FLASH_MS - 1);
        assert!(flash.cells().is_some());
        flash.tick(1);
        assert!(flash.cells().is_none());
    }
}
