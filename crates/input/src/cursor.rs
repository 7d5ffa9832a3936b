//! Board cursor and tile selection.
//!
//! Two ways to request a swap:
//!
//! - select a tile, move the cursor onto a neighbor, select again
//! - select a tile, then press a direction (swaps with that neighbor)
//!
//! The cursor never leaves the board. Whether a swap is legal is not decided
//! here; the request goes to the engine as-is.

use crate::types::{Coord, GameAction};

/// What a cursor action produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOutcome {
    /// Nothing changed (e.g. moving into a wall)
    None,
    Moved(Coord),
    Selected(Coord),
    Deselected,
    /// Swap the first coord with the second
    SwapRequested(Coord, Coord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    rows: u8,
    cols: u8,
    at: Coord,
    selected: Option<Coord>,
}

impl BoardCursor {
    /// Cursor starting near the middle of a `rows x cols` board
    pub fn new(rows: u8, cols: u8) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            at: Coord::new(((rows - 1) / 2) as i8, ((cols - 1) / 2) as i8),
            selected: None,
        }
    }

    pub fn position(&self) -> Coord {
        self.at
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Place the cursor, clamped to the board
    pub fn set_position(&mut self, at: Coord) {
        self.at = self.clamp(at);
    }

    /// Re-fit to a board of a different size (level change)
    pub fn resize(&mut self, rows: u8, cols: u8) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        self.at = self.clamp(self.at);
        self.selected = None;
    }

    fn clamp(&self, at: Coord) -> Coord {
        Coord::new(
            at.row.clamp(0, self.rows as i8 - 1),
            at.col.clamp(0, self.cols as i8 - 1),
        )
    }

    fn step(&mut self, dr: i8, dc: i8) -> CursorOutcome {
        let target = self.clamp(self.at.offset(dr, dc));
        if target == self.at {
            return CursorOutcome::None;
        }
        self.at = target;
        match self.selected.take() {
            Some(from) => CursorOutcome::SwapRequested(from, target),
            None => CursorOutcome::Moved(target),
        }
    }

    fn select(&mut self) -> CursorOutcome {
        match self.selected {
            Some(from) if from == self.at => {
                self.selected = None;
                CursorOutcome::Deselected
            }
            Some(from) if from.is_adjacent(self.at) => {
                self.selected = None;
                CursorOutcome::SwapRequested(from, self.at)
            }
            _ => {
                self.selected = Some(self.at);
                CursorOutcome::Selected(self.at)
            }
        }
    }

    /// Apply a front-end action. Non-cursor actions are ignored.
    pub fn apply(&mut self, action: GameAction) -> CursorOutcome {
        match action {
            GameAction::CursorUp => self.step(-1, 0),
            GameAction::CursorDown => self.step(1, 0),
            GameAction::CursorLeft => self.step(0, -1),
            GameAction::CursorRight => self.step(0, 1),
            GameAction::Select => self.select(),
            GameAction::Cancel => {
                if self.selected.take().is_some() {
                    CursorOutcome::Deselected
                } else {
                    CursorOutcome::None
                }
            }
            GameAction::Hint | GameAction::Pause | GameAction::Restart => CursorOutcome::None,
        }
    }
}
