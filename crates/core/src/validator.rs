//! Move validation - speculative swap probing
//!
//! A swap is legal when both cells are on the board, they are orthogonal
//! neighbors, and either one of them holds a special tile or swapping them
//! makes at least one endpoint part of a match. Probing swaps the cells,
//! checks both endpoints with [`scan_at`] and swaps back, so the grid is
//! unchanged whatever the outcome.

use std::fmt;

use crate::grid::{Grid, GridError};
use crate::matcher::scan_at;
use crate::types::Coord;

/// Why a swap was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    OutOfBounds,
    NotAdjacent,
    NoResultingMatch,
    /// The session is not accepting moves (idle, paused or finished)
    NotPlayable,
}

impl SwapError {
    pub fn code(self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "out_of_bounds",
            SwapError::NotAdjacent => "not_adjacent",
            SwapError::NoResultingMatch => "no_resulting_match",
            SwapError::NotPlayable => "not_playable",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapError::OutOfBounds => "swap target is outside the board",
            SwapError::NotAdjacent => "tiles are not orthogonal neighbors",
            SwapError::NoResultingMatch => "swap would not create a match",
            SwapError::NotPlayable => "level is not accepting moves",
        }
    }
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SwapError {}

impl From<GridError> for SwapError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds => SwapError::OutOfBounds,
        }
    }
}

/// Why a swap was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    /// Forms at least one match
    Match,
    /// Involves a special tile, which activates
    Special,
}

/// Check a proposed swap without leaving any change on the grid
pub fn validate_swap(grid: &mut Grid, a: Coord, b: Coord) -> Result<SwapKind, SwapError> {
    if !grid.in_bounds(a) || !grid.in_bounds(b) {
        return Err(SwapError::OutOfBounds);
    }
    if !a.is_adjacent(b) {
        return Err(SwapError::NotAdjacent);
    }

    let (ta, tb) = (grid.tile(a), grid.tile(b));
    let (Some(ta), Some(tb)) = (ta, tb) else {
        return Err(SwapError::NoResultingMatch);
    };
    if ta.is_special() || tb.is_special() {
        return Ok(SwapKind::Special);
    }
    grid.swap(a, b)?;
    let matched = scan_at(grid, a) || scan_at(grid, b);
    grid.swap(a, b)?;

    if matched {
        Ok(SwapKind::Match)
    } else {
        Err(SwapError::NoResultingMatch)
    }
}
