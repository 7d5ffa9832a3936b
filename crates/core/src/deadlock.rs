//! Deadlock guard - legal-move search, reshuffle and board generation
//!
//! A board is deadlocked when no right/down swap passes validation. The fix
//! is a reshuffle: every normal tile gets a fresh kind (ids and specials are
//! kept) drawn so that no run of three forms, repeated until the board has at
//! least one legal move. Initial boards go through the same loop.

use std::fmt;

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::matcher::scan;
use crate::rng::TileBag;
use crate::types::{Coord, Tile, TileKind, RESHUFFLE_RETRY_CAP};
use crate::validator::validate_swap;

/// Reshuffling gave up; the level's kind palette/dimensions cannot produce a
/// playable board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlockUnrecoverable {
    pub attempts: u32,
}

impl fmt::Display for DeadlockUnrecoverable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no playable board after {} reshuffle attempts",
            self.attempts
        )
    }
}

impl std::error::Error for DeadlockUnrecoverable {}

/// First legal swap in row-major order, probing right then down
pub fn find_valid_move(grid: &mut Grid) -> Option<(Coord, Coord)> {
    let coords: Vec<Coord> = grid.coords().collect();
    for at in coords {
        for other in [at.offset(0, 1), at.offset(1, 0)] {
            if grid.in_bounds(other) && validate_swap(grid, at, other).is_ok() {
                return Some((at, other));
            }
        }
    }
    None
}

pub fn has_any_valid_move(grid: &mut Grid) -> bool {
    find_valid_move(grid).is_some()
}

/// Every legal swap, each pair once (hint overlays, tests)
pub fn valid_moves(grid: &mut Grid) -> Vec<(Coord, Coord)> {
    let coords: Vec<Coord> = grid.coords().collect();
    let mut out = Vec::new();
    for at in coords {
        for other in [at.offset(0, 1), at.offset(1, 0)] {
            if grid.in_bounds(other) && validate_swap(grid, at, other).is_ok() {
                out.push((at, other));
            }
        }
    }
    out
}

/// Kinds that would complete a run of three ending at `at` from the left or above
fn forbidden_kinds(grid: &Grid, at: Coord) -> ArrayVec<TileKind, 2> {
    let mut avoid = ArrayVec::new();
    for (dr, dc) in [(0, -1), (-1, 0)] {
        let a = grid.match_kind_at(at.offset(dr, dc));
        let b = grid.match_kind_at(at.offset(dr * 2, dc * 2));
        if let (Some(a), Some(b)) = (a, b) {
            if a == b && !avoid.contains(&a) {
                avoid.push(a);
            }
        }
    }
    avoid
}

/// Give every normal tile a fresh kind, avoiding runs where the palette allows
fn rewrite_kinds(grid: &mut Grid, bag: &mut TileBag) {
    for at in grid.coords() {
        let Some(tile) = grid.tile(at) else {
            continue;
        };
        if tile.is_special() {
            continue;
        }
        let kind = bag.draw_avoiding(&forbidden_kinds(grid, at));
        grid.set(at, Some(Tile { kind, ..tile }));
    }
}

/// Rewrite kinds until the board is settled and has a legal move.
///
/// Returns the number of attempts used.
pub fn reshuffle(grid: &mut Grid, bag: &mut TileBag) -> Result<u32, DeadlockUnrecoverable> {
    for attempt in 1..=RESHUFFLE_RETRY_CAP {
        rewrite_kinds(grid, bag);
        if scan(grid).is_empty() && has_any_valid_move(grid) {
            return Ok(attempt);
        }
    }
    Err(DeadlockUnrecoverable {
        attempts: RESHUFFLE_RETRY_CAP,
    })
}

/// Fill every empty cell and shuffle into a settled, playable board
pub fn generate(grid: &mut Grid, bag: &mut TileBag) -> Result<u32, DeadlockUnrecoverable> {
    for at in grid.empty_cells() {
        let tile = grid.spawn_tile(bag.draw(), None);
        grid.set(at, Some(tile));
    }
    reshuffle(grid, bag)
}
