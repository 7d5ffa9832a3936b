//! Scoring module - match and combo points
//!
//! - Each match scores its shape's base value plus `EXTRA_CELL_SCORE` per cell
//!   beyond the shape minimum.
//! - Every cascade pass multiplies its points by `combo_multiplier(depth)`,
//!   which is the depth itself capped at `COMBO_MULTIPLIER_CAP`. The curve is
//!   non-decreasing in depth.
//! - Cells cleared by special activations score `SPECIAL_CELL_SCORE` each.

use crate::types::{
    Shape, COMBO_MULTIPLIER_CAP, EXTRA_CELL_SCORE, SHAPE_BASE_SCORES, SPECIAL_CELL_SCORE,
};

/// Points for a match before the combo multiplier
pub fn base_score(shape: Shape, size: usize) -> u32 {
    let extra = size.saturating_sub(shape.min_size()) as u32;
    SHAPE_BASE_SCORES[shape.index()].saturating_add(extra.saturating_mul(EXTRA_CELL_SCORE))
}

/// Multiplier for cascade pass `depth` (1-based; 0 is treated as 1)
pub fn combo_multiplier(depth: u32) -> u32 {
    depth.clamp(1, COMBO_MULTIPLIER_CAP)
}

/// Points for a match resolved at cascade `depth`
pub fn match_score(shape: Shape, size: usize, depth: u32) -> u32 {
    base_score(shape, size).saturating_mul(combo_multiplier(depth))
}

/// Points for `cells` cleared by special activations at cascade `depth`
pub fn activation_score(cells: usize, depth: u32) -> u32 {
    (cells as u32)
        .saturating_mul(SPECIAL_CELL_SCORE)
        .saturating_mul(combo_multiplier(depth))
}
