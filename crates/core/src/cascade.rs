//! Cascade module - resolve a board to quiescence
//!
//! One pass:
//!
//! 1. Scan; score each group at the current combo depth.
//! 2. Reserve one cell per qualifying group for its new special tile (the swap
//!    destination when it is in the group, then the swap origin, else the
//!    group pivot).
//! 3. Mark every other matched cell for clearing.
//! 4. Run activations: specials triggered by the swap (first pass only) and
//!    any special caught in the marked footprint. Their footprints feed back
//!    into the same pass. Each special fires at most once and reserved cells
//!    are never cleared by the pass that created them.
//! 5. Clear, place the new specials, apply gravity, refill from the bag.
//!
//! Passes repeat until one finds nothing to do. Every pass is recorded as a
//! [`CascadeStep`] carrying board frames so a presentation layer can replay
//! the cascade without re-running any rules.

use std::collections::VecDeque;

use log::{trace, warn};

use crate::grid::Grid;
use crate::matcher::{scan, MatchGroup};
use crate::rng::TileBag;
use crate::scoring::{activation_score, match_score};
use crate::specials::{combine, footprint, pair_footprint, SpecialRules};
use crate::types::{Cell, Coord, SpecialKind, Tile, TileKind};

/// The swap that set off a cascade. After the swap, the tile that was at
/// `from` sits at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapContext {
    pub from: Coord,
    pub to: Coord,
}

/// A match together with its points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredGroup {
    pub group: MatchGroup,
    pub score: u32,
    pub depth: u32,
    /// Special tile created by this match, if any
    pub spawned: Option<SpecialKind>,
}

/// A special tile (or combined pair) that fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub kind: SpecialKind,
    pub origin: Coord,
    /// Other special when two were swapped together
    pub partner: Option<SpecialKind>,
    /// Footprint in row-major order
    pub cells: Vec<Coord>,
}

/// One pass of the resolution loop
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeStep {
    pub depth: u32,
    pub groups: Vec<ScoredGroup>,
    pub activations: Vec<Activation>,
    /// Specials placed by this pass
    pub created: Vec<(Coord, Tile)>,
    /// Cells emptied by this pass (before gravity)
    pub cleared: Vec<Coord>,
    /// Cells filled with fresh tiles after gravity
    pub refilled: Vec<Coord>,
    pub score: u32,
    /// Board after clearing, before gravity
    pub after_clear: Vec<Cell>,
    /// Board after gravity and refill
    pub settled: Vec<Cell>,
}

/// Everything one triggering swap produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CascadeResult {
    pub total_score: u32,
    pub steps: Vec<CascadeStep>,
    pub max_combo_depth: u32,
    /// Normal tiles removed per kind (index by [`TileKind::index`])
    pub collected: [u32; TileKind::COUNT],
}

impl CascadeResult {
    pub fn groups(&self) -> impl Iterator<Item = &ScoredGroup> {
        self.steps.iter().flat_map(|s| s.groups.iter())
    }

    pub fn activations(&self) -> impl Iterator<Item = &Activation> {
        self.steps.iter().flat_map(|s| s.activations.iter())
    }

    /// Number of passes that did work
    pub fn iterations(&self) -> usize {
        self.steps.len()
    }

    pub fn collected_of(&self, kind: TileKind) -> u32 {
        self.collected[kind.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Single {
        origin: Coord,
        kind: SpecialKind,
        target: Option<TileKind>,
    },
    Pair {
        origin: Coord,
        kind: SpecialKind,
        partner: SpecialKind,
    },
}

/// Activations implied by the swap itself
fn swap_triggers(grid: &Grid, swap: SwapContext) -> Vec<Trigger> {
    let moved = grid.tile(swap.to);
    let other = grid.tile(swap.from);
    match (moved.and_then(|t| t.special), other.and_then(|t| t.special)) {
        (Some(kind), Some(partner)) => vec![Trigger::Pair {
            origin: swap.to,
            kind,
            partner,
        }],
        (Some(kind), None) => vec![Trigger::Single {
            origin: swap.to,
            kind,
            target: other.map(|t| t.kind),
        }],
        (None, Some(kind)) => vec![Trigger::Single {
            origin: swap.from,
            kind,
            target: moved.map(|t| t.kind),
        }],
        (None, None) => Vec::new(),
    }
}

fn reserve_cell(group: &MatchGroup, swap: Option<SwapContext>) -> Coord {
    if let Some(swap) = swap {
        if group.contains(swap.to) {
            return swap.to;
        }
        if group.contains(swap.from) {
            return swap.from;
        }
    }
    group.pivot
}

/// Resolve a settled-or-not board without a triggering swap
pub fn resolve_from(grid: &mut Grid, bag: &mut TileBag, rules: &SpecialRules) -> CascadeResult {
    resolve_swap(grid, bag, rules, None)
}

/// Resolve the board after `swap` has been applied to it.
///
/// Runs at most `rows * cols` passes.
pub fn resolve_swap(
    grid: &mut Grid,
    bag: &mut TileBag,
    rules: &SpecialRules,
    swap: Option<SwapContext>,
) -> CascadeResult {
    let mut result = CascadeResult::default();
    let cap = grid.len();
    let mut pending = swap.map(|s| swap_triggers(grid, s)).unwrap_or_default();

    loop {
        let groups = scan(grid);
        if groups.is_empty() && pending.is_empty() {
            break;
        }
        if result.steps.len() >= cap {
            warn!(
                "cascade stopped after {} passes with {} groups left",
                cap,
                groups.len()
            );
            break;
        }

        let depth = result.steps.len() as u32 + 1;
        let swap_here = if depth == 1 { swap } else { None };
        let step = run_pass(
            grid,
            bag,
            rules,
            groups,
            std::mem::take(&mut pending),
            swap_here,
            depth,
            &mut result.collected,
        );
        trace!(
            "cascade pass {}: {} groups, {} activations, {} cleared, {} points",
            depth,
            step.groups.len(),
            step.activations.len(),
            step.cleared.len(),
            step.score
        );
        result.total_score = result.total_score.saturating_add(step.score);
        result.max_combo_depth = depth;
        result.steps.push(step);
    }

    result
}

#[allow(clippy::too_many_arguments)]
fn run_pass(
    grid: &mut Grid,
    bag: &mut TileBag,
    rules: &SpecialRules,
    groups: Vec<MatchGroup>,
    triggers: Vec<Trigger>,
    swap: Option<SwapContext>,
    depth: u32,
    collected: &mut [u32; TileKind::COUNT],
) -> CascadeStep {
    let n = grid.len();
    let mut clear = vec![false; n];
    let mut protected = vec![false; n];
    let mut fired = vec![false; n];
    let mut score: u32 = 0;

    // Steps 1-3: score, reserve, mark.
    let mut scored = Vec::with_capacity(groups.len());
    let mut reservations: Vec<(Coord, SpecialKind, TileKind)> = Vec::new();
    for group in groups {
        let points = match_score(group.shape, group.size(), depth);
        score = score.saturating_add(points);
        collected[group.kind.index()] += group.size() as u32;

        let spawned = rules.qualifies(&group);
        if let Some(special) = spawned {
            let at = reserve_cell(&group, swap);
            if let Some(idx) = grid.index_of(at) {
                protected[idx] = true;
            }
            reservations.push((at, special, group.kind));
        }
        for &at in &group.cells {
            if let Some(idx) = grid.index_of(at) {
                if !protected[idx] {
                    clear[idx] = true;
                }
            }
        }
        scored.push(ScoredGroup {
            group,
            score: points,
            depth,
            spawned,
        });
    }

    // Step 4: activations, chaining through caught specials.
    let mut queue: VecDeque<Trigger> = triggers.into_iter().collect();
    for trigger in &queue {
        let origins = match *trigger {
            Trigger::Single { origin, .. } => [Some(origin), None],
            Trigger::Pair { origin, .. } => [Some(origin), swap.map(|s| s.from)],
        };
        for at in origins.into_iter().flatten() {
            if let Some(idx) = grid.index_of(at) {
                fired[idx] = true;
            }
        }
    }

    let mut activations = Vec::new();
    let mut activation_cells = 0usize;
    while let Some(trigger) = queue.pop_front() {
        let (kind, origin, partner, mut cells) = match trigger {
            Trigger::Single {
                origin,
                kind,
                target,
            } => (kind, origin, None, footprint(grid, origin, kind, target)),
            Trigger::Pair {
                origin,
                kind,
                partner,
            } => (
                kind,
                origin,
                Some(partner),
                pair_footprint(grid, origin, combine(kind, partner)),
            ),
        };
        if let (Some(_), Some(swap)) = (partner, swap) {
            if !cells.contains(&swap.from) {
                cells.push(swap.from);
                cells.sort();
            }
        }

        for &at in &cells {
            let Some(idx) = grid.index_of(at) else {
                continue;
            };
            if protected[idx] || clear[idx] {
                continue;
            }
            clear[idx] = true;
            let Some(tile) = grid.tile(at) else {
                continue;
            };
            activation_cells += 1;
            match tile.special {
                None => collected[tile.kind.index()] += 1,
                Some(caught) if !fired[idx] => {
                    fired[idx] = true;
                    queue.push_back(Trigger::Single {
                        origin: at,
                        kind: caught,
                        target: Some(tile.kind),
                    });
                }
                Some(_) => {}
            }
        }

        activations.push(Activation {
            kind,
            origin,
            partner,
            cells,
        });
    }
    score = score.saturating_add(activation_score(activation_cells, depth));

    // Step 5: clear, place, gravity, refill.
    let mut cleared = Vec::new();
    for (idx, marked) in clear.iter().enumerate() {
        if *marked {
            let at = grid.coord_of(idx);
            grid.take(at);
            cleared.push(at);
        }
    }

    let mut created = Vec::with_capacity(reservations.len());
    for (at, special, kind) in reservations {
        let tile = grid.spawn_tile(kind, Some(special));
        grid.set(at, Some(tile));
        created.push((at, tile));
    }

    let after_clear = grid.cells().to_vec();

    grid.apply_gravity();
    let refilled = grid.empty_cells();
    for &at in &refilled {
        let kind = bag.draw();
        let tile = grid.spawn_tile(kind, None);
        grid.set(at, Some(tile));
    }

    CascadeStep {
        depth,
        groups: scored,
        activations,
        created,
        cleared,
        refilled,
        score,
        after_clear,
        settled: grid.cells().to_vec(),
    }
}
