//! Special tile rules - creation and activation footprints
//!
//! Creation (per match shape, filtered by the level's enabled set):
//!
//! | Shape | Special |
//! |-------|---------|
//! | Line4 | Rocket along the run axis |
//! | Line5Plus | Rainbow |
//! | LShape / TShape | Bomb |
//!
//! Activation clears a footprint that always includes the special itself:
//! rockets clear their row or column, a bomb clears a square of radius
//! `BOMB_RADIUS`, a rainbow clears every tile of its target kind.
//!
//! Two specials swapped into each other resolve through [`combine`], a
//! symmetric pairwise lookup into a [`PairEffect`].

use crate::grid::Grid;
use crate::matcher::MatchGroup;
use crate::types::{
    Coord, Shape, SpecialKind, SpecialSet, TileKind, BAND_HALF_WIDTH, BOMB_PAIR_RADIUS,
    BOMB_RADIUS,
};

/// What two specials do when combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEffect {
    /// Full row and full column through the origin
    Cross,
    /// Three full rows and three full columns centered on the origin
    Band,
    /// Square of radius `BOMB_PAIR_RADIUS`
    LargeBlast,
    /// Every cell on the board
    WholeBoard,
}

/// Pairwise lookup; order of the arguments does not matter
pub fn combine(a: SpecialKind, b: SpecialKind) -> PairEffect {
    use SpecialKind::*;
    match (a, b) {
        (Rainbow, _) | (_, Rainbow) => PairEffect::WholeBoard,
        (Bomb, Bomb) => PairEffect::LargeBlast,
        (Bomb, RocketHorizontal | RocketVertical) | (RocketHorizontal | RocketVertical, Bomb) => {
            PairEffect::Band
        }
        (RocketHorizontal | RocketVertical, RocketHorizontal | RocketVertical) => PairEffect::Cross,
    }
}

/// Level-scoped special tile rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRules {
    enabled: SpecialSet,
}

impl SpecialRules {
    pub fn new(enabled: SpecialSet) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> SpecialSet {
        self.enabled
    }

    /// Special tile a match creates, if any
    pub fn qualifies(&self, group: &MatchGroup) -> Option<SpecialKind> {
        let kind = match group.shape {
            Shape::Line3 => return None,
            Shape::Line4 => SpecialKind::rocket(group.axis),
            Shape::Line5Plus => SpecialKind::Rainbow,
            Shape::LShape | Shape::TShape => SpecialKind::Bomb,
        };
        self.enabled.contains(kind).then_some(kind)
    }
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self::new(SpecialSet::all())
    }
}

fn square(grid: &Grid, origin: Coord, radius: i8, out: &mut Vec<Coord>) {
    for dr in -radius..=radius {
        for dc in -radius..=radius {
            let at = origin.offset(dr, dc);
            if grid.in_bounds(at) {
                out.push(at);
            }
        }
    }
}

fn row(grid: &Grid, r: i8, out: &mut Vec<Coord>) {
    if r < 0 || r as u8 >= grid.rows() {
        return;
    }
    out.extend((0..grid.cols() as i8).map(|c| Coord::new(r, c)));
}

fn col(grid: &Grid, c: i8, out: &mut Vec<Coord>) {
    if c < 0 || c as u8 >= grid.cols() {
        return;
    }
    out.extend((0..grid.rows() as i8).map(|r| Coord::new(r, c)));
}

fn finish(mut cells: Vec<Coord>) -> Vec<Coord> {
    cells.sort();
    cells.dedup();
    cells
}

/// Cells a single special at `origin` clears.
///
/// `target` is the kind a rainbow clears; a rainbow without a target clears
/// only itself.
pub fn footprint(
    grid: &Grid,
    origin: Coord,
    kind: SpecialKind,
    target: Option<TileKind>,
) -> Vec<Coord> {
    if !grid.in_bounds(origin) {
        return Vec::new();
    }
    let mut cells = vec![origin];
    match kind {
        SpecialKind::RocketHorizontal => row(grid, origin.row, &mut cells),
        SpecialKind::RocketVertical => col(grid, origin.col, &mut cells),
        SpecialKind::Bomb => square(grid, origin, BOMB_RADIUS, &mut cells),
        SpecialKind::Rainbow => {
            if let Some(target) = target {
                cells.extend(grid.coords().filter(|&at| grid.kind_at(at) == Some(target)));
            }
        }
    }
    finish(cells)
}

/// Cells a combined pair clears around `origin`
pub fn pair_footprint(grid: &Grid, origin: Coord, effect: PairEffect) -> Vec<Coord> {
    if !grid.in_bounds(origin) {
        return Vec::new();
    }
    let mut cells = Vec::new();
    match effect {
        PairEffect::Cross => {
            row(grid, origin.row, &mut cells);
            col(grid, origin.col, &mut cells);
        }
        PairEffect::Band => {
            for d in -BAND_HALF_WIDTH..=BAND_HALF_WIDTH {
                row(grid, origin.row + d, &mut cells);
                col(grid, origin.col + d, &mut cells);
            }
        }
        PairEffect::LargeBlast => square(grid, origin, BOMB_PAIR_RADIUS, &mut cells),
        PairEffect::WholeBoard => cells.extend(grid.coords()),
    }
    finish(cells)
}

/// Activate a special in place: clear its footprint and return it
pub fn activate(
    grid: &mut Grid,
    origin: Coord,
    kind: SpecialKind,
    target: Option<TileKind>,
) -> Vec<Coord> {
    let cells = footprint(grid, origin, kind, target);
    for &at in &cells {
        grid.set(at, None);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Axis;

    fn full_board() -> Grid {
        Grid::from_ascii(&[
            "RGBYRGBY", "GBYRGBYR", "BYRGBYRG", "YRGBYRGB", "RGBYRGBY", "GBYRGBYR", "BYRGBYRG",
            "YRGBYRGB",
        ])
    }

    fn group(shape: Shape, axis: Axis) -> MatchGroup {
        MatchGroup {
            cells: vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)],
            shape,
            kind: TileKind::Red,
            axis,
            pivot: Coord::new(0, 1),
        }
    }

    #[test]
    fn test_qualifies_by_shape() {
        let rules = SpecialRules::default();
        assert_eq!(rules.qualifies(&group(Shape::Line3, Axis::Horizontal)), None);
        assert_eq!(
            rules.qualifies(&group(Shape::Line4, Axis::Horizontal)),
            Some(SpecialKind::RocketHorizontal)
        );
        assert_eq!(
            rules.qualifies(&group(Shape::Line4, Axis::Vertical)),
            Some(SpecialKind::RocketVertical)
        );
        assert_eq!(
            rules.qualifies(&group(Shape::Line5Plus, Axis::Vertical)),
            Some(SpecialKind::Rainbow)
        );
        assert_eq!(
            rules.qualifies(&group(Shape::LShape, Axis::Vertical)),
            Some(SpecialKind::Bomb)
        );
        assert_eq!(
            rules.qualifies(&group(Shape::TShape, Axis::Vertical)),
            Some(SpecialKind::Bomb)
        );
    }

    #[test]
    fn test_disabled_specials_never_qualify() {
        let rules = SpecialRules::new(SpecialSet::empty().with(SpecialKind::Bomb));
        assert_eq!(rules.qualifies(&group(Shape::Line5Plus, Axis::Vertical)), None);
        assert_eq!(
            rules.qualifies(&group(Shape::TShape, Axis::Vertical)),
            Some(SpecialKind::Bomb)
        );
    }

    #[test]
    fn test_bomb_center_and_corner() {
        let grid = full_board();
        let cells = footprint(&grid, Coord::new(4, 4), SpecialKind::Bomb, None);
        assert_eq!(cells.len(), 9);
        assert!(cells
            .iter()
            .all(|c| (3..=5).contains(&c.row) && (3..=5).contains(&c.col)));

        let corner = footprint(&grid, Coord::new(0, 0), SpecialKind::Bomb, None);
        assert_eq!(corner.len(), 4);
    }

    #[test]
    fn test_rockets() {
        let grid = full_board();
        let h = footprint(&grid, Coord::new(2, 5), SpecialKind::RocketHorizontal, None);
        assert_eq!(h.len(), 8);
        assert!(h.iter().all(|c| c.row == 2));
        let v = footprint(&grid, Coord::new(2, 5), SpecialKind::RocketVertical, None);
        assert_eq!(v.len(), 8);
        assert!(v.iter().all(|c| c.col == 5));
    }

    #[test]
    fn test_rainbow_targets_kind() {
        let grid = full_board();
        let origin = Coord::new(0, 0);
        let cells = footprint(&grid, origin, SpecialKind::Rainbow, Some(TileKind::Blue));
        assert_eq!(cells.len(), 16 + 1);
        assert!(cells.contains(&origin));
        let alone = footprint(&grid, origin, SpecialKind::Rainbow, None);
        assert_eq!(alone, vec![origin]);
    }

    #[test]
    fn test_combine_is_symmetric() {
        for a in SpecialKind::ALL {
            for b in SpecialKind::ALL {
                assert_eq!(combine(a, b), combine(b, a));
            }
        }
        assert_eq!(
            combine(SpecialKind::RocketHorizontal, SpecialKind::RocketVertical),
            PairEffect::Cross
        );
        assert_eq!(combine(SpecialKind::Bomb, SpecialKind::RocketVertical), PairEffect::Band);
        assert_eq!(combine(SpecialKind::Bomb, SpecialKind::Bomb), PairEffect::LargeBlast);
        assert_eq!(combine(SpecialKind::Rainbow, SpecialKind::Bomb), PairEffect::WholeBoard);
    }

    #[test]
    fn test_pair_footprints() {
        let grid = full_board();
        let origin = Coord::new(4, 4);
        assert_eq!(pair_footprint(&grid, origin, PairEffect::Cross).len(), 15);
        assert_eq!(pair_footprint(&grid, origin, PairEffect::Band).len(), 64 - 25);
        assert_eq!(pair_footprint(&grid, origin, PairEffect::LargeBlast).len(), 25);
        assert_eq!(pair_footprint(&grid, origin, PairEffect::WholeBoard).len(), 64);
    }

    #[test]
    fn test_activate_clears() {
        let mut grid = full_board();
        let cleared = activate(&mut grid, Coord::new(4, 4), SpecialKind::Bomb, None);
        assert_eq!(cleared.len(), 9);
        assert_eq!(grid.count_empty(), 9);
    }
}
