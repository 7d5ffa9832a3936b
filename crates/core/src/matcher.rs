//! Matcher module - run detection and shape classification
//!
//! A *run* is a maximal horizontal or vertical sequence of normal tiles of the
//! same kind. Runs of three or more are matches. Horizontal and vertical runs
//! that share a cell are merged into one group, so a scan's groups always
//! partition the matched cells.
//!
//! Classification of a merged component:
//!
//! - any run of five or more: `Line5Plus`
//! - a lone run: `Line3` / `Line4`
//! - crossing runs: `LShape` when every crossing is a corner (an endpoint of
//!   both runs), `TShape` otherwise

use crate::grid::Grid;
use crate::types::{Axis, Coord, Shape, TileKind, MIN_RUN};

/// A classified match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    /// Member cells in row-major order, no duplicates
    pub cells: Vec<Coord>,
    pub shape: Shape,
    pub kind: TileKind,
    /// Axis of the longest run in the group
    pub axis: Axis,
    /// Crossing cell for merged groups, middle cell for lines
    pub pivot: Coord,
}

impl MatchGroup {
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells.binary_search(&at).is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    axis: Axis,
    start: Coord,
    len: usize,
    kind: TileKind,
}

impl Run {
    fn cell(&self, i: usize) -> Coord {
        match self.axis {
            Axis::Horizontal => self.start.offset(0, i as i8),
            Axis::Vertical => self.start.offset(i as i8, 0),
        }
    }

    fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.len).map(move |i| self.cell(i))
    }

    fn is_endpoint(&self, at: Coord) -> bool {
        at == self.start || at == self.cell(self.len - 1)
    }

    fn middle(&self) -> Coord {
        self.cell(self.len / 2)
    }
}

/// Collect every run of `MIN_RUN` or more along `axis`
fn runs_along(grid: &Grid, axis: Axis, out: &mut Vec<Run>) {
    let (lines, span) = match axis {
        Axis::Horizontal => (grid.rows() as i8, grid.cols() as i8),
        Axis::Vertical => (grid.cols() as i8, grid.rows() as i8),
    };
    let at = |line: i8, pos: i8| match axis {
        Axis::Horizontal => Coord::new(line, pos),
        Axis::Vertical => Coord::new(pos, line),
    };

    for line in 0..lines {
        let mut pos = 0;
        while pos < span {
            let start = at(line, pos);
            let Some(kind) = grid.match_kind_at(start) else {
                pos += 1;
                continue;
            };
            let mut end = pos + 1;
            while end < span && grid.match_kind_at(at(line, end)) == Some(kind) {
                end += 1;
            }
            let len = (end - pos) as usize;
            if len >= MIN_RUN {
                out.push(Run {
                    axis,
                    start,
                    len,
                    kind,
                });
            }
            pos = end;
        }
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[rb.max(ra)] = rb.min(ra);
    }
}

/// Scan the whole board for matches.
///
/// Groups are pairwise disjoint, each of size ≥3, sorted by first cell.
pub fn scan(grid: &Grid) -> Vec<MatchGroup> {
    let mut runs = Vec::new();
    runs_along(grid, Axis::Horizontal, &mut runs);
    runs_along(grid, Axis::Vertical, &mut runs);
    if runs.is_empty() {
        return Vec::new();
    }

    // Each cell belongs to at most one run per axis.
    const NONE: usize = usize::MAX;
    let mut h_of = vec![NONE; grid.len()];
    let mut v_of = vec![NONE; grid.len()];
    for (i, run) in runs.iter().enumerate() {
        let slot = match run.axis {
            Axis::Horizontal => &mut h_of,
            Axis::Vertical => &mut v_of,
        };
        for at in run.cells() {
            if let Some(idx) = grid.index_of(at) {
                slot[idx] = i;
            }
        }
    }

    let mut parent: Vec<usize> = (0..runs.len()).collect();
    let mut crossings = Vec::new();
    for idx in 0..grid.len() {
        if h_of[idx] != NONE && v_of[idx] != NONE {
            union(&mut parent, h_of[idx], v_of[idx]);
            crossings.push(idx);
        }
    }

    let mut components: Vec<Vec<usize>> = vec![Vec::new(); runs.len()];
    for i in 0..runs.len() {
        let root = find(&mut parent, i);
        components[root].push(i);
    }

    let mut groups: Vec<MatchGroup> = components
        .into_iter()
        .filter(|members| !members.is_empty())
        .map(|members| {
            let member_crossings: Vec<usize> = crossings
                .iter()
                .copied()
                .filter(|&idx| members.contains(&h_of[idx]))
                .collect();
            classify(grid, &runs, &members, &member_crossings, &h_of, &v_of)
        })
        .collect();

    groups.sort_by_key(|g| g.cells[0]);
    groups
}

fn classify(
    grid: &Grid,
    runs: &[Run],
    members: &[usize],
    crossings: &[usize],
    h_of: &[usize],
    v_of: &[usize],
) -> MatchGroup {
    let mut longest = runs[members[0]];
    for &i in &members[1..] {
        if runs[i].len > longest.len {
            longest = runs[i];
        }
    }

    let mut cells: Vec<Coord> = members.iter().flat_map(|&i| runs[i].cells()).collect();
    cells.sort();
    cells.dedup();

    let (shape, pivot) = if members.len() == 1 {
        let shape = match longest.len {
            3 => Shape::Line3,
            4 => Shape::Line4,
            _ => Shape::Line5Plus,
        };
        (shape, longest.middle())
    } else {
        let pivot = grid.coord_of(crossings[0]);
        let shape = if longest.len >= 5 {
            Shape::Line5Plus
        } else {
            let all_corners = crossings.iter().all(|&idx| {
                let at = grid.coord_of(idx);
                runs[h_of[idx]].is_endpoint(at) && runs[v_of[idx]].is_endpoint(at)
            });
            if all_corners {
                Shape::LShape
            } else {
                Shape::TShape
            }
        };
        (shape, pivot)
    };

    MatchGroup {
        cells,
        shape,
        kind: longest.kind,
        axis: longest.axis,
        pivot,
    }
}

/// Length of the same-kind run through `at` along `axis` (0 for specials/empty)
pub fn run_length_at(grid: &Grid, at: Coord, axis: Axis) -> usize {
    let Some(kind) = grid.match_kind_at(at) else {
        return 0;
    };
    let (dr, dc) = match axis {
        Axis::Horizontal => (0, 1),
        Axis::Vertical => (1, 0),
    };
    let mut len = 1;
    let mut p = at.offset(-dr, -dc);
    while grid.match_kind_at(p) == Some(kind) {
        len += 1;
        p = p.offset(-dr, -dc);
    }
    let mut p = at.offset(dr, dc);
    while grid.match_kind_at(p) == Some(kind) {
        len += 1;
        p = p.offset(dr, dc);
    }
    len
}

/// Cheap probe: does the tile at `at` take part in any match?
pub fn scan_at(grid: &Grid, at: Coord) -> bool {
    run_length_at(grid, at, Axis::Horizontal) >= MIN_RUN
        || run_length_at(grid, at, Axis::Vertical) >= MIN_RUN
}
