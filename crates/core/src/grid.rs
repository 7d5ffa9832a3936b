//! Grid module - the tile board
//!
//! A fixed `rows x cols` board where each cell is empty or holds a [`Tile`].
//! Uses a flat row-major vector for cache locality; dimensions are fixed at
//! construction and never change.
//! Coordinates: (row, col) with row 0 at the top. Gravity pulls toward the
//! bottom row.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Cell, Coord, SpecialKind, Tile, TileId, TileKind, MAX_DIM};

/// Error from the unconditional grid primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds,
}

impl GridError {
    pub fn code(self) -> &'static str {
        match self {
            GridError::OutOfBounds => "out_of_bounds",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            GridError::OutOfBounds => "coordinate is outside the board",
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for GridError {}

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
    /// Next tile id handed out by [`Grid::spawn_tile`]
    next_id: u32,
}

impl Grid {
    /// Create an empty board. Dimensions are clamped to `1..=MAX_DIM`.
    pub fn new(rows: u8, cols: u8) -> Self {
        let rows = rows.clamp(1, MAX_DIM);
        let cols = cols.clamp(1, MAX_DIM);
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
            next_id: 0,
        }
    }

    /// Build a board of normal tiles from rows of kind letters.
    ///
    /// Letters follow [`TileKind::from_char`]; any other character is an
    /// empty cell. Short rows are padded with empty cells.
    ///
    /// ```
    /// use tui_match3_core::Grid;
    /// use tui_match3_core::types::{Coord, TileKind};
    ///
    /// let grid = Grid::from_ascii(&["RGB", "R.B", "YYB"]);
    /// assert_eq!(grid.rows(), 3);
    /// assert_eq!(grid.kind_at(Coord::new(0, 1)), Some(TileKind::Green));
    /// assert!(grid.get(Coord::new(1, 1)).unwrap().is_none());
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u8;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u8;
        let mut grid = Grid::new(height, width);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if let Some(kind) = TileKind::from_char(ch) {
                    let tile = grid.spawn_tile(kind, None);
                    grid.set(Coord::new(r as i8, c as i8), Some(tile));
                }
            }
        }
        grid
    }

    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.in_bounds(at) {
            return None;
        }
        Some(at.row as usize * self.cols as usize + at.col as usize)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.row >= 0 && at.col >= 0 && (at.row as u8) < self.rows && (at.col as u8) < self.cols
    }

    /// Get cell at `at`; `None` if out of bounds
    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// Tile at `at`, flattening empty and out-of-bounds to `None`
    pub fn tile(&self, at: Coord) -> Option<Tile> {
        self.get(at).flatten()
    }

    /// Kind of the tile at `at`, regardless of specialness
    pub fn kind_at(&self, at: Coord) -> Option<TileKind> {
        self.tile(at).map(|t| t.kind)
    }

    /// Kind used for run detection (normal tiles only)
    pub fn match_kind_at(&self, at: Coord) -> Option<TileKind> {
        self.tile(at).and_then(|t| t.match_kind())
    }

    /// Set cell at `at`; returns false if out of bounds
    pub fn set(&mut self, at: Coord, cell: Cell) -> bool {
        match self.index(at) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Take the tile out of a cell, leaving it empty
    pub fn take(&mut self, at: Coord) -> Cell {
        self.index(at).and_then(|i| self.cells[i].take())
    }

    /// Allocate a fresh tile identity (the tile is not placed)
    pub fn spawn_tile(&mut self, kind: TileKind, special: Option<SpecialKind>) -> Tile {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Tile { id, kind, special }
    }

    /// In-bounds orthogonal neighbors in up, down, left, right order
    pub fn neighbors4(&self, at: Coord) -> ArrayVec<Coord, 4> {
        let mut out = ArrayVec::new();
        if !self.in_bounds(at) {
            return out;
        }
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let n = at.offset(dr, dc);
            if self.in_bounds(n) {
                out.push(n);
            }
        }
        out
    }

    /// Both in bounds and exactly one orthogonal step apart
    pub fn is_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.in_bounds(a) && self.in_bounds(b) && a.is_adjacent(b)
    }

    /// Swap two cells unconditionally. Swap is its own inverse.
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), GridError> {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return Err(GridError::OutOfBounds);
        };
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Let tiles fall toward the bottom row, column by column.
    ///
    /// Relative order inside a column is preserved. Returns how many tiles
    /// moved. Two-pointer compaction, no allocation.
    pub fn apply_gravity(&mut self) -> usize {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut moved = 0;
        for c in 0..cols {
            let mut write = rows;
            for read in (0..rows).rev() {
                let src = read * cols + c;
                if self.cells[src].is_some() {
                    write -= 1;
                    if write != read {
                        let dst = write * cols + c;
                        self.cells[dst] = self.cells[src].take();
                        moved += 1;
                    }
                }
            }
        }
        moved
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.coords().filter(|&at| matches!(self.get(at), Some(None))).collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let rows = self.rows as i8;
        let cols = self.cols as i8;
        (0..rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
    }

    /// Coordinate for a flat index
    pub fn coord_of(&self, index: usize) -> Coord {
        let cols = self.cols as usize;
        Coord::new((index / cols) as i8, (index % cols) as i8)
    }

    /// Flat index for an in-bounds coordinate
    pub fn index_of(&self, at: Coord) -> Option<usize> {
        self.index(at)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Count of tiles of `kind` (specials included)
    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|t| t.kind == kind)
            .count()
    }

    /// Render kinds as letters, one string per row (`.` empty, `*` special)
    pub fn to_ascii(&self) -> Vec<String> {
        (0..self.rows as i8)
            .map(|r| {
                (0..self.cols as i8)
                    .map(|c| match self.tile(Coord::new(r, c)) {
                        None => '.',
                        Some(t) if t.is_special() => '*',
                        Some(t) => t.kind.as_char(),
                    })
                    .collect()
            })
            .collect()
    }
}
