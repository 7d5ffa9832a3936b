//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing/formatting, making
//! them usable in any context (engine, terminal rendering, level files).
//!
//! # Board Dimensions
//!
//! Boards are `rows x cols`, both in `MIN_DIM..=MAX_DIM`. The default level is
//! 8x8. Coordinates are signed so that callers can describe out-of-bounds
//! positions (e.g. a neighbor of an edge cell) without wrapping.
//!
//! # Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Front-end fixed timestep (~60 FPS) |
//! | `CASCADE_STEP_MS` | 180 | Replay time per cascade pass |
//! | `EXTRA_CELL_SCORE` | 20 | Bonus per matched cell beyond the shape minimum |
//! | `SPECIAL_CELL_SCORE` | 10 | Points per cell cleared by an activation |
//! | `COMBO_MULTIPLIER_CAP` | 8 | Highest combo multiplier |
//! | `RESHUFFLE_RETRY_CAP` | 64 | Reshuffle/generation attempts before giving up |
//! | `BOMB_RADIUS` | 1 | Bomb clears a 3x3 square |
//! | `BOMB_PAIR_RADIUS` | 2 | Two bombs clear a 5x5 square |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Coord, Shape, SpecialKind, TileKind};
//!
//! assert_eq!(TileKind::from_str("red"), Some(TileKind::Red));
//! assert_eq!(TileKind::from_char('B'), Some(TileKind::Blue));
//! assert_eq!(SpecialKind::from_str("bomb"), Some(SpecialKind::Bomb));
//! assert_eq!(Shape::Line5Plus.min_size(), 5);
//!
//! let a = Coord::new(3, 4);
//! assert!(a.is_adjacent(Coord::new(3, 5)));
//! assert!(!a.is_adjacent(Coord::new(4, 5)));
//! ```

use serde::{Deserialize, Serialize};

/// Default board rows
pub const DEFAULT_ROWS: u8 = 8;

/// Default board columns
pub const DEFAULT_COLS: u8 = 8;

/// Smallest board dimension that can hold a run of three
pub const MIN_DIM: u8 = 3;

/// Largest board dimension (coordinates are `i8`)
pub const MAX_DIM: u8 = 16;

/// Shortest run that counts as a match
pub const MIN_RUN: usize = 3;

/// Front-end fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Replay duration of a single cascade pass in the terminal front-end
pub const CASCADE_STEP_MS: u32 = 180;

/// Flash duration for a rejected swap in the terminal front-end
pub const REJECT_FLASH_MS: u32 = 240;

/// Base points per match shape, indexed by [`Shape::index`]
///
/// Order: Line3, Line4, Line5Plus, LShape, TShape
pub const SHAPE_BASE_SCORES: [u32; 5] = [60, 120, 200, 150, 180];

/// Bonus per matched cell beyond the shape's minimum size
pub const EXTRA_CELL_SCORE: u32 = 20;

/// Points per cell cleared by a special tile activation (before multiplier)
pub const SPECIAL_CELL_SCORE: u32 = 10;

/// Combo multiplier ceiling
pub const COMBO_MULTIPLIER_CAP: u32 = 8;

/// Attempts for reshuffle and initial generation before declaring a deadlock
pub const RESHUFFLE_RETRY_CAP: u32 = 64;

/// Bomb blast radius (1 => 3x3)
pub const BOMB_RADIUS: i8 = 1;

/// Bomb+bomb blast radius (2 => 5x5)
pub const BOMB_PAIR_RADIUS: i8 = 2;

/// Half-width of the rocket+bomb band (1 => three rows and three columns)
pub const BAND_HALF_WIDTH: i8 = 1;

/// The matchable flavor of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl TileKind {
    /// Number of tile kinds
    pub const COUNT: usize = 6;

    /// All kinds in index order
    pub const ALL: [TileKind; 6] = [
        TileKind::Red,
        TileKind::Orange,
        TileKind::Yellow,
        TileKind::Green,
        TileKind::Blue,
        TileKind::Purple,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse tile kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(TileKind::Red),
            "orange" | "o" => Some(TileKind::Orange),
            "yellow" | "y" => Some(TileKind::Yellow),
            "green" | "g" => Some(TileKind::Green),
            "blue" | "b" => Some(TileKind::Blue),
            "purple" | "p" => Some(TileKind::Purple),
            _ => None,
        }
    }

    /// Parse the single-letter board notation (`R O Y G B P`, case-insensitive)
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'R' => Some(TileKind::Red),
            'O' => Some(TileKind::Orange),
            'Y' => Some(TileKind::Yellow),
            'G' => Some(TileKind::Green),
            'B' => Some(TileKind::Blue),
            'P' => Some(TileKind::Purple),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            TileKind::Red => 'R',
            TileKind::Orange => 'O',
            TileKind::Yellow => 'Y',
            TileKind::Green => 'G',
            TileKind::Blue => 'B',
            TileKind::Purple => 'P',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Red => "red",
            TileKind::Orange => "orange",
            TileKind::Yellow => "yellow",
            TileKind::Green => "green",
            TileKind::Blue => "blue",
            TileKind::Purple => "purple",
        }
    }
}

/// Special tile variants created by qualifying matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    /// Clears its whole row
    RocketHorizontal,
    /// Clears its whole column
    RocketVertical,
    /// Clears a square around itself
    Bomb,
    /// Clears every tile of one kind
    Rainbow,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 4] = [
        SpecialKind::RocketHorizontal,
        SpecialKind::RocketVertical,
        SpecialKind::Bomb,
        SpecialKind::Rainbow,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_rocket(self) -> bool {
        matches!(
            self,
            SpecialKind::RocketHorizontal | SpecialKind::RocketVertical
        )
    }

    /// Rocket variant that fires along `axis`
    pub fn rocket(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => SpecialKind::RocketHorizontal,
            Axis::Vertical => SpecialKind::RocketVertical,
        }
    }

    /// Parse special kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rocket_horizontal" | "rocket-horizontal" | "hrocket" => {
                Some(SpecialKind::RocketHorizontal)
            }
            "rocket_vertical" | "rocket-vertical" | "vrocket" => Some(SpecialKind::RocketVertical),
            "bomb" => Some(SpecialKind::Bomb),
            "rainbow" => Some(SpecialKind::Rainbow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialKind::RocketHorizontal => "rocket_horizontal",
            SpecialKind::RocketVertical => "rocket_vertical",
            SpecialKind::Bomb => "bomb",
            SpecialKind::Rainbow => "rainbow",
        }
    }
}

/// Set of special kinds enabled for a level (bitmask over [`SpecialKind::index`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<SpecialKind>", into = "Vec<SpecialKind>")]
pub struct SpecialSet(u8);

impl SpecialSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub fn contains(self, kind: SpecialKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    pub fn insert(&mut self, kind: SpecialKind) {
        self.0 |= 1 << kind.index();
    }

    pub fn remove(&mut self, kind: SpecialKind) {
        self.0 &= !(1 << kind.index());
    }

    pub fn with(mut self, kind: SpecialKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = SpecialKind> {
        SpecialKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Default for SpecialSet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<SpecialKind>> for SpecialSet {
    fn from(kinds: Vec<SpecialKind>) -> Self {
        kinds
            .into_iter()
            .fold(SpecialSet::empty(), |set, kind| set.with(kind))
    }
}

impl From<SpecialSet> for Vec<SpecialKind> {
    fn from(set: SpecialSet) -> Self {
        set.iter().collect()
    }
}

/// Stable per-grid tile identity, used by presentation layers to track tiles
/// across swaps, gravity and reshuffles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// A tile occupying a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub special: Option<SpecialKind>,
}

impl Tile {
    pub fn normal(id: TileId, kind: TileKind) -> Self {
        Self {
            id,
            kind,
            special: None,
        }
    }

    pub fn special(id: TileId, kind: TileKind, special: SpecialKind) -> Self {
        Self {
            id,
            kind,
            special: Some(special),
        }
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// Kind used for run detection; specials never match by kind
    pub fn match_kind(&self) -> Option<TileKind> {
        match self.special {
            None => Some(self.kind),
            Some(_) => None,
        }
    }
}

/// Cell on the board (None = empty, Some = tile)
pub type Cell = Option<Tile>;

/// Board coordinate; row 0 is the top row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn offset(self, dr: i8, dc: i8) -> Self {
        Self {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }

    /// Exact 4-neighbor adjacency (diagonals and identity excluded)
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dr = (self.row as i16 - other.row as i16).abs();
        let dc = (self.col as i16 - other.col as i16).abs();
        dr + dc == 1
    }
}

/// Run orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Match shape classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Line3,
    Line4,
    Line5Plus,
    LShape,
    TShape,
}

impl Shape {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Smallest group size this shape can have
    pub fn min_size(self) -> usize {
        match self {
            Shape::Line3 => 3,
            Shape::Line4 => 4,
            Shape::Line5Plus | Shape::LShape | Shape::TShape => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Line3 => "line-3",
            Shape::Line4 => "line-4",
            Shape::Line5Plus => "line-5-plus",
            Shape::LShape => "l-shape",
            Shape::TShape => "t-shape",
        }
    }
}

/// Level session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Idle,
    Active,
    Paused,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Won | SessionStatus::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Active => "active",
            SessionStatus::Paused => "paused",
            SessionStatus::Won => "won",
            SessionStatus::Lost => "lost",
        }
    }
}

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossReason {
    OutOfMoves,
    LevelTimeExpired,
    MoveTimeExpired,
}

impl LossReason {
    pub fn as_str(self) -> &'static str {
        match self {
            LossReason::OutOfMoves => "out_of_moves",
            LossReason::LevelTimeExpired => "level_time_expired",
            LossReason::MoveTimeExpired => "move_time_expired",
        }
    }
}

/// Front-end actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Pick up the tile under the cursor, or swap with the picked tile
    Select,
    /// Drop the current selection
    Cancel,
    Hint,
    Pause,
    Restart,
}

impl GameAction {
    /// Parse action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(GameAction::CursorUp),
            "cursordown" => Some(GameAction::CursorDown),
            "cursorleft" => Some(GameAction::CursorLeft),
            "cursorright" => Some(GameAction::CursorRight),
            "select" => Some(GameAction::Select),
            "cancel" => Some(GameAction::Cancel),
            "hint" => Some(GameAction::Hint),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::CursorUp => "cursorUp",
            GameAction::CursorDown => "cursorDown",
            GameAction::CursorLeft => "cursorLeft",
            GameAction::CursorRight => "cursorRight",
            GameAction::Select => "select",
            GameAction::Cancel => "cancel",
            GameAction::Hint => "hint",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_kind_parsing() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_str(kind.as_str()), Some(kind));
            assert_eq!(TileKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(TileKind::from_char('.'), None);
        assert_eq!(TileKind::from_str("teal"), None);
    }

    #[test]
    fn special_set_membership() {
        let mut set = SpecialSet::empty();
        assert!(set.is_empty());
        set.insert(SpecialKind::Bomb);
        assert!(set.contains(SpecialKind::Bomb));
        assert!(!set.contains(SpecialKind::Rainbow));
        set.remove(SpecialKind::Bomb);
        assert!(set.is_empty());
        assert_eq!(SpecialSet::all().iter().count(), 4);
    }

    #[test]
    fn specials_never_match_by_kind() {
        let tile = Tile::special(TileId(1), TileKind::Red, SpecialKind::Bomb);
        assert_eq!(tile.match_kind(), None);
        assert_eq!(Tile::normal(TileId(2), TileKind::Red).match_kind(), Some(TileKind::Red));
    }

    #[test]
    fn adjacency_is_exact() {
        let c = Coord::new(0, 0);
        assert!(c.is_adjacent(Coord::new(1, 0)));
        assert!(c.is_adjacent(Coord::new(0, 1)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(1, 1)));
        assert!(!c.is_adjacent(Coord::new(0, 2)));
    }

    #[test]
    fn shape_table_matches_indices() {
        assert_eq!(SHAPE_BASE_SCORES.len(), 5);
        assert_eq!(SHAPE_BASE_SCORES[Shape::Line3.index()], 60);
        assert_eq!(SHAPE_BASE_SCORES[Shape::TShape.index()], 180);
    }
}
