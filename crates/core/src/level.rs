//! Level configuration and objectives
//!
//! A [`LevelConfig`] is plain data (serde-friendly, so front-ends can load it
//! from JSON). It is validated once when a session is created; a session never
//! sees a malformed config during play.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{SpecialSet, TileKind, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIM, MIN_DIM};

/// "Collect `required` tiles of `kind`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub kind: TileKind,
    /// Signed so that non-positive counts reach validation instead of failing to parse
    pub required: i32,
}

/// Objective progress during play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objective {
    pub kind: TileKind,
    pub required: u32,
    pub current: u32,
}

impl Objective {
    pub fn new(kind: TileKind, required: u32) -> Self {
        Self {
            kind,
            required,
            current: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.required
    }

    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.current)
    }

    pub fn add(&mut self, count: u32) {
        self.current = self.current.saturating_add(count);
    }
}

/// Everything needed to start a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub rows: u8,
    pub cols: u8,
    /// Move budget
    pub moves: u32,
    /// Level-wide time budget; `None` disables the timer
    pub time_limit_ms: Option<u32>,
    /// Time allowed between committed swaps; `None` disables the timer
    pub move_time_limit_ms: Option<u32>,
    pub objectives: Vec<ObjectiveSpec>,
    /// Tile kinds that appear on the board
    pub kinds: Vec<TileKind>,
    /// Special tiles matches may create
    pub specials: SpecialSet,
    /// Fixed seed for reproducible boards
    pub seed: Option<u32>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            moves: 25,
            time_limit_ms: None,
            move_time_limit_ms: None,
            objectives: vec![
                ObjectiveSpec {
                    kind: TileKind::Red,
                    required: 20,
                },
                ObjectiveSpec {
                    kind: TileKind::Blue,
                    required: 20,
                },
            ],
            kinds: TileKind::ALL.to_vec(),
            specials: SpecialSet::all(),
            seed: None,
        }
    }
}

impl LevelConfig {
    /// Board of the given size with no objectives yet
    pub fn new(rows: u8, cols: u8, moves: u32) -> Self {
        Self {
            rows,
            cols,
            moves,
            objectives: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_objective(mut self, kind: TileKind, required: i32) -> Self {
        self.objectives.push(ObjectiveSpec { kind, required });
        self
    }

    pub fn with_kinds(mut self, kinds: &[TileKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn with_specials(mut self, specials: SpecialSet) -> Self {
        self.specials = specials;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u32) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_move_time_limit_ms(mut self, ms: u32) -> Self {
        self.move_time_limit_ms = Some(ms);
        self
    }

    /// Reject configs that could never be played correctly
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = MIN_DIM..=MAX_DIM;
        if !dims.contains(&self.rows) || !dims.contains(&self.cols) {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }

        for (i, kind) in self.kinds.iter().enumerate() {
            if self.kinds[..i].contains(kind) {
                return Err(ConfigError::DuplicateKind(*kind));
            }
        }
        if self.kinds.len() < 2 {
            return Err(ConfigError::TooFewKinds(self.kinds.len()));
        }

        if self.moves == 0 {
            return Err(ConfigError::ZeroMoves);
        }
        if self.time_limit_ms == Some(0) || self.move_time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }

        if self.objectives.is_empty() {
            return Err(ConfigError::NoObjectives);
        }
        for (i, objective) in self.objectives.iter().enumerate() {
            if objective.required <= 0 {
                return Err(ConfigError::ObjectiveCountNotPositive {
                    kind: objective.kind,
                    required: objective.required,
                });
            }
            if !self.kinds.contains(&objective.kind) {
                return Err(ConfigError::ObjectiveKindNotEnabled(objective.kind));
            }
            if self.objectives[..i].iter().any(|o| o.kind == objective.kind) {
                return Err(ConfigError::DuplicateObjective(objective.kind));
            }
        }
        Ok(())
    }

    /// Fresh objective trackers (call after `validate`)
    pub fn objectives(&self) -> Vec<Objective> {
        self.objectives
            .iter()
            .map(|o| Objective::new(o.kind, o.required.max(0) as u32))
            .collect()
    }
}

/// Malformed level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDimensions { rows: u8, cols: u8 },
    TooFewKinds(usize),
    DuplicateKind(TileKind),
    ZeroMoves,
    ZeroTimeLimit,
    NoObjectives,
    ObjectiveCountNotPositive { kind: TileKind, required: i32 },
    ObjectiveKindNotEnabled(TileKind),
    DuplicateObjective(TileKind),
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        match self {
            ConfigError::InvalidDimensions { .. } => "invalid_dimensions",
            ConfigError::TooFewKinds(_) => "too_few_kinds",
            ConfigError::DuplicateKind(_) => "duplicate_kind",
            ConfigError::ZeroMoves => "zero_moves",
            ConfigError::ZeroTimeLimit => "zero_time_limit",
            ConfigError::NoObjectives => "no_objectives",
            ConfigError::ObjectiveCountNotPositive { .. } => "objective_count_not_positive",
            ConfigError::ObjectiveKindNotEnabled(_) => "objective_kind_not_enabled",
            ConfigError::DuplicateObjective(_) => "duplicate_objective",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimensions { rows, cols } => write!(
                f,
                "board {}x{} is outside {}..={} per side",
                rows, cols, MIN_DIM, MAX_DIM
            ),
            ConfigError::TooFewKinds(n) => write!(f, "need at least 2 tile kinds, got {}", n),
            ConfigError::DuplicateKind(kind) => {
                write!(f, "tile kind {} listed twice", kind.as_str())
            }
            ConfigError::ZeroMoves => f.write_str("move budget must be positive"),
            ConfigError::ZeroTimeLimit => f.write_str("time limits must be positive when set"),
            ConfigError::NoObjectives => f.write_str("level has no objectives"),
            ConfigError::ObjectiveCountNotPositive { kind, required } => write!(
                f,
                "objective for {} requires {} tiles; must be positive",
                kind.as_str(),
                required
            ),
            ConfigError::ObjectiveKindNotEnabled(kind) => write!(
                f,
                "objective kind {} is not enabled on this level",
                kind.as_str()
            ),
            ConfigError::DuplicateObjective(kind) => {
                write!(f, "more than one objective for {}", kind.as_str())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(LevelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let cfg = LevelConfig::new(2, 8, 10).with_objective(TileKind::Red, 5);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidDimensions { rows: 2, cols: 8 })
        );
        let cfg = LevelConfig::new(8, 17, 10).with_objective(TileKind::Red, 5);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_rejects_objective_problems() {
        let base = LevelConfig::new(8, 8, 10).with_kinds(&[
            TileKind::Red,
            TileKind::Blue,
            TileKind::Green,
        ]);

        assert_eq!(base.clone().validate(), Err(ConfigError::NoObjectives));
        assert_eq!(
            base.clone().with_objective(TileKind::Red, 0).validate(),
            Err(ConfigError::ObjectiveCountNotPositive {
                kind: TileKind::Red,
                required: 0
            })
        );
        assert_eq!(
            base.clone().with_objective(TileKind::Red, -3).validate().map_err(|e| e.code()),
            Err("objective_count_not_positive")
        );
        assert_eq!(
            base.clone().with_objective(TileKind::Purple, 3).validate(),
            Err(ConfigError::ObjectiveKindNotEnabled(TileKind::Purple))
        );
        assert_eq!(
            base.clone()
                .with_objective(TileKind::Red, 3)
                .with_objective(TileKind::Red, 4)
                .validate(),
            Err(ConfigError::DuplicateObjective(TileKind::Red))
        );
    }

    #[test]
    fn test_rejects_palette_and_budget() {
        let one = LevelConfig::new(8, 8, 10)
            .with_kinds(&[TileKind::Red])
            .with_objective(TileKind::Red, 3);
        assert_eq!(one.validate(), Err(ConfigError::TooFewKinds(1)));

        let dup = LevelConfig::new(8, 8, 10)
            .with_kinds(&[TileKind::Red, TileKind::Red])
            .with_objective(TileKind::Red, 3);
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateKind(TileKind::Red)));

        let no_moves = LevelConfig::new(8, 8, 0).with_objective(TileKind::Red, 3);
        assert_eq!(no_moves.validate(), Err(ConfigError::ZeroMoves));

        let zero_timer = LevelConfig::new(8, 8, 5)
            .with_objective(TileKind::Red, 3)
            .with_time_limit_ms(0);
        assert_eq!(zero_timer.validate(), Err(ConfigError::ZeroTimeLimit));
    }

    #[test]
    fn test_objective_progress() {
        let mut o = Objective::new(TileKind::Green, 5);
        assert!(!o.is_complete());
        o.add(3);
        assert_eq!(o.remaining(), 2);
        o.add(4);
        assert!(o.is_complete());
        assert_eq!(o.remaining(), 0);
        assert_eq!(o.current, 7);
    }

    #[test]
    fn test_json_round_trip_fields() {
        let json = r#"{
            "rows": 7,
            "cols": 9,
            "moves": 15,
            "time_limit_ms": 60000,
            "objectives": [{"kind": "green", "required": 12}],
            "kinds": ["red", "green", "blue", "yellow"],
            "specials": ["bomb", "rocket_vertical"],
            "seed": 77
        }"#;
        let cfg: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.rows, 7);
        assert_eq!(cfg.cols, 9);
        assert_eq!(cfg.time_limit_ms, Some(60000));
        assert_eq!(cfg.move_time_limit_ms, None);
        assert_eq!(cfg.kinds.len(), 4);
        assert!(cfg.specials.contains(crate::types::SpecialKind::Bomb));
        assert!(!cfg.specials.contains(crate::types::SpecialKind::Rainbow));
        assert_eq!(cfg.seed, Some(77));
        assert_eq!(cfg.validate(), Ok(()));
    }
}
