//! Typed session events
//!
//! The session pushes events while it works; front-ends drain them with
//! [`LevelSession::take_events`](crate::session::LevelSession::take_events).

use crate::matcher::MatchGroup;
use crate::types::{Coord, LossReason, SpecialKind};

/// Final numbers of a finished level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub score: u32,
    pub moves_used: u32,
    pub moves_remaining: u32,
    pub max_combo_depth: u32,
    pub reshuffles: u32,
    pub episode_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A match was cleared and scored
    MatchResolved { group: MatchGroup, score: u32 },
    /// A cascade pass started at this depth (1 = the swap's own matches)
    ComboChanged { depth: u32 },
    /// A special tile fired; `partner` is set when two specials were swapped together
    SpecialActivated {
        kind: SpecialKind,
        partner: Option<SpecialKind>,
        cells: Vec<Coord>,
    },
    /// The board had no legal move and was reshuffled
    Reshuffled,
    LevelWon(LevelSummary),
    LevelLost(LossReason),
}

impl SessionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEvent::MatchResolved { .. } => "match_resolved",
            SessionEvent::ComboChanged { .. } => "combo_changed",
            SessionEvent::SpecialActivated { .. } => "special_activated",
            SessionEvent::Reshuffled => "reshuffled",
            SessionEvent::LevelWon(_) => "level_won",
            SessionEvent::LevelLost(_) => "level_lost",
        }
    }

    /// Whether this event ends the level
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionEvent::LevelWon(_) | SessionEvent::LevelLost(_))
    }
}
