//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::GameAction`] and turns cursor/select actions
//! into swap requests for the engine.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::{BoardCursor, CursorOutcome};
pub use map::{handle_key_event, should_quit};
