//! Terminal front-end for the match-3 engine.
//!
//! A small, game-oriented rendering layer: no widget toolkit, just a
//! framebuffer that views draw into and a renderer that flushes it through
//! `crossterm`.
//!
//! - [`fb`]: styled glyph framebuffer
//! - [`game_view`]: board, side panel and overlays from a `SessionSnapshot`
//! - [`renderer`]: diffing terminal writer
//! - [`replay`]: timed playback of recorded cascade passes

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod replay;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{AnchorY, BoardOverlay, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use replay::{CascadeReplay, Flash, ReplayFrame, ReplayPhase};
