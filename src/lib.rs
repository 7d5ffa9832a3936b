//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_match3::{core,input,term,types}` so
//! the binary, integration tests and benchmarks share one import path.

pub use tui_match3_core as core;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
