//! TUI Retro (workspace facade crate).
//!
//! A real-time character-grid game loop. The implementation lives in
//! dedicated crates under `crates/`; this package re-exports them as
//! `tui_retro::{core,engine,input,term,types}`.

pub use tui_retro_core as core;
pub use tui_retro_engine as engine;
pub use tui_retro_input as input;
pub use tui_retro_term as term;
pub use tui_retro_types as types;
