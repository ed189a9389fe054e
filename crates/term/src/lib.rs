//! Terminal output module.
//!
//! A crossterm-backed [`tui_retro_core::OutputSurface`]. The engine decides
//! which cells changed; this crate only turns those writes into terminal
//! commands and pushes them once per tick.
//!
//! Cells are assumed to be single-column characters. Square mode prints each
//! cell twice to compensate for tall terminal fonts.

pub mod renderer;

pub use tui_retro_core as core;
pub use tui_retro_types as types;

pub use renderer::TerminalSurface;
