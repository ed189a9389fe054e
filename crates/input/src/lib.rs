//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of the loop. It maps `crossterm`
//! key events into [`crate::types::Key`] and provides a background listener
//! implementing [`tui_retro_core::InputSource`].

pub mod listener;
pub mod map;

pub use tui_retro_types as types;

pub use listener::{KeyListener, KeySender};
pub use map::{map_key_event, should_quit};
