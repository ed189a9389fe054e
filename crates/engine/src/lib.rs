//! Engine module - configuration and the tick loop
//!
//! Ties the core pieces together: an [`EngineConfig`] read at startup, the
//! [`Engine`] loop controller, and the [`Context`] handed to host
//! [`Game`] callbacks.
//!
//! # Tick Order
//!
//! 1. Measure delta time; latch this tick's key
//! 2. Composite the registry into the working grid
//! 3. Flush changed cells to the output surface
//! 4. Dispatch collision enter / stay / exit events
//! 5. Call [`Game::on_update`]
//! 6. Increment the tick counter

pub mod config;
pub mod context;
pub mod engine;
pub mod pacer;

pub use tui_retro_core as core;
pub use tui_retro_types as types;

pub use config::{ConfigError, EngineConfig};
pub use context::{Context, ExitHandle};
pub use engine::{Engine, Game, LoopState};
pub use pacer::FramePacer;
