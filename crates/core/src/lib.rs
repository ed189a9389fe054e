//! Core engine module - entity registry, compositing and diff rendering
//!
//! This module contains everything with real algorithmic content: the
//! entity lifecycle, the per-tick composite, and the double-buffered diff that
//! keeps output writes proportional to what changed. Terminal I/O and keyboard
//! polling live in sibling crates and are reached only through the
//! [`OutputSurface`] and [`InputSource`] traits.
//!
//! # Module Structure
//!
//! - [`sprite`]: character grids with an optional collision mask
//! - [`transform`]: position and z-index
//! - [`entity`]: templates and live entities, identifiers, collision capability
//! - [`registry`]: append-only slot store with immediate and delayed destruction
//! - [`grid`]: fixed-size working and flushed buffers
//! - [`compositor`]: paints entities into the working grid, blanking vacated cells
//! - [`overlay`]: direct cell and text writes from host code
//! - [`diff`]: sends changed cells to the output surface
//! - [`renderer`]: composite + flush in one step
//! - [`clock`]: tick counter, delta time and throughput
//! - [`collision`]: overlap bookkeeping (enter / stay / exit)
//!
//! # Example
//!
//! ```
//! use tui_retro_core::{Entity, FrameRenderer, RecordingSurface, Registry, Sprite};
//! use tui_retro_types::{DrawOrder, Vector2};
//!
//! let registry = Registry::new();
//! let template = Entity::new(Sprite::from_rows(&["AB"]).unwrap()).at(Vector2::new(2.0, 1.0));
//! registry.instantiate(&template);
//!
//! let mut renderer = FrameRenderer::new(10, 5, DrawOrder::Registry);
//! let mut out = RecordingSurface::new(10, 5);
//!
//! // First frame writes the two sprite cells.
//! assert_eq!(renderer.render(&registry, &mut out).unwrap().writes, 2);
//! // Nothing moved: nothing is written.
//! assert_eq!(renderer.render(&registry, &mut out).unwrap().writes, 0);
//! ```

pub mod clock;
pub mod collision;
pub mod compositor;
pub mod diff;
pub mod entity;
pub mod error;
pub mod grid;
pub mod input;
pub mod overlay;
pub mod registry;
pub mod renderer;
pub mod sprite;
pub mod surface;
mod timer;
pub mod transform;

pub use tui_retro_types as types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualTime, MonotonicTime, TimeSource};
pub use collision::{CollisionEvent, CollisionPhase, CollisionTracker};
pub use compositor::{CompositeStats, Compositor};
pub use diff::DiffRenderer;
pub use entity::{CollisionEvents, Entity, EntityId};
pub use error::{RegistryError, SpriteError};
pub use grid::{CharGrid, Grid, WorkingGrid};
pub use input::{InputSource, NoInput};
pub use overlay::Overlay;
pub use registry::Registry;
pub use renderer::{FrameRenderer, FrameStats};
pub use sprite::Sprite;
pub use surface::{CellWrite, OutputSurface, RecordingSurface};
pub use transform::Transform;
