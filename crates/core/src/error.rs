//! Error types for the entity registry and sprite construction.

use std::io;

use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised while building a sprite.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// Rows of the character grid have different lengths.
    #[error("sprite rows are ragged: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The collision mask does not cover the character grid exactly.
    #[error("collision mask is {found:?} (w, h), sprite is {expected:?}")]
    MaskShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Errors raised by registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A handle points past the end of the registry.
    ///
    /// Handles are never recycled, so this only happens when a handle
    /// outlives the registry that issued it.
    #[error("entity {id} is not instantiated in this registry (len {len})")]
    NotInstantiated { id: EntityId, len: usize },

    /// The entity is a template and was never instantiated.
    #[error("entity has no identifier; instantiate it first")]
    MissingIdentifier,

    /// The timer worker for delayed destruction could not be started.
    #[error("failed to start destruction timer: {0}")]
    Scheduler(#[from] io::Error),
}
