//! World position and draw-order key.

use tui_retro_types::{Vector2, DEFAULT_Z_INDEX};

/// Position of an entity in the grid plus its draw-order key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector2,
    pub z_index: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            z_index: DEFAULT_Z_INDEX,
        }
    }
}

impl Transform {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Move the position by `translation`.
    pub fn translate(&mut self, translation: Vector2) {
        self.position += translation;
    }

    /// Top-left grid cell covered by this transform.
    pub fn cell(&self) -> (i32, i32) {
        self.position.truncated()
    }
}
