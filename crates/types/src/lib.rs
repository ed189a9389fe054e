//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (registry, compositor, terminal surface, input listener).
//!
//! # Grid Dimensions
//!
//! The grid is a fixed-size character field chosen at startup:
//!
//! - **Width**: 100 columns by default (indexed 0-99)
//! - **Height**: 50 rows by default (indexed 0-49)
//! - **Origin**: top-left, y grows downward
//!
//! # Engine Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_WIDTH` | 100 | Grid columns when not configured |
//! | `DEFAULT_GRID_HEIGHT` | 50 | Grid rows when not configured |
//! | `DEFAULT_Z_INDEX` | 10 | Draw-order key of a fresh transform |
//! | `DEFAULT_ENTITY_NAME` | `"gameobject"` | Name of a fresh entity |
//! | `BLANK` | `' '` | Character used to clear vacated cells |
//!
//! # Examples
//!
//! ```
//! use tui_retro_types::{Axis, Key, Vector2};
//!
//! // Vectors add component-wise
//! let p = Vector2::new(2.5, 1.0) + Vector2::RIGHT;
//! assert_eq!(p, Vector2::new(3.5, 1.0));
//!
//! // Grid placement truncates toward zero
//! assert!(p.eq_int(Vector2::new(3.0, 1.9)));
//!
//! // Keys map onto movement axes
//! assert_eq!(Key::Left.axis_value(Axis::Horizontal), -1.0);
//! assert_eq!(Key::Char('s').axis_value(Axis::Vertical), 1.0);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Grid width in cells when nothing else is configured.
pub const DEFAULT_GRID_WIDTH: u16 = 100;

/// Grid height in cells when nothing else is configured.
pub const DEFAULT_GRID_HEIGHT: u16 = 50;

/// Draw-order key assigned to a fresh transform.
pub const DEFAULT_Z_INDEX: i32 = 10;

/// Name assigned to a fresh entity.
pub const DEFAULT_ENTITY_NAME: &str = "gameobject";

/// Character written into cells vacated by a moved or removed entity.
pub const BLANK: char = ' ';


/// 2D float coordinate.
///
/// Values are plain data: arithmetic returns new vectors. Grid placement
/// truncates each component toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);
    pub const RIGHT: Vector2 = Vector2::new(1.0, 0.0);
    pub const LEFT: Vector2 = Vector2::new(-1.0, 0.0);
    /// Up is toward row 0.
    pub const UP: Vector2 = Vector2::new(0.0, -1.0);
    pub const DOWN: Vector2 = Vector2::new(0.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Integer grid coordinate of this vector (truncation toward zero).
    pub fn truncated(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }

    /// Compare after truncating both vectors to integer grid coordinates.
    pub fn eq_int(&self, other: Vector2) -> bool {
        self.truncated() == other.truncated()
    }

    /// This vector with both components truncated toward zero.
    pub fn integer(&self) -> Vector2 {
        let (x, y) = self.truncated();
        Vector2::new(x as f32, y as f32)
    }

    pub fn set(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Shift both components in place.
    pub fn offset(&mut self, x: f32, y: f32) {
        self.x += x;
        self.y += y;
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, d: f32) -> Vector2 {
        Vector2::new(self.x * d, self.y * d)
    }
}

impl Mul<Vector2> for f32 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        v * self
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

/// Order in which entities are composited each tick.
///
/// - **Registry**: slot order; the last slot painting a cell wins
/// - **ZIndex**: ascending z-index, slot order breaking ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawOrder {
    #[default]
    Registry,
    ZIndex,
}

impl DrawOrder {
    /// Parse from string (case-insensitive): "registry", "z-index" | "zindex" | "z"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "registry" => Some(DrawOrder::Registry),
            "z-index" | "zindex" | "z" => Some(DrawOrder::ZIndex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawOrder::Registry => "registry",
            DrawOrder::ZIndex => "z-index",
        }
    }
}

/// Movement axes derived from the current key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Keys the engine understands
///
/// This is a small, terminal-independent vocabulary. Input backends map their
/// native key events into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Tab,
    Space,
    /// Any printable character other than space.
    Char(char),
}

impl Key {
    /// Contribution of this key to a movement axis: -1, 0 or +1.
    ///
    /// Arrow keys and WASD (case-insensitive) both count. Up is negative on
    /// the vertical axis because rows grow downward.
    pub fn axis_value(&self, axis: Axis) -> f32 {
        let lower = match self {
            Key::Char(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        };
        match axis {
            Axis::Horizontal => match (self, lower) {
                (Key::Left, _) | (_, Some('a')) => -1.0,
                (Key::Right, _) | (_, Some('d')) => 1.0,
                _ => 0.0,
            },
            Axis::Vertical => match (self, lower) {
                (Key::Up, _) | (_, Some('w')) => -1.0,
                (Key::Down, _) | (_, Some('s')) => 1.0,
                _ => 0.0,
            },
        }
    }
}
