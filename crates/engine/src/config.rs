//! Engine configuration.
//!
//! Read once at startup, from the environment or a JSON document, and
//! immutable for the rest of the run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tui_retro_types::{DrawOrder, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("target fps must be greater than zero")]
    ZeroTargetFps,
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u16,
    pub height: u16,
    /// Report `FPS: .., deltaTime: ..` through the surface title each tick.
    pub fps_counter: bool,
    #[serde(with = "draw_order")]
    pub draw_order: DrawOrder,
    /// Sleep out the rest of each frame budget. `None` runs unthrottled.
    pub target_fps: Option<u32>,
    /// Render each cell as two terminal columns.
    pub square_mode: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            fps_counter: true,
            draw_order: DrawOrder::Registry,
            target_fps: None,
            square_mode: false,
        }
    }
}

impl EngineConfig {
    /// Load from `RETRO_*` environment variables.
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).map(|s| s.trim().to_string());

        let width = parse("RETRO_GRID_WIDTH")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.width);
        let height = parse("RETRO_GRID_HEIGHT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.height);
        let fps_counter = parse("RETRO_FPS_COUNTER")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.fps_counter);
        let draw_order = parse("RETRO_DRAW_ORDER")
            .and_then(|s| DrawOrder::from_str(&s))
            .unwrap_or(defaults.draw_order);
        let target_fps = parse("RETRO_TARGET_FPS")
            .and_then(|s| s.parse().ok())
            .filter(|&fps: &u32| fps > 0)
            .or(defaults.target_fps);
        let square_mode = parse("RETRO_SQUARE_MODE")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.square_mode);

        Self {
            width,
            height,
            fps_counter,
            draw_order,
            target_fps,
            square_mode,
        }
    }

    /// Parse a JSON document. Omitted fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.target_fps == Some(0) {
            return Err(ConfigError::ZeroTargetFps);
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

mod draw_order {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use tui_retro_types::DrawOrder;

    pub fn serialize<S: Serializer>(order: &DrawOrder, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(order.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DrawOrder, D::Error> {
        let raw = String::deserialize(d)?;
        DrawOrder::from_str(&raw)
            .ok_or_else(|| de::Error::custom(format!("unknown draw order: {raw}")))
    }
}
