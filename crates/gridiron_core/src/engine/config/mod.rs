//! # Engine Configuration
//!
//! All tuning constants for the play loop live here, grouped by concern.
//! Defaults reproduce the prototype's feel; presets tweak them wholesale.
//!
//! ```rust
//! use gridiron_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.ball.catch_radius > config.ball.catch_radius);
//! ```

mod ball_config;
mod camera_config;
mod movement_config;
mod play_config;

pub use ball_config::BallConfig;
pub use camera_config::CameraConfig;
pub use movement_config::MovementConfig;
pub use play_config::PlayConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlayError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct EngineConfig {
    #[serde(default)]
    pub ball: BallConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub play: PlayConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

impl EngineConfig {
    /// Prototype defaults.
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Forgiving catches, faster players, snappier switching.
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.ball.catch_radius = 1.4;
        cfg.movement.walk_speed = 6.0;
        cfg.movement.run_speed = 10.0;
        cfg.play.handoff_range = 5.0;
        cfg.play.switch_cooldown = 0.2;
        cfg
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load by extension: `.json` is JSON, anything else is YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ball.catch_radius", self.ball.catch_radius),
            ("ball.snap_duration", self.ball.snap_duration),
            ("ball.throw_force", self.ball.throw_force),
            ("movement.walk_speed", self.movement.walk_speed),
            ("movement.run_speed", self.movement.run_speed),
            ("movement.rotation_speed", self.movement.rotation_speed),
            ("movement.arrival_distance", self.movement.arrival_distance),
            ("play.handoff_range", self.play.handoff_range),
            ("play.handoff_window", self.play.handoff_window),
            ("camera.smooth_time", self.camera.smooth_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlayError::InvalidConfig(format!("{name} must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("ball.rest_speed", self.ball.rest_speed),
            ("movement.input_deadband", self.movement.input_deadband),
            ("play.switch_cooldown", self.play.switch_cooldown),
            ("play.selector_cooldown", self.play.selector_cooldown),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlayError::InvalidConfig(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.play.default_play.trim().is_empty() {
            return Err(PlayError::InvalidConfig("play.default_play must not be empty".into()));
        }
        Ok(())
    }
}

// ========== Tests ==========
