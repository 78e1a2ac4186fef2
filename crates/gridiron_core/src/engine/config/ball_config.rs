//! Ball / possession / pass tuning

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BallConfig {
    /// Offset from carrier position to the carried ball (default: [0, 1.5, 0.5])
    pub carry_offset: [f32; 3],
    /// Auto-catch radius around an entity (default: 1.0)
    pub catch_radius: f32,
    /// Speed below which a loose ball counts as resting (default: 0.1)
    pub rest_speed: f32,
    /// Snap animation length in seconds (default: 0.3)
    pub snap_duration: f32,
    /// Base throw force; doubles as the assumed ball speed when leading (default: 15.0)
    pub throw_force: f32,
    /// Where a ball with no center to hold it waits pre-snap (default: [0, 1, 0])
    pub spot: [f32; 3],
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            carry_offset: [0.0, 1.5, 0.5],
            catch_radius: 1.0,
            rest_speed: 0.1,
            snap_duration: 0.3,
            throw_force: 15.0,
            spot: [0.0, 1.0, 0.0],
        }
    }
}
