//! Follow camera tuning

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position relative to its target (default: [0, 6, -12])
    pub offset: [f32; 3],
    /// Damping time for position follow (default: 0.3)
    pub smooth_time: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { offset: [0.0, 6.0, -12.0], smooth_time: 0.3 }
    }
}
