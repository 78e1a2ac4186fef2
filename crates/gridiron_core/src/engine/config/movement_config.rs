//! Entity movement tuning (route running and direct control)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed under direct control (default: 5.0)
    pub walk_speed: f32,
    /// Speed while the run modifier is held (default: 8.0)
    pub run_speed: f32,
    /// Facing smoothing rate, fraction of remaining turn per second (default: 10.0)
    pub rotation_speed: f32,
    /// Distance at which a route waypoint counts as reached (default: 0.5)
    pub arrival_distance: f32,
    /// Stick magnitude below which input is ignored (default: 0.1)
    pub input_deadband: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 8.0,
            rotation_speed: 10.0,
            arrival_distance: 0.5,
            input_deadband: 0.1,
        }
    }
}
