//! Play flow tuning: handoff gating, switching, menu navigation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlayConfig {
    /// Giver/target distance under which the handoff fires (default: 4.0)
    pub handoff_range: f32,
    /// Polling window after arming before the handoff times out (default: 3.0)
    pub handoff_window: f32,
    /// Global cooldown between switch/pass/snap inputs (default: 0.3)
    pub switch_cooldown: f32,
    /// Cooldown between play menu cursor moves (default: 0.2)
    pub selector_cooldown: f32,
    /// Hand control to whoever gains the ball during a live play (default: true)
    pub auto_switch_to_carrier: bool,
    /// Play snapped when nothing was picked from the menu (default: "Outside")
    pub default_play: String,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            handoff_range: 4.0,
            handoff_window: 3.0,
            switch_cooldown: 0.3,
            selector_cooldown: 0.2,
            auto_switch_to_carrier: true,
            default_play: "Outside".to_string(),
        }
    }
}
