//! Play definitions: formations, routes and the play aggregate.

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::engine::math::Vec3;
use crate::error::{PlayError, Result};

fn default_speed() -> f32 {
    5.0
}

fn default_handoff_timing() -> f32 {
    1.0
}

fn default_duration() -> f32 {
    10.0
}

/// Scripted path for one role. Waypoints are offsets from the entity's
/// position at route start, not absolute field coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub role: Role,
    pub waypoints: Vec<Vec3>,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub start_delay: f32,
    #[serde(default)]
    pub handoff_giver: bool,
    #[serde(default)]
    pub handoff_target: bool,
    /// Seconds after the snap before the handoff may happen (giver route only).
    #[serde(default = "default_handoff_timing")]
    pub handoff_timing: f32,
}

impl Route {
    pub fn new(role: Role, waypoints: Vec<Vec3>, speed: f32, start_delay: f32) -> Self {
        Self {
            role,
            waypoints,
            speed,
            start_delay,
            handoff_giver: false,
            handoff_target: false,
            handoff_timing: default_handoff_timing(),
        }
    }

    pub fn giving_handoff_at(mut self, timing: f32) -> Self {
        self.handoff_giver = true;
        self.handoff_timing = timing;
        self
    }

    pub fn taking_handoff(mut self) -> Self {
        self.handoff_target = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.waypoints.is_empty() {
            return Err(PlayError::InvalidRoute { role: self.role, reason: "no waypoints".into() });
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(PlayError::InvalidRoute {
                role: self.role,
                reason: format!("speed must be > 0, got {}", self.speed),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayType {
    Run,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub role: Role,
    pub position: Vec3,
}

/// Absolute pre-snap alignment; Z = 0 is the line of scrimmage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub slots: Vec<FormationSlot>,
}

impl Formation {
    pub fn position_for(&self, role: Role) -> Option<Vec3> {
        self.slots.iter().find(|s| s.role == role).map(|s| s.position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub formation: Formation,
    pub play_type: PlayType,
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Play {
    pub fn is_run(&self) -> bool {
        self.play_type == PlayType::Run
    }

    pub fn is_pass(&self) -> bool {
        self.play_type == PlayType::Pass
    }

    pub fn route_for(&self, role: Role) -> Option<&Route> {
        self.routes.iter().find(|r| r.role == role)
    }

    pub fn handoff_giver(&self) -> Option<&Route> {
        self.routes.iter().find(|r| r.handoff_giver)
    }

    pub fn handoff_target(&self) -> Option<&Route> {
        self.routes.iter().find(|r| r.handoff_target)
    }

    /// Giver and target routes, only for run plays that declare both.
    pub fn handoff_pair(&self) -> Option<(&Route, &Route)> {
        if !self.is_run() {
            return None;
        }
        Some((self.handoff_giver()?, self.handoff_target()?))
    }

    /// Structural checks. Individual empty routes are not rejected here; the
    /// director skips them at start time.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PlayError::InvalidPlay { play: self.name.clone(), reason };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(invalid(format!("duration must be > 0, got {}", self.duration)));
        }
        for (i, route) in self.routes.iter().enumerate() {
            if self.routes[..i].iter().any(|r| r.role == route.role) {
                return Err(invalid(format!("more than one route for {}", route.role)));
            }
        }
        if self.is_run() {
            if self.routes.iter().filter(|r| r.handoff_giver).count() > 1 {
                return Err(invalid("more than one handoff giver".into()));
            }
            if self.routes.iter().filter(|r| r.handoff_target).count() > 1 {
                return Err(invalid("more than one handoff target".into()));
            }
        }
        Ok(())
    }
}
