//! Third-person follow camera.

use super::collaborators::{Camera, CameraTarget};
use super::config::CameraConfig;
use super::math::{smooth_damp, vec3, Vec3};

#[derive(Debug, Clone)]
pub struct FollowCamera {
    offset: Vec3,
    smooth_time: f32,
    position: Vec3,
    velocity: Vec3,
    look_at: Vec3,
    target: Option<CameraTarget>,
}

impl FollowCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let offset = vec3(config.offset);
        Self {
            offset,
            smooth_time: config.smooth_time,
            position: offset,
            velocity: Vec3::zeros(),
            look_at: Vec3::zeros(),
            target: None,
        }
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn desired_position(&self, focus: Vec3) -> Vec3 {
        focus + self.offset
    }
}

impl Camera for FollowCamera {
    fn set_target(&mut self, target: CameraTarget) {
        self.target = Some(target);
    }

    fn target(&self) -> Option<CameraTarget> {
        self.target
    }

    fn snap(&mut self, focus: Vec3) {
        self.position = self.desired_position(focus);
        self.velocity = Vec3::zeros();
        self.look_at = focus;
    }

    fn follow(&mut self, focus: Vec3, dt: f32) {
        let desired = self.desired_position(focus);
        self.position = smooth_damp(self.position, desired, &mut self.velocity, self.smooth_time, dt);
        self.look_at = focus;
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
