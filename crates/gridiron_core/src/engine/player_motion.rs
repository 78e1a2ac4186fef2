//! Direct stick control of the active entity.

use super::collaborators::{Button, InputSource};
use super::config::MovementConfig;
use super::math::{input_to_world, turn_toward};
use crate::models::{EntityId, Roster};

#[derive(Debug, Clone)]
pub struct PlayerMotion {
    walk_speed: f32,
    run_speed: f32,
    rotation_speed: f32,
    deadband: f32,
}

impl PlayerMotion {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            rotation_speed: config.rotation_speed,
            deadband: config.input_deadband,
        }
    }

    /// Moves `active` if it accepts input and the stick is past the deadband.
    pub fn step(&self, dt: f32, input: &dyn InputSource, roster: &mut Roster, active: Option<EntityId>) -> bool {
        let Some(entity) = active.and_then(|id| roster.get_mut(id)) else {
            return false;
        };
        if !entity.accepts_input() {
            return false;
        }
        let stick = input.directional();
        if stick.norm() <= self.deadband {
            return false;
        }
        let speed = if input.button_held(Button::Run) { self.run_speed } else { self.walk_speed };
        let movement = input_to_world(stick);
        entity.position += movement * speed * dt;
        entity.orientation = turn_toward(entity.orientation, movement, self.rotation_speed, dt);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collaborators::InputFrame;
    use crate::engine::math::Vec3;
    use crate::models::Role;

    fn controlled() -> (Roster, EntityId) {
        let mut roster = Roster::new();
        let id = roster.spawn("RB", Role::Rb, 0, Vec3::zeros());
        let e = roster.get_mut(id).unwrap();
        e.has_control = true;
        e.movement_enabled = true;
        (roster, id)
    }

    #[test]
    fn walks_and_runs() {
        let motion = PlayerMotion::new(&MovementConfig::default());
        let (mut roster, id) = controlled();
        let up = InputFrame::idle().with_direction(0.0, 1.0);
        assert!(motion.step(1.0, &up, &mut roster, Some(id)));
        assert_eq!(roster.position(id), Some(Vec3::new(0.0, 0.0, 5.0)));

        let sprint = up.hold(Button::Run);
        motion.step(0.5, &sprint, &mut roster, Some(id));
        assert_eq!(roster.position(id), Some(Vec3::new(0.0, 0.0, 9.0)));
    }

    #[test]
    fn blocked_pre_snap_and_under_ai() {
        let motion = PlayerMotion::new(&MovementConfig::default());
        let (mut roster, id) = controlled();
        let right = InputFrame::idle().with_direction(1.0, 0.0);

        roster.get_mut(id).unwrap().movement_enabled = false;
        assert!(!motion.step(0.1, &right, &mut roster, Some(id)));

        let e = roster.get_mut(id).unwrap();
        e.movement_enabled = true;
        e.ai_controlled = true;
        assert!(!motion.step(0.1, &right, &mut roster, Some(id)));
        assert_eq!(roster.position(id), Some(Vec3::zeros()));
    }

    #[test]
    fn deadband_holds_still() {
        let motion = PlayerMotion::new(&MovementConfig::default());
        let (mut roster, id) = controlled();
        let drift = InputFrame::idle().with_direction(0.05, 0.05);
        assert!(!motion.step(0.1, &drift, &mut roster, Some(id)));
        assert!(!motion.step(0.1, &InputFrame::idle(), &mut roster, None));
    }
}
