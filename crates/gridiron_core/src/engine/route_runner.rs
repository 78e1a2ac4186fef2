//! Per-entity waypoint follower.
//!
//! Waypoints are offsets from where the entity stood when the route started.
//! A finished route keeps the entity frozen under AI control; only `stop()`
//! or a user override hands it back.

use tracing::{debug, warn};

use super::collaborators::InputSource;
use super::config::MovementConfig;
use super::math::{ground, normalize_or_zero, turn_toward, Vec3};
use crate::error::PlayError;
use crate::models::{EntityId, Role, Roster, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Not started yet (waiting on its start delay).
    Idle,
    Running,
    /// Route finished; entity stays under AI control.
    Holding,
    Stopped,
}

/// What a single step produced, for the director to turn into events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerOutcome {
    Advanced { index: usize },
    Completed,
    Canceled,
}

#[derive(Debug, Clone)]
pub struct RouteRunner {
    entity: EntityId,
    role: Role,
    state: RunnerState,
    waypoints: Vec<Vec3>,
    speed: f32,
    origin: Vec3,
    target: Vec3,
    index: usize,
    /// Direct input on the controlled entity cancels the route.
    pub allow_user_override: bool,
}

impl RouteRunner {
    pub fn new(entity: EntityId, role: Role) -> Self {
        Self {
            entity,
            role,
            state: RunnerState::Idle,
            waypoints: Vec::new(),
            speed: 0.0,
            origin: Vec3::zeros(),
            target: Vec3::zeros(),
            index: 0,
            allow_user_override: true,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunnerState::Running
    }

    /// Running or holding its final spot.
    pub fn is_ai_controlled(&self) -> bool {
        matches!(self.state, RunnerState::Running | RunnerState::Holding)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_target(&self) -> Vec3 {
        self.target
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Starts from the entity's current position. Invalid routes and missing
    /// entities are logged and leave the runner untouched.
    pub fn start(&mut self, roster: &mut Roster, route: &Route) -> bool {
        if let Err(err) = route.validate() {
            warn!("{err}; route not started");
            return false;
        }
        let Some(entity) = roster.get_mut(self.entity) else {
            let err = PlayError::MissingComponent { role: self.role, what: "roster entity" };
            warn!("{err}; route not started");
            return false;
        };

        self.waypoints = route.waypoints.clone();
        self.speed = route.speed;
        self.index = 0;
        self.origin = entity.position;
        self.target = self.origin + self.waypoints[0];
        self.state = RunnerState::Running;
        entity.ai_controlled = true;

        debug!(
            "{} ({}) starting route from {:?} toward {:?}",
            entity.name, self.entity, self.origin, self.target
        );
        true
    }

    /// Releases the entity. Safe to call in any state, any number of times.
    pub fn stop(&mut self, roster: &mut Roster) {
        if self.state == RunnerState::Stopped {
            return;
        }
        if self.is_ai_controlled() {
            debug!("{} stopping route", self.entity);
        }
        self.state = RunnerState::Stopped;
        if let Some(entity) = roster.get_mut(self.entity) {
            entity.ai_controlled = false;
        }
    }

    pub fn step(
        &mut self,
        dt: f32,
        roster: &mut Roster,
        input: &dyn InputSource,
        tuning: &MovementConfig,
    ) -> Option<RunnerOutcome> {
        if !self.is_ai_controlled() {
            return None;
        }
        if self.user_overrides(roster, input, tuning.input_deadband) {
            debug!("{} user input overrides route", self.entity);
            self.stop(roster);
            return Some(RunnerOutcome::Canceled);
        }
        if self.state == RunnerState::Holding {
            return None;
        }

        let position = roster.position(self.entity)?;
        let mut outcome = None;
        if (self.target - position).norm() < tuning.arrival_distance {
            self.index += 1;
            if self.index >= self.waypoints.len() {
                self.state = RunnerState::Holding;
                debug!("{} completed route, holding at {:?}", self.entity, position);
                return Some(RunnerOutcome::Completed);
            }
            self.target = self.origin + self.waypoints[self.index];
            outcome = Some(RunnerOutcome::Advanced { index: self.index });
        }

        let to_target = ground(self.target - position);
        let direction = normalize_or_zero(to_target);
        let travel = (self.speed * dt).min(to_target.norm());
        if let Some(entity) = roster.get_mut(self.entity) {
            entity.position += direction * travel;
            entity.orientation =
                turn_toward(entity.orientation, direction, tuning.rotation_speed, dt);
        }
        outcome
    }

    /// Waypoint index over waypoint count, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.waypoints.is_empty() {
            return 0.0;
        }
        (self.index as f32 / self.waypoints.len() as f32).min(1.0)
    }

    /// Ground velocity while running, zero otherwise.
    pub fn current_velocity(&self, roster: &Roster) -> Vec3 {
        if !self.is_running() {
            return Vec3::zeros();
        }
        match roster.position(self.entity) {
            Some(position) => normalize_or_zero(ground(self.target - position)) * self.speed,
            None => Vec3::zeros(),
        }
    }

    fn user_overrides(&self, roster: &Roster, input: &dyn InputSource, deadband: f32) -> bool {
        if !self.allow_user_override {
            return false;
        }
        let controlled = roster.get(self.entity).map_or(false, |e| e.has_control);
        controlled && input.directional().norm() > deadband
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collaborators::InputFrame;

    const DT: f32 = 1.0 / 60.0;

    fn setup(waypoints: Vec<Vec3>, speed: f32) -> (Roster, RouteRunner, Route) {
        let mut roster = Roster::new();
        let id = roster.spawn("WR1", Role::Wr1, 0, Vec3::new(3.0, 0.0, 1.0));
        let route = Route::new(Role::Wr1, waypoints, speed, 0.0);
        (roster, RouteRunner::new(id, Role::Wr1), route)
    }

    #[test]
    fn start_records_origin_and_takes_control() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 5.0)], 5.0);
        assert!(runner.start(&mut roster, &route));
        assert_eq!(runner.origin(), Vec3::new(3.0, 0.0, 1.0));
        assert_eq!(runner.current_target(), Vec3::new(3.0, 0.0, 6.0));
        assert!(roster.get(runner.entity()).unwrap().ai_controlled);
    }

    #[test]
    fn empty_route_start_is_a_no_op() {
        let (mut roster, mut runner, route) = setup(Vec::new(), 5.0);
        assert!(!runner.start(&mut roster, &route));
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(!roster.get(runner.entity()).unwrap().ai_controlled);
    }

    #[test]
    fn two_waypoint_route_advances_then_completes() {
        let (mut roster, mut runner, route) =
            setup(vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 10.0)], 5.0);
        let tuning = MovementConfig::default();
        runner.start(&mut roster, &route);
        let origin = runner.origin();

        let mut advanced = false;
        for _ in 0..600 {
            let before = roster.position(runner.entity()).unwrap();
            match runner.step(DT, &mut roster, &InputFrame::idle(), &tuning) {
                Some(RunnerOutcome::Advanced { index }) => {
                    assert_eq!(index, 1);
                    assert!((before - (origin + Vec3::new(0.0, 0.0, 5.0))).norm() < 0.5);
                    advanced = true;
                }
                Some(RunnerOutcome::Completed) => {
                    assert!(advanced, "must reach the first waypoint before finishing");
                    assert!((before - (origin + Vec3::new(0.0, 0.0, 10.0))).norm() < 0.5);
                    break;
                }
                Some(RunnerOutcome::Canceled) => panic!("no input was given"),
                None => assert_eq!(runner.state(), RunnerState::Running),
            }
        }
        assert_eq!(runner.state(), RunnerState::Holding);
        assert_eq!(runner.progress(), 1.0);
        // Completion does not hand the entity back.
        assert!(roster.get(runner.entity()).unwrap().ai_controlled);
        assert_eq!(runner.current_velocity(&roster), Vec3::zeros());
    }

    #[test]
    fn holding_entity_stays_put() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 1.0)], 5.0);
        let tuning = MovementConfig::default();
        runner.start(&mut roster, &route);
        for _ in 0..120 {
            runner.step(DT, &mut roster, &InputFrame::idle(), &tuning);
        }
        let frozen = roster.position(runner.entity()).unwrap();
        for _ in 0..60 {
            runner.step(DT, &mut roster, &InputFrame::idle(), &tuning);
        }
        assert_eq!(roster.position(runner.entity()).unwrap(), frozen);
    }

    #[test]
    fn large_step_does_not_overshoot() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 2.0)], 5.0);
        runner.start(&mut roster, &route);
        runner.step(1.0, &mut roster, &InputFrame::idle(), &MovementConfig::default());
        assert_eq!(roster.position(runner.entity()).unwrap(), Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn user_input_cancels_only_the_controlled_entity() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 20.0)], 5.0);
        let tuning = MovementConfig::default();
        let stick = InputFrame::idle().with_direction(1.0, 0.0);
        runner.start(&mut roster, &route);

        // Not the controlled entity: input is someone else's.
        assert_eq!(runner.step(DT, &mut roster, &stick, &tuning), None);
        assert!(runner.is_running());

        roster.get_mut(runner.entity()).unwrap().has_control = true;
        // Inside the deadband: ignored.
        let nudge = InputFrame::idle().with_direction(0.05, 0.0);
        assert_eq!(runner.step(DT, &mut roster, &nudge, &tuning), None);

        assert_eq!(runner.step(DT, &mut roster, &stick, &tuning), Some(RunnerOutcome::Canceled));
        assert_eq!(runner.state(), RunnerState::Stopped);
        assert!(!roster.get(runner.entity()).unwrap().ai_controlled);
    }

    #[test]
    fn override_can_be_disabled() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 20.0)], 5.0);
        runner.start(&mut roster, &route);
        runner.allow_user_override = false;
        roster.get_mut(runner.entity()).unwrap().has_control = true;
        let stick = InputFrame::idle().with_direction(0.0, 1.0);
        assert_eq!(runner.step(DT, &mut roster, &stick, &MovementConfig::default()), None);
        assert!(runner.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(0.0, 0.0, 5.0)], 5.0);
        runner.start(&mut roster, &route);
        runner.stop(&mut roster);
        let snapshot = (runner.state(), runner.progress(), roster.get(runner.entity()).unwrap().ai_controlled);
        runner.stop(&mut roster);
        assert_eq!(snapshot, (runner.state(), runner.progress(), roster.get(runner.entity()).unwrap().ai_controlled));
        assert_eq!(runner.state(), RunnerState::Stopped);
    }

    #[test]
    fn velocity_points_at_current_target() {
        let (mut roster, mut runner, route) = setup(vec![Vec3::new(4.0, 0.0, 0.0)], 6.0);
        runner.start(&mut roster, &route);
        let v = runner.current_velocity(&roster);
        assert!((v - Vec3::new(6.0, 0.0, 0.0)).norm() < 1e-5);
    }
}
