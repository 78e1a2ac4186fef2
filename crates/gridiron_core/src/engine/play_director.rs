//! Runs one play: route start times, the handoff, and the play clock.

use tracing::{debug, info, warn};

use super::collaborators::InputSource;
use super::config::{MovementConfig, PlayConfig};
use super::events::{EventQueue, SessionEvent};
use super::handoff::{HandoffCoordinator, HandoffState};
use super::math::Vec3;
use super::possession::Possession;
use super::route_runner::{RouteRunner, RunnerOutcome, RunnerState};
use crate::error::PlayError;
use crate::models::{EntityId, Play, Role, Roster, Route};

#[derive(Debug, Clone)]
struct RouteLane {
    route: Route,
    delay_remaining: f32,
    runner: RouteRunner,
}

#[derive(Debug, Clone)]
struct ActivePlay {
    play: Play,
    elapsed: f32,
    lanes: Vec<RouteLane>,
    handoff: Option<HandoffCoordinator>,
}

#[derive(Debug, Clone)]
pub struct PlayDirector {
    movement: MovementConfig,
    handoff_range: f32,
    handoff_window: f32,
    active: Option<ActivePlay>,
    /// Handoff state of the last play, kept after it ends for reporting.
    last_handoff: Option<HandoffState>,
}

impl PlayDirector {
    pub fn new(movement: &MovementConfig, play: &PlayConfig) -> Self {
        Self {
            movement: movement.clone(),
            handoff_range: play.handoff_range,
            handoff_window: play.handoff_window,
            active: None,
            last_handoff: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_play(&self) -> Option<&Play> {
        self.active.as_ref().map(|a| &a.play)
    }

    pub fn elapsed(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |a| a.elapsed)
    }

    pub fn runner_for(&self, role: Role) -> Option<&RouteRunner> {
        self.lanes().find(|l| l.route.role == role).map(|l| &l.runner)
    }

    pub fn runner_for_entity(&self, entity: EntityId) -> Option<&RouteRunner> {
        self.lanes().find(|l| l.runner.entity() == entity).map(|l| &l.runner)
    }

    pub fn runners(&self) -> impl Iterator<Item = &RouteRunner> {
        self.lanes().map(|l| &l.runner)
    }

    pub fn handoff_state(&self) -> Option<HandoffState> {
        match &self.active {
            Some(active) => active.handoff.as_ref().map(|h| h.state()),
            None => self.last_handoff,
        }
    }

    /// Route velocity of an AI-driven entity, zero for everyone else.
    pub fn route_velocity(&self, entity: EntityId, roster: &Roster) -> Vec3 {
        self.runner_for_entity(entity).map_or(Vec3::zeros(), |r| r.current_velocity(roster))
    }

    fn lanes(&self) -> impl Iterator<Item = &RouteLane> {
        self.active.iter().flat_map(|a| a.lanes.iter())
    }

    /// Warns and does nothing if a play is already running.
    pub fn start(&mut self, play: &Play, roster: &mut Roster, events: &mut EventQueue) -> bool {
        if let Some(active) = &self.active {
            warn!("play '{}' already active; ignoring start of '{}'", active.play.name, play.name);
            return false;
        }

        let handoff = play.handoff_pair().and_then(|(giver, target)| {
            let giver_id = roster.id_for_role(giver.role);
            let target_id = roster.id_for_role(target.role);
            match (giver_id, target_id) {
                (Some(g), Some(t)) => Some(HandoffCoordinator::new(
                    g,
                    t,
                    giver.handoff_timing,
                    self.handoff_range,
                    self.handoff_window,
                )),
                _ => {
                    let role = if giver_id.is_none() { giver.role } else { target.role };
                    warn!("{}; handoff skipped", PlayError::MissingComponent { role, what: "handoff participant" });
                    None
                }
            }
        });
        let handoff_target = handoff.as_ref().map(|h| h.target());

        let mut lanes = Vec::with_capacity(play.routes.len());
        for route in &play.routes {
            if let Err(err) = route.validate() {
                warn!("{err}; skipping route");
                continue;
            }
            let Some(entity) = roster.id_for_role(route.role) else {
                warn!("{}; skipping route", PlayError::MissingComponent { role: route.role, what: "roster entity" });
                continue;
            };
            let mut runner = RouteRunner::new(entity, route.role);
            // The ball carrier-to-be keeps its route until the handoff lands.
            runner.allow_user_override = handoff_target != Some(entity);
            let mut lane = RouteLane { route: route.clone(), delay_remaining: route.start_delay, runner };
            if lane.delay_remaining <= 0.0 {
                lane.runner.start(roster, &lane.route);
            }
            lanes.push(lane);
        }

        info!(
            "starting play '{}' ({:?}, {} routes, handoff: {})",
            play.name,
            play.play_type,
            lanes.len(),
            handoff.is_some()
        );
        self.last_handoff = None;
        self.active = Some(ActivePlay { play: play.clone(), elapsed: 0.0, lanes, handoff });
        events.push(SessionEvent::PlayStarted { play: play.name.clone() });
        true
    }

    /// Start delays, route steps and the play clock. Ends the play when its
    /// duration is up.
    pub fn step(&mut self, dt: f32, roster: &mut Roster, input: &dyn InputSource, events: &mut EventQueue) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.elapsed += dt;

        for lane in &mut active.lanes {
            if lane.runner.state() == RunnerState::Idle {
                lane.delay_remaining -= dt;
                if lane.delay_remaining <= 0.0 {
                    lane.runner.start(roster, &lane.route);
                }
                continue;
            }
            let entity = lane.runner.entity();
            let role = lane.runner.role();
            match lane.runner.step(dt, roster, input, &self.movement) {
                Some(RunnerOutcome::Completed) => events.push(SessionEvent::RouteCompleted { entity, role }),
                Some(RunnerOutcome::Canceled) => events.push(SessionEvent::RouteCanceled { entity, role }),
                Some(RunnerOutcome::Advanced { index }) => debug!("{role} heading to waypoint {index}"),
                None => {}
            }
        }

        if active.elapsed >= active.play.duration {
            self.end(roster, events);
        }
    }

    /// Polls the handoff after possession has settled for the tick.
    pub fn step_handoff(&mut self, dt: f32, roster: &Roster, ball: &mut Possession, events: &mut EventQueue) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(handoff) = active.handoff.as_mut() else {
            return;
        };
        if handoff.step(dt, roster, ball, events) == Some(HandoffState::Completed) {
            let target = handoff.target();
            if let Some(lane) = active.lanes.iter_mut().find(|l| l.runner.entity() == target) {
                lane.runner.allow_user_override = true;
            }
        }
    }

    /// Stops every runner that exists, whatever state it is in.
    pub fn end(&mut self, roster: &mut Roster, events: &mut EventQueue) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        for lane in &mut active.lanes {
            lane.runner.stop(roster);
        }
        self.last_handoff = active.handoff.as_ref().map(|h| h.state());
        info!("play '{}' completed after {:.1}s", active.play.name, active.elapsed);
        events.push(SessionEvent::PlayCompleted { play: active.play.name });
    }
}
