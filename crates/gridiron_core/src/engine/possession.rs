//! Ball possession: who holds the ball, throws, the snap and auto-catch.
//!
//! The ball is always in exactly one [`BallState`]. While carried its
//! position is derived from the carrier every tick; while in flight the
//! physics collaborator moves it (or the snap animation does).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::collaborators::{BallBody, BallPhysics};
use super::config::BallConfig;
use super::events::{EventQueue, SessionEvent};
use super::math::{lerp, smoothstep, vec3, Vec3};
use crate::models::{EntityId, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "carrier", rename_all = "snake_case")]
pub enum BallState {
    Carried(EntityId),
    InFlight,
    Free,
}

#[derive(Debug, Clone, Copy)]
struct SnapAnimation {
    from: Vec3,
    to: Vec3,
    elapsed: f32,
    passer: EntityId,
}

#[derive(Debug, Clone)]
pub struct Possession {
    state: BallState,
    body: BallBody,
    snapped: bool,
    snap: Option<SnapAnimation>,
    carry_offset: Vec3,
    spot: Vec3,
    catch_radius: f32,
    rest_speed: f32,
    snap_duration: f32,
}

impl Possession {
    pub fn new(config: &BallConfig) -> Self {
        let spot = vec3(config.spot);
        Self {
            state: BallState::Free,
            body: BallBody::at(spot),
            snapped: false,
            snap: None,
            carry_offset: vec3(config.carry_offset),
            spot,
            catch_radius: config.catch_radius,
            rest_speed: config.rest_speed,
            snap_duration: config.snap_duration,
        }
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    pub fn carrier(&self) -> Option<EntityId> {
        match self.state {
            BallState::Carried(id) => Some(id),
            _ => None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Meaningful only while in flight; zero otherwise.
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    pub fn carry_offset(&self) -> Vec3 {
        self.carry_offset
    }

    pub fn catch_radius(&self) -> f32 {
        self.catch_radius
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped
    }

    pub fn is_snapping(&self) -> bool {
        self.snap.is_some()
    }

    /// New play: clear the snap and hand the ball to `holder` (or spot it).
    /// No events; this is setup, not a possession change.
    pub fn reset(&mut self, holder: Option<EntityId>, roster: &Roster) {
        self.snapped = false;
        self.snap = None;
        self.body = BallBody::at(self.spot);
        self.state = BallState::Free;
        if let Some(holder) = holder {
            if let Some(position) = roster.position(holder) {
                self.state = BallState::Carried(holder);
                self.body.position = position + self.carry_offset;
            }
        }
    }

    /// Redundant for the current carrier. A give from flight is a catch.
    pub fn give_to(&mut self, entity: EntityId, roster: &Roster, events: &mut EventQueue) -> bool {
        if self.state == BallState::Carried(entity) {
            return false;
        }
        let Some(entity_ref) = roster.get(entity) else {
            warn!("cannot give ball to {entity}: not in roster");
            return false;
        };

        let previous = self.carrier();
        let caught = self.state == BallState::InFlight;
        self.snap = None;
        self.state = BallState::Carried(entity);
        self.body.velocity = Vec3::zeros();
        self.body.grounded = false;
        self.body.position = entity_ref.position + self.carry_offset;

        events.push(SessionEvent::CarrierChanged { previous, carrier: entity });
        if caught {
            events.push(SessionEvent::BallCaught { receiver: entity });
        }
        debug!("ball given to {} ({entity}), catch={caught}", entity_ref.name);
        true
    }

    /// Ignored unless carried.
    pub fn throw_to(&mut self, velocity: Vec3) -> bool {
        if !matches!(self.state, BallState::Carried(_)) {
            return false;
        }
        self.state = BallState::InFlight;
        self.body.velocity = velocity;
        self.body.grounded = false;
        debug!("ball thrown with velocity {velocity:?}");
        true
    }

    /// Once per play: animate the ball to the passer's carry point, then
    /// give it to them. Without a passer the ball is simply loose.
    pub fn snap(&mut self, passer: Option<EntityId>, roster: &Roster, events: &mut EventQueue) -> bool {
        if self.snapped {
            return false;
        }
        self.snapped = true;
        self.state = BallState::InFlight;
        self.body.velocity = Vec3::zeros();
        self.body.grounded = false;

        match passer.and_then(|id| roster.position(id).map(|p| (id, p))) {
            Some((passer, position)) => {
                self.snap = Some(SnapAnimation {
                    from: self.body.position,
                    to: position + self.carry_offset,
                    elapsed: 0.0,
                    passer,
                });
            }
            None => warn!("snap without a passer; ball is loose"),
        }
        events.push(SessionEvent::BallSnapped { passer });
        info!("ball snapped");
        true
    }

    /// Snap animation, carry pin, auto-catch, then ballistics for a loose ball.
    pub fn step(
        &mut self,
        dt: f32,
        roster: &Roster,
        physics: &mut dyn BallPhysics,
        events: &mut EventQueue,
    ) {
        if let Some(mut snap) = self.snap {
            snap.elapsed += dt;
            let t = (snap.elapsed / self.snap_duration).min(1.0);
            self.body.position = lerp(snap.from, snap.to, smoothstep(t));
            if snap.elapsed >= self.snap_duration {
                self.snap = None;
                self.give_to(snap.passer, roster, events);
            } else {
                self.snap = Some(snap);
            }
        }

        if let BallState::Carried(carrier) = self.state {
            match roster.position(carrier) {
                Some(position) => self.body.position = position + self.carry_offset,
                None => {
                    warn!("carrier {carrier} left the roster; ball is loose");
                    self.state = BallState::Free;
                    events.push(SessionEvent::BallLoose);
                }
            }
            return;
        }

        let catchable = match self.state {
            BallState::InFlight => true,
            BallState::Free => self.body.speed() < self.rest_speed,
            BallState::Carried(_) => false,
        };
        if catchable {
            if let Some(receiver) = self.nearest_catcher(roster) {
                self.give_to(receiver, roster, events);
                return;
            }
        }

        if self.state == BallState::InFlight && self.snap.is_none() {
            physics.integrate(&mut self.body, dt);
            if self.body.grounded && self.body.speed() < self.rest_speed {
                self.body.velocity = Vec3::zeros();
                self.state = BallState::Free;
                debug!("ball came to rest at {:?}", self.body.position);
                events.push(SessionEvent::BallLoose);
            }
        }
    }

    /// Nearest entity strictly inside the catch radius; first found on ties.
    pub fn nearest_catcher(&self, roster: &Roster) -> Option<EntityId> {
        let mut best: Option<(EntityId, f32)> = None;
        for entity in roster.iter() {
            let distance = entity.distance_to(self.body.position);
            let closest = best.map_or(f32::MAX, |(_, d)| d);
            if distance < self.catch_radius && distance < closest {
                best = Some((entity.id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Place a loose ball directly (tests and scripted setups).
    pub fn place(&mut self, position: Vec3, velocity: Vec3) {
        self.snap = None;
        self.body = BallBody { position, velocity, grounded: false };
        self.state = if velocity == Vec3::zeros() { BallState::Free } else { BallState::InFlight };
    }
}
