//! Timing- and distance-gated handoff between two designated entities.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::{EventQueue, SessionEvent};
use super::possession::Possession;
use crate::models::{EntityId, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffState {
    /// Counting down `timing` from the snap.
    Waiting,
    /// Polling distance and possession every tick.
    Armed,
    Completed,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct HandoffCoordinator {
    giver: EntityId,
    target: EntityId,
    timing: f32,
    range: f32,
    window: f32,
    state: HandoffState,
    elapsed: f32,
    polled: f32,
}

impl HandoffCoordinator {
    pub fn new(giver: EntityId, target: EntityId, timing: f32, range: f32, window: f32) -> Self {
        Self {
            giver,
            target,
            timing,
            range,
            window,
            state: HandoffState::Waiting,
            elapsed: 0.0,
            polled: 0.0,
        }
    }

    pub fn state(&self) -> HandoffState {
        self.state
    }

    pub fn giver(&self) -> EntityId {
        self.giver
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, HandoffState::Completed | HandoffState::TimedOut)
    }

    /// Returns the new state when it changed to a terminal one this tick.
    pub fn step(
        &mut self,
        dt: f32,
        roster: &Roster,
        ball: &mut Possession,
        events: &mut EventQueue,
    ) -> Option<HandoffState> {
        match self.state {
            HandoffState::Waiting => {
                self.elapsed += dt;
                if self.elapsed < self.timing {
                    return None;
                }
                debug!("handoff armed after {:.2}s", self.elapsed);
                self.state = HandoffState::Armed;
                self.poll(dt, roster, ball, events)
            }
            HandoffState::Armed => self.poll(dt, roster, ball, events),
            HandoffState::Completed | HandoffState::TimedOut => None,
        }
    }

    fn poll(
        &mut self,
        dt: f32,
        roster: &Roster,
        ball: &mut Possession,
        events: &mut EventQueue,
    ) -> Option<HandoffState> {
        let (Some(giver), Some(target)) = (roster.get(self.giver), roster.get(self.target)) else {
            warn!("handoff participants left the roster; giving up");
            self.state = HandoffState::TimedOut;
            return Some(self.state);
        };

        let distance = (giver.position - target.position).norm();
        if distance < self.range {
            if ball.carrier() == Some(self.giver) {
                ball.give_to(self.target, roster, events);
                self.state = HandoffState::Completed;
                events.push(SessionEvent::HandoffCompleted { giver: self.giver, target: self.target });
                info!("handoff completed: {} to {} at {distance:.2}", giver.name, target.name);
                return Some(self.state);
            }
            debug!("handoff in range but {} does not hold the ball", giver.name);
        }

        self.polled += dt;
        if self.polled >= self.window {
            self.state = HandoffState::TimedOut;
            events.push(SessionEvent::HandoffTimedOut { giver: self.giver, target: self.target });
            warn!("handoff timed out after {:.1}s", self.window);
            return Some(self.state);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::BallConfig;
    use crate::engine::math::Vec3;
    use crate::models::Role;

    const DT: f32 = 0.1;

    fn setup(rb_at: Vec3) -> (Roster, Possession, EventQueue, HandoffCoordinator) {
        let mut roster = Roster::new();
        let qb = roster.spawn("QB", Role::Qb, 0, Vec3::zeros());
        let rb = roster.spawn("RB", Role::Rb, 0, rb_at);
        let mut ball = Possession::new(&BallConfig::default());
        ball.reset(Some(qb), &roster);
        let handoff = HandoffCoordinator::new(qb, rb, 1.2, 4.0, 3.0);
        (roster, ball, EventQueue::new(), handoff)
    }

    #[test]
    fn waits_for_timing_even_when_in_range() {
        let (roster, mut ball, mut events, mut handoff) = setup(Vec3::new(1.0, 0.0, 0.0));
        for _ in 0..11 {
            assert_eq!(handoff.step(DT, &roster, &mut ball, &mut events), None);
        }
        assert_eq!(handoff.state(), HandoffState::Waiting);
        assert_eq!(ball.carrier(), Some(handoff.giver()));

        // 12th tick crosses 1.2s (allowing for float accumulation)
        let mut outcome = None;
        for _ in 0..2 {
            outcome = outcome.or(handoff.step(DT, &roster, &mut ball, &mut events));
        }
        assert_eq!(outcome, Some(HandoffState::Completed));
        assert_eq!(ball.carrier(), Some(handoff.target()));
        let drained: Vec<_> = events.drain().collect();
        assert!(matches!(drained.last(), Some(SessionEvent::HandoffCompleted { .. })));
    }

    #[test]
    fn transfers_once_target_closes_in() {
        let (mut roster, mut ball, mut events, mut handoff) = setup(Vec3::new(0.0, 0.0, -8.0));
        let rb = handoff.target();
        let mut t = 0.0;
        while !handoff.is_finished() {
            // closing at 2 u/s from 8 units away; inside 4 units after 2s
            roster.move_by(rb, Vec3::new(0.0, 0.0, 2.0 * DT));
            handoff.step(DT, &roster, &mut ball, &mut events);
            t += DT;
            assert!(t < 5.0);
        }
        assert_eq!(handoff.state(), HandoffState::Completed);
        assert_eq!(ball.carrier(), Some(rb));
        assert!(t > 1.9 && t < 2.2, "completed at {t}");
    }

    #[test]
    fn times_out_without_changing_possession() {
        let (roster, mut ball, mut events, mut handoff) = setup(Vec3::new(0.0, 0.0, -10.0));
        let qb = handoff.giver();
        let mut ticks = 0;
        while !handoff.is_finished() {
            handoff.step(DT, &roster, &mut ball, &mut events);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(handoff.state(), HandoffState::TimedOut);
        assert_eq!(ball.carrier(), Some(qb));
        // 1.2s wait + 3s window
        assert!((41..=44).contains(&ticks), "ticks = {ticks}");
        let drained: Vec<_> = events.drain().collect();
        assert_eq!(drained, vec![SessionEvent::HandoffTimedOut { giver: qb, target: handoff.target() }]);
    }

    #[test]
    fn giver_without_ball_keeps_polling() {
        let (roster, mut ball, mut events, mut handoff) = setup(Vec3::new(2.0, 0.0, 0.0));
        let rb = handoff.target();
        ball.give_to(rb, &roster, &mut events);
        events.drain().for_each(drop);
        for _ in 0..20 {
            handoff.step(DT, &roster, &mut ball, &mut events);
        }
        assert_eq!(handoff.state(), HandoffState::Armed);
        assert!(events.is_empty());
    }

    #[test]
    fn finished_coordinator_ignores_further_steps() {
        let (roster, mut ball, mut events, mut handoff) = setup(Vec3::new(1.0, 0.0, 0.0));
        for _ in 0..20 {
            handoff.step(DT, &roster, &mut ball, &mut events);
        }
        assert_eq!(handoff.state(), HandoffState::Completed);
        let before = events.len();
        assert_eq!(handoff.step(DT, &roster, &mut ball, &mut events), None);
        assert_eq!(events.len(), before);
    }
}
