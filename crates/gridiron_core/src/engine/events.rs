//! In-process event queue. Components push during the tick; the session
//! drains once per tick in push order.

use serde::Serialize;
use std::collections::VecDeque;

use crate::models::{EntityId, Role};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    PlaySelected { play: String },
    BallSnapped { passer: Option<EntityId> },
    PlayStarted { play: String },
    CarrierChanged { previous: Option<EntityId>, carrier: EntityId },
    BallCaught { receiver: EntityId },
    BallThrown { passer: EntityId, target: Option<EntityId> },
    BallLoose,
    HandoffCompleted { giver: EntityId, target: EntityId },
    HandoffTimedOut { giver: EntityId, target: EntityId },
    RouteCompleted { entity: EntityId, role: Role },
    RouteCanceled { entity: EntityId, role: Role },
    ControlSwitched { from: Option<EntityId>, to: EntityId },
    PlayCompleted { play: String },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<SessionEvent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.pending.drain(..)
    }
}
