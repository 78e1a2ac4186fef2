//! Which entity the user controls, and where the camera looks.

use tracing::{debug, info};

use super::collaborators::{Camera, CameraTarget, Indicator};
use super::events::{EventQueue, SessionEvent};
use crate::models::{EntityId, Roster};

#[derive(Debug, Clone)]
pub struct ControlSwitch {
    /// Controllable entities in priority order (QB, RB, WR1, WR2, TE1, TE2).
    order: Vec<EntityId>,
    active: usize,
    cooldown: f32,
    cooldown_remaining: f32,
}

impl ControlSwitch {
    pub fn new(cooldown: f32) -> Self {
        Self { order: Vec::new(), active: 0, cooldown, cooldown_remaining: 0.0 }
    }

    pub fn order(&self) -> &[EntityId] {
        &self.order
    }

    pub fn active(&self) -> Option<EntityId> {
        self.order.get(self.active).copied()
    }

    pub fn cooldown_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Shared by every action on the switch button (snap, pass, switch).
    pub fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    pub fn step(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// New roster: take the priority order and hand control to its first
    /// entity, snapping the camera to it.
    pub fn rebuild(&mut self, roster: &mut Roster, indicator: &mut dyn Indicator, camera: &mut dyn Camera) {
        self.order = roster.controllable_in_priority();
        self.active = 0;
        self.cooldown_remaining = 0.0;
        for entity in roster.iter_mut() {
            entity.has_control = false;
            indicator.set_active(entity.id, false);
        }
        if let Some(first) = self.active() {
            set_control(roster, indicator, first, true);
            camera.set_target(CameraTarget::Entity(first));
            if let Some(position) = roster.position(first) {
                camera.snap(position);
            }
        }
    }

    /// Circular advance, rate-limited by the global cooldown.
    pub fn switch_to_next(
        &mut self,
        roster: &mut Roster,
        indicator: &mut dyn Indicator,
        camera: &mut dyn Camera,
        events: &mut EventQueue,
    ) -> bool {
        if self.order.len() <= 1 {
            return false;
        }
        if !self.cooldown_ready() {
            debug!("switch blocked, cooldown {:.2}s left", self.cooldown_remaining);
            return false;
        }
        self.start_cooldown();
        let next = (self.active + 1) % self.order.len();
        self.activate(next, roster, indicator, camera, events);
        if let Some(position) = self.active().and_then(|id| roster.position(id)) {
            camera.snap(position);
        }
        true
    }

    /// Explicit retarget (possession changes). Entities outside the order are
    /// ignored; the already-active entity is a no-op.
    pub fn switch_to(
        &mut self,
        entity: EntityId,
        roster: &mut Roster,
        indicator: &mut dyn Indicator,
        camera: &mut dyn Camera,
        events: &mut EventQueue,
    ) -> bool {
        let Some(index) = self.order.iter().position(|id| *id == entity) else {
            debug!("{entity} is not user-controllable; control unchanged");
            return false;
        };
        if index == self.active {
            return false;
        }
        self.activate(index, roster, indicator, camera, events);
        true
    }

    fn activate(
        &mut self,
        index: usize,
        roster: &mut Roster,
        indicator: &mut dyn Indicator,
        camera: &mut dyn Camera,
        events: &mut EventQueue,
    ) {
        let from = self.active();
        if let Some(from) = from {
            set_control(roster, indicator, from, false);
        }
        self.active = index;
        let to = self.order[index];
        set_control(roster, indicator, to, true);
        camera.set_target(CameraTarget::Entity(to));
        events.push(SessionEvent::ControlSwitched { from, to });
        if let Some(entity) = roster.get(to) {
            info!("now controlling {} ({})", entity.name, entity.role);
        }
    }
}

fn set_control(roster: &mut Roster, indicator: &mut dyn Indicator, entity: EntityId, enabled: bool) {
    if let Some(e) = roster.get_mut(entity) {
        e.has_control = enabled;
    }
    indicator.set_active(entity, enabled);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::FollowCamera;
    use crate::engine::collaborators::IndicatorBoard;
    use crate::engine::config::CameraConfig;
    use crate::models::playbook::single_back;
    use crate::models::Role;

    struct Fixture {
        roster: Roster,
        indicator: IndicatorBoard,
        camera: FollowCamera,
        events: EventQueue,
        switch: ControlSwitch,
    }

    impl Fixture {
        fn new() -> Self {
            let mut f = Fixture {
                roster: Roster::from_formation(&single_back(), 0),
                indicator: IndicatorBoard::new(),
                camera: FollowCamera::new(&CameraConfig::default()),
                events: EventQueue::new(),
                switch: ControlSwitch::new(0.3),
            };
            f.switch.rebuild(&mut f.roster, &mut f.indicator, &mut f.camera);
            f
        }

        fn next(&mut self) -> bool {
            self.switch.switch_to_next(&mut self.roster, &mut self.indicator, &mut self.camera, &mut self.events)
        }

        fn to(&mut self, entity: EntityId) -> bool {
            self.switch.switch_to(entity, &mut self.roster, &mut self.indicator, &mut self.camera, &mut self.events)
        }

        fn active_role(&self) -> Role {
            self.roster.get(self.switch.active().unwrap()).unwrap().role
        }

        fn controlled_count(&self) -> usize {
            self.roster.iter().filter(|e| e.has_control).count()
        }
    }

    #[test]
    fn rebuild_starts_on_the_quarterback() {
        let f = Fixture::new();
        assert_eq!(f.active_role(), Role::Qb);
        assert_eq!(f.controlled_count(), 1);
        let qb = f.switch.active().unwrap();
        assert_eq!(f.indicator.active_entities(), vec![qb]);
        assert_eq!(f.camera.target(), Some(CameraTarget::Entity(qb)));
    }

    #[test]
    fn next_cycles_through_priority_order_with_cooldown() {
        let mut f = Fixture::new();
        let mut seen = vec![f.active_role()];
        for _ in 0..6 {
            assert!(f.next());
            assert!(!f.next(), "second press inside the cooldown is dropped");
            f.switch.step(0.31);
            seen.push(f.active_role());
            assert_eq!(f.controlled_count(), 1);
        }
        assert_eq!(
            seen,
            vec![Role::Qb, Role::Rb, Role::Wr1, Role::Wr2, Role::Te1, Role::Te2, Role::Qb]
        );
    }

    #[test]
    fn switch_to_ignores_linemen_and_current() {
        let mut f = Fixture::new();
        let center = f.roster.id_for_role(Role::C).unwrap();
        let qb = f.roster.id_for_role(Role::Qb).unwrap();
        assert!(!f.to(center));
        assert!(!f.to(qb));
        assert!(f.events.is_empty());
        assert_eq!(f.active_role(), Role::Qb);
    }

    #[test]
    fn switch_to_moves_control_indicator_and_camera() {
        let mut f = Fixture::new();
        let qb = f.roster.id_for_role(Role::Qb).unwrap();
        let te2 = f.roster.id_for_role(Role::Te2).unwrap();
        assert!(f.to(te2));
        assert!(f.roster.get(te2).unwrap().has_control);
        assert!(!f.roster.get(qb).unwrap().has_control);
        assert!(f.indicator.is_active(te2));
        assert!(!f.indicator.is_active(qb));
        assert_eq!(f.camera.target(), Some(CameraTarget::Entity(te2)));
        let drained: Vec<_> = f.events.drain().collect();
        assert_eq!(drained, vec![SessionEvent::ControlSwitched { from: Some(qb), to: te2 }]);
    }
}
