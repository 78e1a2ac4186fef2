//! Controllable participants and the roster that owns them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::play::Formation;
use super::role::Role;
use crate::engine::math::{Orientation, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub role: Role,
    pub team: u8,
    pub user_controllable: bool,
    pub position: Vec3,
    pub orientation: Orientation,
    /// Cleared pre-snap; the snap enables every entity.
    pub movement_enabled: bool,
    /// Set while a route runner drives the entity; blocks direct input.
    pub ai_controlled: bool,
    /// Whether this is the entity the user currently steers.
    pub has_control: bool,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, role: Role, team: u8, position: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            team,
            user_controllable: role.is_user_controllable(),
            position,
            orientation: Orientation::identity(),
            movement_enabled: false,
            ai_controlled: false,
            has_control: false,
        }
    }

    /// Direct input reaches the entity only when it is active, free to move and not scripted.
    pub fn accepts_input(&self) -> bool {
        self.has_control && self.movement_enabled && !self.ai_controlled
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        (self.position - point).norm()
    }
}

/// Explicit registry of every entity in the session, indexed by id and by role.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entities: Vec<Entity>,
    by_role: [Option<EntityId>; Role::COUNT],
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entity per formation slot, named after its role, all on `team`.
    pub fn from_formation(formation: &Formation, team: u8) -> Self {
        let mut roster = Self::new();
        for slot in &formation.slots {
            roster.spawn(slot.role.as_str(), slot.role, team, slot.position);
        }
        roster
    }

    /// Adds an entity. A second entity for an already-filled role replaces the role index entry.
    pub fn spawn(&mut self, name: impl Into<String>, role: Role, team: u8, position: Vec3) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::new(id, name, role, team, position));
        self.by_role[role.index()] = Some(id);
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn id_for_role(&self, role: Role) -> Option<EntityId> {
        self.by_role[role.index()]
    }

    pub fn by_role(&self, role: Role) -> Option<&Entity> {
        self.id_for_role(role).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.get(id).map(|e| e.position)
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.get_mut(id) {
            entity.position = position;
        }
    }

    pub fn move_by(&mut self, id: EntityId, delta: Vec3) {
        if let Some(entity) = self.get_mut(id) {
            entity.position += delta;
        }
    }

    /// User-controllable entities sorted QB, RB, WR1, WR2, TE1, TE2.
    pub fn controllable_in_priority(&self) -> Vec<EntityId> {
        let mut ids: Vec<(usize, EntityId)> = self
            .entities
            .iter()
            .filter(|e| e.user_controllable)
            .filter_map(|e| e.role.control_priority().map(|p| (p, e.id)))
            .collect();
        ids.sort_by_key(|(priority, id)| (*priority, *id));
        ids.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::playbook::single_back;

    #[test]
    fn formation_spawns_every_role_once() {
        let roster = Roster::from_formation(&single_back(), 0);
        assert_eq!(roster.len(), Role::COUNT);
        for role in Role::ALL {
            let entity = roster.by_role(role).expect("role present");
            assert_eq!(entity.role, role);
            assert_eq!(entity.name, role.as_str());
            assert!(!entity.movement_enabled);
        }
    }

    #[test]
    fn priority_order_skips_linemen() {
        let roster = Roster::from_formation(&single_back(), 0);
        let roles: Vec<Role> = roster
            .controllable_in_priority()
            .into_iter()
            .map(|id| roster.get(id).unwrap().role)
            .collect();
        assert_eq!(roles, Role::CONTROL_PRIORITY.to_vec());
    }

    #[test]
    fn move_by_updates_position() {
        let mut roster = Roster::new();
        let id = roster.spawn("Runner", Role::Rb, 0, Vec3::zeros());
        roster.move_by(id, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(roster.position(id), Some(Vec3::new(1.0, 0.0, 2.0)));
        // Unknown ids are ignored.
        roster.move_by(EntityId(99), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn accepts_input_requires_all_flags() {
        let mut e = Entity::new(EntityId(0), "QB", Role::Qb, 0, Vec3::zeros());
        assert!(!e.accepts_input());
        e.has_control = true;
        e.movement_enabled = true;
        assert!(e.accepts_input());
        e.ai_controlled = true;
        assert!(!e.accepts_input());
    }
}
