//! Seams to the outside world: input, ball ballistics, indicators, camera.
//!
//! The core never polls devices or renders anything. Hosts implement these
//! traits (or use the in-memory versions here) and hand them to the session.

use std::collections::BTreeMap;

use super::math::{Vec2, Vec3};
use crate::models::EntityId;

// ========== Input ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Switch player / snap / pass, depending on the phase.
    Switch,
    /// Confirm in the play menu; rebuilds the formation after a play.
    Select,
    /// Sprint modifier.
    Run,
    Up,
    Down,
}

impl Button {
    pub const ALL: [Button; 5] = [Button::Switch, Button::Select, Button::Run, Button::Up, Button::Down];

    /// Buttons that trigger an action; `Run` only modifies movement.
    pub const ACTIONS: [Button; 4] = [Button::Switch, Button::Select, Button::Up, Button::Down];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

pub trait InputSource {
    /// Stick vector, each axis in [-1, 1]. `y` is downfield.
    fn directional(&self) -> Vec2;
    /// Pressed this tick (down edge).
    fn button_edge(&self, button: Button) -> bool;
    fn button_held(&self, button: Button) -> bool;
}

/// One tick of input, sampled once and read by every consumer that tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    pub direction: Vec2,
    edges: u8,
    held: u8,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn sample(source: &dyn InputSource) -> Self {
        let mut frame = Self { direction: source.directional(), ..Self::default() };
        for button in Button::ALL {
            if source.button_edge(button) {
                frame.edges |= button.bit();
            }
            if source.button_held(button) {
                frame.held |= button.bit();
            }
        }
        frame
    }

    pub fn with_direction(mut self, x: f32, y: f32) -> Self {
        self.direction = Vec2::new(x, y);
        self
    }

    /// Down edge; the button also counts as held.
    pub fn press(mut self, button: Button) -> Self {
        self.edges |= button.bit();
        self.held |= button.bit();
        self
    }

    pub fn hold(mut self, button: Button) -> Self {
        self.held |= button.bit();
        self
    }

    /// First action edge in priority order. Only this one is dispatched.
    pub fn first_edge(&self) -> Option<Button> {
        Button::ACTIONS.into_iter().find(|b| self.edges & b.bit() != 0)
    }
}

impl InputSource for InputFrame {
    fn directional(&self) -> Vec2 {
        self.direction
    }

    fn button_edge(&self, button: Button) -> bool {
        self.edges & button.bit() != 0
    }

    fn button_held(&self, button: Button) -> bool {
        self.held & button.bit() != 0
    }
}

// ========== Ball physics ==========

/// Kinematic state handed to the physics collaborator while the ball is loose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Touching the ground this tick.
    pub grounded: bool,
}

impl BallBody {
    pub fn at(position: Vec3) -> Self {
        Self { position, velocity: Vec3::zeros(), grounded: false }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

pub trait BallPhysics {
    fn integrate(&mut self, body: &mut BallBody, dt: f32);
}

/// Gravity, linear drag, a damped bounce and rolling friction. Enough to
/// bring a thrown ball down and to rest; not a flight model.
#[derive(Debug, Clone)]
pub struct SimpleBallistics {
    pub gravity: f32,
    pub drag: f32,
    /// Resting height of the ball's center.
    pub ground_height: f32,
    pub restitution: f32,
    pub rolling_friction: f32,
}

impl Default for SimpleBallistics {
    fn default() -> Self {
        Self { gravity: 9.81, drag: 0.3, ground_height: 0.11, restitution: 0.3, rolling_friction: 2.0 }
    }
}

impl BallPhysics for SimpleBallistics {
    fn integrate(&mut self, body: &mut BallBody, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        body.velocity.y -= self.gravity * dt;
        body.velocity *= (1.0 - self.drag * dt).max(0.0);
        body.position += body.velocity * dt;

        body.grounded = body.position.y <= self.ground_height;
        if !body.grounded {
            return;
        }
        body.position.y = self.ground_height;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * self.restitution;
            // small hops die out instead of jittering forever
            if body.velocity.y < 1.0 {
                body.velocity.y = 0.0;
            }
        }
        let friction = (1.0 - self.rolling_friction * dt).max(0.0);
        body.velocity.x *= friction;
        body.velocity.z *= friction;
        if body.velocity.y == 0.0 && (body.velocity.x.abs() + body.velocity.z.abs()) < 0.05 {
            body.velocity = Vec3::zeros();
        }
    }
}

// ========== Indicators ==========

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const CLEAR: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
}

/// Marker shown over the entity the user controls.
pub trait Indicator {
    fn set_active(&mut self, entity: EntityId, active: bool);
    fn set_color(&mut self, entity: EntityId, color: Color);
    /// Forget every entity (formation rebuild).
    fn clear(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    pub active: bool,
    pub color: Color,
}

/// In-memory indicator sink; what a renderer would draw.
#[derive(Debug, Clone, Default)]
pub struct IndicatorBoard {
    states: BTreeMap<EntityId, IndicatorState>,
}

impl IndicatorBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, entity: EntityId) -> Option<IndicatorState> {
        self.states.get(&entity).copied()
    }

    pub fn is_active(&self, entity: EntityId) -> bool {
        self.states.get(&entity).map_or(false, |s| s.active)
    }

    pub fn active_entities(&self) -> Vec<EntityId> {
        self.states.iter().filter(|(_, s)| s.active).map(|(id, _)| *id).collect()
    }

    fn entry(&mut self, entity: EntityId) -> &mut IndicatorState {
        self.states.entry(entity).or_insert(IndicatorState { active: false, color: Color::RED })
    }
}

impl Indicator for IndicatorBoard {
    fn set_active(&mut self, entity: EntityId, active: bool) {
        self.entry(entity).active = active;
    }

    fn set_color(&mut self, entity: EntityId, color: Color) {
        self.entry(entity).color = color;
    }

    fn clear(&mut self) {
        self.states.clear();
    }
}

// ========== Camera ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTarget {
    Entity(EntityId),
    Ball,
}

pub trait Camera {
    fn set_target(&mut self, target: CameraTarget);
    fn target(&self) -> Option<CameraTarget>;
    /// Jump straight to the framing for `focus`.
    fn snap(&mut self, focus: Vec3);
    /// Ease toward the framing for `focus`.
    fn follow(&mut self, focus: Vec3, dt: f32);
    fn position(&self) -> Vec3;
}
