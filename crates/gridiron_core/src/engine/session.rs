//! # Session
//!
//! Root context for one game: owns the roster, ball, director, control
//! switch, menu and collaborators, and advances them in dependency order
//! once per [`Session::step`].
//!
//! Game flow:
//!
//! | phase      | button edge        | effect                                   |
//! |------------|--------------------|------------------------------------------|
//! | `PrePlay`  | Up / Down / Select | drive the play menu; Select → `Ready`    |
//! | `PrePlay`  | Switch             | re-open a hidden menu                    |
//! | `Ready`    | Switch / Select    | snap → `Live`                            |
//! | `Live`     | Switch             | pass (QB with ball, pass play) or switch |
//! | `PostPlay` | Select             | rebuild formation → `PrePlay`            |
//!
//! ```rust
//! use gridiron_core::engine::collaborators::InputFrame;
//! use gridiron_core::engine::config::EngineConfig;
//! use gridiron_core::engine::session::{GamePhase, Session};
//!
//! let mut session = Session::new(EngineConfig::default());
//! session.select_play("Mesh").unwrap();
//! assert!(session.snap());
//! session.advance(0.5, 1.0 / 60.0, &InputFrame::idle());
//! assert_eq!(session.phase(), GamePhase::Live);
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use super::camera::FollowCamera;
use super::collaborators::{
    BallPhysics, Button, Camera, CameraTarget, Color, Indicator, IndicatorBoard, InputFrame,
    InputSource, SimpleBallistics,
};
use super::config::EngineConfig;
use super::control_switch::ControlSwitch;
use super::events::{EventQueue, SessionEvent};
use super::math::{input_to_world, Vec3};
use super::pass_targeting::PassTargeting;
use super::play_director::PlayDirector;
use super::play_selector::PlaySelector;
use super::player_motion::PlayerMotion;
use super::possession::{BallState, Possession};
use crate::error::{PlayError, Result};
use crate::models::playbook::{single_back, PlayCatalog};
use crate::models::{EntityId, Formation, Play, Role, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    PrePlay,
    Ready,
    Live,
    PostPlay,
}

pub struct Session<V = IndicatorBoard, C = FollowCamera> {
    config: EngineConfig,
    catalog: PlayCatalog,
    roster: Roster,
    ball: Possession,
    physics: Box<dyn BallPhysics>,
    director: PlayDirector,
    switch: ControlSwitch,
    selector: PlaySelector,
    motion: PlayerMotion,
    targeting: PassTargeting,
    indicator: V,
    camera: C,
    events: EventQueue,
    phase: GamePhase,
    selected: Option<Play>,
    clock: f32,
}

impl Session {
    /// Built-in playbook, in-memory indicators, follow camera, simple ballistics.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_catalog(config, PlayCatalog::builtin())
    }

    pub fn with_catalog(config: EngineConfig, catalog: PlayCatalog) -> Self {
        let camera = FollowCamera::new(&config.camera);
        Self::with_collaborators(
            config,
            catalog,
            IndicatorBoard::new(),
            camera,
            Box::new(SimpleBallistics::default()),
        )
    }
}

impl<V: Indicator, C: Camera> Session<V, C> {
    pub fn with_collaborators(
        config: EngineConfig,
        catalog: PlayCatalog,
        indicator: V,
        camera: C,
        physics: Box<dyn BallPhysics>,
    ) -> Self {
        let mut session = Self {
            ball: Possession::new(&config.ball),
            director: PlayDirector::new(&config.movement, &config.play),
            switch: ControlSwitch::new(config.play.switch_cooldown),
            selector: PlaySelector::new(catalog.len(), config.play.selector_cooldown),
            motion: PlayerMotion::new(&config.movement),
            targeting: PassTargeting::new(config.movement.input_deadband, config.ball.throw_force),
            roster: Roster::new(),
            physics,
            indicator,
            camera,
            events: EventQueue::new(),
            phase: GamePhase::PrePlay,
            selected: None,
            clock: 0.0,
            catalog,
            config,
        };
        let formation = session.default_play().map_or_else(single_back, |p| p.formation.clone());
        session.rebuild_formation(&formation);
        session.selector.show();
        session
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PlayCatalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Direct transform access for hosts that move entities themselves.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn ball(&self) -> &Possession {
        &self.ball
    }

    pub fn director(&self) -> &PlayDirector {
        &self.director
    }

    pub fn control(&self) -> &ControlSwitch {
        &self.switch
    }

    pub fn selector(&self) -> &PlaySelector {
        &self.selector
    }

    pub fn indicator(&self) -> &V {
        &self.indicator
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn selected_play(&self) -> Option<&Play> {
        self.selected.as_ref()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn active_entity(&self) -> Option<EntityId> {
        self.switch.active()
    }

    pub fn entity_for(&self, role: Role) -> Option<EntityId> {
        self.roster.id_for_role(role)
    }

    fn default_play(&self) -> Option<&Play> {
        self.catalog.get(&self.config.play.default_play).or_else(|| self.catalog.at(0))
    }

    // ========== Commands ==========

    /// Extra plays from a YAML or JSON playbook file.
    pub fn load_playbook(&mut self, path: impl AsRef<std::path::Path>) -> Result<usize> {
        let added = self.catalog.extend_from_path(path)?;
        self.selector.set_len(self.catalog.len());
        Ok(added)
    }

    /// Pick a play by name, bypassing the menu. Rebuilds the formation.
    pub fn select_play(&mut self, name: &str) -> Result<()> {
        if self.phase == GamePhase::Live {
            return Err(PlayError::InvalidPlay {
                play: name.to_string(),
                reason: "a play is already live".into(),
            });
        }
        let play = self.catalog.require(name)?.clone();
        self.selector.hide();
        self.apply_selection(play);
        Ok(())
    }

    /// Starts the selected play (or the default one). Only before a play.
    pub fn snap(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::PrePlay | GamePhase::Ready) {
            return false;
        }
        let Some(play) = self.selected.clone().or_else(|| self.default_play().cloned()) else {
            warn!("no play available to snap");
            return false;
        };
        if self.selected.is_none() {
            info!("no play selected, running default '{}'", play.name);
            self.rebuild_formation(&play.formation);
        }

        self.selector.hide();
        for entity in self.roster.iter_mut() {
            entity.movement_enabled = true;
        }
        let passer = self.roster.id_for_role(Role::Qb);
        self.ball.snap(passer, &self.roster, &mut self.events);
        self.director.start(&play, &mut self.roster, &mut self.events);
        self.selected = Some(play);
        self.switch.start_cooldown();
        self.set_phase(GamePhase::Live);
        true
    }

    /// Throw from the current carrier toward the best receiver for `direction`.
    pub fn pass(&mut self, direction: Vec3) -> bool {
        if self.phase != GamePhase::Live {
            return false;
        }
        let Some(passer) = self.ball.carrier() else {
            return false;
        };
        let Some(carrier_position) = self.roster.position(passer) else {
            return false;
        };
        let plan = self.targeting.plan(
            direction,
            self.ball.position(),
            carrier_position,
            &self.roster,
            |id| self.director.route_velocity(id, &self.roster),
        );
        let Some(plan) = plan else {
            debug!("no pass target for direction {direction:?}");
            return false;
        };
        if !self.ball.throw_to(plan.velocity()) {
            return false;
        }
        if let Some(target) = self.roster.get(plan.target) {
            info!("pass to {} ({}) with force {:.1}", target.name, target.role, plan.force);
        }
        self.events.push(SessionEvent::BallThrown { passer, target: Some(plan.target) });
        true
    }

    pub fn switch_to_next(&mut self) -> bool {
        self.switch.switch_to_next(&mut self.roster, &mut self.indicator, &mut self.camera, &mut self.events)
    }

    /// After a play: rebuild the last formation and re-open the menu.
    pub fn reset_formation(&mut self) -> bool {
        if self.phase == GamePhase::Live {
            return false;
        }
        let formation = match &self.selected {
            Some(play) => play.formation.clone(),
            None => self.default_play().map_or_else(single_back, |p| p.formation.clone()),
        };
        self.rebuild_formation(&formation);
        self.selected = None;
        self.selector.show();
        self.set_phase(GamePhase::PrePlay);
        true
    }

    // ========== Tick ==========

    /// One frame. Returns the events handled this tick, in order.
    pub fn step(&mut self, dt: f32, input: &dyn InputSource) -> Vec<SessionEvent> {
        let frame = InputFrame::sample(input);
        self.clock += dt;
        self.switch.step(dt);
        self.selector.step(dt);

        self.dispatch(&frame);
        self.motion.step(dt, &frame, &mut self.roster, self.switch.active());
        self.director.step(dt, &mut self.roster, &frame, &mut self.events);
        self.ball.step(dt, &self.roster, self.physics.as_mut(), &mut self.events);
        self.director.step_handoff(dt, &self.roster, &mut self.ball, &mut self.events);
        let handled = self.drain_events();
        self.update_camera(dt);

        debug_assert!(
            self.check_invariants().is_ok(),
            "invariant violated: {:?}",
            self.check_invariants()
        );
        handled
    }

    /// Steps with the same input for `seconds`; the input's edges repeat
    /// every tick, so pass held input only.
    pub fn advance(&mut self, seconds: f32, dt: f32, input: &dyn InputSource) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if !(dt.is_finite() && dt > 0.0) || !seconds.is_finite() {
            warn!("advance ignored: dt {dt}, seconds {seconds}");
            return events;
        }
        let ticks = (seconds / dt).round().max(0.0) as usize;
        for _ in 0..ticks {
            events.extend(self.step(dt, input));
        }
        events
    }

    /// The single action edge of the tick goes to whichever system owns it
    /// in the current phase.
    fn dispatch(&mut self, frame: &InputFrame) {
        let Some(button) = frame.first_edge() else {
            return;
        };
        match (self.phase, button) {
            (GamePhase::PrePlay, Button::Switch) => {
                if self.selector.is_visible() {
                    debug!("play menu open; waiting for a selection");
                } else if self.switch.cooldown_ready() {
                    self.selector.show();
                    self.switch.start_cooldown();
                }
            }
            (GamePhase::PrePlay, Button::Up) => {
                self.selector.navigate_up();
            }
            (GamePhase::PrePlay, Button::Down) => {
                self.selector.navigate_down();
            }
            (GamePhase::PrePlay, Button::Select) => {
                if let Some(play) = self.selector.select().and_then(|i| self.catalog.at(i)).cloned() {
                    self.apply_selection(play);
                }
            }
            (GamePhase::Ready, Button::Switch | Button::Select) => {
                if self.switch.cooldown_ready() {
                    self.snap();
                }
            }
            (GamePhase::Live, Button::Switch) => {
                if self.switch.cooldown_ready() {
                    self.live_switch(frame);
                }
            }
            (GamePhase::PostPlay, Button::Select) => {
                self.reset_formation();
            }
            _ => {}
        }
    }

    fn live_switch(&mut self, frame: &InputFrame) {
        let active = self.switch.active();
        let active_is_passer = active
            .and_then(|id| self.roster.get(id))
            .map_or(false, |e| e.role == Role::Qb);
        let pass_play = self.selected.as_ref().map_or(false, |p| p.is_pass());

        // The passer's button belongs to the throw for the whole pass play.
        if active_is_passer && pass_play {
            if self.ball.carrier() == active {
                self.pass(input_to_world(frame.direction));
            } else {
                debug!("passer has no ball; switch ignored");
            }
            self.switch.start_cooldown();
            return;
        }
        if !self.config.play.auto_switch_to_carrier {
            self.switch_to_next();
        }
    }

    fn apply_selection(&mut self, play: Play) {
        self.rebuild_formation(&play.formation);
        info!("play selected: {} ({})", play.name, play.description);
        self.events.push(SessionEvent::PlaySelected { play: play.name.clone() });
        self.selected = Some(play);
        self.set_phase(GamePhase::Ready);
    }

    /// Fresh roster in `formation`: ball to the center, control and camera
    /// to the first controllable entity, everyone frozen until the snap.
    fn rebuild_formation(&mut self, formation: &Formation) {
        if self.director.is_active() {
            self.director.end(&mut self.roster, &mut self.events);
        }
        self.roster = Roster::from_formation(formation, 0);
        self.indicator.clear();
        for entity in self.roster.iter() {
            self.indicator.set_color(entity.id, Color::BLUE);
        }
        self.ball.reset(self.roster.id_for_role(Role::C), &self.roster);
        self.switch.rebuild(&mut self.roster, &mut self.indicator, &mut self.camera);
        debug!("formation '{}' set with {} entities", formation.name, self.roster.len());
    }

    fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut handled = Vec::new();
        while let Some(event) = self.events.pop() {
            self.handle_event(&event);
            handled.push(event);
        }
        handled
    }

    fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::CarrierChanged { carrier, .. } => {
                if self.config.play.auto_switch_to_carrier && self.phase != GamePhase::PrePlay {
                    self.switch.switch_to(
                        *carrier,
                        &mut self.roster,
                        &mut self.indicator,
                        &mut self.camera,
                        &mut self.events,
                    );
                }
            }
            SessionEvent::BallCaught { receiver } => {
                self.camera.set_target(CameraTarget::Entity(*receiver));
                self.switch.switch_to(
                    *receiver,
                    &mut self.roster,
                    &mut self.indicator,
                    &mut self.camera,
                    &mut self.events,
                );
            }
            SessionEvent::HandoffCompleted { target, .. } => {
                self.switch.switch_to(
                    *target,
                    &mut self.roster,
                    &mut self.indicator,
                    &mut self.camera,
                    &mut self.events,
                );
            }
            SessionEvent::BallThrown { .. } => self.camera.set_target(CameraTarget::Ball),
            SessionEvent::PlayCompleted { .. } => self.set_phase(GamePhase::PostPlay),
            _ => {}
        }
    }

    fn update_camera(&mut self, dt: f32) {
        let focus = match self.camera.target() {
            Some(CameraTarget::Entity(id)) => self.roster.position(id),
            Some(CameraTarget::Ball) => Some(self.ball.position()),
            None => None,
        };
        if let Some(focus) = focus {
            self.camera.follow(focus, dt);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Exactly one controlled entity (when any are controllable) and a ball
    /// state consistent with its kinematics.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let controlled: Vec<EntityId> =
            self.roster.iter().filter(|e| e.has_control).map(|e| e.id).collect();
        let expected = usize::from(!self.switch.order().is_empty());
        if controlled.len() != expected {
            return Err(format!("{} controlled entities, expected {expected}", controlled.len()));
        }
        if let Some(active) = self.switch.active() {
            if controlled != [active] {
                return Err(format!("active entity {active} does not hold control"));
            }
        }

        match self.ball.state() {
            BallState::Carried(carrier) => {
                let Some(position) = self.roster.position(carrier) else {
                    return Err(format!("carrier {carrier} is not in the roster"));
                };
                let pinned = position + self.ball.carry_offset();
                if (self.ball.position() - pinned).norm() > 1e-4 {
                    return Err(format!("carried ball drifted from {carrier}"));
                }
                if self.ball.velocity() != Vec3::zeros() {
                    return Err("carried ball has velocity".into());
                }
            }
            BallState::Free => {
                if self.ball.velocity() != Vec3::zeros() {
                    return Err("free ball is moving".into());
                }
            }
            BallState::InFlight => {}
        }
        Ok(())
    }
}
