pub mod camera;
pub mod collaborators;
pub mod config;
pub mod control_switch;
pub mod events;
pub mod handoff;
pub mod math;
pub mod pass_targeting;
pub mod play_director;
pub mod play_selector;
pub mod player_motion;
pub mod possession;
pub mod route_runner;
pub mod session;

pub use camera::FollowCamera;
pub use collaborators::{
    BallBody, BallPhysics, Button, Camera, CameraTarget, Color, Indicator, IndicatorBoard,
    InputFrame, InputSource, SimpleBallistics,
};
pub use config::EngineConfig;
pub use control_switch::ControlSwitch;
pub use events::{EventQueue, SessionEvent};
pub use handoff::{HandoffCoordinator, HandoffState};
pub use pass_targeting::{PassPlan, PassTargeting};
pub use play_director::PlayDirector;
pub use play_selector::PlaySelector;
pub use player_motion::PlayerMotion;
pub use possession::{BallState, Possession};
pub use route_runner::{RouteRunner, RunnerOutcome, RunnerState};
pub use session::{GamePhase, Session};
