//! # gridiron_core - Play Execution Core for an American Football Prototype
//!
//! Runs one offensive play at a time: a snapped ball, scripted routes for
//! every eligible player, a timed QB→RB handoff or a targeted pass, and
//! user control that follows the ball.
//!
//! ## Features
//! - Single-owner [`Session`] ticked with a fixed `dt`, no hidden globals
//! - Ball possession state machine with auto-catch
//! - Waypoint route runners with user override
//! - Playbooks and tuning loadable from YAML or JSON
//!
//! Rendering, input devices and physics stay outside: hosts plug them in
//! through the traits in [`engine::collaborators`].

// Game loop APIs pass roster, ball, indicator, camera and events together
#![allow(clippy::too_many_arguments)]
// Config presets tweak a default wholesale
#![allow(clippy::field_reassign_with_default)]
// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]

pub mod engine;
pub mod error;
pub mod models;

pub use engine::collaborators::{Button, InputFrame, InputSource};
pub use engine::config::EngineConfig;
pub use engine::events::SessionEvent;
pub use engine::possession::BallState;
pub use engine::session::{GamePhase, Session};
pub use error::{PlayError, Result};
pub use models::{EntityId, Play, PlayCatalog, PlayType, Role, Roster, PLAYBOOK};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
