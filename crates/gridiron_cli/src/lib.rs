//! Headless play runner
//!
//! Scripted sessions for the command line and CI: load tuning and extra
//! plays, run one play to completion, report what happened.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use gridiron_core::engine::handoff::HandoffState;
use gridiron_core::{
    BallState, Button, EngineConfig, GamePhase, InputFrame, PlayCatalog, Role, Session,
    SessionEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Realistic,
    Arcade,
}

impl Preset {
    pub fn config(self) -> EngineConfig {
        match self {
            Preset::Realistic => EngineConfig::realistic(),
            Preset::Arcade => EngineConfig::arcade(),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "realistic" => Ok(Preset::Realistic),
            "arcade" => Ok(Preset::Arcade),
            other => Err(format!("unknown preset '{other}' (expected realistic or arcade)")),
        }
    }
}

/// Tuning file if given, otherwise the preset.
pub fn load_config(path: Option<&Path>, preset: Preset) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(preset.config()),
    }
}

/// Built-in plays plus any playbook files, in order.
pub fn load_catalog(playbooks: &[impl AsRef<Path>]) -> Result<PlayCatalog> {
    let mut catalog = PlayCatalog::builtin();
    for path in playbooks {
        let path = path.as_ref();
        let added = catalog
            .extend_from_path(path)
            .with_context(|| format!("loading playbook {}", path.display()))?;
        info!("loaded {} plays from {}", added, path.display());
    }
    Ok(catalog)
}

/// One scripted throw: at `at` seconds after the snap, push the stick
/// toward `direction` and press switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedPass {
    pub at: f32,
    pub direction: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub play: Option<String>,
    pub dt: f32,
    /// Hard stop even if the play has not ended.
    pub max_seconds: f32,
    pub pass: Option<ScriptedPass>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { play: None, dt: 1.0 / 60.0, max_seconds: 15.0, pass: None }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedEvent {
    pub time: f32,
    #[serde(flatten)]
    pub event: SessionEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub version: &'static str,
    pub play: String,
    pub ticks: usize,
    pub seconds: f32,
    pub completed: bool,
    pub ball: BallState,
    pub carrier_role: Option<Role>,
    pub handoff: Option<HandoffState>,
    pub events: Vec<TimedEvent>,
}

/// Snap one play and tick it until it completes or `max_seconds` runs out.
pub fn run_play(config: EngineConfig, catalog: PlayCatalog, options: &RunOptions) -> Result<RunReport> {
    if !(options.dt.is_finite() && options.dt > 0.0) {
        bail!("dt must be > 0, got {}", options.dt);
    }
    let mut session = Session::with_catalog(config, catalog);
    if let Some(name) = &options.play {
        session.select_play(name)?;
    }
    if !session.snap() {
        bail!("nothing to snap: the playbook is empty");
    }
    let play = session.selected_play().map(|p| p.name.clone()).unwrap_or_default();
    info!("running '{}' for at most {:.1}s", play, options.max_seconds);

    let start = session.clock();
    let mut events = Vec::new();
    let mut ticks = 0;
    let mut passed = false;
    while session.phase() == GamePhase::Live && session.clock() - start < options.max_seconds {
        let elapsed = session.clock() - start;
        let frame = match options.pass {
            Some(pass) if !passed && elapsed >= pass.at => {
                passed = true;
                InputFrame::idle().with_direction(pass.direction.0, pass.direction.1).press(Button::Switch)
            }
            _ => InputFrame::idle(),
        };
        for event in session.step(options.dt, &frame) {
            events.push(TimedEvent { time: session.clock() - start, event });
        }
        ticks += 1;
    }
    if let Some(pass) = options.pass {
        let thrown = events.iter().any(|e| matches!(e.event, SessionEvent::BallThrown { .. }));
        if !thrown {
            warn!("scripted pass at {:.2}s did not leave the passer's hand", pass.at);
        }
    }

    let carrier_role = session.ball().carrier().and_then(|id| session.roster().get(id)).map(|e| e.role);
    Ok(RunReport {
        version: gridiron_core::VERSION,
        play,
        ticks,
        seconds: session.clock() - start,
        completed: session.phase() == GamePhase::PostPlay,
        ball: session.ball().state(),
        carrier_role,
        handoff: session.director().handoff_state(),
        events,
    })
}
