//! Built-in formations and plays, plus loading of extra plays from files.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::play::{Formation, FormationSlot, Play, PlayType, Route};
use super::role::Role;
use crate::engine::math::Vec3;
use crate::error::{PlayError, Result};

/// Built-in catalog, shared read-only by every session.
pub static PLAYBOOK: Lazy<PlayCatalog> = Lazy::new(PlayCatalog::builtin);

fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

fn slot(role: Role, x: f32, z: f32) -> FormationSlot {
    FormationSlot { role, position: v(x, 0.0, z) }
}

/// Standard single back: five linemen on the line, TEs outside the tackles,
/// QB under center at -7, RB at -12, WRs split wide.
pub fn single_back() -> Formation {
    Formation {
        name: "Single Back".to_string(),
        description: "Standard single back offensive formation".to_string(),
        slots: vec![
            slot(Role::Lt, -8.0, 0.0),
            slot(Role::Lg, -4.0, 0.0),
            slot(Role::C, 0.0, 0.0),
            slot(Role::Rg, 4.0, 0.0),
            slot(Role::Rt, 8.0, 0.0),
            slot(Role::Te1, -12.0, 0.0),
            slot(Role::Te2, 12.0, 0.0),
            slot(Role::Qb, 0.0, -7.0),
            slot(Role::Rb, 0.0, -12.0),
            slot(Role::Wr1, -20.0, 0.0),
            slot(Role::Wr2, 20.0, 0.0),
        ],
    }
}

/// RB runs outside through the left gap after a handoff from the QB.
pub fn outside() -> Play {
    Play {
        name: "Outside".to_string(),
        description: "RB runs outside through left gap".to_string(),
        formation: single_back(),
        play_type: PlayType::Run,
        duration: 10.0,
        routes: vec![
            // back and left for the handoff, then keep drifting back
            Route::new(Role::Qb, vec![v(-2.0, 0.0, -2.0), v(-4.0, 0.0, -4.0)], 4.0, 0.0)
                .giving_handoff_at(1.2),
            Route::new(
                Role::Rb,
                vec![v(-8.0, 0.0, 4.0), v(-20.0, 0.0, 10.0), v(-32.0, 0.0, 16.0)],
                6.0,
                0.0,
            )
            .taking_handoff(),
            Route::new(Role::Wr1, vec![v(-20.0, 0.0, 10.0), v(-20.0, 0.0, 30.0)], 7.0, 0.0),
            Route::new(Role::Wr2, vec![v(20.0, 0.0, 10.0), v(20.0, 0.0, 30.0)], 7.0, 0.0),
            // TEs and linemen stay home to block
        ],
    }
}

/// Mesh concept: crossing WRs underneath, TEs on corner routes.
pub fn mesh() -> Play {
    Play {
        name: "Mesh".to_string(),
        description: "Crossing routes with mesh concept".to_string(),
        formation: single_back(),
        play_type: PlayType::Pass,
        duration: 10.0,
        routes: vec![
            Route::new(Role::Qb, vec![v(0.0, 0.0, -3.0), v(0.0, 0.0, -4.0)], 3.0, 0.0),
            Route::new(Role::Rb, vec![v(-2.0, 0.0, -2.0), v(-2.0, 0.0, -2.0)], 3.0, 0.0),
            Route::new(
                Role::Wr1,
                vec![
                    v(-10.0, 0.0, 8.0),
                    v(5.0, 0.0, 12.0),
                    v(15.0, 0.0, 15.0),
                    v(25.0, 0.0, 18.0),
                    v(35.0, 0.0, 21.0),
                ],
                7.0,
                0.0,
            ),
            Route::new(
                Role::Wr2,
                vec![
                    v(10.0, 0.0, 8.0),
                    v(-5.0, 0.0, 12.0),
                    v(-15.0, 0.0, 15.0),
                    v(-25.0, 0.0, 18.0),
                    v(-35.0, 0.0, 21.0),
                ],
                7.0,
                0.0,
            ),
            Route::new(
                Role::Te1,
                vec![
                    v(-12.0, 0.0, 12.0),
                    v(-18.0, 0.0, 20.0),
                    v(-22.0, 0.0, 30.0),
                    v(-26.0, 0.0, 40.0),
                    v(-30.0, 0.0, 50.0),
                ],
                6.0,
                0.0,
            ),
            Route::new(
                Role::Te2,
                vec![
                    v(12.0, 0.0, 12.0),
                    v(18.0, 0.0, 20.0),
                    v(22.0, 0.0, 30.0),
                    v(26.0, 0.0, 40.0),
                    v(30.0, 0.0, 50.0),
                ],
                6.0,
                0.0,
            ),
        ],
    }
}

/// File layout for extra plays: `plays: [ ... ]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybookFile {
    #[serde(default)]
    pub plays: Vec<Play>,
}

/// Named plays in menu order.
#[derive(Debug, Clone, Default)]
pub struct PlayCatalog {
    plays: Vec<Play>,
}

impl PlayCatalog {
    pub fn builtin() -> Self {
        Self { plays: vec![outside(), mesh()] }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plays.iter().map(|p| p.name.as_str()).collect()
    }

    /// Case-insensitive lookup by play name.
    pub fn get(&self, name: &str) -> Option<&Play> {
        self.plays.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn require(&self, name: &str) -> Result<&Play> {
        self.get(name).ok_or_else(|| PlayError::UnknownPlay(name.to_string()))
    }

    pub fn at(&self, index: usize) -> Option<&Play> {
        self.plays.get(index)
    }

    /// Adds a validated play; a play with an existing name replaces it in place.
    pub fn insert(&mut self, play: Play) -> Result<()> {
        play.validate()?;
        match self.plays.iter_mut().find(|p| p.name.eq_ignore_ascii_case(&play.name)) {
            Some(existing) => *existing = play,
            None => self.plays.push(play),
        }
        Ok(())
    }

    pub fn extend_from_yaml_str(&mut self, text: &str) -> Result<usize> {
        let file: PlaybookFile = serde_yaml::from_str(text)?;
        self.extend_from_file(file)
    }

    pub fn extend_from_json_str(&mut self, text: &str) -> Result<usize> {
        let file: PlaybookFile = serde_json::from_str(text)?;
        self.extend_from_file(file)
    }

    /// Load by extension: `.json` is JSON, anything else is YAML.
    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.extend_from_json_str(&text),
            _ => self.extend_from_yaml_str(&text),
        }
    }

    fn extend_from_file(&mut self, file: PlaybookFile) -> Result<usize> {
        let count = file.plays.len();
        for play in file.plays {
            self.insert(play)?;
        }
        Ok(count)
    }
}
