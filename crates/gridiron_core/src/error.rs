use thiserror::Error;

use crate::models::Role;

#[derive(Error, Debug)]
pub enum PlayError {
    #[error("Invalid route for {role}: {reason}")]
    InvalidRoute { role: Role, reason: String },

    #[error("Missing component for {role}: {what}")]
    MissingComponent { role: Role, what: &'static str },

    #[error("Unknown play: {0}")]
    UnknownPlay(String),

    #[error("Invalid play '{play}': {reason}")]
    InvalidPlay { play: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlayError {
    /// Failures the tick loop logs and skips past instead of surfacing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlayError::InvalidRoute { .. } | PlayError::MissingComponent { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlayError>;
