//! Error types for the weather model and its preset boundary.

use thiserror::Error;

/// Which preset table a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Sun,
    Weather,
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetKind::Sun => f.write_str("sun"),
            PresetKind::Weather => f.write_str("weather"),
        }
    }
}

/// Main error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown {kind} preset '{name}'")]
    UnknownPreset { kind: PresetKind, name: String },

    #[error("unknown vehicle light state '{0}'")]
    UnknownLightState(String),

    #[error("unknown light group '{0}'")]
    UnknownLightGroup(String),

    #[error("light command error: {0}")]
    LightCommand(String),

    #[error("invalid session config: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
