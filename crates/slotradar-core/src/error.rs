//! Error types for SlotRadar.

use thiserror::Error;

/// Errors surfaced by the radar core and its collaborators.
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid alarm time '{0}' (expected HH:MM)")]
    InvalidAlarm(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Host capability failed: {0}")]
    Host(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
