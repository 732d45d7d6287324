//! Spawnwatch error type.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, SpawnwatchError>;

/// Errors surfaced by the spawn tracker.
///
/// Malformed reports are NOT errors — they degrade to ignored outcomes
/// (see `ReportOutcome::Ignored`). This enum covers configuration and
/// wiring failures only; nothing here is raised on the hot report path.
#[derive(Error, Debug)]
pub enum SpawnwatchError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown category code: {0}")]
    UnknownCategory(String),

    #[error("invalid UTC offset '{0}' (expected e.g. +08:00)")]
    Timezone(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
