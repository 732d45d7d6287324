//! # Spawnwatch Core
//! Shared data model for the spawn tracker.
//!
//! Holds the static category catalog, the spawn key/entry types, the
//! outbound event model, configuration, and the error type used across
//! the workspace.

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{category, location_display, CategoryDef, CATEGORY_PRIORITY};
pub use config::SpawnwatchConfig;
pub use error::{Result, SpawnwatchError};
pub use types::{
    CategoryKind, DuplicateKind, IgnoreReason, ReportOutcome, SpawnEntry, SpawnEvent, SpawnKey,
    Submission,
};
