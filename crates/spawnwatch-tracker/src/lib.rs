//! # Spawnwatch Tracker
//! The authoritative in-memory spawn schedule.
//!
//! `registry` owns the state maps behind a single cohesive object;
//! `service` wraps parser + time resolution + registry into the one
//! `handle_report_text` entry point the chat layer calls.

pub mod registry;
pub mod service;

pub use registry::SpawnRegistry;
pub use service::{FixedTimezone, RoleTimezones, TimezoneResolver, TrackerService};
