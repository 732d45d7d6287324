//! # Spawnwatch Scheduler
//! Periodic driver that advances the spawn schedule through warning,
//! auto-extension, and expiry, emitting notification events as it goes.
//!
//! Uses tokio::interval for ticking; one tick at a time, shared registry
//! behind a mutex, events fire-and-forget.

pub mod engine;

pub use engine::{spawn_scheduler, TickEngine};
