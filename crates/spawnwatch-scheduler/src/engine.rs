//! Tick engine — the loop that checks and advances schedule entries.
//!
//! Three independent passes per tick: warnings, auto-extensions, expiries.
//! The registry lock is held for the duration of one tick, so a concurrent
//! submission either lands before the passes see the key or simply
//! overwrites whatever the passes left behind — never a partial interleave.
//! A failed event send is logged and never aborts the remaining passes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, Mutex};

use spawnwatch_core::types::SpawnEvent;
use spawnwatch_tracker::SpawnRegistry;

/// The scheduler engine — sweeps the registry and emits transitions.
pub struct TickEngine {
    registry: Arc<Mutex<SpawnRegistry>>,
    events: mpsc::UnboundedSender<SpawnEvent>,
}

impl TickEngine {
    pub fn new(
        registry: Arc<Mutex<SpawnRegistry>>,
        events: mpsc::UnboundedSender<SpawnEvent>,
    ) -> Self {
        Self { registry, events }
    }

    /// Run one tick: warning pass, auto-extend pass, expiry pass.
    pub async fn tick(&self, now: DateTime<Utc>) {
        let mut registry = self.registry.lock().await;

        for key in registry.sweep_warnings(now) {
            tracing::info!(?key, "spawn imminent");
            self.emit(SpawnEvent::Warning { key });
        }

        for (key, entry) in registry.sweep_auto_extensions(now) {
            tracing::info!(?key, next = %entry.next_spawn_at, "timer silently restarted");
            self.emit(SpawnEvent::AutoExtended { key, entry });
        }

        for (key, taken_at) in registry.sweep_expired(now) {
            tracing::info!(?key, %taken_at, "stale entry dropped");
            self.emit(SpawnEvent::Expired { key, taken_at });
        }
    }

    fn emit(&self, event: SpawnEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("event receiver dropped; notification lost");
        }
    }
}

/// Run the scheduler loop until shutdown is signalled.
///
/// Ticks never overlap: the in-flight tick runs to completion inside its
/// select branch, both between intervals and across shutdown.
pub async fn spawn_scheduler(
    engine: TickEngine,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!("⏰ Scheduler started (tick every {interval_secs}s)");
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                engine.tick(Utc::now()).await;
            }
            _ = shutdown.changed() => {
                tracing::info!("Scheduler stopping");
                break;
            }
        }
    }
}
