//! Report handling service — the single entry point the chat layer calls.
//!
//! Wraps parser + time resolution + registry behind one `handle_report_text`
//! call, with the submitter's timezone supplied by an injected resolver.
//! Accept/reject events go out over a fire-and-forget channel to whatever
//! renders confirmations and summary views.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::{mpsc, Mutex};

use spawnwatch_core::config::SpawnwatchConfig;
use spawnwatch_core::error::Result;
use spawnwatch_core::types::{
    IgnoreReason, ReportOutcome, SpawnEntry, SpawnEvent, SpawnKey, Submission,
};
use spawnwatch_parser::{compute_next_spawn, parse_report, resolve_taken_at};

use crate::registry::SpawnRegistry;

/// Maps a submitter to their UTC offset.
///
/// Implementations fall back to the canonical offset for unresolved
/// submitters; the call never fails.
pub trait TimezoneResolver: Send + Sync {
    fn resolve(&self, submitter_id: &str) -> FixedOffset;
}

/// Puts every submitter in one fixed offset.
pub struct FixedTimezone(pub FixedOffset);

impl TimezoneResolver for FixedTimezone {
    fn resolve(&self, _submitter_id: &str) -> FixedOffset {
        self.0
    }
}

/// Resolver backed by the config role table.
///
/// The chat layer owns role membership; it registers submitter→role
/// assignments here and this resolver turns them into offsets, falling
/// back to the canonical offset.
pub struct RoleTimezones {
    assignments: HashMap<String, String>,
    roles: HashMap<String, FixedOffset>,
    fallback: FixedOffset,
}

impl RoleTimezones {
    pub fn from_config(config: &SpawnwatchConfig) -> Result<Self> {
        let mut roles = HashMap::new();
        for role in config.role_offsets.keys() {
            if let Some(offset) = config.offset_for_role(role) {
                roles.insert(role.clone(), offset?);
            }
        }
        Ok(Self {
            assignments: HashMap::new(),
            roles,
            fallback: config.canonical_tz()?,
        })
    }

    /// Record that a submitter carries a timezone role.
    pub fn assign(&mut self, submitter_id: &str, role: &str) {
        self.assignments
            .insert(submitter_id.to_string(), role.to_string());
    }
}

impl TimezoneResolver for RoleTimezones {
    fn resolve(&self, submitter_id: &str) -> FixedOffset {
        self.assignments
            .get(submitter_id)
            .and_then(|role| self.roles.get(role))
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// The report handling service.
pub struct TrackerService {
    registry: Arc<Mutex<SpawnRegistry>>,
    timezones: Arc<dyn TimezoneResolver>,
    events: mpsc::UnboundedSender<SpawnEvent>,
}

impl TrackerService {
    pub fn new(
        registry: Arc<Mutex<SpawnRegistry>>,
        timezones: Arc<dyn TimezoneResolver>,
        events: mpsc::UnboundedSender<SpawnEvent>,
    ) -> Self {
        Self {
            registry,
            timezones,
            events,
        }
    }

    /// Shared registry handle, for wiring the scheduler to the same state.
    pub fn registry(&self) -> Arc<Mutex<SpawnRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Handle one raw report line.
    ///
    /// Malformed input degrades to `Ignored` — nothing here is fatal and
    /// nothing mutates state before every resolution step has succeeded.
    pub async fn handle_report_text(
        &self,
        scope: &str,
        submitter: &str,
        raw_text: &str,
        now: DateTime<Utc>,
    ) -> ReportOutcome {
        let Some(report) = parse_report(raw_text) else {
            return ReportOutcome::Ignored(IgnoreReason::ParseMiss);
        };
        let tz = self.timezones.resolve(submitter);
        let Some(taken_at) = resolve_taken_at(&report.time_text, tz, now) else {
            tracing::debug!(%submitter, time = %report.time_text, "time token failed strict parsing");
            return ReportOutcome::Ignored(IgnoreReason::InvalidTime);
        };
        let def = report.category;
        if def.requires_location() && report.location.is_none() {
            tracing::debug!(%submitter, category = def.code, "card report without a location");
            return ReportOutcome::Ignored(IgnoreReason::MissingCardLocation);
        }
        // Rooms ARE the location and bosses have none; a stray location
        // token on either is ignored rather than splitting the key.
        let location = if def.requires_location() {
            report.location
        } else {
            None
        };

        let next_spawn_at = compute_next_spawn(taken_at, def, now);
        let key = SpawnKey::new(scope, def.code, location);
        let verdict = {
            let mut registry = self.registry.lock().await;
            registry.submit(key.clone(), def.kind, taken_at, next_spawn_at, submitter)
        };

        match verdict {
            Submission::Accepted(entry) => {
                self.emit(SpawnEvent::Accepted {
                    key: key.clone(),
                    entry: entry.clone(),
                });
                ReportOutcome::Accepted { key, entry }
            }
            Submission::RejectedDuplicate { kind, existing } => {
                self.emit(SpawnEvent::RejectedDuplicate {
                    key: key.clone(),
                    kind,
                    existing,
                });
                ReportOutcome::RejectedDuplicate {
                    key,
                    kind,
                    existing,
                }
            }
        }
    }

    /// Active entries for a scope, for building any summary view.
    pub async fn list_active(&self, scope: &str) -> Vec<(SpawnKey, SpawnEntry)> {
        self.registry.lock().await.list_active(scope)
    }

    fn emit(&self, event: SpawnEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("event receiver dropped; notification lost");
        }
    }
}
