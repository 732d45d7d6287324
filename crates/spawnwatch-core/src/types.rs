//! Spawn tracking data model — keys, entries, outcomes, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of trackable resource.
///
/// Carried explicitly on every entry; schedule listings group by this in
/// declaration order (rooms, then bosses, then cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Room,
    Boss,
    Card,
}

/// Composite identity of a schedule entry.
///
/// `scope` isolates tracking per origin channel/room. `location` is present
/// only for card categories — rooms ARE the location, bosses have none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnKey {
    pub scope: String,
    pub category: String,
    pub location: Option<String>,
}

impl SpawnKey {
    pub fn new(scope: &str, category: &str, location: Option<&str>) -> Self {
        Self {
            scope: scope.to_string(),
            category: category.to_string(),
            location: location.map(String::from),
        }
    }
}

/// An active schedule entry.
///
/// Created on the first valid report for a key, overwritten in place on
/// later accepted reports (flags reset), removed by the expiry pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: CategoryKind,
    /// Instant the resource was observed consumed.
    pub taken_at: DateTime<Utc>,
    /// Computed instant of next availability.
    pub next_spawn_at: DateTime<Utc>,
    /// Whether the one-shot spawn-imminent warning fired for this occupancy.
    pub warned: bool,
    /// Whether the one-shot silent timer restart fired for this occupancy.
    pub auto_extended: bool,
}

impl SpawnEntry {
    pub fn new(kind: CategoryKind, taken_at: DateTime<Utc>, next_spawn_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            taken_at,
            next_spawn_at,
            warned: false,
            auto_extended: false,
        }
    }
}

/// Which duplicate guard rejected a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKind {
    /// The key already holds this exact next-spawn time.
    Global,
    /// This submitter already registered this exact next-spawn time.
    Submitter,
}

/// Registry verdict for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Submission {
    Accepted(SpawnEntry),
    RejectedDuplicate {
        kind: DuplicateKind,
        /// The already-scheduled time, for the rejection message.
        existing: DateTime<Utc>,
    },
}

/// Why a report was silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// No recognizable time/category token — unrelated chatter.
    ParseMiss,
    /// A time-like token was present but failed strict clock parsing.
    InvalidTime,
    /// Category resolved as a card but no location token matched.
    MissingCardLocation,
}

/// Outcome of handling one raw report line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportOutcome {
    Accepted {
        key: SpawnKey,
        entry: SpawnEntry,
    },
    RejectedDuplicate {
        key: SpawnKey,
        kind: DuplicateKind,
        existing: DateTime<Utc>,
    },
    Ignored(IgnoreReason),
}

/// Outbound events consumed by the rendering collaborator.
///
/// Emission is fire-and-forget: a failed send is logged and never feeds
/// back into registry or scheduler control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnEvent {
    /// A report was accepted and the schedule changed.
    Accepted { key: SpawnKey, entry: SpawnEntry },
    /// A report duplicated a known timer.
    RejectedDuplicate {
        key: SpawnKey,
        kind: DuplicateKind,
        existing: DateTime<Utc>,
    },
    /// The spawn is imminent (within the warning lead).
    Warning { key: SpawnKey },
    /// A card timer silently restarted once with no fresh report.
    AutoExtended { key: SpawnKey, entry: SpawnEntry },
    /// A stale entry was dropped; carries the original taken time for display.
    Expired {
        key: SpawnKey,
        taken_at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_grouping_order() {
        // Listing order relies on the declaration order of the enum.
        assert!(CategoryKind::Room < CategoryKind::Boss);
        assert!(CategoryKind::Boss < CategoryKind::Card);
    }

    #[test]
    fn test_key_equality_includes_location() {
        let a = SpawnKey::new("ch1", "PCARD", Some("AP"));
        let b = SpawnKey::new("ch1", "PCARD", Some("HB"));
        let c = SpawnKey::new("ch1", "PCARD", Some("AP"));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_event_round_trips_through_json() {
        let taken = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let ev = SpawnEvent::Expired {
            key: SpawnKey::new("ch1", "EG", None),
            taken_at: taken,
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: SpawnEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
