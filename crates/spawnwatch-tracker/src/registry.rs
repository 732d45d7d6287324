//! The spawn registry — active schedule entries plus per-submitter
//! last-accepted values.
//!
//! A pure state container: it never sends notifications. The message path
//! calls `submit`/`list_active`; the scheduler calls the three sweep
//! operations. The maps are never exposed directly, so all mutation goes
//! through these operations under whatever lock wraps the registry.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use spawnwatch_core::catalog::{self, AUTO_EXTEND_TOLERANCE_MINS};
use spawnwatch_core::types::{CategoryKind, DuplicateKind, SpawnEntry, SpawnKey, Submission};

/// In-memory map of active schedule entries and submission records.
#[derive(Debug, Default)]
pub struct SpawnRegistry {
    entries: HashMap<SpawnKey, SpawnEntry>,
    /// Last accepted next-spawn per (submitter, key). Lives independently
    /// of the entry: survives expiry, cleared when any submitter moves the
    /// key's schedule to a different value.
    submissions: HashMap<(String, SpawnKey), DateTime<Utc>>,
}

impl SpawnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a report for a key.
    ///
    /// Guard order: a key already scheduled at this exact time rejects
    /// globally (no mutation); otherwise a submitter re-posting their own
    /// identical value rejects individually; otherwise the entry is
    /// overwritten with both one-shot flags reset.
    pub fn submit(
        &mut self,
        key: SpawnKey,
        kind: CategoryKind,
        taken_at: DateTime<Utc>,
        next_spawn_at: DateTime<Utc>,
        submitter: &str,
    ) -> Submission {
        if let Some(existing) = self.entries.get(&key) {
            if existing.next_spawn_at == next_spawn_at {
                tracing::debug!(?key, %submitter, "duplicate of the posted timer");
                return Submission::RejectedDuplicate {
                    kind: DuplicateKind::Global,
                    existing: existing.next_spawn_at,
                };
            }
        }
        let record_key = (submitter.to_string(), key.clone());
        if self.submissions.get(&record_key) == Some(&next_spawn_at) {
            tracing::debug!(?key, %submitter, "submitter re-posted their own timer");
            return Submission::RejectedDuplicate {
                kind: DuplicateKind::Submitter,
                existing: next_spawn_at,
            };
        }

        // The schedule moves to a new value: stale records of the old value
        // must not block anyone later, so clear them for every submitter.
        self.submissions.retain(|(_, k), _| *k != key);

        let entry = SpawnEntry::new(kind, taken_at, next_spawn_at);
        tracing::info!(?key, %submitter, %next_spawn_at, "schedule updated");
        self.entries.insert(key, entry.clone());
        self.submissions.insert(record_key, next_spawn_at);
        Submission::Accepted(entry)
    }

    /// Active entries for a scope, grouped rooms → bosses → cards and
    /// ordered by next spawn inside each group.
    pub fn list_active(&self, scope: &str) -> Vec<(SpawnKey, SpawnEntry)> {
        let mut active: Vec<_> = self
            .entries
            .iter()
            .filter(|(key, _)| key.scope == scope)
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        active.sort_by(|a, b| {
            a.1.kind
                .cmp(&b.1.kind)
                .then(a.1.next_spawn_at.cmp(&b.1.next_spawn_at))
        });
        active
    }

    /// Warning pass: mark and return every unwarned entry whose remaining
    /// time has entered `[0, warning lead]`. Each occupancy warns once.
    pub fn sweep_warnings(&mut self, now: DateTime<Utc>) -> Vec<SpawnKey> {
        let mut due = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            let Some(def) = catalog::category(&key.category) else {
                continue;
            };
            let remaining = entry.next_spawn_at - now;
            if !entry.warned
                && remaining >= Duration::zero()
                && remaining <= Duration::minutes(def.warning_lead_mins)
            {
                entry.warned = true;
                due.push(key.clone());
            }
        }
        due
    }

    /// Auto-extend pass: for extendable categories, push the next spawn
    /// forward once when the expected moment passes without a fresh report.
    /// The overshoot tolerance covers the tick interval so the transition
    /// cannot be missed between ticks.
    pub fn sweep_auto_extensions(&mut self, now: DateTime<Utc>) -> Vec<(SpawnKey, SpawnEntry)> {
        let mut extended = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            let Some(def) = catalog::category(&key.category) else {
                continue;
            };
            if def.auto_extend_mins == 0 || entry.auto_extended {
                continue;
            }
            let overshoot = now - entry.next_spawn_at;
            if overshoot >= Duration::zero()
                && overshoot < Duration::minutes(AUTO_EXTEND_TOLERANCE_MINS)
            {
                entry.next_spawn_at += Duration::minutes(def.auto_extend_mins);
                entry.auto_extended = true;
                extended.push((key.clone(), entry.clone()));
            }
        }
        extended
    }

    /// Expiry pass: drop entries past their category grace window and
    /// return them with the original taken time for display.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> Vec<(SpawnKey, DateTime<Utc>)> {
        let stale: Vec<SpawnKey> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                catalog::category(&key.category).is_some_and(|def| {
                    now >= entry.next_spawn_at + Duration::minutes(def.expiry_grace_mins)
                })
            })
            .map(|(key, _)| key.clone())
            .collect();
        stale
            .into_iter()
            .filter_map(|key| {
                self.entries
                    .remove(&key)
                    .map(|entry| (key, entry.taken_at))
            })
            .collect()
    }

    /// Current entry for a key, if any.
    pub fn get(&self, key: &SpawnKey) -> Option<&SpawnEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    fn room_key() -> SpawnKey {
        SpawnKey::new("ch1", "NUC", None)
    }

    #[test]
    fn test_identical_resubmission_rejects_globally() {
        let mut reg = SpawnRegistry::new();
        let first = reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), "ana");
        assert!(matches!(first, Submission::Accepted(_)));
        // Any submitter, same value: global duplicate, no mutation.
        for submitter in ["ana", "ben"] {
            let again = reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), submitter);
            assert_eq!(
                again,
                Submission::RejectedDuplicate {
                    kind: DuplicateKind::Global,
                    existing: t(12, 0),
                }
            );
        }
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_different_times_both_accepted() {
        let mut reg = SpawnRegistry::new();
        assert!(matches!(
            reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), "ana"),
            Submission::Accepted(_)
        ));
        assert!(matches!(
            reg.submit(room_key(), CategoryKind::Room, t(10, 30), t(12, 30), "ana"),
            Submission::Accepted(_)
        ));
        assert_eq!(reg.get(&room_key()).unwrap().next_spawn_at, t(12, 30));
    }

    #[test]
    fn test_submitter_record_survives_expiry() {
        let mut reg = SpawnRegistry::new();
        reg.submit(room_key(), CategoryKind::Room, t(1, 0), t(3, 0), "ana");
        // Room grace is 2h: expired at 5:00.
        let expired = reg.sweep_expired(t(5, 0));
        assert_eq!(expired.len(), 1);
        // Entry is gone, but ana's record still blocks the identical repost.
        let again = reg.submit(room_key(), CategoryKind::Room, t(1, 0), t(3, 0), "ana");
        assert_eq!(
            again,
            Submission::RejectedDuplicate {
                kind: DuplicateKind::Submitter,
                existing: t(3, 0),
            }
        );
        // A different submitter is free to re-register it.
        assert!(matches!(
            reg.submit(room_key(), CategoryKind::Room, t(1, 0), t(3, 0), "ben"),
            Submission::Accepted(_)
        ));
    }

    #[test]
    fn test_schedule_change_clears_rival_records() {
        let mut reg = SpawnRegistry::new();
        reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), "ana");
        reg.submit(room_key(), CategoryKind::Room, t(10, 30), t(12, 30), "ben");
        // Ben moved the schedule, so ana's old record was cleared and her
        // original value is acceptable again.
        assert!(matches!(
            reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), "ana"),
            Submission::Accepted(_)
        ));
    }

    #[test]
    fn test_accepted_entry_resets_flags() {
        let mut reg = SpawnRegistry::new();
        let key = SpawnKey::new("ch1", "PCARD", Some("AP"));
        reg.submit(key.clone(), CategoryKind::Card, t(1, 0), t(3, 30), "ana");
        reg.sweep_warnings(t(3, 27));
        reg.sweep_auto_extensions(t(3, 30));
        let entry = reg.get(&key).unwrap();
        assert!(entry.warned && entry.auto_extended);
        // Fresh report resets the occupancy.
        reg.submit(key.clone(), CategoryKind::Card, t(3, 40), t(6, 10), "ana");
        let entry = reg.get(&key).unwrap();
        assert!(!entry.warned && !entry.auto_extended);
    }

    #[test]
    fn test_list_active_grouping_and_order() {
        let mut reg = SpawnRegistry::new();
        let card = SpawnKey::new("ch1", "PCARD", Some("AP"));
        reg.submit(card, CategoryKind::Card, t(9, 0), t(11, 30), "ana");
        reg.submit(
            SpawnKey::new("ch1", "EG", None),
            CategoryKind::Boss,
            t(6, 0),
            t(12, 0),
            "ana",
        );
        reg.submit(
            SpawnKey::new("ch1", "AP", None),
            CategoryKind::Room,
            t(11, 0),
            t(13, 0),
            "ana",
        );
        reg.submit(room_key(), CategoryKind::Room, t(10, 0), t(12, 0), "ana");
        // Other scopes stay invisible.
        reg.submit(
            SpawnKey::new("ch2", "HB", None),
            CategoryKind::Room,
            t(10, 0),
            t(12, 0),
            "ana",
        );

        let listed = reg.list_active("ch1");
        let codes: Vec<&str> = listed.iter().map(|(k, _)| k.category.as_str()).collect();
        assert_eq!(codes, vec!["NUC", "AP", "EG", "PCARD"]);
    }

    #[test]
    fn test_expiry_grace_per_category() {
        let mut reg = SpawnRegistry::new();
        // Boss grace 10 minutes, room grace 2 hours.
        reg.submit(
            SpawnKey::new("ch1", "EG", None),
            CategoryKind::Boss,
            t(8, 0),
            t(14, 0),
            "ana",
        );
        reg.submit(room_key(), CategoryKind::Room, t(12, 0), t(14, 0), "ana");

        assert!(reg.sweep_expired(t(14, 9)).is_empty());
        let expired = reg.sweep_expired(t(14, 11));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0.category, "EG");
        assert_eq!(expired[0].1, t(8, 0));
        // The room holds on until 16:00.
        assert!(reg.sweep_expired(t(15, 59)).is_empty());
        assert_eq!(reg.sweep_expired(t(16, 0)).len(), 1);
    }
}
