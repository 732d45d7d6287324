//! Spawn time arithmetic — taken-at normalization and next-spawn computation.
//!
//! Reports describe the past: a clock time later than the submitter's
//! current local time is read as yesterday, never as the future. Instants
//! are stored as UTC; the submitter's offset only shapes interpretation.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use regex::Regex;

use spawnwatch_core::catalog::CategoryDef;

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})\s*:\s*(\d{2})\s*(AM|PM)\s*$").expect("clock pattern")
});

/// Resolve a `H:MM AM/PM` clock string against the submitter's offset.
///
/// The candidate lands on the submitter's current calendar day; a candidate
/// strictly after their current instant rolls back one day. Returns `None`
/// when the text is not a strict 12-hour clock time.
pub fn resolve_taken_at(
    time_text: &str,
    tz: FixedOffset,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let caps = CLOCK_RE.captures(time_text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let pm = caps[3].eq_ignore_ascii_case("PM");
    let hour24 = (hour % 12) + if pm { 12 } else { 0 };

    let now_local = now.with_timezone(&tz);
    let candidate = now_local
        .date_naive()
        .and_hms_opt(hour24, minute, 0)?
        .and_local_timezone(tz)
        .single()?;
    let taken = if candidate > now_local {
        candidate - Duration::days(1)
    } else {
        candidate
    };
    Some(taken.with_timezone(&Utc))
}

/// Compute the next spawn instant from a taken time and the category rule.
///
/// Adds the category duration; when the result is not strictly after the
/// current instant (the reported cycle already elapsed by submission time),
/// it advances by exactly one calendar day. Rollover compares against the
/// CURRENT instant, not against `taken_at`.
pub fn compute_next_spawn(
    taken_at: DateTime<Utc>,
    def: &CategoryDef,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let next = taken_at + Duration::minutes(def.spawn_duration_mins);
    if next <= now {
        next + Duration::days(1)
    } else {
        next
    }
}
