//! # Spawnwatch Parser
//! Turns unconstrained report text into structured spawn reports.
//!
//! Two halves: `tokens` extracts `(time text, category, location)` from a
//! raw message with priority-ordered keyword matching; `time` converts the
//! clock string plus the submitter's offset into canonical instants.

pub mod time;
pub mod tokens;

pub use time::{compute_next_spawn, resolve_taken_at};
pub use tokens::{parse_report, ParsedReport};
