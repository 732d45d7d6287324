//! Report tokenizer — pulls a clock time, a category, and an optional
//! location out of free-form word order.
//!
//! Matching rules:
//! - at most one `H:MM AM/PM` time is honored per message (first match);
//! - categories resolve in fixed priority: cards → bosses → rooms, so a
//!   message naming both a card and a room resolves as the card;
//! - locations try two-word aliases right-to-left before single tokens,
//!   and a token already consumed by the category match is never reused
//!   as a location alias.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use spawnwatch_core::catalog::{self, CategoryDef, CATEGORY_PRIORITY};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*:\s*(\d{2})\s*(AM|PM)\b").expect("time pattern")
});

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("word pattern"));

/// Structured result of tokenizing one report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    /// The raw clock substring, e.g. "6:00 PM". Strict parsing happens in
    /// `time::resolve_taken_at`.
    pub time_text: String,
    pub category: &'static CategoryDef,
    /// Canonical location code, when any location alias matched.
    pub location: Option<&'static str>,
}

/// Parse a raw message into a spawn report.
///
/// Returns `None` when no time or no category token is found — the caller
/// treats that as unrelated chatter and takes no action.
pub fn parse_report(text: &str) -> Option<ParsedReport> {
    let time_match = TIME_RE.find(text)?;
    let time_text = time_match.as_str().to_string();

    // Tokenize everything around the time substring so "PM" never leaks
    // into keyword matching.
    let rest = format!("{} {}", &text[..time_match.start()], &text[time_match.end()..]);
    let tokens: Vec<String> = WORD_RE
        .find_iter(&rest)
        .map(|w| w.as_str().to_uppercase())
        .collect();

    let (category, used) = resolve_category(&tokens)?;
    let location = resolve_location(&tokens, &used);

    Some(ParsedReport {
        time_text,
        category,
        location,
    })
}

/// Scan tokens against the category tables in priority order.
///
/// Within a table, positions are scanned left-to-right; a two-word alias
/// ("EG MUTANT", "BANDIT CAMP") is tried at each position before the single
/// token, so full display names map back to their short codes. Returns the
/// match plus the token indices it consumed.
fn resolve_category(tokens: &[String]) -> Option<(&'static CategoryDef, HashSet<usize>)> {
    for table in CATEGORY_PRIORITY {
        for i in 0..tokens.len() {
            if i + 1 < tokens.len() {
                let pair = format!("{} {}", tokens[i], tokens[i + 1]);
                if let Some(def) = table.iter().find(|d| d.aliases.contains(&pair.as_str())) {
                    return Some((def, HashSet::from([i, i + 1])));
                }
            }
            let single = tokens[i].as_str();
            if let Some(def) = table.iter().find(|d| d.aliases.contains(&single)) {
                return Some((def, HashSet::from([i])));
            }
        }
    }
    None
}

/// Scan for a location alias, skipping tokens the category match consumed.
///
/// Pairs are tried right-to-left first so "BS" + "BOT" resolves as one
/// two-word alias; single tokens are the fallback, also right-to-left
/// (locations tend to trail the report).
fn resolve_location(tokens: &[String], used: &HashSet<usize>) -> Option<&'static str> {
    for i in (0..tokens.len().saturating_sub(1)).rev() {
        if used.contains(&i) || used.contains(&(i + 1)) {
            continue;
        }
        if let Some(code) = catalog::location_pair_alias(&tokens[i], &tokens[i + 1]) {
            return Some(code);
        }
    }
    for i in (0..tokens.len()).rev() {
        if used.contains(&i) {
            continue;
        }
        if let Some(code) = catalog::location_alias(&tokens[i]) {
            return Some(code);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use spawnwatch_core::types::CategoryKind;

    #[test]
    fn test_room_report_any_word_order() {
        let a = parse_report("NUC 6:00 PM").unwrap();
        let b = parse_report("6:00 PM nuc").unwrap();
        assert_eq!(a.category.code, "NUC");
        assert_eq!(b.category.code, "NUC");
        assert_eq!(a.time_text, "6:00 PM");
        assert_eq!(a.location, None);
    }

    #[test]
    fn test_first_time_wins() {
        let report = parse_report("tank 6:00 PM or maybe 7:30 PM").unwrap();
        assert_eq!(report.time_text, "6:00 PM");
    }

    #[test]
    fn test_flexible_spacing_and_case() {
        let report = parse_report("avenger 11:45pm").unwrap();
        assert_eq!(report.category.code, "AVG");
        assert_eq!(report.time_text, "11:45pm");
    }

    #[test]
    fn test_display_name_maps_to_code() {
        let report = parse_report("eg mutant 9:15 AM").unwrap();
        assert_eq!(report.category.code, "EG");
        let report = parse_report("took bandit camp 9:15 AM").unwrap();
        assert_eq!(report.category.code, "BANDIT");
    }

    #[test]
    fn test_card_beats_room_tie_break() {
        // AP is both a room and a card location; the card table wins.
        let report = parse_report("pcard AP 2:00 PM").unwrap();
        assert_eq!(report.category.code, "PCARD");
        assert_eq!(report.category.kind, CategoryKind::Card);
        assert_eq!(report.location, Some("AP"));
    }

    #[test]
    fn test_two_word_location_right_to_left() {
        let report = parse_report("bcard 1:00 AM bs bot").unwrap();
        assert_eq!(report.category.code, "BCARD");
        assert_eq!(report.location, Some("BSB"));
        let report = parse_report("bcard bs up 1:00 AM").unwrap();
        assert_eq!(report.location, Some("BSU"));
    }

    #[test]
    fn test_category_token_not_reused_as_location() {
        // NUC resolves as the room category, so it must not also be
        // reported as a location alias.
        let report = parse_report("NUC 6:00 PM").unwrap();
        assert_eq!(report.category.code, "NUC");
        assert_eq!(report.location, None);
    }

    #[test]
    fn test_card_without_location() {
        let report = parse_report("pcard 2:00 PM").unwrap();
        assert_eq!(report.location, None);
    }

    #[test]
    fn test_no_time_is_a_miss() {
        assert!(parse_report("NUC was taken just now").is_none());
    }

    #[test]
    fn test_no_category_is_a_miss() {
        assert!(parse_report("see you at 6:00 PM").is_none());
    }

    #[test]
    fn test_bare_clock_without_meridiem_is_a_miss() {
        assert!(parse_report("NUC 18:00").is_none());
    }
}
