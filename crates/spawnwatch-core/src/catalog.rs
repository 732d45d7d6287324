//! Static category catalog and location alias tables.
//!
//! Immutable for process lifetime. Category resolution priority and the
//! two-word-before-single location lookup rule are data here; the scanning
//! itself lives in `spawnwatch-parser`.

use crate::types::CategoryKind;

/// Static definition of a trackable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    /// Short unique code, e.g. "NUC", "EG", "PCARD".
    pub code: &'static str,
    pub display_name: &'static str,
    pub kind: CategoryKind,
    /// Minutes from taken-at to next spawn.
    pub spawn_duration_mins: i64,
    /// Minutes past next-spawn a stale entry stays listed before dropping.
    pub expiry_grace_mins: i64,
    /// One-shot silent extension, 0 = none.
    pub auto_extend_mins: i64,
    /// Spawn-imminent warning lead, fixed at 5 across the catalog.
    pub warning_lead_mins: i64,
    /// Tokens (upper-case, two-word aliases space-joined) that resolve to
    /// this category. Always includes `code`.
    pub aliases: &'static [&'static str],
}

impl CategoryDef {
    /// Cards are addressed per location; rooms and bosses are not.
    pub fn requires_location(&self) -> bool {
        self.kind == CategoryKind::Card
    }
}

/// Overshoot window for the auto-extend pass. The pass runs once per tick
/// interval and must not miss the restart instant.
pub const AUTO_EXTEND_TOLERANCE_MINS: i64 = 2;

const fn room(code: &'static str, name: &'static str, aliases: &'static [&'static str]) -> CategoryDef {
    CategoryDef {
        code,
        display_name: name,
        kind: CategoryKind::Room,
        spawn_duration_mins: 120,
        expiry_grace_mins: 120,
        auto_extend_mins: 0,
        warning_lead_mins: 5,
        aliases,
    }
}

const fn boss(
    code: &'static str,
    name: &'static str,
    duration: i64,
    aliases: &'static [&'static str],
) -> CategoryDef {
    CategoryDef {
        code,
        display_name: name,
        kind: CategoryKind::Boss,
        spawn_duration_mins: duration,
        expiry_grace_mins: 10,
        auto_extend_mins: 0,
        warning_lead_mins: 5,
        aliases,
    }
}

const fn card(code: &'static str, name: &'static str, aliases: &'static [&'static str]) -> CategoryDef {
    CategoryDef {
        code,
        display_name: name,
        kind: CategoryKind::Card,
        spawn_duration_mins: 150,
        expiry_grace_mins: 120,
        auto_extend_mins: 30,
        warning_lead_mins: 5,
        aliases,
    }
}

/// Collectible cards. Highest resolution priority.
pub const CARDS: &[CategoryDef] = &[
    card("PCARD", "Pcard", &["PCARD"]),
    card("BCARD", "Bcard", &["BCARD"]),
];

/// World bosses. Tank respawns on a shorter cycle than the others.
pub const BOSSES: &[CategoryDef] = &[
    boss("EG", "EG Mutant", 360, &["EG", "EG MUTANT", "MUTANT"]),
    boss("AVG", "Avenger", 360, &["AVG", "AVENGER"]),
    boss("TANK", "Tank", 240, &["TANK"]),
];

/// Lootable rooms. The room code doubles as its location.
pub const ROOMS: &[CategoryDef] = &[
    room("AP", "Airport", &["AP", "AIRPORT"]),
    room("HB", "Harbor", &["HB", "HARBOR"]),
    room("BANDIT", "Bandit Camp", &["BANDIT", "BANDIT CAMP"]),
    room("BIO", "Bio-Research Lab", &["BIO", "BIO LAB"]),
    room("NUC", "Nuclear Plant", &["NUC", "NUCLEAR", "NUCLEAR PLANT"]),
    room("MILI", "Military Base", &["MILI", "MILITARY", "MILITARY BASE"]),
];

/// Category tables in resolution priority order: a message mentioning both
/// a card and a room token resolves as a card (deliberate tie-break).
pub const CATEGORY_PRIORITY: [&[CategoryDef]; 3] = [CARDS, BOSSES, ROOMS];

/// Look up a category by its short code.
pub fn category(code: &str) -> Option<&'static CategoryDef> {
    CATEGORY_PRIORITY
        .iter()
        .flat_map(|table| table.iter())
        .find(|def| def.code == code)
}

// ─── Card locations ──────────────────────────────────────────────────────

/// Canonical location code → display name.
const LOCATION_NAMES: &[(&str, &str)] = &[
    ("BSU", "Bomb Shelter Upper"),
    ("BSB", "Bomb Shelter Bottom"),
    ("AP", "Airport"),
    ("HB", "Harbor"),
    ("NUC", "Nuclear Plant"),
    ("MILI", "Military Base"),
    ("BIO", "Bio-Research Lab"),
    ("BANDIT", "Bandit Camp"),
];

/// Two-word aliases, checked BEFORE single tokens so that "BS" + "BOT"
/// resolves as one location instead of a stray "BS".
const LOCATION_PAIR_ALIASES: &[(&str, &str, &str)] = &[
    ("BS", "UP", "BSU"),
    ("BS", "UPPER", "BSU"),
    ("BS", "BOT", "BSB"),
    ("BS", "BOTTOM", "BSB"),
    ("BANDIT", "CAMP", "BANDIT"),
    ("NUCLEAR", "PLANT", "NUC"),
    ("MILITARY", "BASE", "MILI"),
];

/// Single-token aliases.
const LOCATION_ALIASES: &[(&str, &str)] = &[
    ("BSU", "BSU"),
    ("BSB", "BSB"),
    ("AP", "AP"),
    ("AIRPORT", "AP"),
    ("HB", "HB"),
    ("HARBOR", "HB"),
    ("NUC", "NUC"),
    ("NUCLEAR", "NUC"),
    ("MILI", "MILI"),
    ("MILITARY", "MILI"),
    ("BIO", "BIO"),
    ("BANDIT", "BANDIT"),
];

/// Resolve a two-word location alias (tokens upper-cased by the caller).
pub fn location_pair_alias(first: &str, second: &str) -> Option<&'static str> {
    LOCATION_PAIR_ALIASES
        .iter()
        .find(|(a, b, _)| *a == first && *b == second)
        .map(|(_, _, code)| *code)
}

/// Resolve a single-token location alias.
pub fn location_alias(token: &str) -> Option<&'static str> {
    LOCATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, code)| *code)
}

/// Display name for a canonical location code.
pub fn location_display(code: &str) -> Option<&'static str> {
    LOCATION_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_unique_across_tables() {
        let mut codes: Vec<_> = CATEGORY_PRIORITY
            .iter()
            .flat_map(|t| t.iter().map(|d| d.code))
            .collect();
        let total = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), total, "category codes must be unique");
    }

    #[test]
    fn test_every_alias_list_contains_code() {
        for def in CATEGORY_PRIORITY.iter().flat_map(|t| t.iter()) {
            assert!(
                def.aliases.contains(&def.code),
                "{} missing its own code in aliases",
                def.code
            );
        }
    }

    #[test]
    fn test_warning_lead_uniform() {
        for def in CATEGORY_PRIORITY.iter().flat_map(|t| t.iter()) {
            assert_eq!(def.warning_lead_mins, 5);
        }
    }

    #[test]
    fn test_only_cards_extend_and_need_location() {
        for def in CATEGORY_PRIORITY.iter().flat_map(|t| t.iter()) {
            if def.kind == CategoryKind::Card {
                assert!(def.auto_extend_mins > 0);
                assert!(def.requires_location());
            } else {
                assert_eq!(def.auto_extend_mins, 0);
                assert!(!def.requires_location());
            }
        }
    }

    #[test]
    fn test_tank_is_the_short_boss() {
        let tank = category("TANK").unwrap();
        let eg = category("EG").unwrap();
        assert!(tank.spawn_duration_mins < eg.spawn_duration_mins);
    }

    #[test]
    fn test_pair_alias_beats_single() {
        // "BS BOT" must resolve as Bomb Shelter Bottom, not fail on "BS".
        assert_eq!(location_pair_alias("BS", "BOT"), Some("BSB"));
        assert_eq!(location_alias("BS"), None);
    }

    #[test]
    fn test_every_location_code_has_display_name() {
        for (_, _, code) in LOCATION_PAIR_ALIASES {
            assert!(location_display(code).is_some(), "no display for {code}");
        }
        for (_, code) in LOCATION_ALIASES {
            assert!(location_display(code).is_some(), "no display for {code}");
        }
    }
}
