//! Identifier Sanitization Integration Tests
//!
//! Tests for title → identifier conversion and the export prefix rule.

use wiki_cursors::domain::identifier::is_reserved;
use wiki_cursors::{export_identifier, sanitize_identifier};
use wiki_cursors::domain::RESERVED_WORDS;

const CASES: &[(&str, &str)] = &[
    ("Abyssal whip", "abyssalWhip"),
    ("Dragon scimitar", "dragonScimitar"),
    ("3rd age amulet", "3rdAgeAmulet"),
    ("1/2 anchovy pizza", "12AnchovyPizza"),
    ("Coins (100)", "coins100"),
    ("Ring of wealth (+5)", "ringOfWealthPlus5"),
    ("Saradomin & Zamorak", "saradominAndZamorak"),
    ("Bob's axe", "bobsAxe"),
    ("Combat icon", "combatIcon"),
    ("Free-to-play icon", "freeToPlayIcon"),
    ("Magic Damage icon", "magicDamageIcon"),
    ("Equipment_slot_icon", "equipmentSlotIcon"),
    ("", ""),
];

#[test]
fn test_known_titles() {
    for (input, expected) in CASES {
        assert_eq!(
            sanitize_identifier(input),
            *expected,
            "sanitize_identifier({:?})",
            input
        );
    }
}

#[test]
fn test_deterministic() {
    for (input, _) in CASES {
        assert_eq!(sanitize_identifier(input), sanitize_identifier(input));
    }
}

#[test]
fn test_reserved_words_prefixed() {
    for word in RESERVED_WORDS {
        assert!(is_reserved(word));
        assert_eq!(sanitize_identifier(word), format!("_{}", word));
    }

    for word in ["class", "return", "delete", "void", "yield"] {
        assert_eq!(sanitize_identifier(word), format!("_{}", word));
    }
}

#[test]
fn test_reserved_after_lowercasing() {
    // "Class" lowercases to a reserved word
    assert_eq!(sanitize_identifier("Class"), "_class");
    // Multi-word titles never collide with a single keyword
    assert_eq!(sanitize_identifier("Class icon"), "classIcon");
}

#[test]
fn test_export_identifier_prefix_rule() {
    assert_eq!(export_identifier("3rd age amulet"), "_3rdAgeAmulet");
    assert_eq!(export_identifier("1/2 anchovy pizza"), "_12AnchovyPizza");
    assert_eq!(export_identifier(""), "_");
    assert_eq!(export_identifier("!!!"), "_");
    assert_eq!(export_identifier("Abyssal whip"), "abyssalWhip");
}

#[test]
fn test_non_ascii_stripped() {
    assert_eq!(sanitize_identifier("Café sign"), "cafSign");
}
