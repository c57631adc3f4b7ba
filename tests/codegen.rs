//! Code Generation Integration Tests
//!
//! Tests for generated source layout, in-map deduplication and reading
//! published exports back.

use tempfile::TempDir;

use wiki_cursors::core::codegen::{emit_icons, emit_meta, read_exports};
use wiki_cursors::domain::IconMap;

fn icons(entries: &[(&str, &str)]) -> IconMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_emit_icons_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");

    let map = icons(&[
        ("Dragon scimitar", "url('data:b'), auto"),
        ("Abyssal whip", "url('data:a'), auto"),
        ("3rd age amulet", "url('data:c'), auto"),
    ]);

    let names = emit_icons(&map, &path).await.unwrap();
    assert_eq!(names, vec!["_3rdAgeAmulet", "abyssalWhip", "dragonScimitar"]);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "// Auto-generated OSRS Icon definitions\n\n\
         export const _3rdAgeAmulet = \"url('data:c'), auto\";\n\
         export const abyssalWhip = \"url('data:a'), auto\";\n\
         export const dragonScimitar = \"url('data:b'), auto\";\n"
    );
}

#[tokio::test]
async fn test_source_by_raw_key_names_sorted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");
    let meta = temp.path().join("meta.ts");

    // Raw-key order differs from identifier order here
    let map = icons(&[("Zeta", "z"), ("alpha", "a"), ("Beta", "b")]);
    let names = emit_icons(&map, &path).await.unwrap();
    assert_eq!(names, vec!["alpha", "beta", "zeta"]);

    let exports: Vec<String> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .filter_map(|l| l.strip_prefix("export const "))
        .map(|l| l.split(' ').next().unwrap().to_string())
        .collect();
    assert_eq!(exports, vec!["beta", "zeta", "alpha"]);

    emit_meta(&names, &meta, "iconNames", "IconName").await.unwrap();
    let listed: Vec<String> = std::fs::read_to_string(&meta)
        .unwrap()
        .lines()
        .filter_map(|l| l.trim().strip_prefix('\''))
        .map(|l| l.trim_end_matches("',").to_string())
        .collect();
    assert_eq!(listed, vec!["alpha", "beta", "zeta"]);
}

#[tokio::test]
async fn test_emit_icons_deduplicates_within_map() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");

    let map = icons(&[
        ("Coins", "1"),
        ("Coins (10)", "2"),
        ("Coins 10", "3"),
        ("coins", "4"),
    ]);
    let names = emit_icons(&map, &path).await.unwrap();

    assert_eq!(names, vec!["coins", "coins10", "coins10_1", "coins_1"]);

    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
}

#[tokio::test]
async fn test_emit_icons_empty_map() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");

    let names = emit_icons(&IconMap::new(), &path).await.unwrap();
    assert!(names.is_empty());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "// Auto-generated OSRS Icon definitions\n\n"
    );
}

#[tokio::test]
async fn test_emit_meta_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("meta.ts");

    let names = vec!["abyssalWhip".to_string(), "coins".to_string()];
    emit_meta(&names, &path, "iconNames", "IconName").await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "// Auto-generated OSRS Icon metadata\n\n\
         export const iconNames = [\n\
         \x20 'abyssalWhip',\n\
         \x20 'coins',\n\
         ] as const;\n\n\
         export type IconName = (typeof iconNames)[number];\n"
    );
}

#[tokio::test]
async fn test_emit_overwrites_previous_output() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");

    emit_icons(&icons(&[("Old", "o")]), &path).await.unwrap();
    emit_icons(&icons(&[("New icon", "n")]), &path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!content.contains("old"));
    assert!(content.contains("export const newIcon = \"n\";"));
}

#[tokio::test]
async fn test_read_exports_from_generated_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("icons.ts");

    let map = icons(&[
        ("Abyssal whip", "url('data:image/png;base64,AA=='), auto"),
        ("Hunter kit", "url('data:image/png;base64,BB=='), auto"),
    ]);
    emit_icons(&map, &path).await.unwrap();

    let exports = read_exports(&path).await.unwrap();
    assert_eq!(exports.len(), 2);
    assert_eq!(exports["hunterKit"], "url('data:image/png;base64,BB=='), auto");
}

#[tokio::test]
async fn test_read_exports_missing_file() {
    let temp = TempDir::new().unwrap();
    let exports = read_exports(&temp.path().join("absent.ts")).await.unwrap();
    assert!(exports.is_empty());
}
