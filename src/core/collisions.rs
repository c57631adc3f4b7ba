//! Cross-set identifier collisions.
//!
//! Two icon sets are generated independently and exported side by side, so
//! a name emitted by the second set must not shadow one already published by
//! the first. Keys are compared after the same sanitization the code
//! generator applies.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{export_identifier, IconMap};

/// Suffix appended to a raw key whose identifier is taken by a different value
pub const RENAME_SUFFIX: &str = " category";

/// Counts from [`resolve_collisions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Entries removed because the published value is identical
    pub dropped: usize,
    /// Entries kept under a renamed key
    pub renamed: usize,
}

/// Reconcile `icons` (raw key → value) with `published` (identifier → value).
///
/// - identifier not published: entry untouched
/// - published with the same value: entry dropped
/// - published with a different value: raw key gets [`RENAME_SUFFIX`]
pub fn resolve_collisions(
    icons: &mut IconMap,
    published: &BTreeMap<String, String>,
) -> CollisionStats {
    let mut stats = CollisionStats::default();

    let keys: Vec<String> = icons.keys().cloned().collect();
    for raw_key in keys {
        let name = export_identifier(&raw_key);
        let Some(published_value) = published.get(&name) else {
            continue;
        };

        let Some(value) = icons.remove(&raw_key) else {
            continue;
        };

        if *published_value == value {
            info!("  Collision (identical, dropped): {}", name);
            stats.dropped += 1;
        } else {
            let renamed_key = format!("{}{}", raw_key, RENAME_SUFFIX);
            info!(
                "  Collision (different, renamed): {} → {}",
                name,
                export_identifier(&renamed_key)
            );
            icons.insert(renamed_key, value);
            stats.renamed += 1;
        }
    }

    stats
}

/// A shared identifier between two published sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub identical: bool,
}

/// Identifiers present in both `a` and `b`, sorted by name
pub fn find_collisions(
    a: &BTreeMap<String, String>,
    b: &BTreeMap<String, String>,
) -> Vec<Collision> {
    a.iter()
        .filter_map(|(name, value)| {
            b.get(name).map(|other| Collision {
                name: name.clone(),
                identical: value == other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_untouched_when_not_published() {
        let mut icons = map(&[("Attack icon", "a")]);
        let stats = resolve_collisions(&mut icons, &map(&[("strengthIcon", "s")]));

        assert_eq!(stats, CollisionStats::default());
        assert_eq!(icons, map(&[("Attack icon", "a")]));
    }

    #[test]
    fn test_identical_value_dropped() {
        let mut icons = map(&[("Hunter kit", "same"), ("Other", "o")]);
        let stats = resolve_collisions(&mut icons, &map(&[("hunterKit", "same")]));

        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.renamed, 0);
        assert_eq!(icons, map(&[("Other", "o")]));
    }

    #[test]
    fn test_different_value_renamed() {
        let mut icons = map(&[("Hunter kit", "new")]);
        let stats = resolve_collisions(&mut icons, &map(&[("hunterKit", "old")]));

        assert_eq!(stats.renamed, 1);
        assert_eq!(icons, map(&[("Hunter kit category", "new")]));
        assert_eq!(export_identifier("Hunter kit category"), "hunterKitCategory");
    }

    #[test]
    fn test_digit_prefix_applied_before_compare() {
        let mut icons = map(&[("3rd age amulet", "v")]);
        let stats = resolve_collisions(&mut icons, &map(&[("_3rdAgeAmulet", "v")]));
        assert_eq!(stats.dropped, 1);
        assert!(icons.is_empty());
    }

    #[test]
    fn test_find_collisions() {
        let a = map(&[("coins", "1"), ("bucket", "2"), ("onlyA", "3")]);
        let b = map(&[("coins", "1"), ("bucket", "x"), ("onlyB", "4")]);

        let collisions = find_collisions(&a, &b);
        assert_eq!(
            collisions,
            vec![
                Collision { name: "bucket".into(), identical: false },
                Collision { name: "coins".into(), identical: true },
            ]
        );
    }
}
