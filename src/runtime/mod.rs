//! Consumer-side helpers for generated cursor values.
//!
//! Flipping and style injection need a rendering surface. Both are
//! capability-gated: without one they pass values through or do nothing.

pub mod flip;
pub mod style;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

pub use flip::{CursorFlipper, MirrorSurface, PngMirror};
pub use style::{
    AnimateError, AnimateOptions, CursorMapping, CursorState, CursorStyler, Detached, StyleHandle,
    StyleHost, StyleSheet,
};

static CURSOR_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"url\('(.*)'\)").unwrap());

/// Extract the `data:` URL from a cursor value.
///
/// Only the single-quoted `url('…')` form matches; anything else is
/// returned unchanged.
pub fn to_data_url(cursor: &str) -> &str {
    CURSOR_URL
        .captures(cursor)
        .and_then(|caps| caps.get(1))
        .map_or(cursor, |m| m.as_str())
}

/// [`to_data_url`] over every value of a keyed collection
pub fn to_data_urls<K, V>(cursors: &BTreeMap<K, V>) -> BTreeMap<K, String>
where
    K: Ord + Clone,
    V: AsRef<str>,
{
    cursors
        .iter()
        .map(|(key, value)| (key.clone(), to_data_url(value.as_ref()).to_string()))
        .collect()
}
