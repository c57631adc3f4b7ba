//! Icon entries and CSS cursor values.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Raw key → CSS cursor value, as produced by one pipeline run
pub type IconMap = BTreeMap<String, String>;

/// Fallback keyword appended to every generated cursor value
pub const CURSOR_FALLBACK: &str = "auto";

/// Wrap PNG bytes into a CSS `cursor` property value.
///
/// Output has the form `url('data:image/png;base64,<data>'), auto`.
pub fn cursor_value(png: &[u8]) -> String {
    format!(
        "url('{}'), {}",
        png_data_url(png),
        CURSOR_FALLBACK
    )
}

/// Encode PNG bytes as a `data:` URL
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
