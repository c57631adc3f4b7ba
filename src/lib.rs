//! wiki-cursors - Inlined CSS cursor constants generated from wiki images
//!
//! Crawls MediaWiki categories, downloads every image, recompresses it to a
//! small PNG and emits TypeScript source exposing each image as a named
//! `cursor` value.
//!
//! # Pipeline
//!
//! Crawl → resolve URLs → download and compress (disk-cached) → resolve
//! collisions with published exports → generate source. Each stage finishes
//! before the next starts.
//!
//! # Modules
//!
//! - `adapters`: MediaWiki API and retrying HTTP client
//! - `core`: Pipeline stages, bounded executor, cache, code generation
//! - `domain`: Data structures (WikiItem, RunSummary, PackInfo, identifiers)
//! - `imaging`: PNG/SVG recompression
//! - `runtime`: Consumer helpers (data URLs, flipping, style injection)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Regenerate item icons
//! wiki-cursors update-icons
//!
//! # Crawl the icon category tree without touching the cache
//! wiki-cursors update-category-icons --no-cache
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod imaging;
pub mod runtime;

// Re-export main types at crate root for convenience
pub use core::{IconSet, Pipeline};
pub use domain::{export_identifier, sanitize_identifier, PackInfo, RunSummary, Stage};
pub use runtime::{to_data_url, to_data_urls, CursorFlipper, CursorStyler};
