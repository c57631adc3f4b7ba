//! Domain types for the cursor generator.
//!
//! This module contains the core data structures:
//! - Wiki: listing entries and image requests
//! - Identifier: title → identifier sanitization
//! - Icon: cursor values
//! - Pack: curated cursor progressions
//! - Run: pipeline stage machine and run summary

pub mod icon;
pub mod identifier;
pub mod pack;
pub mod run;
pub mod wiki;

// Re-export commonly used types
pub use icon::{cursor_value, IconMap};
pub use identifier::{export_identifier, sanitize_identifier, RESERVED_WORDS};
pub use pack::{PackError, PackFile, PackInfo};
pub use run::{RunSummary, Stage};
pub use wiki::{ImageRequest, MemberPage, MemberType, ResolvedImage, WikiItem};
