//! Asset pipeline.
//!
//! This module contains:
//! - Executor: bounded-concurrency task runner
//! - Cache: URL-hash keyed manifest of processed images
//! - Crawler / ImageInfo: category discovery and URL resolution
//! - Processor: download and recompression
//! - Collisions / Codegen: identifier reconciliation and source output
//! - Pipeline: the staged run tying them together

pub mod cache;
pub mod codegen;
pub mod collisions;
pub mod crawler;
pub mod executor;
pub mod image_info;
pub mod pipeline;
pub mod processor;

pub use cache::{hash_url, CacheManifest, DiskCache};
pub use codegen::{emit_icons, emit_meta, read_exports};
pub use collisions::{find_collisions, resolve_collisions, Collision, CollisionStats};
pub use crawler::{build_image_requests, fetch_members, filter_image_files, CategoryCrawler};
pub use executor::{bounded_collect, bounded_execute};
pub use image_info::resolve_image_urls;
pub use pipeline::{Discovery, IconSet, Pipeline};
pub use processor::{process_images, ProcessReport};
