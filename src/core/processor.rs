//! Download and recompress images into cursor values.
//!
//! Every `key → URL` pair becomes one task under the download ceiling. The
//! manifest is read-only while tasks run; each task reports what it produced
//! and the driver folds new entries into the manifest once all tasks settle.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use tracing::{error, info};

use super::cache::{hash_url, CacheManifest, DiskCache};
use super::executor::bounded_collect;
use crate::adapters::Downloader;
use crate::domain::IconMap;
use crate::imaging::{encode_cursor, Codec};

/// Default concurrent downloads
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 10;

/// Log progress every this many new downloads
const PROGRESS_INTERVAL: usize = 100;

/// Result of a processing pass
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// key → cursor value for every item that succeeded
    pub icons: IconMap,
    /// Items served from the manifest
    pub cache_hits: usize,
    /// Items downloaded and recompressed
    pub downloads: usize,
    /// Items dropped after a download or codec failure
    pub failures: usize,
}

enum Outcome {
    Cached { key: String, value: String },
    Fresh { key: String, url_hash: String, value: String },
    Failed,
}

/// Turn every `key → URL` pair into a cursor value.
///
/// With `use_cache` the manifest is loaded before the pass and saved once
/// after it; without it the manifest is neither read nor written. A failed
/// item is logged and left out of the report.
pub async fn process_images(
    downloader: &dyn Downloader,
    cache: &DiskCache,
    url_map: &BTreeMap<String, String>,
    use_cache: bool,
    concurrency: usize,
) -> Result<ProcessReport> {
    let mut manifest = if use_cache {
        let manifest = cache.load().await;
        info!("Cache: loaded {} cached entries.", manifest.len());
        manifest
    } else {
        CacheManifest::new()
    };

    let total = url_map.len();
    let hits = AtomicUsize::new(0);
    let downloaded = AtomicUsize::new(0);

    let tasks = url_map.iter().map(|(key, url)| {
        let manifest = &manifest;
        let hits = &hits;
        let downloaded = &downloaded;
        move || async move {
            let url_hash = hash_url(url);

            if use_cache {
                if let Some(value) = manifest.get(&url_hash) {
                    hits.fetch_add(1, Ordering::Relaxed);
                    return Outcome::Cached {
                        key: key.clone(),
                        value: value.to_string(),
                    };
                }
            }

            match fetch_and_encode(downloader, url).await {
                Ok(value) => {
                    let done = downloaded.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_INTERVAL == 0 {
                        let expected = total - hits.load(Ordering::Relaxed);
                        info!("Downloaded {} / ~{} new images...", done, expected);
                    }
                    Outcome::Fresh {
                        key: key.clone(),
                        url_hash,
                        value,
                    }
                }
                Err(e) => {
                    error!(%key, %url, error = %format!("{:#}", e), "Failed to download/process image");
                    Outcome::Failed
                }
            }
        }
    });

    let outcomes = bounded_collect(tasks, concurrency).await;

    let mut report = ProcessReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Cached { key, value } => {
                report.cache_hits += 1;
                report.icons.insert(key, value);
            }
            Outcome::Fresh {
                key,
                url_hash,
                value,
            } => {
                report.downloads += 1;
                if use_cache {
                    manifest.insert(url_hash, value.clone());
                }
                report.icons.insert(key, value);
            }
            Outcome::Failed => report.failures += 1,
        }
    }

    if use_cache {
        cache.save(&manifest).await?;
        info!(
            "Cache: {} hits, {} new downloads.",
            report.cache_hits, report.downloads
        );
    }

    Ok(report)
}

async fn fetch_and_encode(downloader: &dyn Downloader, url: &str) -> Result<String> {
    let bytes = downloader.download(url).await?;
    Ok(encode_cursor(bytes, Codec::from_url(url)).await?)
}
