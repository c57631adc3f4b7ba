//! Resolve file titles to download URLs.
//!
//! Distinct titles are looked up in chunks of 50 (the API's `titles` ceiling)
//! with a small concurrency limit. A title may be requested under several
//! keys; every key receives the title's URL. Unresolved titles are absent
//! from the result rather than reported as errors.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info};

use super::executor::bounded_collect;
use crate::adapters::WikiApi;
use crate::domain::{ImageRequest, ResolvedImage};

/// Maximum titles per `imageinfo` request
pub const CHUNK_SIZE: usize = 50;

/// Default concurrent metadata lookups
pub const DEFAULT_METADATA_CONCURRENCY: usize = 2;

/// Log progress every this many chunks
const PROGRESS_INTERVAL: usize = 20;

/// Resolve `key → download URL` for every request whose title resolves
pub async fn resolve_image_urls(
    api: &dyn WikiApi,
    requests: &[ImageRequest],
    concurrency: usize,
) -> BTreeMap<String, String> {
    info!(files = requests.len(), "Fetching image info");

    let mut keys_by_title: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut titles: Vec<String> = Vec::new();
    for request in requests {
        let keys = keys_by_title
            .entry(request.file_title.as_str())
            .or_insert_with(|| {
                titles.push(request.file_title.clone());
                Vec::new()
            });
        keys.push(request.key.as_str());
    }

    let total_chunks = chunk_count(titles.len());
    let completed = AtomicUsize::new(0);

    let tasks = titles.chunks(CHUNK_SIZE).map(|chunk| {
        let completed = &completed;
        move || async move {
            let images = match api.image_info(chunk).await {
                Ok(images) => images,
                Err(e) => {
                    error!(error = %format!("{:#}", e), "Error fetching image info");
                    Vec::new()
                }
            };

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} chunks...", done, total_chunks);
            }
            images
        }
    });

    let results: Vec<Vec<ResolvedImage>> = bounded_collect(tasks, concurrency).await;

    let mut urls = BTreeMap::new();
    for image in results.into_iter().flatten() {
        if let Some(keys) = keys_by_title.get(image.title.as_str()) {
            for key in keys {
                urls.insert((*key).to_string(), image.url.clone());
            }
        }
    }

    info!(resolved = urls.len(), "Resolved image URLs");
    urls
}

/// Number of metadata requests needed for `titles` distinct titles
pub fn chunk_count(titles: usize) -> usize {
    titles.div_ceil(CHUNK_SIZE)
}
