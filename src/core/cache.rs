//! Disk cache of processed cursor values.
//!
//! A single JSON object maps the MD5 hex digest of a source URL to the cursor
//! value produced from it. The key is derived from the URL, not the bytes, so
//! the same image served from two URLs is cached twice. Entries never expire.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

/// Lowercase 32-character hex MD5 digest of a URL
pub fn hash_url(url: &str) -> String {
    hex::encode(md5::compute(url.as_bytes()).0)
}

/// URL hash → cursor value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheManifest(BTreeMap<String, String>);

impl CacheManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached value for a URL hash
    pub fn get(&self, url_hash: &str) -> Option<&str> {
        self.0.get(url_hash).map(String::as_str)
    }

    pub fn insert(&mut self, url_hash: String, value: String) {
        self.0.insert(url_hash, value);
    }

    pub fn contains(&self, url_hash: &str) -> bool {
        self.0.contains_key(url_hash)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The manifest file on disk
#[derive(Debug, Clone)]
pub struct DiskCache {
    path: PathBuf,
}

impl DiskCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the manifest.
    ///
    /// A missing, unreadable or corrupted file yields an empty manifest.
    pub async fn load(&self) -> CacheManifest {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache manifest, starting cold");
                return CacheManifest::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cache manifest unreadable, starting fresh.");
                return CacheManifest::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cache manifest corrupted, starting fresh.");
                CacheManifest::new()
            }
        }
    }

    /// Overwrite the manifest on disk.
    ///
    /// Writes a sibling temp file and renames it over the manifest, so a
    /// crash mid-write leaves the previous manifest intact.
    pub async fn save(&self, manifest: &CacheManifest) -> Result<()> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

        let content = serde_json::to_vec(manifest).context("Failed to serialize cache manifest")?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)
                .context("Failed to create temporary manifest")?;
            tmp.write_all(&content)?;
            tmp.persist(&path)
                .with_context(|| format!("Failed to write cache manifest: {}", path.display()))?;
            Ok(())
        })
        .await
        .context("Cache writer task failed")?
    }
}
