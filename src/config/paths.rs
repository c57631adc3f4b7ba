//! Canonical paths for generated artifacts.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ## Layout
//!
//! | Path | Purpose |
//! |------|---------|
//! | `icons.ts` / `meta.ts` | Flat inventory icon set |
//! | `category-icons.ts` / `category-icons-meta.ts` | Recursive category icon set |
//! | `cache/manifest.json` | URL-hash → cursor value cache |
//! | `packs.yaml` | Pack definitions |

use std::path::{Path, PathBuf};

/// Default generated source directory (relative to project root)
pub const DEFAULT_OUTPUT_DIR: &str = "src/generated";

/// Cache subdirectory name
pub const CACHE_DIR: &str = "cache";

/// Cache manifest file name
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths derived from one output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    root: PathBuf,
}

impl OutputPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Generated source directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file name inside the output directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Main icon definitions (`icons.ts`)
    pub fn icons(&self) -> PathBuf {
        self.file("icons.ts")
    }

    /// Main icon metadata (`meta.ts`)
    pub fn icons_meta(&self) -> PathBuf {
        self.file("meta.ts")
    }

    /// Category icon definitions
    pub fn category_icons(&self) -> PathBuf {
        self.file("category-icons.ts")
    }

    /// Category icon metadata
    pub fn category_icons_meta(&self) -> PathBuf {
        self.file("category-icons-meta.ts")
    }

    /// Disk cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// Disk cache manifest
    pub fn cache_manifest(&self) -> PathBuf {
        self.cache_dir().join(MANIFEST_FILE)
    }

    /// Pack definition file
    pub fn packs(&self) -> PathBuf {
        self.file("packs.yaml")
    }
}
