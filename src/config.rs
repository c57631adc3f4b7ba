//! Configuration for the cursor generator.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (WIKI_CURSORS_API_URL, WIKI_CURSORS_USER_AGENT,
//!    WIKI_CURSORS_OUTPUT_DIR)
//! 2. Config file (.wiki-cursors/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .wiki-cursors/config.yaml
//! - Falls back to the user config directory (~/.config/wiki-cursors/config.yaml)
//! - Paths in config file are relative to the project root (parent of .wiki-cursors/)

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::http::RetryPolicy;
use crate::adapters::mediawiki::MAX_PAGE_SIZE;

/// Default MediaWiki endpoint
pub const DEFAULT_API_URL: &str = "https://oldschool.runescape.wiki/api.php";

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wiki-cursors/",
    env!("CARGO_PKG_VERSION"),
    " (generated cursor icon package)"
);

/// Config directory name searched for in the project tree
const CONFIG_DIR_NAME: &str = ".wiki-cursors";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WikiConfig {
    pub api_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Generated source directory (relative to project root)
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConcurrencyConfig {
    pub metadata: Option<usize>,
    pub downloads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetryConfig {
    pub api_retries: Option<u32>,
    pub download_retries: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub jitter_ms: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub wiki: WikiSettings,
    /// Absolute or cwd-relative generated source directory
    pub output_dir: PathBuf,
    pub concurrency: ConcurrencySettings,
    pub retry: RetrySettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WikiSettings {
    pub api_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// `cmlimit` per listing request
    pub page_size: u32,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 15,
            page_size: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcurrencySettings {
    /// Concurrent metadata chunk lookups
    pub metadata: usize,
    /// Concurrent image downloads
    pub downloads: usize,
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        Self {
            metadata: 2,
            downloads: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrySettings {
    pub api_retries: u32,
    pub download_retries: u32,
    pub base_delay_ms: u64,
    pub jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            api_retries: 10,
            download_retries: 5,
            base_delay_ms: 5000,
            jitter_ms: 5000,
        }
    }
}

impl RetrySettings {
    /// Policy for listing and metadata calls
    pub fn api_policy(&self) -> RetryPolicy {
        self.policy(self.api_retries)
    }

    /// Policy for binary downloads
    pub fn download_policy(&self) -> RetryPolicy {
        self.policy(self.download_retries)
    }

    fn policy(&self, max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: std::time::Duration::from_millis(self.base_delay_ms),
            jitter: std::time::Duration::from_millis(self.jitter_ms),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wiki: WikiSettings::default(),
            output_dir: PathBuf::from(paths::DEFAULT_OUTPUT_DIR),
            concurrency: ConcurrencySettings::default(),
            retry: RetrySettings::default(),
            config_file: None,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_file = find_config_file();

        let (mut settings, base_dir) = match config_file {
            Some(ref path) => {
                let file = load_config_file(path)?;
                // Project root is the parent of .wiki-cursors/
                let base_dir = path
                    .parent()
                    .and_then(|p| p.parent())
                    .unwrap_or(Path::new("."))
                    .to_path_buf();
                (Self::from_file(file, &base_dir), Some(base_dir))
            }
            None => (Self::default(), None),
        };
        settings.config_file = config_file;

        if let Ok(api_url) = std::env::var("WIKI_CURSORS_API_URL") {
            settings.wiki.api_url = api_url;
        }
        if let Ok(user_agent) = std::env::var("WIKI_CURSORS_USER_AGENT") {
            settings.wiki.user_agent = user_agent;
        }
        if let Ok(dir) = std::env::var("WIKI_CURSORS_OUTPUT_DIR") {
            settings.output_dir = match base_dir {
                Some(ref base) => resolve_path(base, &dir),
                None => PathBuf::from(dir),
            };
        }

        Ok(settings)
    }

    /// Apply a parsed config file on top of the defaults
    pub fn from_file(file: ConfigFile, base_dir: &Path) -> Self {
        let defaults = Self::default();

        let wiki = WikiSettings {
            api_url: file.wiki.api_url.unwrap_or(defaults.wiki.api_url),
            user_agent: file.wiki.user_agent.unwrap_or(defaults.wiki.user_agent),
            timeout_seconds: file
                .wiki
                .timeout_seconds
                .unwrap_or(defaults.wiki.timeout_seconds),
            page_size: file
                .wiki
                .page_size
                .unwrap_or(defaults.wiki.page_size)
                .clamp(1, MAX_PAGE_SIZE),
        };

        let output_dir = file
            .output
            .dir
            .map(|dir| resolve_path(base_dir, &dir))
            .unwrap_or_else(|| base_dir.join(paths::DEFAULT_OUTPUT_DIR));

        let concurrency = ConcurrencySettings {
            metadata: file
                .concurrency
                .metadata
                .unwrap_or(defaults.concurrency.metadata)
                .max(1),
            downloads: file
                .concurrency
                .downloads
                .unwrap_or(defaults.concurrency.downloads)
                .max(1),
        };

        let retry = RetrySettings {
            api_retries: file.retry.api_retries.unwrap_or(defaults.retry.api_retries),
            download_retries: file
                .retry
                .download_retries
                .unwrap_or(defaults.retry.download_retries),
            base_delay_ms: file
                .retry
                .base_delay_ms
                .unwrap_or(defaults.retry.base_delay_ms),
            jitter_ms: file.retry.jitter_ms.unwrap_or(defaults.retry.jitter_ms),
        };

        Self {
            wiki,
            output_dir,
            concurrency,
            retry,
            config_file: None,
        }
    }

    /// Canonical output paths under the configured directory
    pub fn paths(&self) -> paths::OutputPaths {
        paths::OutputPaths::new(&self.output_dir)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR_NAME).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("wiki-cursors").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse config YAML content
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(serde_yaml::from_str(content)?)
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
