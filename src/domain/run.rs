//! Pipeline run state.
//!
//! A run moves strictly forward through its stages. Each stage consumes the
//! full result set of the previous one; there is no pipelining between stages.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Crawling,
    ResolvingUrls,
    Processing,
    ResolvingCollisions,
    Generating,
    Done,
}

impl Stage {
    /// Whether `next` is a legal transition from this stage.
    ///
    /// Collision resolution is optional, so `Processing` may go straight
    /// to `Generating`.
    pub fn can_advance_to(&self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Idle, Stage::Crawling)
                | (Stage::Crawling, Stage::ResolvingUrls)
                | (Stage::ResolvingUrls, Stage::Processing)
                | (Stage::Processing, Stage::ResolvingCollisions)
                | (Stage::Processing, Stage::Generating)
                | (Stage::ResolvingCollisions, Stage::Generating)
                | (Stage::Generating, Stage::Done)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Crawling => "crawling",
            Stage::ResolvingUrls => "resolving_urls",
            Stage::Processing => "processing",
            Stage::ResolvingCollisions => "resolving_collisions",
            Stage::Generating => "generating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Summary of a completed pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run (log correlation only)
    pub id: Uuid,

    /// Name of the icon set that was generated
    pub icon_set: String,

    /// Current stage
    pub stage: Stage,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Files discovered by the crawler (after dedup and filtering)
    pub items_found: usize,

    /// Keys with a resolved download URL
    pub urls_resolved: usize,

    /// Keys with a processed cursor value
    pub images_processed: usize,

    pub cache_hits: usize,
    pub downloads: usize,

    /// Entries dropped as identical to a published export
    pub dropped: usize,

    /// Entries renamed to avoid a published export
    pub renamed: usize,

    /// Identifiers written to the generated source file
    pub identifiers: usize,

    pub output_path: Option<PathBuf>,
    pub meta_path: Option<PathBuf>,
    pub output_bytes: u64,
}

impl RunSummary {
    /// Create a new summary in the `Idle` stage
    pub fn new(icon_set: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            icon_set: icon_set.into(),
            stage: Stage::Idle,
            started_at: Utc::now(),
            completed_at: None,
            items_found: 0,
            urls_resolved: 0,
            images_processed: 0,
            cache_hits: 0,
            downloads: 0,
            dropped: 0,
            renamed: 0,
            identifiers: 0,
            output_path: None,
            meta_path: None,
            output_bytes: 0,
        }
    }

    /// Move to the next stage, rejecting out-of-order transitions
    pub fn advance(&mut self, next: Stage) -> anyhow::Result<()> {
        if !self.stage.can_advance_to(next) {
            anyhow::bail!("Invalid stage transition: {} → {}", self.stage, next);
        }
        self.stage = next;
        if next == Stage::Done {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Wall-clock duration of the run in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Generated source size in megabytes
    pub fn output_megabytes(&self) -> f64 {
        self.output_bytes as f64 / (1024.0 * 1024.0)
    }
}
