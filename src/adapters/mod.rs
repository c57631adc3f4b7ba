//! Adapter interfaces for external systems.
//!
//! Adapters put the remote wiki behind traits so the crawler, resolver and
//! processor can run against in-memory fakes.

pub mod http;
pub mod mediawiki;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{MemberPage, MemberType, ResolvedImage};

pub use http::{FetchError, RetryPolicy, RetryingClient};
pub use mediawiki::MediaWikiClient;

/// Read-only access to the wiki's listing and metadata APIs
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Fetch one page of a category listing
    async fn category_members(
        &self,
        category: &str,
        page_size: u32,
        member_type: MemberType,
        continue_token: Option<&str>,
    ) -> Result<MemberPage>;

    /// Resolve download URLs for up to 50 file titles.
    ///
    /// Titles without image info are absent from the result.
    async fn image_info(&self, titles: &[String]) -> Result<Vec<ResolvedImage>>;
}

/// Binary download of a resolved image URL
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}
