//! MediaWiki Action API adapter.
//!
//! Implements category listing (`list=categorymembers`), file URL lookup
//! (`prop=imageinfo`) and binary downloads on top of [`RetryingClient`].

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::http::{RetryPolicy, RetryingClient};
use super::{Downloader, WikiApi};
use crate::config::{RetrySettings, WikiSettings};
use crate::domain::{MemberPage, MemberType, ResolvedImage, WikiItem};

/// Maximum `cmlimit` the API accepts for authenticated clients
pub const MAX_PAGE_SIZE: u32 = 500;

/// Response to `list=categorymembers`
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    query: Option<ListQuery>,

    #[serde(default, rename = "continue")]
    continuation: Option<ListContinue>,

    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    categorymembers: Vec<WikiItem>,
}

#[derive(Debug, Deserialize)]
struct ListContinue {
    cmcontinue: Option<String>,
}

/// Response to `prop=imageinfo`
#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    query: Option<InfoQuery>,

    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct InfoQuery {
    #[serde(default)]
    pages: HashMap<String, InfoPage>,
}

#[derive(Debug, Deserialize)]
struct InfoPage {
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: Option<String>,
}

/// Error body the API returns with HTTP 200
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

impl ListResponse {
    fn into_page(self) -> Result<MemberPage> {
        if let Some(err) = self.error {
            anyhow::bail!("MediaWiki API error [{}]: {}", err.code, err.info);
        }

        Ok(MemberPage {
            members: self.query.map(|q| q.categorymembers).unwrap_or_default(),
            continue_token: self.continuation.and_then(|c| c.cmcontinue),
        })
    }
}

impl InfoResponse {
    fn into_images(self) -> Result<Vec<ResolvedImage>> {
        if let Some(err) = self.error {
            anyhow::bail!("MediaWiki API error [{}]: {}", err.code, err.info);
        }

        let query = self
            .query
            .context("imageinfo response has no query section")?;

        // Pages without image info (missing files) are dropped
        Ok(query
            .pages
            .into_values()
            .filter_map(|page| {
                let url = page.imageinfo.into_iter().next()?.url?;
                Some(ResolvedImage {
                    title: page.title,
                    url,
                })
            })
            .collect())
    }
}

/// MediaWiki client backed by [`RetryingClient`]
pub struct MediaWikiClient {
    http: RetryingClient,
    api_url: String,
    api_policy: RetryPolicy,
    download_policy: RetryPolicy,
}

impl MediaWikiClient {
    /// Create a client from resolved settings
    pub fn new(wiki: &WikiSettings, retry: &RetrySettings) -> Result<Self> {
        let http = RetryingClient::new(&wiki.user_agent, Duration::from_secs(wiki.timeout_seconds))
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: wiki.api_url.clone(),
            api_policy: retry.api_policy(),
            download_policy: retry.download_policy(),
        })
    }

    /// API endpoint this client talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch one listing page as raw JSON (diagnostics)
    pub async fn raw_category_page(
        &self,
        category: &str,
        page_size: u32,
    ) -> Result<serde_json::Value> {
        let params = vec![
            ("action", "query".to_string()),
            ("list", "categorymembers".to_string()),
            ("cmtitle", category.to_string()),
            ("cmlimit", page_size.min(MAX_PAGE_SIZE).to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ];

        let value = self
            .http
            .get_json(&self.api_url, &params, &self.api_policy)
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl WikiApi for MediaWikiClient {
    async fn category_members(
        &self,
        category: &str,
        page_size: u32,
        member_type: MemberType,
        continue_token: Option<&str>,
    ) -> Result<MemberPage> {
        let mut params = vec![
            ("action", "query".to_string()),
            ("list", "categorymembers".to_string()),
            ("cmtitle", category.to_string()),
            ("cmlimit", page_size.min(MAX_PAGE_SIZE).to_string()),
            ("cmtype", member_type.as_str().to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ];
        if let Some(token) = continue_token {
            params.push(("cmcontinue", token.to_string()));
        }

        let response: ListResponse = self
            .http
            .get_json(&self.api_url, &params, &self.api_policy)
            .await
            .with_context(|| format!("Failed to list members of {}", category))?;

        response.into_page()
    }

    async fn image_info(&self, titles: &[String]) -> Result<Vec<ResolvedImage>> {
        let params = vec![
            ("action", "query".to_string()),
            ("titles", titles.join("|")),
            ("prop", "imageinfo".to_string()),
            ("iiprop", "url".to_string()),
            ("format", "json".to_string()),
            ("origin", "*".to_string()),
        ];

        let response: InfoResponse = self
            .http
            .get_json(&self.api_url, &params, &self.api_policy)
            .await
            .with_context(|| format!("Failed to fetch image info for {} titles", titles.len()))?;

        response.into_images()
    }
}

#[async_trait]
impl Downloader for MediaWikiClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .download(url, &self.download_policy)
            .await
            .with_context(|| format!("Failed to download {}", url))?;
        Ok(bytes)
    }
}
