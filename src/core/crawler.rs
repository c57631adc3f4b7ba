//! Category crawler.
//!
//! Pages through `categorymembers` listings and, for the recursive variant,
//! walks subcategories depth-first. Category graphs on wikis are not trees:
//! parent and child may list each other, so visited categories are tracked
//! and a revisit yields nothing.

use std::collections::{BTreeMap, HashSet};

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, error, info};

use crate::adapters::WikiApi;
use crate::domain::{ImageRequest, MemberType, WikiItem};

/// File extensions the image pipeline can process
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".png", ".svg"];

/// Namespace prefix of file titles
const FILE_PREFIX: &str = "File:";

/// Fetch every member of a category, following continuation tokens.
///
/// A failing page ends pagination; whatever was collected so far is
/// returned.
pub async fn fetch_members(
    api: &dyn WikiApi,
    category: &str,
    page_size: u32,
    member_type: MemberType,
) -> Vec<WikiItem> {
    info!(category, %member_type, "Fetching category members");

    let mut items = Vec::new();
    let mut continue_token: Option<String> = None;

    loop {
        let page = match api
            .category_members(category, page_size, member_type, continue_token.as_deref())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!(category, error = %format!("{:#}", e), "Error fetching category members");
                break;
            }
        };

        let fetched = page.members.len();
        items.extend(page.members);
        debug!(category, fetched, total = items.len(), "Fetched listing page");

        match page.continue_token {
            Some(token) => continue_token = Some(token),
            None => break,
        }
    }

    info!(category, total = items.len(), "Finished listing");
    items
}

/// Recursive crawler with cycle detection.
///
/// The visited set lives on the crawler, so one instance crawls one tree.
pub struct CategoryCrawler<'a> {
    api: &'a dyn WikiApi,
    page_size: u32,
    visited: HashSet<String>,
}

impl<'a> CategoryCrawler<'a> {
    pub fn new(api: &'a dyn WikiApi, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            visited: HashSet::new(),
        }
    }

    /// Categories visited so far
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Collect all files under `root` and its subcategories.
    ///
    /// Returns `title → item`. A file reachable through several paths keeps
    /// the entry from the first path that reached it.
    pub async fn fetch_all_recursively(&mut self, root: &str) -> BTreeMap<String, WikiItem> {
        self.crawl(root.to_string()).await
    }

    fn crawl(&mut self, category: String) -> BoxFuture<'_, BTreeMap<String, WikiItem>> {
        async move {
            if !self.visited.insert(category.clone()) {
                info!(%category, "Skipping already-visited category");
                return BTreeMap::new();
            }

            let mut files = BTreeMap::new();

            let direct = fetch_members(self.api, &category, self.page_size, MemberType::File).await;
            for file in direct {
                files.entry(file.title.clone()).or_insert(file);
            }

            let subcategories =
                fetch_members(self.api, &category, self.page_size, MemberType::Subcat).await;
            info!(
                %category,
                count = subcategories.len(),
                "Found subcategories: {}",
                subcategories
                    .iter()
                    .map(|s| s.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            for subcategory in subcategories {
                let child_files = self.crawl(subcategory.title).await;
                for (title, item) in child_files {
                    files.entry(title).or_insert(item);
                }
            }

            files
        }
        .boxed()
    }
}

/// Keep only files with a supported image extension
pub fn filter_image_files(files: BTreeMap<String, WikiItem>) -> BTreeMap<String, WikiItem> {
    files
        .into_iter()
        .filter(|(title, _)| {
            let supported = has_extension(title, SUPPORTED_EXTENSIONS);
            if !supported {
                info!(%title, "Skipping unsupported file format");
            }
            supported
        })
        .collect()
}

/// Build image requests, deriving each key from the file title.
///
/// The key drops the `File:` prefix and one trailing extension from
/// `extensions` (case-insensitive).
pub fn build_image_requests<'i>(
    items: impl IntoIterator<Item = &'i WikiItem>,
    extensions: &[&str],
) -> Vec<ImageRequest> {
    items
        .into_iter()
        .map(|item| ImageRequest {
            file_title: item.title.clone(),
            key: request_key(&item.title, extensions),
        })
        .collect()
}

/// Strip the file namespace prefix and a known extension from a title
pub fn request_key(title: &str, extensions: &[&str]) -> String {
    let name = title.strip_prefix(FILE_PREFIX).unwrap_or(title);

    for ext in extensions {
        if has_extension(name, &[*ext]) {
            return name[..name.len() - ext.len()].to_string();
        }
    }
    name.to_string()
}

fn has_extension(title: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| {
        title.len() >= ext.len()
            && title.is_char_boundary(title.len() - ext.len())
            && title[title.len() - ext.len()..].eq_ignore_ascii_case(ext)
    })
}
