//! In-memory wiki shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use wiki_cursors::adapters::{Downloader, WikiApi};
use wiki_cursors::domain::{MemberPage, MemberType, ResolvedImage, WikiItem};

#[derive(Default)]
struct Category {
    files: Vec<String>,
    subcategories: Vec<String>,
}

/// Serves category listings, image info and image bytes from memory
#[derive(Default)]
pub struct FakeWiki {
    categories: HashMap<String, Category>,
    /// Category title → first zero-based listing page that fails
    failing_categories: HashMap<String, usize>,
    urls: HashMap<String, String>,
    blobs: HashMap<String, Vec<u8>>,
    pub listing_calls: AtomicUsize,
    pub info_chunks: Mutex<Vec<usize>>,
    pub downloads: AtomicUsize,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category with file and subcategory members
    pub fn category(mut self, title: &str, files: &[&str], subcategories: &[&str]) -> Self {
        self.categories.insert(
            title.to_string(),
            Category {
                files: files.iter().map(|s| s.to_string()).collect(),
                subcategories: subcategories.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    /// Make every listing of `title` fail
    pub fn failing(self, title: &str) -> Self {
        self.failing_from_page(title, 0)
    }

    /// Serve listing pages of `title` before `page`, then fail
    pub fn failing_from_page(mut self, title: &str, page: usize) -> Self {
        self.failing_categories.insert(title.to_string(), page);
        self
    }

    /// Register a download URL for a file title, served with `bytes`
    pub fn image(mut self, file_title: &str, url: &str, bytes: Vec<u8>) -> Self {
        self.urls.insert(file_title.to_string(), url.to_string());
        self.blobs.insert(url.to_string(), bytes);
        self
    }

    /// Register a URL whose download always fails
    pub fn broken_image(mut self, file_title: &str, url: &str) -> Self {
        self.urls.insert(file_title.to_string(), url.to_string());
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

fn item(title: &str, namespace: i64) -> WikiItem {
    WikiItem {
        page_id: title.len() as i64,
        namespace,
        title: title.to_string(),
    }
}

#[async_trait]
impl WikiApi for FakeWiki {
    async fn category_members(
        &self,
        category: &str,
        page_size: u32,
        member_type: MemberType,
        continue_token: Option<&str>,
    ) -> Result<MemberPage> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let offset: usize = continue_token.map_or(0, |t| t.parse().unwrap_or(0));
        if let Some(&page) = self.failing_categories.get(category) {
            if offset / page_size as usize >= page {
                bail!("listing of {} failed at offset {}", category, offset);
            }
        }

        let Some(entry) = self.categories.get(category) else {
            return Ok(MemberPage::default());
        };
        let (titles, namespace) = match member_type {
            MemberType::File => (&entry.files, 6),
            MemberType::Subcat => (&entry.subcategories, 14),
            MemberType::Page => return Ok(MemberPage::default()),
        };

        let end = (offset + page_size as usize).min(titles.len());
        let members = titles[offset..end].iter().map(|t| item(t, namespace)).collect();
        let continue_token = (end < titles.len()).then(|| end.to_string());

        Ok(MemberPage {
            members,
            continue_token,
        })
    }

    async fn image_info(&self, titles: &[String]) -> Result<Vec<ResolvedImage>> {
        assert!(titles.len() <= 50, "chunk of {} titles", titles.len());
        self.info_chunks.lock().unwrap().push(titles.len());

        Ok(titles
            .iter()
            .filter_map(|title| {
                self.urls.get(title).map(|url| ResolvedImage {
                    title: title.clone(),
                    url: url.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl Downloader for FakeWiki {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        match self.blobs.get(url) {
            Some(bytes) => Ok(bytes.clone()),
            None => bail!("404 for {}", url),
        }
    }
}

/// A small PNG filled with one color
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// A square SVG with one filled rectangle
pub fn svg(size: u32) -> Vec<u8> {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}"><rect width="{0}" height="{0}" fill="green"/></svg>"#,
        size
    )
    .into_bytes()
}

/// Build a string map from pairs
pub fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
