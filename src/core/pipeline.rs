//! Icon set generation pipeline.
//!
//! A run walks `Crawling → ResolvingUrls → Processing →
//! [ResolvingCollisions] → Generating → Done`, each stage finishing before
//! the next begins.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::cache::DiskCache;
use super::codegen::{emit_icons, emit_meta, read_exports};
use super::collisions::resolve_collisions;
use super::crawler::{
    build_image_requests, fetch_members, filter_image_files, CategoryCrawler,
    SUPPORTED_EXTENSIONS,
};
use super::image_info::resolve_image_urls;
use super::processor::process_images;
use crate::adapters::{Downloader, WikiApi};
use crate::config::paths::OutputPaths;
use crate::config::Settings;
use crate::domain::{MemberType, RunSummary, Stage, WikiItem};

/// Category listing every item inventory image
pub const ITEM_CATEGORY: &str = "Category:Item_inventory_images";

/// Root of the icon category tree
pub const ICON_ROOT_CATEGORY: &str = "Category:Icons";

/// How an icon set discovers its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// File members of one category
    Flat { category: String },
    /// File members of a category and all its subcategories
    Recursive { root: String },
}

/// Definition of one generated icon set
#[derive(Debug, Clone)]
pub struct IconSet {
    pub name: String,
    pub discovery: Discovery,
    /// Extensions stripped from file titles to form keys
    pub key_extensions: Vec<&'static str>,
    pub output_path: PathBuf,
    pub meta_path: PathBuf,
    pub array_name: String,
    pub type_name: String,
    /// Previously published definitions to resolve collisions against
    pub published: Option<PathBuf>,
}

impl IconSet {
    /// Item inventory images → `icons.ts` / `meta.ts`
    pub fn items(paths: &OutputPaths) -> Self {
        Self {
            name: "icons".to_string(),
            discovery: Discovery::Flat {
                category: ITEM_CATEGORY.to_string(),
            },
            key_extensions: vec![".png"],
            output_path: paths.icons(),
            meta_path: paths.icons_meta(),
            array_name: "iconNames".to_string(),
            type_name: "IconName".to_string(),
            published: None,
        }
    }

    /// Recursive category icons → `category-icons.ts`, deduplicated
    /// against `icons.ts`
    pub fn category_icons(paths: &OutputPaths, root: &str) -> Self {
        Self {
            name: "category-icons".to_string(),
            discovery: Discovery::Recursive {
                root: root.to_string(),
            },
            key_extensions: SUPPORTED_EXTENSIONS.to_vec(),
            output_path: paths.category_icons(),
            meta_path: paths.category_icons_meta(),
            array_name: "categoryIconNames".to_string(),
            type_name: "CategoryIconName".to_string(),
            published: Some(paths.icons()),
        }
    }
}

/// Drives one icon set through every stage
pub struct Pipeline<'a> {
    api: &'a dyn WikiApi,
    downloader: &'a dyn Downloader,
    settings: &'a Settings,
    cache: DiskCache,
}

impl<'a> Pipeline<'a> {
    pub fn new(api: &'a dyn WikiApi, downloader: &'a dyn Downloader, settings: &'a Settings) -> Self {
        Self {
            api,
            downloader,
            settings,
            cache: DiskCache::new(settings.paths().cache_manifest()),
        }
    }

    /// Generate `set`, reading and writing the disk cache when `use_cache`
    #[instrument(skip(self, set), fields(icon_set = %set.name))]
    pub async fn run(&self, set: &IconSet, use_cache: bool) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::new(&set.name);
        info!(run_id = %summary.id, "Starting {} update", set.name);
        info!(
            "Cache: {}",
            if use_cache { "enabled" } else { "disabled (--no-cache)" }
        );

        let output_dir = self.settings.paths().root().to_path_buf();
        tokio::fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        self.enter(&mut summary, Stage::Crawling)?;
        let items = self.discover(&set.discovery).await;
        summary.items_found = items.len();
        info!("Found {} items.", items.len());

        self.enter(&mut summary, Stage::ResolvingUrls)?;
        let requests = build_image_requests(&items, &set.key_extensions);
        info!("Total image requests prepared: {}", requests.len());
        let urls =
            resolve_image_urls(self.api, &requests, self.settings.concurrency.metadata).await;
        summary.urls_resolved = urls.len();
        info!("Resolved {} image URLs.", urls.len());

        self.enter(&mut summary, Stage::Processing)?;
        let report = process_images(
            self.downloader,
            &self.cache,
            &urls,
            use_cache,
            self.settings.concurrency.downloads,
        )
        .await?;
        summary.images_processed = report.icons.len();
        summary.cache_hits = report.cache_hits;
        summary.downloads = report.downloads;
        info!("Processed {} images.", report.icons.len());
        let mut icons = report.icons;

        if let Some(published_path) = &set.published {
            self.enter(&mut summary, Stage::ResolvingCollisions)?;
            let published = read_exports(published_path).await?;
            info!(
                published = published.len(),
                "Resolving collisions with {}",
                published_path.display()
            );
            let stats = resolve_collisions(&mut icons, &published);
            summary.dropped = stats.dropped;
            summary.renamed = stats.renamed;
            info!(
                "Collision resolution: {} dropped (identical), {} renamed.",
                stats.dropped, stats.renamed
            );
            info!("{} icons remaining after collision resolution.", icons.len());
        }

        self.enter(&mut summary, Stage::Generating)?;
        let names = emit_icons(&icons, &set.output_path).await?;
        emit_meta(&names, &set.meta_path, &set.array_name, &set.type_name).await?;
        summary.identifiers = names.len();

        let metadata = tokio::fs::metadata(&set.output_path)
            .await
            .with_context(|| format!("Failed to stat {}", set.output_path.display()))?;
        summary.output_bytes = metadata.len();
        summary.output_path = Some(set.output_path.clone());
        summary.meta_path = Some(set.meta_path.clone());

        self.enter(&mut summary, Stage::Done)?;
        info!(
            "Generated {} ({:.1} MB)",
            set.output_path.display(),
            summary.output_megabytes()
        );
        info!("Generated {} ({} names)", set.meta_path.display(), names.len());
        info!("Total time: {:.1}s", start.elapsed().as_secs_f64());

        Ok(summary)
    }

    async fn discover(&self, discovery: &Discovery) -> Vec<WikiItem> {
        let page_size = self.settings.wiki.page_size;
        match discovery {
            Discovery::Flat { category } => {
                fetch_members(self.api, category, page_size, MemberType::File).await
            }
            Discovery::Recursive { root } => {
                info!("Crawling {} recursively...", root);
                let mut crawler = CategoryCrawler::new(self.api, page_size);
                let files = crawler.fetch_all_recursively(root).await;
                info!(
                    categories = crawler.visited().len(),
                    "Found {} unique files (before filtering).",
                    files.len()
                );
                let images = filter_image_files(files);
                info!("{} supported image files after filtering.", images.len());
                images.into_values().collect()
            }
        }
    }

    fn enter(&self, summary: &mut RunSummary, stage: Stage) -> Result<()> {
        summary.advance(stage)?;
        info!(stage = %stage, "Entering stage");
        Ok(())
    }
}
