//! Command-line interface for wiki-cursors.
//!
//! Provides commands for regenerating the icon sets, inspecting the wiki,
//! checking generated output and validating cursor packs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::MediaWikiClient;
use crate::config::Settings;
use crate::core::codegen::read_exports;
use crate::core::collisions::find_collisions;
use crate::core::pipeline::{IconSet, Pipeline, ICON_ROOT_CATEGORY, ITEM_CATEGORY};
use crate::domain::{PackFile, RunSummary};

/// wiki-cursors - Generate inlined CSS cursor constants from wiki images
#[derive(Parser, Debug)]
#[command(name = "wiki-cursors")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate icons.ts from the item inventory images category
    UpdateIcons {
        /// Neither read nor write the disk cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Regenerate category-icons.ts by crawling the icon category tree
    UpdateCategoryIcons {
        /// Neither read nor write the disk cache
        #[arg(long)]
        no_cache: bool,

        /// Root category to crawl
        #[arg(long, default_value = ICON_ROOT_CATEGORY)]
        root: String,
    },

    /// Report identifier collisions between the two generated sets
    CheckCollisions,

    /// Print the first page of a category listing
    CheckCategory {
        /// Category title
        #[arg(short, long, default_value = ITEM_CATEGORY)]
        category: String,

        /// Members to fetch
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Validate pack definitions against the published icons
    Packs,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;

        match self.command {
            Commands::UpdateIcons { no_cache } => {
                let set = IconSet::items(&settings.paths());
                update(&settings, &set, !no_cache).await
            }
            Commands::UpdateCategoryIcons { no_cache, root } => {
                let set = IconSet::category_icons(&settings.paths(), &root);
                update(&settings, &set, !no_cache).await
            }
            Commands::CheckCollisions => check_collisions(&settings).await,
            Commands::CheckCategory { category, limit } => {
                check_category(&settings, &category, limit).await
            }
            Commands::Packs => show_packs(&settings).await,
            Commands::Config => show_config(&settings),
        }
    }
}

/// Run one icon set through the pipeline and print the summary
async fn update(settings: &Settings, set: &IconSet, use_cache: bool) -> Result<()> {
    let client = MediaWikiClient::new(&settings.wiki, &settings.retry)?;
    let pipeline = Pipeline::new(&client, &client, settings);

    let summary = pipeline.run(set, use_cache).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("[Run {} ({}) {}]", summary.id, summary.icon_set, summary.stage);
    eprintln!("  Items found:      {}", summary.items_found);
    eprintln!("  URLs resolved:    {}", summary.urls_resolved);
    eprintln!(
        "  Images processed: {} ({} cached, {} downloaded)",
        summary.images_processed, summary.cache_hits, summary.downloads
    );
    if summary.dropped > 0 || summary.renamed > 0 {
        eprintln!(
            "  Collisions:       {} dropped, {} renamed",
            summary.dropped, summary.renamed
        );
    }
    eprintln!("  Identifiers:      {}", summary.identifiers);
    if let Some(path) = &summary.output_path {
        eprintln!(
            "  Output:           {} ({:.1} MB)",
            path.display(),
            summary.output_megabytes()
        );
    }
    eprintln!("  Elapsed:          {:.1}s", summary.elapsed_seconds());
}

/// Compare the exports of both generated source files
async fn check_collisions(settings: &Settings) -> Result<()> {
    let paths = settings.paths();
    let main_icons = read_exports(&paths.icons()).await?;
    let category_icons = read_exports(&paths.category_icons()).await?;

    println!("Main icons: {}", main_icons.len());
    println!("Category icons: {}", category_icons.len());

    let collisions = find_collisions(&main_icons, &category_icons);
    println!("Collisions: {}", collisions.len());

    if collisions.is_empty() {
        println!("\nNo collisions found! Safe to export both sets together.");
        return Ok(());
    }

    println!("\nColliding names:");
    for collision in &collisions {
        let kind = if collision.identical {
            "IDENTICAL"
        } else {
            "DIFFERENT"
        };
        println!("  {} - {}", collision.name, kind);
    }

    let different = collisions.iter().filter(|c| !c.identical).count();
    println!("\nIdentical collisions: {}", collisions.len() - different);
    println!("Different collisions (need resolution): {}", different);

    Ok(())
}

/// Dump one raw listing page
async fn check_category(settings: &Settings, category: &str, limit: u32) -> Result<()> {
    let client = MediaWikiClient::new(&settings.wiki, &settings.retry)?;
    let response = client.raw_category_page(category, limit).await?;

    let members = response
        .pointer("/query/categorymembers")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    println!(
        "{}",
        serde_json::to_string_pretty(&members).context("Failed to format listing")?
    );
    Ok(())
}

/// Validate and list cursor packs
async fn show_packs(settings: &Settings) -> Result<()> {
    let paths = settings.paths();
    let packs = PackFile::load_or_builtin(&paths.packs())?;
    if packs.packs.is_empty() {
        anyhow::bail!("No pack definitions found");
    }
    let published = read_exports(&paths.icons()).await?;

    if published.is_empty() {
        eprintln!(
            "No published icons at {}; run update-icons first.",
            paths.icons().display()
        );
    }

    let mut failures = 0;
    for pack in &packs.packs {
        match pack.resolve(&published) {
            Ok(resolved) => {
                println!(
                    "{} {} ({}) - {}",
                    resolved.icon, resolved.name, resolved.import_name, resolved.description
                );
                let labels: Vec<&str> = resolved.labeled_stages().map(|(label, _)| label).collect();
                println!("    {} stages: {}", resolved.stages.len(), labels.join(" → "));
            }
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", pack.name, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} packs failed validation", failures, packs.packs.len());
    }
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(settings: &Settings) -> Result<()> {
    let paths = settings.paths();

    println!("wiki-cursors configuration");
    println!();
    println!(
        "Config file: {}",
        settings
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Wiki:");
    println!("  API URL:    {}", settings.wiki.api_url);
    println!("  User agent: {}", settings.wiki.user_agent);
    println!("  Timeout:    {}s", settings.wiki.timeout_seconds);
    println!("  Page size:  {}", settings.wiki.page_size);
    println!();
    println!("Paths:");
    println!("  Output:        {}", paths.root().display());
    println!("  Icons:         {}", paths.icons().display());
    println!("  Category:      {}", paths.category_icons().display());
    println!("  Cache:         {}", paths.cache_manifest().display());
    println!("  Packs:         {}", paths.packs().display());
    println!();
    println!("Concurrency:");
    println!("  Metadata:  {}", settings.concurrency.metadata);
    println!("  Downloads: {}", settings.concurrency.downloads);
    println!();
    println!("Retry:");
    println!("  API retries:      {}", settings.retry.api_retries);
    println!("  Download retries: {}", settings.retry.download_retries);
    println!(
        "  Delay:            {}ms + up to {}ms jitter",
        settings.retry.base_delay_ms, settings.retry.jitter_ms
    );

    Ok(())
}
