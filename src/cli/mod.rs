//! Command-line interface for the catalog.
//!
//! Provides commands for searching content, listing a module's content,
//! reporting metrics, seeding the SQLite store, and showing configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig, StoreBackend};
use crate::domain::{ContentSet, ModuleId};
use crate::metrics::{MetricsAggregator, MetricsRequest, MetricsSnapshot};
use crate::search::{FilterEngine, FilterRequest};
use crate::store::{CatalogSnapshot, CatalogStore, MemoryStore, SqliteStore};

/// catalog - content catalog search and reporting
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store backend (overrides configuration)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search content; every given criterion must match
    Search {
        /// Title substring (case-insensitive)
        #[arg(short, long)]
        title: Option<String>,

        /// Format substring (case-insensitive)
        #[arg(short, long)]
        format: Option<String>,

        /// Module id the content must be linked to (repeatable)
        #[arg(short, long = "module", value_delimiter = ',')]
        modules: Vec<i64>,

        /// Read the request as JSON from a file instead
        #[arg(long, conflicts_with_all = ["title", "format", "modules"])]
        request: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all content linked to a module
    Module {
        /// Module id
        module_id: i64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report usage metrics
    Metrics {
        /// Time graph window in days (defaults to configuration)
        #[arg(short, long)]
        days: Option<u32>,

        /// Module ids to average link counts over (repeatable)
        #[arg(short, long = "module", value_delimiter = ',')]
        modules: Vec<i64>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Seed the SQLite database from a JSON snapshot
    Import {
        /// Snapshot file
        snapshot: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut config = config::config()?.clone();
        if let Some(backend) = &self.backend {
            config.backend = backend.parse()?;
        }

        match self.command {
            Commands::Search {
                title,
                format,
                modules,
                request,
                json,
            } => {
                let request = match request {
                    Some(path) => read_request(&path)?,
                    None => FilterRequest {
                        title,
                        format,
                        modules: modules.into_iter().map(ModuleId).collect(),
                    },
                };
                search(&config, &request, json).await
            }
            Commands::Module { module_id, json } => {
                module_content(&config, ModuleId(module_id), json).await
            }
            Commands::Metrics {
                days,
                modules,
                json,
            } => {
                let request = MetricsRequest {
                    modules: modules.into_iter().map(ModuleId).collect(),
                };
                let days = days.unwrap_or(config.metrics.timeframe_days);
                metrics(&config, &request, days, json).await
            }
            Commands::Import { snapshot } => {
                import(&config, &snapshot).await
            }
            Commands::Config => {
                show_config(&config)
            }
        }
    }
}

/// Open the configured store
pub async fn open_store(config: &ResolvedConfig) -> Result<Arc<dyn CatalogStore>> {
    let store: Arc<dyn CatalogStore> = match config.backend {
        StoreBackend::Json => Arc::new(
            MemoryStore::load(&config.snapshot)
                .await
                .with_context(|| format!("Failed to load snapshot: {}", config.snapshot.display()))?,
        ),
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::open(&config.database)
                .with_context(|| format!("Failed to open database: {}", config.database.display()))?,
        ),
    };
    Ok(store)
}

fn read_request(path: &Path) -> Result<FilterRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    Ok(FilterRequest::from_json(&raw)?)
}

async fn search(config: &ResolvedConfig, request: &FilterRequest, json: bool) -> Result<()> {
    let engine = FilterEngine::new(open_store(config).await?);
    let results = engine.filter(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No content matches the given criteria");
        return Ok(());
    }

    print_content_table(&results);
    Ok(())
}

async fn module_content(config: &ResolvedConfig, module_id: ModuleId, json: bool) -> Result<()> {
    let engine = FilterEngine::new(open_store(config).await?);
    let results = engine.content_for_module(module_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No content linked to module {}", module_id);
        return Ok(());
    }

    print_content_table(&results);
    Ok(())
}

async fn metrics(
    config: &ResolvedConfig,
    request: &MetricsRequest,
    days: u32,
    json: bool,
) -> Result<()> {
    let aggregator = MetricsAggregator::new(open_store(config).await?)
        .with_formats(config.metrics.formats.iter().cloned());
    let snapshot = aggregator
        .collect(request, chrono::Duration::days(i64::from(days)))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_metrics(&snapshot, days);
    Ok(())
}

/// Replace the configured database's rows with a snapshot file.
///
/// The snapshot is read and validated before the database is touched.
pub async fn import(config: &ResolvedConfig, path: &Path) -> Result<()> {
    let snapshot = CatalogSnapshot::load(path)
        .await
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;

    if let Some(parent) = config.database.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::open(&config.database)?;
    store.import_snapshot(&snapshot)?;

    eprintln!(
        "Imported {} content, {} modules, {} links into {}",
        snapshot.contents.len(),
        snapshot.modules.len(),
        snapshot.links.len(),
        config.database.display()
    );
    Ok(())
}

fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Catalog configuration");
    println!("{}", "-".repeat(60));
    println!(
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Home:        {}", config.home.display());
    println!("Backend:     {}", config.backend);
    println!("Snapshot:    {}", config.snapshot.display());
    println!("Database:    {}", config.database.display());
    println!("Formats:     {}", config.metrics.formats.join(", "));
    println!("Timeframe:   {} days", config.metrics.timeframe_days);
    Ok(())
}

fn print_content_table(results: &ContentSet) {
    println!("{:<8} {:<12} {:<50}", "ID", "FORMAT", "TITLE");
    println!("{}", "-".repeat(72));

    for content in results {
        let title = if content.title.chars().count() > 48 {
            format!("{}...", content.title.chars().take(45).collect::<String>())
        } else {
            content.title.clone()
        };
        println!("{:<8} {:<12} {:<50}", content.id, content.format, title);
    }

    println!("\nTotal: {} items", results.len());
}

fn print_metrics(snapshot: &MetricsSnapshot, days: u32) {
    println!("Content by format:");
    for (format, count) in &snapshot.format_counts {
        println!("  {:<12} {}", format, count);
    }
    println!("Modules:            {}", snapshot.module_count);
    println!("Average resources:  {:.2}", snapshot.average_resources);
    println!(
        "Created (last {} days): {}",
        days,
        snapshot.time_graph.total()
    );
}
