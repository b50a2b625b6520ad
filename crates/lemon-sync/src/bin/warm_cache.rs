//! # Warm Cache
//!
//! Fills the local menu cache from the command line, for development.
//!
//! ## Usage
//! ```bash
//! # Use catalog.toml / environment / defaults
//! cargo run -p lemon-sync --bin warm-cache
//!
//! # Specify database path and catalog URL
//! cargo run -p lemon-sync --bin warm-cache -- --db ./menu.db --url http://localhost:8080/menu.json
//!
//! # Throw away what is cached and fetch again
//! cargo run -p lemon-sync --bin warm-cache -- --resync
//! ```

use std::env;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lemon_sync::{CatalogConfig, CatalogService, SyncOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = CatalogConfig::load_or_default(None);
    let mut resync = false;

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database.path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    config.catalog.url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--resync" | "-r" => resync = true,
            "--help" | "-h" => {
                println!("Lemon Menu Cache Warmer");
                println!();
                println!("Usage: warm-cache [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: platform data dir)");
                println!("  -u, --url <URL>    Catalog URL (default: from catalog.toml)");
                println!("  -r, --resync       Replace the cached menu with a fresh fetch");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    config.validate()?;

    println!("Lemon Menu Cache Warmer");
    println!("=======================");
    println!("Database: {}", config.database_path().display());
    println!("Catalog:  {}", config.catalog.url);
    println!();

    if let Some(parent) = config.database_path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let service = CatalogService::open(config).await?;
    let orchestrator = service.orchestrator();

    if resync {
        let count = orchestrator.resync().await?;
        println!("✓ Fetched {} items (cache replaced)", count);
    } else {
        match orchestrator.ensure_synced().await? {
            SyncOutcome::Fetched { count } => println!("✓ Fetched {} items", count),
            SyncOutcome::LoadedFromCache { count } => {
                println!("✓ Cache already holds {} items, nothing fetched", count);
                println!("  Run with --resync to replace it.");
            }
            SyncOutcome::AlreadySynced => println!("✓ Already synced"),
        }
    }

    println!();
    for section in service.startup().await? {
        println!("  {:<10} {:>3} items", section.title(), section.items.len());
        for item in &section.items {
            println!("    #{:<3} {:<24} {}", item.id, item.name, item.price());
        }
    }

    let status = orchestrator.status().await?;
    info!(items = status.item_count, "Cache warm");

    println!();
    println!("✓ Done!");

    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lemon=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
