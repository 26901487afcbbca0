//! midicat-ix - MIDI score catalog indexer
//!
//! Walks a score folder, summarizes every `.mid` file and upserts the
//! results into the shared catalog database. Runs one scan to
//! completion and exits; the facet browser (midicat-fb) serves queries
//! over the same catalog.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use midicat_common::config;
use midicat_ix::scan;

#[derive(Parser, Debug)]
#[command(name = "midicat-ix")]
#[command(about = "MIDI score catalog indexer")]
#[command(version)]
struct Args {
    /// Score folder to scan recursively for .mid files
    root: PathBuf,

    /// Catalog folder override (default: MIDICAT_FOLDER, config.toml, or the OS data dir)
    #[arg(short, long)]
    catalog_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting midicat-ix v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let catalog_folder = config::resolve_catalog_folder(args.catalog_folder.as_deref());
    let db_path = config::catalog_db_path(&catalog_folder);
    info!("Catalog database: {}", db_path.display());

    let pool = midicat_common::db::open_catalog(&db_path).await?;

    let summary = scan::scan_library(&pool, &args.root).await?;
    info!(
        "Scan complete: {} files seen, {} indexed, {} failed",
        summary.files_seen, summary.indexed, summary.failed
    );

    pool.close().await;
    Ok(())
}
