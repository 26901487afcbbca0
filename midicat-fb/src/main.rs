//! midicat-fb - Facet browser for the MIDI score catalog
//!
//! Serves read-only HTTP endpoints over the catalog built by
//! midicat-ix: facet listings, per-facet value enumeration and
//! conjunctive facet queries.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use midicat_common::config;
use midicat_fb::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "midicat-fb")]
#[command(about = "Facet browser for the MIDI score catalog")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5733", env = "MIDICAT_FB_PORT")]
    port: u16,

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
        "Starting midicat-fb v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let catalog_folder = config::resolve_catalog_folder(args.catalog_folder.as_deref());
    let db_path = config::catalog_db_path(&catalog_folder);
    info!("Catalog database: {}", db_path.display());

    let pool = match midicat_common::db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to catalog (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to open catalog: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("midicat-fb listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
