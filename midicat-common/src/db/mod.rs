//! Catalog database access
//!
//! The indexer opens the catalog with `mode=rwc` and creates the schema;
//! the facet browser connects with `mode=ro` and refuses to start when
//! the catalog has not been created yet. Both sides share one SQLite
//! file, with WAL keeping readers live while a scan writes.

use crate::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod catalog;
pub mod init;

/// Open the catalog database for writing, creating file and schema if
/// needed.
pub async fn open_catalog(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    if newly_created {
        info!("Initialized new catalog: {}", db_path.display());
    } else {
        info!("Opened existing catalog: {}", db_path.display());
    }

    // WAL allows concurrent readers while the scan writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Idempotent - safe to call on an existing catalog
    init::create_midis_table(&pool).await?;

    Ok(pool)
}

/// Connect to the catalog with read-only mode
///
/// Safety: Uses SQLite mode=ro to prevent any write operations
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "catalog not found: {} (run midicat-ix first to build it)",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            panic!("SAFETY VIOLATION: catalog connection is not read-only!");
        }
    }

    Ok(pool)
}
