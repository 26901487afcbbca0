//! Score folder scanning
//!
//! Walks a folder tree, summarizes every `.mid` file and upserts each
//! result into the catalog as it is produced. A crash mid-scan leaves
//! every already-visited file durably cataloged.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use midicat_common::db::catalog;
use midicat_common::record::Extraction;
use midicat_common::Result;

use crate::extract::extract_summary;

/// Outcome counts for one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// MIDI files found under the root
    pub files_seen: usize,
    /// Files summarized and stored with facet values
    pub indexed: usize,
    /// Files stored as failure rows
    pub failed: usize,
}

/// Scan `root` recursively and upsert a catalog record for every
/// `.mid` file found.
///
/// Each file is written as soon as it is summarized. A root that does
/// not exist (or is not a directory) yields an empty summary rather
/// than an error.
pub async fn scan_library(pool: &SqlitePool, root: &Path) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();

    if !root.is_dir() {
        warn!(
            "score folder {} does not exist, nothing to scan",
            root.display()
        );
        return Ok(summary);
    }

    info!("Scanning score folder: {}", root.display());

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_midi_file(entry.path()) {
            continue;
        }

        summary.files_seen += 1;
        let record = extract_summary(entry.path());
        match record.extraction {
            Extraction::Success(_) => summary.indexed += 1,
            Extraction::Failure(_) => summary.failed += 1,
        }
        catalog::upsert(pool, &record).await?;
        debug!("cataloged {}", record.path);
    }

    Ok(summary)
}

/// `.mid` extension check, case-insensitive.
fn is_midi_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mid"))
        .unwrap_or(false)
}
