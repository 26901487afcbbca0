//! Catalog schema creation

use crate::Result;
use sqlx::SqlitePool;

/// Create the `midis` table and its facet indexes.
///
/// One row per file path, guarded by the UNIQUE constraint at the
/// storage layer. A summarized file has every facet column populated
/// and `errors` NULL; a file that failed to decode has `errors`
/// populated and every facet column NULL.
pub async fn create_midis_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS midis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL UNIQUE,
            dir TEXT,
            name TEXT,
            keys TEXT,
            notecount INTEGER,
            noteset TEXT,
            different_notes INTEGER,
            different_times INTEGER,
            tracks INTEGER,
            errors TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Facet columns are equality-filtered by every query
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_midis_keys ON midis(keys)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_midis_notecount ON midis(notecount)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_midis_different_notes ON midis(different_notes)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_midis_different_times ON midis(different_times)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_midis_tracks ON midis(tracks)")
        .execute(pool)
        .await?;

    Ok(())
}
