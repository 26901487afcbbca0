//! Catalog row operations
//!
//! One table, `midis`, one row per score file path. Re-indexing a path
//! replaces its row in place through the upsert here, so a row's id is
//! stable across rescans.

use crate::facet::{Facet, FacetSelection, FacetValue, WILDCARD};
use crate::record::{Extraction, ScoreFacets, SummaryRecord};
use crate::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Identity fields of a catalog row matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub path: String,
    pub name: String,
}

/// A row recorded for a file that could not be summarized.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    pub id: i64,
    pub path: String,
    pub error: String,
}

/// Row counts over the whole catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogCounts {
    pub total: i64,
    pub indexed: i64,
    pub failed: i64,
}

/// Full catalog row, as stored.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub id: i64,
    pub path: String,
    pub dir: String,
    pub name: String,
    pub keys: Option<String>,
    pub notecount: Option<i64>,
    pub noteset: Option<String>,
    pub different_notes: Option<i64>,
    pub different_times: Option<i64>,
    pub tracks: Option<i64>,
    pub errors: Option<String>,
}

impl CatalogRow {
    /// Facet values, present only on success rows.
    pub fn facets(&self) -> Option<ScoreFacets> {
        Some(ScoreFacets {
            keys: self.keys.clone()?,
            notecount: self.notecount?,
            noteset: self.noteset.clone()?,
            different_notes: self.different_notes?,
            different_times: self.different_times?,
            tracks: self.tracks?,
        })
    }
}

/// Insert or replace the catalog row for `record.path`.
///
/// On conflict every payload column is overwritten, so a re-indexed file
/// fully replaces its prior summary (including flipping between the
/// success and failure shapes) while keeping its row id.
pub async fn upsert(pool: &SqlitePool, record: &SummaryRecord) -> Result<()> {
    let (facets, error) = match &record.extraction {
        Extraction::Success(facets) => (Some(facets), None),
        Extraction::Failure(message) => (None, Some(message.as_str())),
    };

    sqlx::query(
        r#"
        INSERT INTO midis (path, dir, name, keys, notecount, noteset, different_notes, different_times, tracks, errors)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(path) DO UPDATE SET
            dir = excluded.dir,
            name = excluded.name,
            keys = excluded.keys,
            notecount = excluded.notecount,
            noteset = excluded.noteset,
            different_notes = excluded.different_notes,
            different_times = excluded.different_times,
            tracks = excluded.tracks,
            errors = excluded.errors
        "#,
    )
    .bind(&record.path)
    .bind(&record.dir)
    .bind(&record.name)
    .bind(facets.map(|f| f.keys.as_str()))
    .bind(facets.map(|f| f.notecount))
    .bind(facets.map(|f| f.noteset.as_str()))
    .bind(facets.map(|f| f.different_notes))
    .bind(facets.map(|f| f.different_times))
    .bind(facets.map(|f| f.tracks))
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the catalog row for one path.
pub async fn load_by_path(pool: &SqlitePool, path: &str) -> Result<Option<CatalogRow>> {
    let row = sqlx::query(
        r#"
        SELECT id, path, dir, name, keys, notecount, noteset, different_notes, different_times, tracks, errors
        FROM midis
        WHERE path = ?
        "#,
    )
    .bind(path)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| CatalogRow {
        id: row.get("id"),
        path: row.get("path"),
        dir: row.get("dir"),
        name: row.get("name"),
        keys: row.get("keys"),
        notecount: row.get("notecount"),
        noteset: row.get("noteset"),
        different_notes: row.get("different_notes"),
        different_times: row.get("different_times"),
        tracks: row.get("tracks"),
        errors: row.get("errors"),
    }))
}

/// Distinct stored values for one facet, sorted.
///
/// Facet columns are NULL exactly on failure rows, so `IS NOT NULL`
/// both excludes failed files and keeps the value list clean.
pub async fn distinct_values(pool: &SqlitePool, facet: Facet) -> Result<Vec<FacetValue>> {
    let sql = format!(
        "SELECT DISTINCT {col} FROM midis WHERE {col} IS NOT NULL ORDER BY {col}",
        col = facet.column()
    );
    if facet.is_text() {
        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(pool).await?;
        Ok(rows.into_iter().map(|(v,)| FacetValue::Text(v)).collect())
    } else {
        let rows: Vec<(i64,)> = sqlx::query_as(&sql).fetch_all(pool).await?;
        Ok(rows.into_iter().map(|(v,)| FacetValue::Count(v)).collect())
    }
}

/// Filter choices for one facet: the wildcard sentinel followed by every
/// stored value, rendered for presentation.
pub async fn facet_choices(pool: &SqlitePool, facet: Facet) -> Result<Vec<String>> {
    let mut choices = vec![WILDCARD.to_string()];
    for value in distinct_values(pool, facet).await? {
        choices.push(value.to_string());
    }
    Ok(choices)
}

/// Resolve a facet selection to matching rows, ordered by path.
pub async fn query(pool: &SqlitePool, selection: &FacetSelection) -> Result<Vec<CatalogEntry>> {
    let (where_clause, params) = selection.where_clause();
    let sql = format!(
        "SELECT id, path, name FROM midis {} ORDER BY path",
        where_clause
    );

    let mut query = sqlx::query_as::<_, (i64, String, String)>(&sql);
    for value in &params {
        query = match value {
            FacetValue::Text(s) => query.bind(s.as_str()),
            FacetValue::Count(n) => query.bind(*n),
        };
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(id, path, name)| CatalogEntry { id, path, name })
        .collect())
}

/// Files recorded as failed, with their error text, ordered by path.
pub async fn failures(pool: &SqlitePool) -> Result<Vec<FailureEntry>> {
    let rows: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT id, path, errors FROM midis WHERE errors IS NOT NULL ORDER BY path",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, path, error)| FailureEntry { id, path, error })
        .collect())
}

/// Row counts: all rows, summarized rows, failed rows.
pub async fn counts(pool: &SqlitePool) -> Result<CatalogCounts> {
    // COUNT(errors) counts only rows where errors is non-NULL
    let (total, failed): (i64, i64) = sqlx::query_as("SELECT COUNT(*), COUNT(errors) FROM midis")
        .fetch_one(pool)
        .await?;

    Ok(CatalogCounts {
        total,
        indexed: total - failed,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_midis_table;
    use std::path::Path;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        create_midis_table(&pool).await.unwrap();
        pool
    }

    fn success_record(path: &str, keys: &str, notecount: i64, tracks: i64) -> SummaryRecord {
        SummaryRecord::new(
            Path::new(path),
            Extraction::Success(ScoreFacets {
                keys: keys.to_string(),
                notecount,
                noteset: "C_E_G".to_string(),
                different_notes: 3,
                different_times: notecount,
                tracks,
            }),
        )
    }

    fn failure_record(path: &str, message: &str) -> SummaryRecord {
        SummaryRecord::new(Path::new(path), Extraction::Failure(message.to_string()))
    }

    async fn seed_library(pool: &SqlitePool) -> Vec<SummaryRecord> {
        let records = vec![
            success_record("/lib/a/alpha.mid", "C", 4, 1),
            success_record("/lib/a/beta.mid", "C", 6, 2),
            success_record("/lib/b/gamma.mid", "Am_C", 6, 2),
            failure_record("/lib/b/broken.mid", "not a MIDI file"),
        ];
        for record in &records {
            upsert(pool, record).await.unwrap();
        }
        records
    }

    #[tokio::test]
    async fn test_upsert_and_load_success_row() {
        let pool = setup_pool().await;
        upsert(&pool, &success_record("/lib/tune.mid", "G", 4, 1))
            .await
            .unwrap();

        let row = load_by_path(&pool, "/lib/tune.mid")
            .await
            .unwrap()
            .expect("row not found");

        assert_eq!(row.dir, "/lib");
        assert_eq!(row.name, "tune");
        assert_eq!(row.keys.as_deref(), Some("G"));
        assert_eq!(row.notecount, Some(4));
        assert_eq!(row.noteset.as_deref(), Some("C_E_G"));
        assert_eq!(row.tracks, Some(1));
        assert_eq!(row.errors, None);
        assert!(row.facets().is_some());
    }

    #[tokio::test]
    async fn test_upsert_and_load_failure_row() {
        let pool = setup_pool().await;
        upsert(&pool, &failure_record("/lib/bad.mid", "truncated header"))
            .await
            .unwrap();

        let row = load_by_path(&pool, "/lib/bad.mid")
            .await
            .unwrap()
            .expect("row not found");

        assert_eq!(row.errors.as_deref(), Some("truncated header"));
        assert_eq!(row.keys, None);
        assert_eq!(row.notecount, None);
        assert_eq!(row.noteset, None);
        assert_eq!(row.different_notes, None);
        assert_eq!(row.different_times, None);
        assert_eq!(row.tracks, None);
        assert!(row.facets().is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_id_and_leaves_no_stale_fields() {
        let pool = setup_pool().await;
        let path = "/lib/flip.mid";

        upsert(&pool, &success_record(path, "D", 9, 3)).await.unwrap();
        let first = load_by_path(&pool, path).await.unwrap().unwrap();

        // Success -> failure: facet columns must all clear
        upsert(&pool, &failure_record(path, "unreadable")).await.unwrap();
        let second = load_by_path(&pool, path).await.unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert!(second.facets().is_none());
        assert_eq!(second.errors.as_deref(), Some("unreadable"));

        // Failure -> success: error column must clear
        upsert(&pool, &success_record(path, "D", 9, 3)).await.unwrap();
        let third = load_by_path(&pool, path).await.unwrap().unwrap();
        assert_eq!(third.id, first.id);
        assert_eq!(third.errors, None);
        assert_eq!(third.facets(), first.facets());

        let totals = counts(&pool).await.unwrap();
        assert_eq!(totals.total, 1);
    }

    #[tokio::test]
    async fn test_unconstrained_query_returns_success_rows_sorted() {
        let pool = setup_pool().await;
        seed_library(&pool).await;

        let results = query(&pool, &FacetSelection::new()).await.unwrap();
        let paths: Vec<&str> = results.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/lib/a/alpha.mid", "/lib/a/beta.mid", "/lib/b/gamma.mid"]
        );
        assert_eq!(results[0].name, "alpha");
    }

    #[tokio::test]
    async fn test_query_conjunction_narrows_results() {
        let pool = setup_pool().await;
        seed_library(&pool).await;

        let mut selection = FacetSelection::new();
        selection.set(Facet::Keys, FacetValue::Text("C".to_string()));
        assert_eq!(query(&pool, &selection).await.unwrap().len(), 2);

        selection.set(Facet::Tracks, FacetValue::Count(2));
        let results = query(&pool, &selection).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/lib/a/beta.mid");

        selection.set(Facet::NoteCount, FacetValue::Count(99));
        assert!(query(&pool, &selection).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_agrees_with_in_memory_predicate() {
        let pool = setup_pool().await;
        let records = seed_library(&pool).await;

        let mut selections = vec![FacetSelection::new()];
        let mut by_keys = FacetSelection::new();
        by_keys.set(Facet::Keys, FacetValue::Text("Am_C".to_string()));
        selections.push(by_keys);
        let mut by_counts = FacetSelection::new();
        by_counts.set(Facet::NoteCount, FacetValue::Count(6));
        by_counts.set(Facet::Tracks, FacetValue::Count(2));
        selections.push(by_counts);

        for selection in &selections {
            let mut expected: Vec<&str> = records
                .iter()
                .filter(|r| match &r.extraction {
                    Extraction::Success(facets) => selection.matches(facets),
                    Extraction::Failure(_) => false,
                })
                .map(|r| r.path.as_str())
                .collect();
            expected.sort_unstable();

            let got: Vec<String> = query(&pool, selection)
                .await
                .unwrap()
                .into_iter()
                .map(|e| e.path)
                .collect();
            assert_eq!(got, expected);
        }
    }

    #[tokio::test]
    async fn test_distinct_values_sorted_without_failures_or_duplicates() {
        let pool = setup_pool().await;
        seed_library(&pool).await;

        let keys = distinct_values(&pool, Facet::Keys).await.unwrap();
        assert_eq!(
            keys,
            vec![
                FacetValue::Text("Am_C".to_string()),
                FacetValue::Text("C".to_string())
            ]
        );

        let notecounts = distinct_values(&pool, Facet::NoteCount).await.unwrap();
        assert_eq!(notecounts, vec![FacetValue::Count(4), FacetValue::Count(6)]);
    }

    #[tokio::test]
    async fn test_facet_choices_lead_with_wildcard() {
        let pool = setup_pool().await;
        seed_library(&pool).await;

        let choices = facet_choices(&pool, Facet::Keys).await.unwrap();
        assert_eq!(choices, vec![WILDCARD, "Am_C", "C"]);

        // Empty catalog still offers the wildcard
        let empty = setup_pool().await;
        assert_eq!(
            facet_choices(&empty, Facet::Tracks).await.unwrap(),
            vec![WILDCARD]
        );
    }

    #[tokio::test]
    async fn test_counts_split_indexed_and_failed() {
        let pool = setup_pool().await;
        seed_library(&pool).await;

        let totals = counts(&pool).await.unwrap();
        assert_eq!(totals.total, 4);
        assert_eq!(totals.indexed, 3);
        assert_eq!(totals.failed, 1);
    }
}
