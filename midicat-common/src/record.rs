//! Summary record model
//!
//! One record per indexed MIDI file. A record carries either the facet
//! values extracted from the file or the error that prevented extraction,
//! never both; the catalog row mirrors this shape with NULLs in the other
//! column group.

use std::path::Path;

/// Facet values extracted from one successfully decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreFacets {
    /// Sorted set of key-signature labels joined with `_`, or `NONE`
    /// when the file carries no key signature.
    pub keys: String,
    /// Total count of note-on events across all tracks.
    pub notecount: i64,
    /// Sorted set of pitch-class labels joined with `_`. Informational,
    /// not a filter facet.
    pub noteset: String,
    /// Count of distinct raw pitch numbers.
    pub different_notes: i64,
    /// Count of distinct note-on tick times.
    pub different_times: i64,
    /// Number of tracks in the file.
    pub tracks: i64,
}

/// Outcome of feature extraction for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Success(ScoreFacets),
    Failure(String),
}

impl Extraction {
    pub fn is_success(&self) -> bool {
        matches!(self, Extraction::Success(_))
    }
}

/// One catalog record: identity fields plus the extraction outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub path: String,
    /// Containing directory, stored redundantly for display.
    pub dir: String,
    /// File stem (name without the `.mid` suffix).
    pub name: String,
    pub extraction: Extraction,
}

impl SummaryRecord {
    /// Build a record for `path`, deriving `dir` and `name` from it.
    pub fn new(path: &Path, extraction: Extraction) -> Self {
        let dir = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: path.display().to_string(),
            dir,
            name,
            extraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_fields_derived_from_path() {
        let record = SummaryRecord::new(
            Path::new("/library/scores/sub/tune.mid"),
            Extraction::Failure("bad header".to_string()),
        );
        assert_eq!(record.path, "/library/scores/sub/tune.mid");
        assert_eq!(record.dir, "/library/scores/sub");
        assert_eq!(record.name, "tune");
        assert!(!record.extraction.is_success());
    }
}
