//! Facet registry and conjunctive query composition
//!
//! A facet is a stored summary column exposed as an independent filter
//! dimension. A query is the conjunction of per-facet equality
//! constraints; a facet without a constraint matches every record.
//!
//! The `*ANY*` sentinel is how presentation layers spell "no constraint".
//! It is translated to an absent constraint on entry and never compared
//! against stored data, so a real value can never collide with it.

use crate::record::ScoreFacets;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Wildcard sentinel understood at presentation boundaries.
pub const WILDCARD: &str = "*ANY*";

/// The summary columns exposed for faceted filtering.
///
/// This registry is the single configuration point for the exposed facet
/// set; the query engine and the HTTP surface both iterate it rather than
/// hardcoding columns. `noteset` is informational and deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Facet {
    #[serde(rename = "keys")]
    Keys,
    #[serde(rename = "notecount")]
    NoteCount,
    #[serde(rename = "different_notes")]
    DifferentNotes,
    #[serde(rename = "different_times")]
    DifferentTimes,
    #[serde(rename = "tracks")]
    Tracks,
}

impl Facet {
    /// Every facet, in presentation order.
    pub const ALL: [Facet; 5] = [
        Facet::Keys,
        Facet::NoteCount,
        Facet::DifferentNotes,
        Facet::DifferentTimes,
        Facet::Tracks,
    ];

    /// Column name in the `midis` table.
    pub fn column(&self) -> &'static str {
        match self {
            Facet::Keys => "keys",
            Facet::NoteCount => "notecount",
            Facet::DifferentNotes => "different_notes",
            Facet::DifferentTimes => "different_times",
            Facet::Tracks => "tracks",
        }
    }

    /// Whether stored values are text (as opposed to integer counts).
    pub fn is_text(&self) -> bool {
        matches!(self, Facet::Keys)
    }

    /// Parse a presentation-layer input into a typed constraint value.
    pub fn parse_value(&self, raw: &str) -> Result<FacetValue> {
        if self.is_text() {
            Ok(FacetValue::Text(raw.to_string()))
        } else {
            let count = raw.parse::<i64>().map_err(|_| {
                Error::InvalidInput(format!(
                    "facet '{}' expects an integer value, got '{}'",
                    self.column(),
                    raw
                ))
            })?;
            Ok(FacetValue::Count(count))
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Facet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Facet::ALL
            .iter()
            .copied()
            .find(|facet| facet.column() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown facet '{}'", s)))
    }
}

/// A concrete constraint value for one facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetValue {
    Text(String),
    Count(i64),
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Text(s) => f.write_str(s),
            FacetValue::Count(n) => write!(f, "{}", n),
        }
    }
}

/// A conjunctive facet selection. Facets without an entry are
/// unconstrained; the empty selection matches every summarized file.
#[derive(Debug, Clone, Default)]
pub struct FacetSelection {
    constraints: Vec<(Facet, FacetValue)>,
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `facet` to equal `value`, replacing any prior constraint
    /// on the same facet.
    pub fn set(&mut self, facet: Facet, value: FacetValue) {
        self.constraints.retain(|(f, _)| *f != facet);
        self.constraints.push((facet, value));
    }

    /// Interpret a presentation-layer input for `facet`: `None` and the
    /// wildcard sentinel leave it unconstrained, anything else is parsed
    /// as a concrete value.
    pub fn set_raw(&mut self, facet: Facet, raw: Option<&str>) -> Result<()> {
        match raw {
            None => Ok(()),
            Some(s) if s == WILDCARD => Ok(()),
            Some(s) => {
                let value = facet.parse_value(s)?;
                self.set(facet, value);
                Ok(())
            }
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[(Facet, FacetValue)] {
        &self.constraints
    }

    /// SQL predicate over the `midis` table, one bind slot per constrained
    /// facet. Values are always bound as parameters, never interpolated;
    /// column names come from the registry, not from input. Failed files
    /// carry no facet values, so the predicate starts by requiring a
    /// summary row even when the selection is empty.
    pub fn where_clause(&self) -> (String, Vec<FacetValue>) {
        let mut clause = String::from("WHERE errors IS NULL");
        let mut params = Vec::with_capacity(self.constraints.len());
        for (facet, value) in &self.constraints {
            clause.push_str(" AND ");
            clause.push_str(facet.column());
            clause.push_str(" = ?");
            params.push(value.clone());
        }
        (clause, params)
    }

    /// In-memory equivalent of the SQL predicate, over already-extracted
    /// facet values (a failed file has none and is rejected before this
    /// point).
    pub fn matches(&self, facets: &ScoreFacets) -> bool {
        self.constraints
            .iter()
            .all(|(facet, value)| match (facet, value) {
                (Facet::Keys, FacetValue::Text(s)) => facets.keys == *s,
                (Facet::NoteCount, FacetValue::Count(n)) => facets.notecount == *n,
                (Facet::DifferentNotes, FacetValue::Count(n)) => facets.different_notes == *n,
                (Facet::DifferentTimes, FacetValue::Count(n)) => facets.different_times == *n,
                (Facet::Tracks, FacetValue::Count(n)) => facets.tracks == *n,
                // Mistyped constraint (e.g. text against a count column)
                // can never equal a stored value.
                _ => false,
            })
    }
}
