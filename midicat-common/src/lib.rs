//! # midicat Common Library
//!
//! Shared code for the midicat binaries including:
//! - Summary record model
//! - Facet registry and conjunctive query composition
//! - Catalog schema and persistence adapter
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod facet;
pub mod record;

pub use error::{Error, Result};
pub use facet::{Facet, FacetSelection, FacetValue, WILDCARD};
pub use record::{Extraction, ScoreFacets, SummaryRecord};
