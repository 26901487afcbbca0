//! HTTP API handlers for midicat-fb

pub mod catalog;
pub mod facets;
pub mod health;
pub mod scores;

pub use catalog::{list_failures, stats};
pub use facets::{facet_values, list_facets};
pub use health::health_routes;
pub use scores::query_scores;
