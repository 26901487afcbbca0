//! # midicat-ix Library
//!
//! Indexing pipeline for the MIDI score catalog: `extract` reduces one
//! MIDI file to its summary facets, `scan` walks a score folder and
//! streams the results into the catalog database.

pub mod extract;
pub mod scan;
