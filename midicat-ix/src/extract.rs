//! Per-file summary extraction
//!
//! Reduces a MIDI file to the facet values stored in the catalog.
//! Decoding is delegated to `midly`; everything here is a single pass
//! over the parsed event stream.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use thiserror::Error;
use tracing::{debug, warn};

use midicat_common::record::{Extraction, ScoreFacets, SummaryRecord};

/// The twelve pitch classes in chromatic order starting at C.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

// Key signature labels indexed by accidental count shifted into
// 0..=14 (7 flats .. 7 sharps).
const MAJOR_KEYS: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];
const MINOR_KEYS: [&str; 15] = [
    "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m",
    "A#m",
];

/// Why a file could not be summarized.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// File could not be read from disk
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Bytes are not a standard MIDI file
    #[error("not a valid MIDI file: {0}")]
    Parse(#[from] midly::Error),
}

/// Pitch class label for a raw MIDI key number, periodic modulo 12.
pub fn pitch_class(key: u8) -> &'static str {
    PITCH_CLASSES[(key % 12) as usize]
}

/// Conventional label for a key signature: `(0, false)` is "C",
/// `(3, true)` is "F#m". Accidental counts outside -7..=7 have no
/// label.
pub fn key_signature_label(accidentals: i8, minor: bool) -> Option<&'static str> {
    if !(-7..=7).contains(&accidentals) {
        return None;
    }
    let index = (accidentals + 7) as usize;
    Some(if minor {
        MINOR_KEYS[index]
    } else {
        MAJOR_KEYS[index]
    })
}

/// Reduce a parsed file to its facet values in one pass over every
/// track.
fn collect_facets(smf: &Smf) -> ScoreFacets {
    let mut notecount: i64 = 0;
    let mut pitches: HashSet<u8> = HashSet::new();
    let mut onset_ticks: HashSet<u64> = HashSet::new();
    let mut note_names: BTreeSet<&'static str> = BTreeSet::new();
    let mut key_names: BTreeSet<&'static str> = BTreeSet::new();

    for track in &smf.tracks {
        // Delta times accumulate into absolute ticks per track
        let mut at_tick: u64 = 0;
        for event in track {
            at_tick += u64::from(event.delta.as_int());
            match event.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => {
                    // Velocity 0 note-ons count as onsets too
                    notecount += 1;
                    pitches.insert(key.as_int());
                    note_names.insert(pitch_class(key.as_int()));
                    onset_ticks.insert(at_tick);
                }
                TrackEventKind::Meta(MetaMessage::KeySignature(accidentals, minor)) => {
                    match key_signature_label(accidentals, minor) {
                        Some(label) => {
                            key_names.insert(label);
                        }
                        None => {
                            warn!("ignoring key signature with {} accidentals", accidentals)
                        }
                    }
                }
                _ => {}
            }
        }
    }

    let keys = if key_names.is_empty() {
        "NONE".to_string()
    } else {
        key_names.into_iter().collect::<Vec<_>>().join("_")
    };
    let noteset = note_names.into_iter().collect::<Vec<_>>().join("_");

    ScoreFacets {
        keys,
        notecount,
        noteset,
        different_notes: pitches.len() as i64,
        different_times: onset_ticks.len() as i64,
        tracks: smf.tracks.len() as i64,
    }
}

/// Read, decode and reduce one file.
pub fn summarize(path: &Path) -> Result<ScoreFacets, SummarizeError> {
    let bytes = std::fs::read(path)?;
    let smf = Smf::parse(&bytes)?;
    Ok(collect_facets(&smf))
}

/// Summarize one file into a catalog record.
///
/// Decode problems are captured in the record rather than returned, so
/// a malformed file becomes a failure row and never aborts a scan.
pub fn extract_summary(path: &Path) -> SummaryRecord {
    match summarize(path) {
        Ok(facets) => {
            debug!("summarized {}: {:?}", path.display(), facets);
            SummaryRecord::new(path, Extraction::Success(facets))
        }
        Err(e) => {
            warn!("failed to summarize {}: {}", path.display(), e);
            SummaryRecord::new(path, Extraction::Failure(e.to_string()))
        }
    }
}
