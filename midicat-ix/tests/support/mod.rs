//! Byte-level builders for the small standard MIDI files used as test
//! fixtures.

/// Assemble a complete format 1 file (96 ticks per beat) from track
/// chunks.
pub fn smf(tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&96u16.to_be_bytes());
    for track in tracks {
        bytes.extend_from_slice(track);
    }
    bytes
}

/// Wrap events into an MTrk chunk, appending end-of-track.
pub fn track(events: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for event in events {
        body.extend_from_slice(event);
    }
    body.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut chunk = b"MTrk".to_vec();
    chunk.extend_from_slice(&(body.len() as u32).to_be_bytes());
    chunk.extend(body);
    chunk
}

/// Note-on event. Delta must fit in a single varint byte.
pub fn note_on(delta: u8, key: u8, velocity: u8) -> Vec<u8> {
    assert!(delta < 0x80);
    vec![delta, 0x90, key, velocity]
}

/// Key signature meta event.
pub fn key_signature(delta: u8, accidentals: i8, minor: bool) -> Vec<u8> {
    assert!(delta < 0x80);
    vec![delta, 0xFF, 0x59, 0x02, accidentals as u8, u8::from(minor)]
}
