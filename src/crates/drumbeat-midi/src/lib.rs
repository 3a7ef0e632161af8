//! Drum pattern to MIDI converter library
//!
//! This library converts drum patterns to single-track Standard MIDI Files
//! and reads them back, one pattern per MIDI key.

pub mod codec;
pub mod error;

// Re-export main types for convenience
pub use codec::{from_bytes, from_midi, from_smf, to_midi, to_smf, DRUM_CHANNEL};
pub use error::{MidiError, Result};
