//! Core types for drum step patterns
//!
//! This crate models drum patterns as step grids of pulses positioned in
//! ticks, parses the `x...x...` step notation, and persists pattern
//! collections. MIDI conversion lives in `drumbeat-midi`.
//!
//! # Examples
//!
//! ```
//! use drumbeat_core::{notation, GridRes};
//!
//! let mut patterns = notation::parse(GridRes::One16, "[kick]{C1}x...x...;[snare]{D1}....x...");
//! assert_eq!(patterns.len(), 2);
//! assert_eq!(patterns[0].key, 36);
//!
//! patterns[1].offset(2).unwrap();
//! assert_eq!(patterns[1].pulses.to_string(), "......x.");
//! ```
//!
//! # Main Components
//!
//! - **GridRes**: the step resolution (1/4 to 1/64)
//! - **Pulse / Pulses**: drum hits and the step slots holding them
//! - **Pattern**: a named, pitched step sequence with rotation and realignment
//! - **notation**: the text parser
//! - **serializer**: compacted JSON persistence

pub mod drums;
pub mod error;
pub mod euclid;
pub mod grid;
pub mod notation;
pub mod note;
pub mod pattern;
pub mod pulse;
pub mod serializer;

pub use drums::gm_drum_name;
pub use error::{Error, Result};
pub use euclid::bjorklund;
pub use grid::GridRes;
pub use note::{key_int, note_to_name};
pub use pattern::Pattern;
pub use pulse::{Pulse, Pulses};
pub use serializer::{read_from, write_to};

/// Default amount of ticks per quarter note
pub const DEFAULT_PPQN: u16 = 96;

/// Velocity of hits read from step notation
pub const DEFAULT_VELOCITY: u8 = 90;

/// C1, the General MIDI bass drum
pub const DEFAULT_KEY: u8 = 36;
