use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A single drum hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pulse {
    /// Absolute start position in ticks
    pub ticks: u64,
    /// Length in ticks. Informational only, hits are always played as one step.
    pub duration: u16,
    /// 0..=127, a velocity of 0 does not sound
    pub velocity: u8,
}

impl Pulse {
    pub fn new(ticks: u64, duration: u16, velocity: u8) -> Self {
        Pulse {
            ticks,
            duration,
            velocity,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.velocity > 0
    }
}

/// Ordered step slots of a pattern, `None` being a rest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pulses(pub Vec<Option<Pulse>>);

impl Pulses {
    pub fn new() -> Self {
        Pulses(Vec::new())
    }

    /// `len` empty slots
    pub fn rests(len: usize) -> Self {
        Pulses(vec![None; len])
    }

    /// Iterate over the present pulses, skipping rests
    pub fn hits(&self) -> impl Iterator<Item = &Pulse> {
        self.0.iter().flatten()
    }

    pub fn into_inner(self) -> Vec<Option<Pulse>> {
        self.0
    }
}

impl Deref for Pulses {
    type Target = Vec<Option<Pulse>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Pulses {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Option<Pulse>>> for Pulses {
    fn from(slots: Vec<Option<Pulse>>) -> Self {
        Pulses(slots)
    }
}

impl FromIterator<Option<Pulse>> for Pulses {
    fn from_iter<I: IntoIterator<Item = Option<Pulse>>>(iter: I) -> Self {
        Pulses(iter.into_iter().collect())
    }
}

/// Step view: `x` for a sounding pulse, `.` for anything else
impl fmt::Display for Pulses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.0 {
            match slot {
                Some(p) if p.is_sounding() => f.write_str("x")?,
                _ => f.write_str(".")?,
            }
        }
        Ok(())
    }
}
