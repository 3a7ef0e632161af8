use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::grid::GridRes;
use crate::pulse::{Pulse, Pulses};
use crate::{DEFAULT_PPQN, DEFAULT_VELOCITY};

/// Most slots a pulse position may ask [`Pattern::realign`] for
pub const MAX_STEPS: usize = 1 << 20;

fn slot_start(slot: usize, step: u64) -> Option<u64> {
    u64::try_from(slot).ok()?.checked_mul(step)
}

/// A named, pitched sequence of step slots
///
/// Slot `i` nominally covers ticks `[i * step_size, (i + 1) * step_size)`.
/// Pulses inserted by hand may disagree with their slot until
/// [`Pattern::realign`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Name of the instrument or voice
    pub name: String,
    /// MIDI key the pattern triggers, 0 when unset
    pub key: u8,
    /// Ticks per quarter note
    pub ppqn: u16,
    pub grid: GridRes,
    pub pulses: Pulses,
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern {
            name: String::new(),
            key: 0,
            ppqn: DEFAULT_PPQN,
            grid: GridRes::default(),
            pulses: Pulses::new(),
        }
    }
}

impl Pattern {
    pub fn new(grid: GridRes) -> Self {
        Pattern {
            grid,
            ..Default::default()
        }
    }

    /// Builds a pattern from a hit/rest sequence, one slot per entry
    pub fn from_hits(grid: GridRes, hits: &[bool]) -> Self {
        let step = grid.step_size(DEFAULT_PPQN);
        let pulses = hits
            .iter()
            .enumerate()
            .map(|(i, &on)| on.then(|| Pulse::new(i as u64 * step, step as u16, DEFAULT_VELOCITY)))
            .collect();

        Pattern {
            grid,
            pulses,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_key(mut self, key: u8) -> Self {
        self.key = key;
        self
    }

    /// Size of one step in ticks
    ///
    /// Fails when the grid cannot split this pattern's PPQN, rather than
    /// handing a zero step size to callers that divide by it.
    pub fn step_size(&self) -> Result<u64> {
        match self.grid.step_size(self.ppqn) {
            0 => Err(Error::DegenerateGrid {
                grid: self.grid,
                ppqn: self.ppqn,
            }),
            step => Ok(step),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Number of sounding pulses
    pub fn hit_count(&self) -> usize {
        self.pulses.hits().filter(|p| p.is_sounding()).count()
    }

    /// Rotates the steps `n` slots to the right (left when negative)
    ///
    /// Each pulse keeps its position relative to its slot: ticks are made
    /// slot-relative before the rotation and absolute again afterwards, so
    /// `offset(n)` followed by `offset(-n)` restores aligned ticks exactly.
    pub fn offset(&mut self, n: i64) -> Result<()> {
        let total = self.pulses.len();
        if total == 0 {
            return Ok(());
        }
        let shift = n.rem_euclid(total as i64) as usize;
        if shift == 0 {
            return Ok(());
        }
        let step = self.step_size()?;

        // Built aside so a pulse that cannot move leaves the pattern untouched
        let mut rotated = Pulses::rests(total);
        for (i, slot) in self.pulses.iter().enumerate() {
            let Some(pulse) = slot else {
                continue;
            };
            let to = (i + shift) % total;
            let ticks = slot_start(i, step)
                .map(|start| pulse.ticks.saturating_sub(start))
                .zip(slot_start(to, step))
                .and_then(|(relative, start)| relative.checked_add(start))
                .ok_or(Error::TicksOutOfRange { ticks: pulse.ticks })?;
            rotated[to] = Some(Pulse { ticks, ..*pulse });
        }
        self.pulses = rotated;

        Ok(())
    }

    /// Re-slots every pulse by its tick position and pads the pattern to
    /// whole 4-beat bars
    ///
    /// When several pulses land in the same slot the earliest one is kept.
    /// Running it twice gives the same result as running it once.
    pub fn realign(&mut self) -> Result<()> {
        let step = self.step_size()?;
        let bar_steps = (self.grid.steps_in_beat() * 4) as usize;
        let max = self.pulses.hits().map(|p| p.ticks).max().unwrap_or(0);

        let needed = usize::try_from(max / step)
            .ok()
            .and_then(|n| n.checked_add(1))
            .filter(|&n| n <= MAX_STEPS)
            .ok_or(Error::TicksOutOfRange { ticks: max })?;
        let required = needed.max(self.pulses.len()).max(1);
        let len = required
            .div_ceil(bar_steps)
            .checked_mul(bar_steps)
            .ok_or(Error::TicksOutOfRange { ticks: max })?;

        let mut slots = Pulses::rests(len);
        let mut dropped = 0;
        for pulse in self.pulses.hits() {
            let idx = (pulse.ticks / step) as usize;
            match &mut slots[idx] {
                Some(kept) if kept.ticks <= pulse.ticks => dropped += 1,
                Some(kept) => {
                    *kept = *pulse;
                    dropped += 1;
                }
                empty => *empty = Some(*pulse),
            }
        }
        if dropped > 0 {
            tracing::warn!(
                pattern = %self.name,
                dropped,
                "pulses sharing a grid slot were dropped while realigning"
            );
        }

        self.pulses = slots;
        Ok(())
    }

    /// Drops the rests, keeping only the real pulses in order
    pub fn compact(&mut self) {
        self.pulses.retain(Option::is_some);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.pulses)
        } else {
            write!(f, "{}: {}", self.name, self.pulses)
        }
    }
}
