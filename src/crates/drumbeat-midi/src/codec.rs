use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use drumbeat_core::pattern::MAX_STEPS;
use drumbeat_core::{note_to_name, GridRes, Pattern, Pulse, Pulses, DEFAULT_KEY, DEFAULT_VELOCITY};

use crate::error::{MidiError, Result};

/// General MIDI percussion channel (channel 10)
pub const DRUM_CHANNEL: u8 = 9;

/// Grids the decoder may settle on, coarsest first
const DECODE_GRIDS: [GridRes; 4] = [GridRes::One4, GridRes::One8, GridRes::One16, GridRes::One32];

/// Builds a single track one event at a time, delta-timed
struct TrackEncoder {
    events: Vec<TrackEvent<'static>>,
}

impl TrackEncoder {
    fn new() -> Self {
        Self { events: Vec::new() }
    }

    fn add_after_delta(&mut self, delta: u32, kind: TrackEventKind<'static>) {
        tracing::trace!(delta, ?kind, "track event");
        self.events.push(TrackEvent {
            delta: u28::new(delta),
            kind,
        });
    }

    fn note_on(&mut self, delta: u32, key: u8, vel: u8) {
        self.add_after_delta(delta, note_message(MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(vel) }));
    }

    fn note_off(&mut self, delta: u32, key: u8) {
        self.add_after_delta(delta, note_message(MidiMessage::NoteOff { key: u7::new(key), vel: u7::new(0) }));
    }

    fn end_of_track(&mut self, delta: u32) {
        self.add_after_delta(delta, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }
}

fn note_message(message: MidiMessage) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::new(DRUM_CHANNEL),
        message,
    }
}

/// Key a pattern plays on. Unset keys (0) are spread upwards from C1 by
/// position so that unannotated voices stay distinct.
fn playback_key(pattern: &Pattern, index: usize) -> u8 {
    if pattern.key != 0 {
        return pattern.key.min(127);
    }
    DEFAULT_KEY.saturating_add(index.min(u8::MAX as usize) as u8).min(127)
}

/// Render patterns as a single-track Standard MIDI File
///
/// Every pattern is realigned first, which mutates the caller's patterns.
/// All patterns are played in lockstep at one step per sixteenth note
/// (PPQN / 4 ticks), whatever their own grid. Returns `None` when there is
/// nothing to encode.
pub fn to_smf(patterns: &mut [Pattern]) -> Result<Option<Smf<'static>>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    for pattern in patterns.iter_mut() {
        pattern.realign()?;
    }

    let ppqn = patterns[0].ppqn;
    if ppqn > 0x7FFF {
        return Err(MidiError::InvalidPpqn(ppqn));
    }
    let step_ticks = u32::from(ppqn) / 4;
    if step_ticks == 0 {
        return Err(drumbeat_core::Error::DegenerateGrid {
            grid: GridRes::One16,
            ppqn,
        }
        .into());
    }

    let keys: Vec<u8> = patterns
        .iter()
        .enumerate()
        .map(|(i, p)| playback_key(p, i))
        .collect();
    let nbr_steps = patterns[0].pulses.len();

    let mut track = TrackEncoder::new();
    let mut playing: BTreeMap<u8, bool> = BTreeMap::new();
    let mut delta = 0u32;

    for step in 0..nbr_steps {
        if step > 0 {
            delta += step_ticks;
        }
        for (pattern, &key) in patterns.iter().zip(&keys) {
            // Shorter patterns stop contributing past their own end
            let Some(slot) = pattern.pulses.get(step) else {
                continue;
            };

            match slot {
                Some(pulse) if pulse.is_sounding() => {
                    track.note_on(delta, key, DEFAULT_VELOCITY);
                    playing.insert(key, true);
                    delta = 0;
                }
                _ => {
                    if playing.get(&key) == Some(&true) {
                        track.note_off(delta, key);
                        playing.insert(key, false);
                        delta = 0;
                    }
                }
            }
        }
    }

    // Close what is still sounding at the end of the last step
    let mut tail = delta + step_ticks;
    for (&key, _) in playing.iter().filter(|(_, on)| **on) {
        track.note_off(tail, key);
        tail = 0;
    }
    track.end_of_track(tail);

    let mut smf = Smf::new(Header::new(Format::SingleTrack, Timing::Metrical(u15::new(ppqn))));
    smf.tracks.push(track.events);
    Ok(Some(smf))
}

/// Write patterns to `w` as a Standard MIDI File
///
/// Writes nothing when `patterns` is empty.
pub fn to_midi<W: Write>(w: W, patterns: &mut [Pattern]) -> Result<()> {
    let Some(smf) = to_smf(patterns)? else {
        return Ok(());
    };
    smf.write_std(w)?;
    Ok(())
}

/// A note as an absolute tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NoteSpan {
    start: u64,
    duration: u64,
    velocity: u8,
}

/// Read drum patterns from a Standard MIDI File
pub fn from_midi<R: Read>(mut r: R) -> Result<Vec<Pattern>> {
    let mut data = Vec::new();
    r.read_to_end(&mut data)?;
    from_bytes(&data)
}

pub fn from_bytes(data: &[u8]) -> Result<Vec<Pattern>> {
    let smf = Smf::parse(data)?;
    from_smf(&smf)
}

/// Rebuild one pattern per MIDI key from a parsed file
///
/// Meant for drum tracks: channels are ignored and every key becomes its
/// own pattern, sorted by key. The grid is the coarsest one whose step fits
/// in the shortest note, but never finer than 1/32. Each note lands in the
/// slot nearest to its start; when two notes share a slot the earlier one
/// is kept.
pub fn from_smf(smf: &Smf) -> Result<Vec<Pattern>> {
    let ppqn = match smf.header.timing {
        Timing::Metrical(tpb) => tpb.as_int(),
        Timing::Timecode(..) => return Err(MidiError::UnsupportedTiming),
    };

    let (notes, total_ticks) = collect_notes(smf);
    if notes.is_empty() {
        return Ok(Vec::new());
    }

    let shortest = notes
        .values()
        .flatten()
        .map(|n| n.duration)
        .filter(|&d| d > 0)
        .min();
    let grid = infer_grid(ppqn, shortest);
    tracing::debug!(ppqn, ?shortest, %grid, total_ticks, "inferred grid");

    let mut patterns = Vec::with_capacity(notes.len());
    for (key, mut spans) in notes {
        let mut pattern = Pattern {
            name: note_to_name(key),
            key,
            ppqn,
            grid,
            pulses: Pulses::new(),
        };
        let step = pattern.step_size()?;

        spans.sort_by_key(|n| n.start);
        let nbr_slots = usize::try_from(total_ticks.div_ceil(step))
            .ok()
            .filter(|&n| n <= MAX_STEPS)
            .ok_or(drumbeat_core::Error::TicksOutOfRange { ticks: total_ticks })?;
        let mut slots = Pulses::rests(nbr_slots);
        for span in spans {
            let idx = ((span.start + step / 2) / step) as usize;
            if idx >= slots.len() {
                slots.resize(idx + 1, None);
            }
            if slots[idx].is_some() {
                tracing::debug!(key, start = span.start, slot = idx, "slot already taken, note dropped");
                continue;
            }
            slots[idx] = Some(Pulse::new(idx as u64 * step, step as u16, span.velocity));
        }

        pattern.pulses = slots;
        patterns.push(pattern);
    }

    Ok(patterns)
}

/// Group note intervals by key across all tracks
///
/// Also returns the length of the longest track in ticks.
fn collect_notes(smf: &Smf) -> (BTreeMap<u8, Vec<NoteSpan>>, u64) {
    let mut notes: BTreeMap<u8, Vec<NoteSpan>> = BTreeMap::new();
    let mut total_ticks = 0u64;

    for track in &smf.tracks {
        let mut clock = 0u64;
        // key -> (start, velocity) of the note currently held
        let mut held: HashMap<u8, (u64, u8)> = HashMap::new();

        for event in track {
            clock += u64::from(event.delta.as_int());

            let TrackEventKind::Midi { message, .. } = event.kind else {
                continue;
            };
            match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    let key = key.as_int();
                    // A new note-on for a held key closes the previous note
                    if let Some((start, velocity)) = held.insert(key, (clock, vel.as_int())) {
                        notes.entry(key).or_default().push(NoteSpan {
                            start,
                            duration: clock - start,
                            velocity,
                        });
                    }
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    let key = key.as_int();
                    if let Some((start, velocity)) = held.remove(&key) {
                        notes.entry(key).or_default().push(NoteSpan {
                            start,
                            duration: clock - start,
                            velocity,
                        });
                    }
                }
                _ => {}
            }
        }

        // Notes never released end with their track
        for (key, (start, velocity)) in held {
            notes.entry(key).or_default().push(NoteSpan {
                start,
                duration: clock - start,
                velocity,
            });
        }
        total_ticks = total_ticks.max(clock);
    }

    (notes, total_ticks)
}

fn infer_grid(ppqn: u16, shortest: Option<u64>) -> GridRes {
    let Some(shortest) = shortest else {
        return GridRes::One16;
    };
    DECODE_GRIDS
        .into_iter()
        .find(|g| g.step_size(ppqn) <= shortest)
        .unwrap_or(GridRes::One32)
}
