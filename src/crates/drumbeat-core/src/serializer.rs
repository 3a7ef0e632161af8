//! Persisting pattern collections
//!
//! Patterns are stored as JSON with their rests dropped, so only the real
//! pulses hit the disk. Reading realigns every pattern back onto its grid.

use serde::Serialize;
use std::io::{Read, Write};

use crate::error::Result;
use crate::grid::GridRes;
use crate::pattern::Pattern;
use crate::pulse::Pulse;

/// Borrowed, compacted form of a pattern
#[derive(Serialize)]
struct StoredPattern<'a> {
    name: &'a str,
    key: u8,
    ppqn: u16,
    grid: GridRes,
    pulses: Vec<&'a Pulse>,
}

impl<'a> From<&'a Pattern> for StoredPattern<'a> {
    fn from(p: &'a Pattern) -> Self {
        StoredPattern {
            name: &p.name,
            key: p.key,
            ppqn: p.ppqn,
            grid: p.grid,
            pulses: p.pulses.hits().collect(),
        }
    }
}

/// Serialize `patterns` to `w`
///
/// The patterns are realigned afterwards, so callers get them back in their
/// display form even though the written form is compacted. A write error is
/// reported after the realignment.
pub fn write_to<W: Write>(w: W, patterns: &mut [Pattern]) -> Result<()> {
    let stored: Vec<StoredPattern> = patterns.iter().map(StoredPattern::from).collect();
    let written = serde_json::to_writer(w, &stored);

    for p in patterns.iter_mut() {
        p.realign()?;
    }
    written?;

    tracing::debug!(count = patterns.len(), "patterns written");
    Ok(())
}

/// Read patterns written by [`write_to`], realigned onto their grids
pub fn read_from<R: Read>(r: R) -> Result<Vec<Pattern>> {
    let mut patterns: Vec<Pattern> = serde_json::from_reader(r)?;
    for p in &mut patterns {
        p.realign()?;
    }

    tracing::debug!(count = patterns.len(), "patterns read");
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::notation::parse;
    use std::io;

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_round_trip_nothing() {
        let mut buf: Vec<u8> = Vec::new();
        write_to(&mut buf, &mut []).unwrap();
        let patterns = read_from(buf.as_slice()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_round_trip_one_pattern() {
        let mut patterns = parse(GridRes::One8, "x...x...");
        let mut buf: Vec<u8> = Vec::new();
        write_to(&mut buf, &mut patterns).unwrap();

        let restored = read_from(buf.as_slice()).unwrap();
        assert_eq!(restored, patterns);
    }

    #[test]
    fn test_round_trip_annotated_kit() {
        let mut patterns = parse(
            GridRes::One16,
            "[kick]{C1}x...x...x...x...;[snare]{D1}....x.......x...;[hat]{F#1}x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.x.",
        );
        patterns[1].pulses[4].as_mut().unwrap().velocity = 127;

        let mut buf: Vec<u8> = Vec::new();
        write_to(&mut buf, &mut patterns).unwrap();
        let restored = read_from(buf.as_slice()).unwrap();

        assert_eq!(restored, patterns);
        assert_eq!(restored[1].name, "snare");
        assert_eq!(restored[1].key, 38);
        assert_eq!(restored[1].pulses[4].unwrap().velocity, 127);
        assert_eq!(restored[2].pulses.len(), 32);
    }

    #[test]
    fn test_written_form_is_compact() {
        let mut patterns = parse(GridRes::One16, "[kick]x.......x.......");
        let mut buf: Vec<u8> = Vec::new();
        write_to(&mut buf, &mut patterns).unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let pulses = raw[0]["pulses"].as_array().unwrap();
        assert_eq!(pulses.len(), 2);
        assert_eq!(pulses[1]["ticks"], 192);
        assert_eq!(raw[0]["grid"], "1/16");

        // The caller's patterns are still in display form
        assert_eq!(patterns[0].pulses.len(), 16);
    }

    #[test]
    fn test_write_realigns_the_callers_patterns() {
        let mut patterns = parse(GridRes::One16, "x...x");
        write_to(&mut Vec::<u8>::new(), &mut patterns).unwrap();
        assert_eq!(patterns[0].pulses.to_string(), "x...x...........");
    }

    #[test]
    fn test_corrupt_input() {
        let err = read_from("[{\"name\": 1}]".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Serialize(_)));

        let err = read_from("[{\"name\":\"a\",\"key\":0,\"ppqn\":96,\"grid\":\"1/3\",\"pulses\":[]}]".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::Serialize(_)));
    }

    #[test]
    fn test_write_error_still_realigns() {
        let mut patterns = parse(GridRes::One16, "[kick]x...x");
        let err = write_to(ClosedSink, &mut patterns).unwrap_err();
        assert!(matches!(err, Error::Serialize(_)));
        assert_eq!(patterns[0].pulses.to_string(), "x...x...........");
    }

    #[test]
    fn test_read_out_of_range_ticks() {
        let input = r#"[{"name":"a","key":36,"ppqn":96,"grid":"1/16","pulses":[{"ticks":18446744073709551615,"duration":24,"velocity":90}]}]"#;
        let err = read_from(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::TicksOutOfRange { ticks: u64::MAX }));
    }
}
