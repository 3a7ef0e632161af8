//! Step notation parser
//!
//! A pattern is written one character per step: `x` (or `X`) is a hit and
//! anything else is a rest. Several patterns can be multiplexed with `;`,
//! and each one may carry a `[name]` and a `{pitch}` annotation anywhere in
//! its text:
//!
//! ```text
//! [kick]  {C1}   x.x.......xx...x  x.x.....x......x;
//! [snare] {D1}   ....x.......x...  ....x.......x...
//! ```
//!
//! Tabs and line breaks only help alignment and are ignored. Spaces are
//! rests.

use crate::grid::GridRes;
use crate::note::parse_pitch;
use crate::pattern::Pattern;
use crate::pulse::{Pulse, Pulses};
use crate::{DEFAULT_PPQN, DEFAULT_VELOCITY};

/// Parse step notation into one pattern per `;` separated segment
///
/// Never fails: an unreadable `{pitch}` leaves the key at 0 and an unclosed
/// bracket is read as a rest.
pub fn parse(grid: GridRes, input: &str) -> Vec<Pattern> {
    input.split(';').map(|segment| parse_segment(grid, segment)).collect()
}

fn parse_segment(grid: GridRes, segment: &str) -> Pattern {
    let mut text = segment.to_string();

    let name = take_delimited(&mut text, '[', ']').unwrap_or_default();
    let key = take_delimited(&mut text, '{', '}')
        .and_then(|token| parse_pitch(&token))
        .unwrap_or(0);

    text.retain(|c| !matches!(c, '\t' | '\n' | '\r'));

    let step = grid.step_size(DEFAULT_PPQN);
    let pulses: Pulses = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            c.eq_ignore_ascii_case(&'x')
                .then(|| Pulse::new(i as u64 * step, step as u16, DEFAULT_VELOCITY))
        })
        .collect();

    Pattern {
        name,
        key,
        ppqn: DEFAULT_PPQN,
        grid,
        pulses,
    }
}

/// Removes the first `open`..`close` pair from `text` and returns its content
fn take_delimited(text: &mut String, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let len = text[start..].find(close)?;
    let end = start + len;

    let inner = text[start + open.len_utf8()..end].trim().to_string();
    text.replace_range(start..end + close.len_utf8(), "");
    Some(inner)
}
