const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a MIDI key to its name, octaves starting at -2 (36 is "C1")
pub fn note_to_name(key: u8) -> String {
    let note_name = NOTE_NAMES[(key % 12) as usize];
    let octave = (key / 12) as i32 - 2;

    format!("{}{}", note_name, octave)
}

/// Convert a note letter (with optional `#` or `b`) and an octave to a MIDI key
///
/// Returns `None` for an unknown letter or a key outside 0..=127.
pub fn key_int(note: &str, octave: i32) -> Option<u8> {
    let mut chars = note.trim().chars();

    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let accidental = match chars.as_str() {
        "" => 0,
        "#" => 1,
        "b" => -1,
        _ => return None,
    };

    let key = base + accidental + (octave + 2) * 12;
    u8::try_from(key).ok().filter(|k| *k <= 127)
}

/// Parse a `C#3` style pitch. The last character is the octave digit.
pub fn parse_pitch(token: &str) -> Option<u8> {
    let token = token.trim();
    let octave = token.chars().last()?.to_digit(10)?;
    let letter = &token[..token.len() - 1];

    key_int(letter, octave as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_to_name() {
        assert_eq!(note_to_name(36), "C1");
        assert_eq!(note_to_name(37), "C#1");
        assert_eq!(note_to_name(42), "F#1");
        assert_eq!(note_to_name(60), "C3");
        assert_eq!(note_to_name(0), "C-2");
    }

    #[test]
    fn test_key_int() {
        assert_eq!(key_int("C", 1), Some(36));
        assert_eq!(key_int("C#", 1), Some(37));
        assert_eq!(key_int("Db", 1), Some(37));
        assert_eq!(key_int("d", 2), Some(50));
        assert_eq!(key_int("G", 8), Some(127));
        assert_eq!(key_int("G#", 8), None);
        assert_eq!(key_int("H", 1), None);
        assert_eq!(key_int("", 1), None);
    }

    #[test]
    fn test_names_round_trip() {
        for key in 24..=127u8 {
            let name = note_to_name(key);
            assert_eq!(parse_pitch(&name), Some(key), "{}", name);
        }
    }

    #[test]
    fn test_parse_pitch() {
        assert_eq!(parse_pitch("D2"), key_int("D", 2));
        assert_eq!(parse_pitch("C#3"), Some(61));
        assert_eq!(parse_pitch("noteAKey"), None);
        assert_eq!(parse_pitch("7"), None);
        assert_eq!(parse_pitch(""), None);
    }
}
