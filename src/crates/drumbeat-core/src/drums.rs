/// General MIDI Level 1 percussion key map (channel 10)
const GM_DRUMS: [&str; 47] = [
    "Acoustic Bass Drum", // 35
    "Bass Drum 1",
    "Side Stick",
    "Acoustic Snare",
    "Hand Clap",
    "Electric Snare", // 40
    "Low Floor Tom",
    "Closed Hi-Hat",
    "High Floor Tom",
    "Pedal Hi-Hat",
    "Low Tom", // 45
    "Open Hi-Hat",
    "Low-Mid Tom",
    "Hi-Mid Tom",
    "Crash Cymbal 1",
    "High Tom", // 50
    "Ride Cymbal 1",
    "Chinese Cymbal",
    "Ride Bell",
    "Tambourine",
    "Splash Cymbal", // 55
    "Cowbell",
    "Crash Cymbal 2",
    "Vibraslap",
    "Ride Cymbal 2",
    "Hi Bongo", // 60
    "Low Bongo",
    "Mute Hi Conga",
    "Open Hi Conga",
    "Low Conga",
    "High Timbale", // 65
    "Low Timbale",
    "High Agogo",
    "Low Agogo",
    "Cabasa",
    "Maracas", // 70
    "Short Whistle",
    "Long Whistle",
    "Short Guiro",
    "Long Guiro",
    "Claves", // 75
    "Hi Wood Block",
    "Low Wood Block",
    "Mute Cuica",
    "Open Cuica",
    "Mute Triangle", // 80
    "Open Triangle",
];

const FIRST_GM_DRUM: u8 = 35;

/// Get the human-readable name for a GM drum key
pub fn gm_drum_name(key: u8) -> Option<&'static str> {
    let idx = key.checked_sub(FIRST_GM_DRUM)?;
    GM_DRUMS.get(idx as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::key_int;

    #[test]
    fn test_drum_names() {
        assert_eq!(gm_drum_name(35), Some("Acoustic Bass Drum"));
        assert_eq!(gm_drum_name(36), Some("Bass Drum 1"));
        assert_eq!(gm_drum_name(38), Some("Acoustic Snare"));
        assert_eq!(gm_drum_name(42), Some("Closed Hi-Hat"));
        assert_eq!(gm_drum_name(81), Some("Open Triangle"));
    }

    #[test]
    fn test_outside_the_map() {
        assert_eq!(gm_drum_name(34), None);
        assert_eq!(gm_drum_name(82), None);
        assert_eq!(gm_drum_name(0), None);
    }

    #[test]
    fn test_named_keys() {
        // C1 / D1 / F#1 are the usual kick / snare / hi-hat
        assert_eq!(key_int("C", 1).and_then(gm_drum_name), Some("Bass Drum 1"));
        assert_eq!(key_int("D", 1).and_then(gm_drum_name), Some("Acoustic Snare"));
        assert_eq!(key_int("F#", 1).and_then(gm_drum_name), Some("Closed Hi-Hat"));
    }
}
