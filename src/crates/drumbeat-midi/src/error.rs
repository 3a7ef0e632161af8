pub type Result<T> = std::result::Result<T, MidiError>;

#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("Failed to parse MIDI data: {0}")]
    Parse(#[from] midly::Error),

    #[error("MIDI I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pattern(#[from] drumbeat_core::Error),

    #[error("SMPTE timecode files are not supported, only ticks per quarter note")]
    UnsupportedTiming,

    #[error("PPQN {0} does not fit in a MIDI header")]
    InvalidPpqn(u16),
}
