use crate::grid::GridRes;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("grid {grid} has no ticks per step at {ppqn} PPQN")]
    DegenerateGrid { grid: GridRes, ppqn: u16 },

    #[error("pulse at tick {ticks} is out of range for a pattern")]
    TicksOutOfRange { ticks: u64 },

    #[error("unknown grid resolution '{0}' (expected 1/4, 1/8, 1/16, 1/32 or 1/64)")]
    UnknownGrid(String),

    #[error("failed to encode or decode patterns: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
