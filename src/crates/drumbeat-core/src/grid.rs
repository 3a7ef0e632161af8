use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Resolution of the step grid a pattern is written on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GridRes {
    One4,
    One8,
    #[default]
    One16,
    One32,
    One64,
}

impl GridRes {
    /// All supported resolutions, coarsest first
    pub const ALL: [GridRes; 5] = [
        GridRes::One4,
        GridRes::One8,
        GridRes::One16,
        GridRes::One32,
        GridRes::One64,
    ];

    /// Number of steps needed to fill one beat (a quarter note)
    pub fn steps_in_beat(self) -> u64 {
        match self {
            GridRes::One4 => 1,
            GridRes::One8 => 2,
            GridRes::One16 => 4,
            GridRes::One32 => 8,
            GridRes::One64 => 16,
        }
    }

    /// Size of one step in ticks. Zero when `ppqn` is too small to be split
    /// into this many steps.
    pub fn step_size(self, ppqn: u16) -> u64 {
        u64::from(ppqn) / self.steps_in_beat()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GridRes::One4 => "1/4",
            GridRes::One8 => "1/8",
            GridRes::One16 => "1/16",
            GridRes::One32 => "1/32",
            GridRes::One64 => "1/64",
        }
    }
}

impl fmt::Display for GridRes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridRes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridRes::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownGrid(s.to_string()))
    }
}

impl TryFrom<String> for GridRes {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridRes> for String {
    fn from(grid: GridRes) -> Self {
        grid.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_PPQN;

    #[test]
    fn test_step_size() {
        let ppqn = DEFAULT_PPQN;
        assert_eq!(GridRes::One4.step_size(ppqn), 96);
        assert_eq!(GridRes::One8.step_size(ppqn), 48);
        assert_eq!(GridRes::One16.step_size(ppqn), 24);
        assert_eq!(GridRes::One32.step_size(ppqn), 12);
        assert_eq!(GridRes::One64.step_size(ppqn), 6);
    }

    #[test]
    fn test_steps_in_beat() {
        let steps: Vec<u64> = GridRes::ALL.iter().map(|g| g.steps_in_beat()).collect();
        assert_eq!(steps, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_degenerate_step_size() {
        assert_eq!(GridRes::One64.step_size(8), 0);
        assert_eq!(GridRes::One4.step_size(0), 0);
    }

    #[test]
    fn test_parse_grid() {
        assert_eq!("1/16".parse::<GridRes>().unwrap(), GridRes::One16);
        assert_eq!(" 1/8 ".parse::<GridRes>().unwrap(), GridRes::One8);
        assert!(matches!(
            "1/12".parse::<GridRes>(),
            Err(Error::UnknownGrid(s)) if s == "1/12"
        ));
    }

    #[test]
    fn test_grid_serde() {
        let json = serde_json::to_string(&GridRes::One32).unwrap();
        assert_eq!(json, "\"1/32\"");
        let grid: GridRes = serde_json::from_str("\"1/4\"").unwrap();
        assert_eq!(grid, GridRes::One4);
        assert!(serde_json::from_str::<GridRes>("\"triplet\"").is_err());
    }
}
