use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

pub const CUSTOM_ROWS: RangeInclusive<Coord> = 9..=24;
pub const CUSTOM_COLS: RangeInclusive<Coord> = 9..=30;
pub const CUSTOM_MINES: RangeInclusive<CellCount> = 10..=668;

/// Named board configurations offered to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    Custom {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
}

impl Difficulty {
    pub const PRESETS: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    /// `(rows, cols, mines)` for this difficulty.
    pub const fn params(self) -> (Coord, Coord, CellCount) {
        match self {
            Self::Beginner => (9, 9, 10),
            Self::Intermediate => (16, 16, 40),
            Self::Expert => (16, 30, 99),
            Self::Custom { rows, cols, mines } => (rows, cols, mines),
        }
    }

    /// Stable identifier used in save files and on the command line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
            Self::Custom { .. } => "Custom",
        }
    }

    pub fn config(self) -> Result<GameConfig> {
        if let Self::Custom { rows, cols, mines } = self {
            check_range("rows", rows.into(), &CUSTOM_ROWS)?;
            check_range("cols", cols.into(), &CUSTOM_COLS)?;
            check_range("mines", mines, &CUSTOM_MINES)?;
        }
        let (rows, cols, mines) = self.params();
        GameConfig::new(rows, cols, mines)
    }

    /// The preset matching `config`'s dimensions, or `Custom` carrying them.
    pub fn from_config(config: &GameConfig) -> Self {
        let params = (config.rows(), config.cols(), config.mines());
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.params() == params)
            .unwrap_or(Self::Custom {
                rows: params.0,
                cols: params.1,
                mines: params.2,
            })
    }
}

fn check_range(
    field: &'static str,
    value: u16,
    range: &RangeInclusive<impl Into<u16> + Copy>,
) -> Result<()> {
    let (min, max) = ((*range.start()).into(), (*range.end()).into());
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GameError::CustomOutOfRange { field, min, max })
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses preset labels case-insensitively. `Custom` has no dimensions of its own and is rejected.
impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(s))
            .ok_or(UnknownDifficulty)
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("unknown difficulty, expected one of: Beginner, Intermediate, Expert")]
pub struct UnknownDifficulty;
