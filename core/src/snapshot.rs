use alloc::string::String;
use core::fmt;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Compact per-cell encoding used by saved games.
///
/// Counts are never stored authoritatively: `N<n>` is written for hidden numbered cells but the number is dropped on
/// read, and all counts are recomputed once the board is rebuilt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CellSymbol {
    /// `E`
    Empty,
    /// `N<n>`
    Numbered(u8),
    /// `R`
    Revealed,
    /// `F`
    Flagged,
    /// `FX`
    FalseFlag,
    /// `M`
    Mine,
    /// `MF`
    FlaggedMine,
    /// `MR`
    RevealedMine,
    /// `MRF`, a correctly flagged mine uncovered by a loss
    RevealedFlaggedMine,
    /// `MX`
    BlastedMine,
}

impl CellSymbol {
    pub const fn encode(cell: &Cell) -> Self {
        use CellSymbol::*;

        match (cell.is_mine, cell.is_revealed, cell.is_flagged) {
            (true, _, _) if cell.was_blasted => BlastedMine,
            (true, true, true) => RevealedFlaggedMine,
            (true, false, true) => FlaggedMine,
            (true, true, false) => RevealedMine,
            (true, false, false) => Mine,
            (false, true, _) => Revealed,
            (false, false, true) if cell.was_falsely_flagged => FalseFlag,
            (false, false, true) => Flagged,
            (false, false, false) if cell.neighbor_mines > 0 => Numbered(cell.neighbor_mines),
            (false, false, false) => Empty,
        }
    }

    /// Rebuilds the cell flags. The neighbor count is left at zero.
    pub const fn decode(self) -> Cell {
        use CellSymbol::*;

        let mut cell = Cell {
            is_mine: false,
            is_revealed: false,
            is_flagged: false,
            neighbor_mines: 0,
            was_blasted: false,
            was_falsely_flagged: false,
        };
        match self {
            Empty | Numbered(_) => {}
            Revealed => cell.is_revealed = true,
            Flagged => cell.is_flagged = true,
            FalseFlag => {
                cell.is_flagged = true;
                cell.was_falsely_flagged = true;
            }
            Mine => cell.is_mine = true,
            FlaggedMine => {
                cell.is_mine = true;
                cell.is_flagged = true;
            }
            RevealedMine => {
                cell.is_mine = true;
                cell.is_revealed = true;
            }
            RevealedFlaggedMine => {
                cell.is_mine = true;
                cell.is_revealed = true;
                cell.is_flagged = true;
            }
            BlastedMine => {
                cell.is_mine = true;
                cell.is_revealed = true;
                cell.was_blasted = true;
            }
        }
        cell
    }
}

impl fmt::Display for CellSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CellSymbol::*;

        match self {
            Empty => f.write_str("E"),
            Numbered(count) => write!(f, "N{}", count),
            Revealed => f.write_str("R"),
            Flagged => f.write_str("F"),
            FalseFlag => f.write_str("FX"),
            Mine => f.write_str("M"),
            FlaggedMine => f.write_str("MF"),
            RevealedMine => f.write_str("MR"),
            RevealedFlaggedMine => f.write_str("MRF"),
            BlastedMine => f.write_str("MX"),
        }
    }
}

impl FromStr for CellSymbol {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        use CellSymbol::*;

        Ok(match s {
            "E" => Empty,
            "R" => Revealed,
            "F" => Flagged,
            "FX" => FalseFlag,
            "M" => Mine,
            "MF" => FlaggedMine,
            "MR" => RevealedMine,
            "MRF" => RevealedFlaggedMine,
            "MX" => BlastedMine,
            _ => {
                let count = s
                    .strip_prefix('N')
                    .and_then(|count| count.parse::<u8>().ok())
                    .filter(|&count| count <= 8)
                    .ok_or(GameError::InvalidSymbol)?;
                Numbered(count)
            }
        })
    }
}

impl From<CellSymbol> for String {
    fn from(symbol: CellSymbol) -> Self {
        use alloc::string::ToString;
        symbol.to_string()
    }
}

impl TryFrom<String> for CellSymbol {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Logical saved state of a [`Game`], independent of any file format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub board: Array2<CellSymbol>,
    pub is_game_over: bool,
    pub has_started: bool,
    pub mines_remaining: CellCount,
}

impl GameSnapshot {
    pub fn capture<G: MineGenerator>(game: &Game<G>) -> Self {
        Self {
            config: *game.config(),
            board: game.board().cells().map(CellSymbol::encode),
            is_game_over: game.is_game_over(),
            has_started: game.has_started(),
            mines_remaining: game.mines_remaining(),
        }
    }

    /// Rebuilds the game. `generator` is only consulted if the saved game had not started yet.
    pub fn restore<G: MineGenerator>(&self, generator: G) -> Result<Game<G>> {
        let config = self.config;
        config.validate()?;
        if self.board.dim() != (usize::from(config.rows()), usize::from(config.cols())) {
            return Err(GameError::InvalidBoardShape);
        }

        let board = Board::from_cells(self.board.map(|&symbol| symbol.decode()));

        let expected_mines = if self.has_started { config.mines() } else { 0 };
        if board.count_mines() != expected_mines {
            return Err(GameError::MineCountMismatch);
        }

        let flagged = board.count_flagged();
        if flagged > config.mines() {
            return Err(GameError::MineCountMismatch);
        }
        if config.mines() - flagged != self.mines_remaining {
            log::warn!(
                "Saved mines remaining {} disagrees with {} flags on the board, using the board",
                self.mines_remaining,
                flagged
            );
        }

        let state = self.derive_state(&board, flagged)?;
        Ok(Game::from_parts(config, board, state, generator))
    }

    /// Reads the state off the board and checks it against the saved flags.
    fn derive_state(&self, board: &Board, flagged: CellCount) -> Result<EngineState> {
        let cells = board.cells();
        let state = if !self.has_started {
            if cells.iter().any(|cell| cell.is_revealed) {
                return Err(GameError::InconsistentState);
            }
            EngineState::Ready
        } else if cells.iter().any(|cell| cell.is_mine && cell.is_revealed) {
            EngineState::Lost
        } else if crate::engine::win_condition_holds(&self.config, board, flagged) {
            EngineState::Won
        } else {
            EngineState::Active
        };

        if state.is_finished() != self.is_game_over {
            log::warn!(
                "Board reads as {:?} but the save says game over is {}",
                state,
                self.is_game_over
            );
            return Err(GameError::InconsistentState);
        }
        Ok(state)
    }
}

impl<G: MineGenerator> Game<G> {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}
