//! JSON save file for Minesweeper games.
//!
//! Field names follow the long-standing save layout (`rows`, `cols`, `mines`, `board`, `game_over`, `game_started`,
//! `mines_left`, `elapsed_time`, `selected_difficulty`, `zoom_level`). The board is a list of rows, each cell being
//! one [`CellSymbol`] string. Presentation hints travel with the game but are never interpreted by the engine.

use minesweeper_core::{
    CellCount, CellSymbol, Coord, Difficulty, Game, GameConfig, GameError, GameSnapshot, MineGenerator, WinPolicy,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

pub const DEFAULT_ZOOM_LEVEL: u16 = 100;
pub const ZOOM_LEVELS: [u16; 3] = [100, 150, 200];

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed save file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not access save file: {0}")]
    Io(#[from] io::Error),
    #[error("Saved game is invalid: {0}")]
    Game(#[from] GameError),
    #[error("Saved board rows have different lengths")]
    RaggedBoard,
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Front-end state saved next to the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationHints {
    /// Seconds on the clock when the game was saved.
    pub elapsed_time: u32,
    pub selected_difficulty: String,
    /// Board scale in percent.
    pub zoom_level: u16,
}

impl PresentationHints {
    pub fn for_config(config: &GameConfig) -> Self {
        Self {
            elapsed_time: 0,
            selected_difficulty: Difficulty::from_config(config).label().to_owned(),
            zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    pub board: Vec<Vec<CellSymbol>>,
    pub game_over: bool,
    #[serde(default)]
    pub game_started: bool,
    #[serde(default)]
    pub mines_left: Option<CellCount>,
    #[serde(default)]
    pub elapsed_time: u32,
    #[serde(default = "default_difficulty_label")]
    pub selected_difficulty: String,
    #[serde(default = "default_zoom_level")]
    pub zoom_level: u16,
    #[serde(default)]
    pub win_policy: WinPolicy,
}

fn default_difficulty_label() -> String {
    "Custom".to_owned()
}

fn default_zoom_level() -> u16 {
    DEFAULT_ZOOM_LEVEL
}

impl SaveFile {
    pub fn capture<G: MineGenerator>(game: &Game<G>, hints: &PresentationHints) -> Self {
        let snapshot = game.snapshot();
        let config = snapshot.config;
        Self {
            rows: config.rows(),
            cols: config.cols(),
            mines: config.mines(),
            board: snapshot
                .board
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            game_over: snapshot.is_game_over,
            game_started: snapshot.has_started,
            mines_left: Some(snapshot.mines_remaining),
            elapsed_time: hints.elapsed_time,
            selected_difficulty: hints.selected_difficulty.clone(),
            zoom_level: hints.zoom_level,
            win_policy: config.win_policy(),
        }
    }

    pub fn hints(&self) -> PresentationHints {
        PresentationHints {
            elapsed_time: self.elapsed_time,
            selected_difficulty: self.selected_difficulty.clone(),
            zoom_level: self.zoom_level,
        }
    }

    pub fn snapshot(&self) -> Result<GameSnapshot> {
        let config = GameConfig::new(self.rows, self.cols, self.mines)?.with_win_policy(self.win_policy);

        let width = self.board.first().map_or(0, Vec::len);
        if self.board.iter().any(|row| row.len() != width) {
            return Err(ProtocolError::RaggedBoard);
        }
        let cells: Vec<CellSymbol> = self.board.iter().flatten().copied().collect();
        let board = Array2::from_shape_vec((self.board.len(), width), cells)
            .map_err(|_| ProtocolError::Game(GameError::InvalidBoardShape))?;

        Ok(GameSnapshot {
            config,
            board,
            is_game_over: self.game_over,
            has_started: self.game_started,
            mines_remaining: self.mines_left.unwrap_or(self.mines),
        })
    }

    /// Rebuilds the game, with `generator` placing mines if the saved game never started.
    pub fn restore<G: MineGenerator>(&self, generator: G) -> Result<(Game<G>, PresentationHints)> {
        let game = self.snapshot()?.restore(generator)?;
        log::debug!(
            "Restored {}x{} game with {} mines, state {:?}",
            self.rows,
            self.cols,
            self.mines,
            game.state()
        );
        Ok((game, self.hints()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from<R: io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
