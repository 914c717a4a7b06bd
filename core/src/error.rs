use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines, at least one cell must stay free")]
    TooManyMines,
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Custom {field} must be between {min} and {max}")]
    CustomOutOfRange {
        field: &'static str,
        min: u16,
        max: u16,
    },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Mine count on the board does not match the configuration")]
    MineCountMismatch,
    #[error("Mine layout places a mine on the first revealed cell")]
    UnsafeStart,
    #[error("Unknown cell symbol")]
    InvalidSymbol,
    #[error("Saved game state does not match its board")]
    InconsistentState,
}

pub type Result<T> = core::result::Result<T, GameError>;
