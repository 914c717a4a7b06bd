use serde::{Deserialize, Serialize};

/// Full state of one board position, as owned by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) is_revealed: bool,
    pub(crate) is_flagged: bool,
    pub(crate) neighbor_mines: u8,
    pub(crate) was_blasted: bool,
    pub(crate) was_falsely_flagged: bool,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    /// Mines among the adjacent cells. Not meaningful for mine cells.
    pub const fn neighbor_mines(&self) -> u8 {
        self.neighbor_mines
    }

    /// Whether this is the mine whose reveal ended the game.
    pub const fn was_blasted(&self) -> bool {
        self.was_blasted
    }

    /// Whether this cell was flagged without holding a mine when the game was lost.
    pub const fn was_falsely_flagged(&self) -> bool {
        self.was_falsely_flagged
    }

    /// Hidden and unflagged, i.e. still a candidate for reveal.
    pub const fn is_covered(&self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub const fn view(&self) -> CellView {
        use CellView::*;

        if self.is_mine {
            if self.was_blasted {
                Blasted
            } else if self.is_flagged {
                Flagged
            } else if self.is_revealed {
                Mine
            } else {
                Hidden
            }
        } else if self.was_falsely_flagged {
            FalseFlag
        } else if self.is_flagged {
            Flagged
        } else if self.is_revealed {
            Revealed(self.neighbor_mines)
        } else {
            Hidden
        }
    }
}

/// What a front end should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine uncovered when the game was lost.
    Mine,
    /// The mine that was clicked.
    Blasted,
    /// A flag that turned out to cover a safe cell.
    FalseFlag,
}

impl CellView {
    /// Whether the cell is visually closed.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::FalseFlag)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
