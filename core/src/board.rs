use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Row-major grid of [`Cell`]s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub(crate) fn from_cells(cells: Array2<Cell>) -> Self {
        let mut board = Self { cells };
        board.recompute_neighbor_counts();
        board
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_mines(&self) -> CellCount {
        self.count_where(Cell::is_mine)
    }

    pub fn count_flagged(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    /// Whether every cell without a mine has been revealed.
    pub fn all_safe_revealed(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_mine || cell.is_revealed)
    }

    pub(crate) fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged)
            .count() as u8
    }

    /// Marks every mine of `layout` on the board and refreshes the counts.
    pub(crate) fn place_mines(&mut self, layout: &MineLayout) {
        for (pos, cell) in self.cells.indexed_iter_mut() {
            cell.is_mine = layout[(pos.0 as Coord, pos.1 as Coord)];
        }
        self.recompute_neighbor_counts();
    }

    /// Sets each non-mine cell's count to the mines among its neighbors.
    pub fn recompute_neighbor_counts(&mut self) {
        for coords in iter_coords(self.size()) {
            let count = if self[coords].is_mine {
                0
            } else {
                self.iter_neighbors(coords)
                    .filter(|&pos| self[pos].is_mine)
                    .count() as u8
            };
            self[coords].neighbor_mines = count;
        }
    }

    fn count_where(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&cell| predicate(cell)).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
