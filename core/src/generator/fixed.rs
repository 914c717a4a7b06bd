use alloc::vec::Vec;

use super::*;

/// Places mines at exactly the given positions. Used to replay known boards and in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, config: &GameConfig, safe: Coord2) -> Result<MineLayout> {
        let layout = MineLayout::from_mine_coords(config.size(), &self.mines)?;
        if layout.contains_mine(safe) {
            return Err(GameError::UnsafeStart);
        }
        if layout.mine_count() != config.mines() {
            return Err(GameError::MineCountMismatch);
        }
        Ok(layout)
    }
}
