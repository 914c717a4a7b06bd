use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement over every cell except the first revealed one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: &GameConfig, safe: Coord2) -> Result<MineLayout> {
        config.validate()?;
        let safe = config.validate_coords(safe)?;

        let mut candidates: Vec<Coord2> = iter_coords(config.size())
            .filter(|&coords| coords != safe)
            .collect();
        let mines = usize::from(config.mines());

        // partial Fisher-Yates: the first `mines` slots end up a uniform sample
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..mines {
            let j = rng.random_range(i..candidates.len());
            candidates.swap(i, j);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &coords in &candidates[..mines] {
            mine_mask[coords.to_nd_index()] = true;
        }

        log::debug!(
            "Placed {} mines with seed {}, keeping {:?} safe",
            mines,
            self.seed,
            safe
        );
        Ok(MineLayout::from_mine_mask(mine_mask))
    }
}
