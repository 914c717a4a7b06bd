use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of mine placements, consulted once per game on the first reveal.
pub trait MineGenerator {
    /// Produces exactly `config.mines()` mines, none of them at `safe`.
    fn generate(&mut self, config: &GameConfig, safe: Coord2) -> Result<MineLayout>;
}

impl<G: MineGenerator + ?Sized> MineGenerator for &mut G {
    fn generate(&mut self, config: &GameConfig, safe: Coord2) -> Result<MineLayout> {
        (**self).generate(config, safe)
    }
}
