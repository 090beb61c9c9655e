use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// Fresh layout for one of the preset tiers.
pub fn generate_board(difficulty: Difficulty, seed: u64) -> Result<MineLayout> {
    RandomMinefieldGenerator::new(seed).generate(difficulty.config())
}
