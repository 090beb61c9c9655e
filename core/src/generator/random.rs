use super::*;

/// Places mines one at a time at uniformly random coordinates, re-rolling picks that land on a
/// cell that already has one.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        let total_cells = config.total_cells();
        let mut layout = MineLayout::new(config.size)?;

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::full(config.size);
        }

        let (size_x, size_y, size_z) = config.size;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut rerolls: u64 = 0;
        while layout.mine_count() < config.mines {
            let coords = (
                rng.random_range(0..size_x),
                rng.random_range(0..size_y),
                rng.random_range(0..size_z),
            );
            if !layout.add_mine(coords) {
                rerolls += 1;
            }
        }

        log::debug!(
            "Generated {:?} minefield with {} mines, {} re-rolls",
            config.size,
            layout.mine_count(),
            rerolls
        );
        Ok(layout)
    }
}
