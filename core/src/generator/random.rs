use alloc::vec::Vec;

use super::*;

/// Uniform bomb placement: every choice of `total_bombs` positions out of
/// `total_boxes` is equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        let config = config.validate()?;
        let total = usize::from(config.total_boxes);
        let bombs = usize::from(config.total_bombs);

        let mut contents = Vec::with_capacity(total);
        contents.resize(total, BoxContent::Confetti);

        // partial Fisher-Yates, only the first `bombs` slots of the permutation matter
        let mut positions: Vec<usize> = (0..total).collect();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..bombs {
            let pick = rng.random_range(i..total);
            positions.swap(i, pick);
            contents[positions[i]] = BoxContent::Bomb;
        }

        // double check bomb count
        let count = contents.iter().filter(|content| content.is_bomb()).count();
        if count != bombs {
            log::warn!(
                "Generated board bomb count mismatch, actual: {}, requested: {}",
                count,
                bombs
            );
        }

        Ok(Board::from_contents_unchecked(contents, count as BoxCount))
    }
}
