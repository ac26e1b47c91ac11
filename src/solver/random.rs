use super::board::SolverBoard;
use super::{Action, Strategy};
use crate::Cell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Baseline that clicks a uniformly random cell, revealed or not. It can
/// never win (it never flags) and eventually clicks a mine.
///
/// A comparison fixture, not a member of the strategy pipeline: unlike real
/// strategies it deliberately ignores the no-revealed-targets rule, modeling
/// a clueless player.
pub struct RandomClicker {
    rng: StdRng,
}

impl RandomClicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomClicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomClicker {
    fn name(&self) -> &str {
        "random-clicker"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        let (height, width) = board.dimensions();
        Action::Click(Cell::new(
            self.rng.gen_range(0..height),
            self.rng.gen_range(0..width),
        ))
    }
}

/// Baseline that flags a uniformly random cell; eventually exceeds the mine
/// count and loses.
pub struct RandomFlagger {
    rng: StdRng,
}

impl RandomFlagger {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomFlagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomFlagger {
    fn name(&self) -> &str {
        "random-flagger"
    }

    fn next_action(&mut self, board: &SolverBoard) -> Action {
        let (height, width) = board.dimensions();
        Action::Flag(Cell::new(
            self.rng.gen_range(0..height),
            self.rng.gen_range(0..width),
        ))
    }
}
