use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::Variable;
use crate::engine::ConstraintView;

use super::{SplitBounds, SplitVariableProvider};

/// Splits on a random subset of the candidates of size
/// `ceil(lower_bound%)`, drawn from a seeded generator.
pub struct RandomSplitProvider {
    seed: u64,
    bounds: SplitBounds,
    rng: SmallRng,
}

impl RandomSplitProvider {
    pub fn new(seed: u64) -> RandomSplitProvider {
        RandomSplitProvider::with_bounds(seed, SplitBounds::default())
    }

    pub fn with_bounds(seed: u64, bounds: SplitBounds) -> RandomSplitProvider {
        RandomSplitProvider {
            seed,
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl SplitVariableProvider for RandomSplitProvider {
    fn split_variables(
        &mut self,
        _constraints: &dyn ConstraintView,
        candidates: &BTreeSet<Variable>,
    ) -> BTreeSet<Variable> {
        if self.bounds.too_small(candidates) {
            return BTreeSet::new();
        }
        let mut vars: Vec<Variable> = candidates.iter().cloned().collect();
        vars.shuffle(&mut self.rng);
        vars.truncate(self.bounds.min_split_vars(candidates.len()));
        vars.into_iter().collect()
    }

    fn clone_box(&self) -> Box<dyn SplitVariableProvider> {
        // reset the generator so every run draws the same sequence
        Box::new(RandomSplitProvider::with_bounds(self.seed, self.bounds))
    }
}
