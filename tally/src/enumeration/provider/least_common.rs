use std::collections::{BTreeMap, BTreeSet};

use crate::core::Variable;
use crate::engine::ConstraintView;

use super::{SplitBounds, SplitVariableProvider};

/// Splits on the candidates occurring least often in the constraints
/// currently on the engine. Rarely-occurring variables constrain little,
/// so fixing them tends to divide the model set evenly.
#[derive(Clone)]
pub struct LeastCommonSplitProvider {
    bounds: SplitBounds,
}

impl LeastCommonSplitProvider {
    pub fn new() -> LeastCommonSplitProvider {
        LeastCommonSplitProvider::with_bounds(SplitBounds::default())
    }

    pub fn with_bounds(bounds: SplitBounds) -> LeastCommonSplitProvider {
        LeastCommonSplitProvider { bounds }
    }
}

impl Default for LeastCommonSplitProvider {
    fn default() -> LeastCommonSplitProvider {
        LeastCommonSplitProvider::new()
    }
}

impl SplitVariableProvider for LeastCommonSplitProvider {
    fn split_variables(
        &mut self,
        constraints: &dyn ConstraintView,
        candidates: &BTreeSet<Variable>,
    ) -> BTreeSet<Variable> {
        if self.bounds.too_small(candidates) {
            return BTreeSet::new();
        }
        let mut counts: BTreeMap<Variable, usize> = BTreeMap::new();
        constraints.for_each_constraint(&mut |clause| {
            for lit in clause {
                let var = constraints.variable_at(lit.index);
                if candidates.contains(var) {
                    *counts.entry(var.clone()).or_insert(0) += 1;
                }
            }
        });
        // no occurrence data, nothing sensible to split on
        if counts.is_empty() {
            return BTreeSet::new();
        }

        let mut buckets: BTreeMap<usize, BTreeSet<Variable>> = BTreeMap::new();
        for (var, count) in counts {
            buckets.entry(count).or_default().insert(var);
        }

        let min = self.bounds.min_split_vars(candidates.len());
        let max = self.bounds.max_split_vars(candidates.len());
        let mut split = BTreeSet::new();
        for (_, bucket) in buckets {
            if split.len() >= min {
                break;
            }
            if split.len() + bucket.len() <= max {
                split.extend(bucket);
            } else {
                // take just enough of the bucket, in name order
                let need = min - split.len();
                split.extend(bucket.into_iter().take(need));
                break;
            }
        }
        split
    }

    fn clone_box(&self) -> Box<dyn SplitVariableProvider> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dpll::DpllEngine;
    use crate::engine::SatEngine;

    #[test]
    fn prefers_rare_variables() {
        let mut e = DpllEngine::new();
        // a..h occur once, the rest occur in every clause
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for name in names {
            e.add(&[(name, true), ("x", true), ("y", true), ("z", true), ("w", true)]);
        }
        let candidates = e.known_variables();
        let mut p = LeastCommonSplitProvider::with_bounds(SplitBounds {
            min_candidates: 4,
            ..SplitBounds::default()
        });
        let split = p.split_variables(&e, &candidates);
        // 12 candidates, lower bound 50% -> at least 6, all from the rare bucket
        assert_eq!(split.len(), 6);
        assert!(split.iter().all(|v| names.contains(&v.name())));
    }

    #[test]
    fn no_constraints_means_no_split() {
        let mut e = DpllEngine::new();
        for i in 0..20 {
            e.var(&format!("v{i}"));
        }
        let candidates = e.known_variables();
        let mut p = LeastCommonSplitProvider::new();
        assert!(p.split_variables(&e, &candidates).is_empty());
    }
}
