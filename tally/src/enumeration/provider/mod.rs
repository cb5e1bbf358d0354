//! Split variable selection strategies.
//!
//! A provider picks, from the candidate projection variables, the subset
//! the splitter branches on. Strategies are pluggable through
//! [`SplitVariableProvider`]; three are built in: a fixed user-chosen set
//! ([`FixedSplitProvider`]), a seeded random selection
//! ([`RandomSplitProvider`]) and a selection preferring variables with few
//! constraint occurrences ([`LeastCommonSplitProvider`]).

use std::collections::BTreeSet;

use crate::core::Variable;
use crate::engine::ConstraintView;

mod fixed;
mod least_common;
mod random;

pub use fixed::FixedSplitProvider;
pub use least_common::LeastCommonSplitProvider;
pub use random::RandomSplitProvider;

/// Strategy choosing the variables to split the search space on.
pub trait SplitVariableProvider {
    /// Picks split variables among `candidates`, consulting the
    /// constraints currently on the engine. An empty result means the
    /// input is not worth splitting and enumeration runs directly.
    fn split_variables(
        &mut self,
        constraints: &dyn ConstraintView,
        candidates: &BTreeSet<Variable>,
    ) -> BTreeSet<Variable>;

    /// Fresh clone with any internal randomness reset to its seed, so
    /// that repeated runs of the same configuration are reproducible.
    fn clone_box(&self) -> Box<dyn SplitVariableProvider>;
}

impl Clone for Box<dyn SplitVariableProvider> {
    fn clone(&self) -> Box<dyn SplitVariableProvider> {
        self.clone_box()
    }
}

/// Size bounds shared by the selecting providers.
///
/// `lower_bound` and `upper_bound` are percentages of the candidate count:
/// a provider aims for at least `ceil(lower_bound%)` and at most
/// `floor(upper_bound%)` split variables. Candidate sets smaller than
/// `min_candidates` are not split at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitBounds {
    pub min_candidates: usize,
    pub lower_bound: u32,
    pub upper_bound: u32,
}

impl Default for SplitBounds {
    fn default() -> SplitBounds {
        SplitBounds {
            min_candidates: 12,
            lower_bound: 50,
            upper_bound: 65,
        }
    }
}

impl SplitBounds {
    fn too_small(&self, candidates: &BTreeSet<Variable>) -> bool {
        candidates.len() < self.min_candidates
    }

    /// Minimum split set size for `n` candidates.
    fn min_split_vars(&self, n: usize) -> usize {
        (self.lower_bound as usize * n).div_ceil(100)
    }

    /// Maximum split set size for `n` candidates.
    fn max_split_vars(&self, n: usize) -> usize {
        self.upper_bound as usize * n / 100
    }
}
