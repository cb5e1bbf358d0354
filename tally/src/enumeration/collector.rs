//! Commit/rollback collectors for enumeration results.
//!
//! Every engine model first lands in an uncommitted buffer. `commit` moves
//! the buffer into the result, `rollback` discards it; an aborted run
//! therefore never exposes half-processed models. The splitter additionally
//! drains the buffer as witness assignments through
//! [`EnumerationCollector::rollback_and_return_models`].

use std::collections::BTreeSet;

use malachite::base::num::arithmetic::traits::PowerOf2;
use malachite::base::num::basic::traits::{One, Zero};
use malachite::Natural;

use crate::core::{Assignment, Literal, Variable};
use crate::engine::ConstraintView;

use super::handler::IterationHandler;

/// Accumulator for projected models, parameterized over the final result
/// shape (a model list or a count).
pub trait EnumerationCollector: Sized {
    type Result;

    /// `dont_cares` are projection variables unknown to the engine, to be
    /// expanded over both values; `missing_additional` are unknown
    /// additional variables, appended as negative literals.
    fn new(
        dont_cares: BTreeSet<Variable>,
        missing_additional: BTreeSet<Variable>,
        fast_evaluable: bool,
    ) -> Self;

    /// Buffers one engine model, projected onto `relevant` indices.
    /// Returns the handler's verdict.
    fn add_model(
        &mut self,
        view: &dyn ConstraintView,
        model: &[bool],
        relevant: &[usize],
        handler: &mut dyn IterationHandler,
    ) -> bool;

    /// Moves the uncommitted buffer into the result. Returns the
    /// handler's verdict.
    fn commit(&mut self, handler: &mut dyn IterationHandler) -> bool;

    /// Discards the uncommitted buffer. Returns the handler's verdict.
    fn rollback(&mut self, handler: &mut dyn IterationHandler) -> bool;

    /// Discards the uncommitted buffer and hands it back as assignments;
    /// used by the splitter to obtain split witnesses without touching
    /// the committed result.
    fn rollback_and_return_models(
        &mut self,
        view: &dyn ConstraintView,
        handler: &mut dyn IterationHandler,
    ) -> Vec<Assignment>;

    /// The committed result. Uncommitted leftovers are dropped.
    fn into_result(self) -> Self::Result;

    /// Combines per-component results: cartesian product (or count
    /// multiplication) over `parts`, then expansion over the `free`
    /// variables and appending of `missing_additional` as negatives.
    fn join(
        parts: Vec<Self::Result>,
        free: &BTreeSet<Variable>,
        missing_additional: &BTreeSet<Variable>,
        fast_evaluable: bool,
    ) -> Self::Result;
}

/// All polarity combinations over `vars`, as literal vectors.
fn all_combinations(vars: &[Variable]) -> Vec<Vec<Literal>> {
    assert!(
        vars.len() < usize::BITS as usize,
        "cannot expand {} free variables",
        vars.len()
    );
    (0..1usize << vars.len())
        .map(|mask| {
            vars.iter()
                .enumerate()
                .map(|(i, v)| Literal::new(v.clone(), mask & (1 << i) != 0))
                .collect()
        })
        .collect()
}

/// Collects the models themselves. The uncommitted buffer holds the
/// projected literals as-is; don't-care expansion and missing-additional
/// padding happen at commit time, so split witnesses drained from the
/// buffer stay pure engine assignments while the committed result length
/// still equals the exact model count.
pub struct ModelListCollector {
    dont_cares: Vec<Variable>,
    missing_additional: Vec<Literal>,
    fast_evaluable: bool,
    committed: Vec<Assignment>,
    uncommitted: Vec<Vec<Literal>>,
}

impl EnumerationCollector for ModelListCollector {
    type Result = Vec<Assignment>;

    fn new(
        dont_cares: BTreeSet<Variable>,
        missing_additional: BTreeSet<Variable>,
        fast_evaluable: bool,
    ) -> ModelListCollector {
        ModelListCollector {
            dont_cares: dont_cares.into_iter().collect(),
            missing_additional: missing_additional.into_iter().map(|v| v.neg()).collect(),
            fast_evaluable,
            committed: Vec::new(),
            uncommitted: Vec::new(),
        }
    }

    fn add_model(
        &mut self,
        view: &dyn ConstraintView,
        model: &[bool],
        relevant: &[usize],
        handler: &mut dyn IterationHandler,
    ) -> bool {
        self.uncommitted.push(
            relevant
                .iter()
                .map(|&idx| Literal::new(view.variable_at(idx).clone(), model[idx]))
                .collect(),
        );
        handler.found_model()
    }

    fn commit(&mut self, handler: &mut dyn IterationHandler) -> bool {
        for base in std::mem::take(&mut self.uncommitted) {
            for combo in all_combinations(&self.dont_cares) {
                let literals = base
                    .iter()
                    .chain(combo.iter())
                    .chain(self.missing_additional.iter())
                    .cloned();
                self.committed
                    .push(Assignment::from_literals(literals, self.fast_evaluable));
            }
        }
        handler.committed()
    }

    fn rollback(&mut self, handler: &mut dyn IterationHandler) -> bool {
        self.uncommitted.clear();
        handler.committed()
    }

    fn rollback_and_return_models(
        &mut self,
        _view: &dyn ConstraintView,
        handler: &mut dyn IterationHandler,
    ) -> Vec<Assignment> {
        let models = std::mem::take(&mut self.uncommitted)
            .into_iter()
            .map(|literals| Assignment::from_literals(literals, self.fast_evaluable))
            .collect();
        handler.committed();
        models
    }

    fn into_result(self) -> Vec<Assignment> {
        self.committed
    }

    fn join(
        parts: Vec<Vec<Assignment>>,
        free: &BTreeSet<Variable>,
        missing_additional: &BTreeSet<Variable>,
        fast_evaluable: bool,
    ) -> Vec<Assignment> {
        let mut joined = vec![Assignment::new()];
        for part in &parts {
            if part.is_empty() {
                return Vec::new();
            }
            joined = joined
                .iter()
                .flat_map(|left| part.iter().map(|right| left.union(right)))
                .collect();
        }
        let free: Vec<Variable> = free.iter().cloned().collect();
        let negatives: Vec<Literal> = missing_additional.iter().map(|v| v.neg()).collect();
        let combos = all_combinations(&free);
        let mut result = Vec::with_capacity(joined.len() * combos.len());
        for combo in combos {
            for model in &joined {
                let literals = model
                    .literals()
                    .iter()
                    .chain(combo.iter())
                    .chain(negatives.iter())
                    .cloned();
                result.push(Assignment::from_literals(literals, fast_evaluable));
            }
        }
        result
    }
}

/// Counts models without materializing them. Uncommitted models are kept
/// as raw projected index/value pairs so that split witnesses can still be
/// handed back; commits collapse the buffer into a number.
pub struct ModelCountCollector {
    /// Multiplier per engine model: `2^|dont_cares|`.
    factor: Natural,
    committed: Natural,
    uncommitted: Vec<Vec<(usize, bool)>>,
}

impl EnumerationCollector for ModelCountCollector {
    type Result = Natural;

    fn new(
        dont_cares: BTreeSet<Variable>,
        _missing_additional: BTreeSet<Variable>,
        _fast_evaluable: bool,
    ) -> ModelCountCollector {
        ModelCountCollector {
            factor: Natural::power_of_2(dont_cares.len() as u64),
            committed: Natural::ZERO,
            uncommitted: Vec::new(),
        }
    }

    fn add_model(
        &mut self,
        _view: &dyn ConstraintView,
        model: &[bool],
        relevant: &[usize],
        handler: &mut dyn IterationHandler,
    ) -> bool {
        self.uncommitted
            .push(relevant.iter().map(|&idx| (idx, model[idx])).collect());
        handler.found_model()
    }

    fn commit(&mut self, handler: &mut dyn IterationHandler) -> bool {
        self.committed += Natural::from(self.uncommitted.len()) * &self.factor;
        self.uncommitted.clear();
        handler.committed()
    }

    fn rollback(&mut self, handler: &mut dyn IterationHandler) -> bool {
        self.uncommitted.clear();
        handler.committed()
    }

    fn rollback_and_return_models(
        &mut self,
        view: &dyn ConstraintView,
        handler: &mut dyn IterationHandler,
    ) -> Vec<Assignment> {
        let raw = std::mem::take(&mut self.uncommitted);
        let models = raw
            .into_iter()
            .map(|pairs| {
                let literals = pairs
                    .into_iter()
                    .map(|(idx, value)| Literal::new(view.variable_at(idx).clone(), value));
                Assignment::from_literals(literals, false)
            })
            .collect();
        handler.committed();
        models
    }

    fn into_result(self) -> Natural {
        self.committed
    }

    fn join(
        parts: Vec<Natural>,
        free: &BTreeSet<Variable>,
        _missing_additional: &BTreeSet<Variable>,
        _fast_evaluable: bool,
    ) -> Natural {
        let mut total = Natural::ONE;
        for part in parts {
            total *= part;
        }
        total * Natural::power_of_2(free.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumeration::handler::NoAbort;

    use crate::engine::dpll::DpllEngine;

    fn vars(names: &[&str]) -> BTreeSet<Variable> {
        names.iter().map(|name| Variable::from(*name)).collect()
    }

    #[test]
    fn count_collector_applies_the_dont_care_factor() {
        let mut e = DpllEngine::new();
        let a = e.var("a");
        let mut c = ModelCountCollector::new(vars(&["x", "y"]), BTreeSet::new(), false);
        let mut h = NoAbort;
        assert!(c.add_model(&e, &[true], &[a], &mut h));
        assert!(c.add_model(&e, &[false], &[a], &mut h));
        assert!(c.commit(&mut h));
        assert_eq!(c.into_result(), Natural::from(8u32));
    }

    #[test]
    fn rollback_discards_uncommitted_models() {
        let mut e = DpllEngine::new();
        let a = e.var("a");
        let mut c = ModelCountCollector::new(BTreeSet::new(), BTreeSet::new(), false);
        let mut h = NoAbort;
        c.add_model(&e, &[true], &[a], &mut h);
        c.commit(&mut h);
        c.add_model(&e, &[false], &[a], &mut h);
        c.rollback(&mut h);
        assert_eq!(c.into_result(), Natural::ONE);
    }

    #[test]
    fn list_collector_expands_dont_cares_per_model() {
        let mut e = DpllEngine::new();
        let a = e.var("a");
        let mut c = ModelListCollector::new(vars(&["x"]), vars(&["extra"]), false);
        let mut h = NoAbort;
        c.add_model(&e, &[true], &[a], &mut h);
        c.commit(&mut h);
        let models = c.into_result();
        assert_eq!(models.len(), 2);
        for m in &models {
            assert_eq!(m.value_of(&Variable::new("a")), Some(true));
            assert_eq!(m.value_of(&Variable::new("extra")), Some(false));
            assert!(m.value_of(&Variable::new("x")).is_some());
        }
    }

    #[test]
    fn list_join_is_a_cartesian_product() {
        let left = vec![
            Assignment::from_literals([Variable::new("a").pos()], false),
            Assignment::from_literals([Variable::new("a").neg()], false),
        ];
        let right = vec![Assignment::from_literals([Variable::new("b").pos()], false)];
        let joined = ModelListCollector::join(
            vec![left, right],
            &vars(&["f"]),
            &BTreeSet::new(),
            false,
        );
        assert_eq!(joined.len(), 4);
    }

    #[test]
    fn count_join_multiplies_and_expands_free_variables() {
        let total = ModelCountCollector::join(
            vec![Natural::from(3u32), Natural::from(2u32)],
            &vars(&["f", "g"]),
            &BTreeSet::new(),
            false,
        );
        assert_eq!(total, Natural::from(24u32));
    }
}
