//! Recursive search-space splitting.
//!
//! The provider picks a split set; the splitter enumerates all assignments
//! of that set (the *split assignments*), then enumerates the full
//! projection once per split assignment with the assignment asserted as
//! unit clauses. Large split assignments are split again on the leftover
//! candidates with a seeded random provider, up to a configured depth.
//! Every branch runs between a snapshot and a restore, so branches never
//! observe each other's clauses.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::{Assignment, Variable};
use crate::engine::{RawLit, SatEngine, StateHandle};

use super::collector::EnumerationCollector;
use super::config::IterationConfig;
use super::core::{self, Step};
use super::handler::IterationHandler;
use super::provider::{RandomSplitProvider, SplitBounds, SplitVariableProvider};
use super::IterationError;

/// Provider used on the nested levels, over the leftover candidates.
fn nested_provider() -> RandomSplitProvider {
    RandomSplitProvider::with_bounds(
        1,
        SplitBounds {
            min_candidates: 5,
            lower_bound: 50,
            upper_bound: 100,
        },
    )
}

/// Split-driven enumeration over `variables`. Falls back to direct
/// enumeration when the provider declines to split.
pub(crate) fn split_enumeration<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    provider: &mut dyn SplitVariableProvider,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
) -> Result<Step, IterationError> {
    let split_vars = provider.split_variables(&*engine, variables);
    if split_vars.is_empty() {
        return core::enumerate_and_commit(
            engine,
            variables,
            additional,
            collector,
            handler,
            config.max_models,
        );
    }
    debug!(split = split_vars.len(), of = variables.len(), "splitting");
    let outer = engine.save_state();
    let result = split_loop(
        engine, config, variables, additional, &split_vars, collector, handler, outer,
    );
    // sweeps every frame a branch may have left behind
    engine.restore_state(outer);
    result
}

#[allow(clippy::too_many_arguments)]
fn split_loop<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    split_vars: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
    outer: StateHandle,
) -> Result<Step, IterationError> {
    // witness pass: all assignments of the split set, kept uncommitted
    let step = core::enumerate(engine, split_vars, &BTreeSet::new(), collector, handler, None)?;
    if step == Step::Abort {
        collector.rollback(handler);
        return Ok(Step::Abort);
    }
    let split_assignments = collector.rollback_and_return_models(&*engine, handler);

    for sa in &split_assignments {
        engine.restore_state(outer);
        let step = if sa.len() >= config.split_recursion_threshold {
            let remaining: BTreeSet<Variable> =
                variables.difference(split_vars).cloned().collect();
            split_branch(
                engine, config, variables, additional, &remaining, sa, 1, collector, handler,
            )?
        } else {
            assert_assignment(engine, sa)?;
            core::enumerate_and_commit(
                engine,
                variables,
                additional,
                collector,
                handler,
                config.max_models,
            )?
        };
        if step == Step::Abort {
            return Ok(Step::Abort);
        }
    }
    Ok(Step::Continue)
}

/// One nested branch: asserts the split assignment, then either splits
/// again over `candidates` or enumerates directly.
#[allow(clippy::too_many_arguments)]
fn split_branch<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    candidates: &BTreeSet<Variable>,
    assignment: &Assignment,
    depth: u32,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
) -> Result<Step, IterationError> {
    assert_assignment(engine, assignment)?;

    let split_vars = if depth >= config.max_split_depth {
        BTreeSet::new()
    } else {
        nested_provider().split_variables(&*engine, candidates)
    };
    // splitting must shrink the candidate set, otherwise recursion stalls
    if split_vars.is_empty() || split_vars.len() >= candidates.len() {
        return core::enumerate_and_commit(
            engine,
            variables,
            additional,
            collector,
            handler,
            config.max_models,
        );
    }

    let inner = engine.save_state();
    let step = core::enumerate(engine, &split_vars, &BTreeSet::new(), collector, handler, None)?;
    if step == Step::Abort {
        collector.rollback(handler);
        return Ok(Step::Abort);
    }
    let split_assignments = collector.rollback_and_return_models(&*engine, handler);
    let remaining: BTreeSet<Variable> = candidates.difference(&split_vars).cloned().collect();

    for sa in &split_assignments {
        engine.restore_state(inner);
        let step = if sa.len() > config.split_again_threshold {
            split_branch(
                engine,
                config,
                variables,
                additional,
                &remaining,
                sa,
                depth + 1,
                collector,
                handler,
            )?
        } else {
            assert_assignment(engine, sa)?;
            core::enumerate_and_commit(
                engine,
                variables,
                additional,
                collector,
                handler,
                config.max_models,
            )?
        };
        if step == Step::Abort {
            return Ok(Step::Abort);
        }
    }
    Ok(Step::Continue)
}

/// Asserts every literal of `assignment` as a unit clause.
fn assert_assignment<E: SatEngine>(
    engine: &mut E,
    assignment: &Assignment,
) -> Result<(), IterationError> {
    for lit in assignment.literals() {
        if let Some(idx) = engine.index_of(lit.variable().name()) {
            engine.add_clause(&[RawLit::new(idx, lit.phase())])?;
        }
    }
    Ok(())
}
