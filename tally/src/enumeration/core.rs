//! The blocking-clause enumeration loop.
//!
//! Repeatedly solves, hands the model to the collector, then asserts a
//! clause negating the model's projection so the next solve finds a
//! different one. Projection indices not in the blocking clause never
//! shrink the model set, so the loop enumerates exactly the distinct
//! projected models. On incremental engines the whole loop runs inside a
//! private snapshot, so the blocking clauses do not outlive the call.

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::trace;

use crate::core::Variable;
use crate::engine::{RawLit, SatEngine, SolveOutcome};

use super::collector::EnumerationCollector;
use super::handler::IterationHandler;
use super::IterationError;

/// Continue/abort verdict of an enumeration pass. An abort is not an
/// error: the committed part of the collector is still valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Abort,
}

/// Runs the blocking-clause loop over `variables`, buffering every model
/// in the collector. `commit_every` is the commit cadence; `None` leaves
/// all models uncommitted (the splitter drains them as witnesses).
pub(crate) fn enumerate<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
    commit_every: Option<usize>,
) -> Result<Step, IterationError> {
    let snapshot = engine.is_incremental().then(|| engine.save_state());
    let result = blocking_loop(engine, variables, additional, collector, handler, commit_every);
    if let Some(handle) = snapshot {
        engine.restore_state(handle);
    }
    result
}

fn blocking_loop<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
    commit_every: Option<usize>,
) -> Result<Step, IterationError> {
    // blocking runs over the projection; additional variables are only
    // reported, never blocked on
    let relevant: Vec<usize> = variables
        .iter()
        .filter_map(|v| engine.index_of(v.name()))
        .sorted()
        .dedup()
        .collect();
    let relevant_all: Vec<usize> = relevant
        .iter()
        .copied()
        .chain(additional.iter().filter_map(|v| engine.index_of(v.name())))
        .sorted()
        .dedup()
        .collect();

    let mut since_commit = 0usize;
    loop {
        match engine.solve(&mut || handler.stop_solve())? {
            SolveOutcome::Unsat => return Ok(Step::Continue),
            SolveOutcome::Canceled => return Ok(Step::Abort),
            SolveOutcome::Sat => {}
        }
        let model = engine.model();
        let blocking: Vec<RawLit> = relevant
            .iter()
            .map(|&idx| RawLit::new(idx, !model[idx]))
            .collect();
        trace!(?blocking, "model found");
        if !collector.add_model(&*engine, model, &relevant_all, handler) {
            return Ok(Step::Abort);
        }
        // an empty projection admits a single projected model
        if blocking.is_empty() {
            return Ok(Step::Continue);
        }
        engine.add_clause(&blocking)?;
        if let Some(every) = commit_every {
            since_commit += 1;
            if since_commit >= every {
                if !collector.commit(handler) {
                    return Ok(Step::Abort);
                }
                since_commit = 0;
            }
        }
    }
}

/// Direct enumeration followed by a final commit, with abort handling:
/// aborted passes roll their uncommitted models back.
pub(crate) fn enumerate_and_commit<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
    commit_every: usize,
) -> Result<Step, IterationError> {
    match enumerate(engine, variables, additional, collector, handler, Some(commit_every))? {
        Step::Abort => {
            collector.rollback(handler);
            Ok(Step::Abort)
        }
        Step::Continue => {
            if collector.commit(handler) {
                Ok(Step::Continue)
            } else {
                Ok(Step::Abort)
            }
        }
    }
}
