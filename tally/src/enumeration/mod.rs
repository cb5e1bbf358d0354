//! Projected model enumeration and exact model counting.
//!
//! [`enumerate_models`] materializes every model of the engine's
//! constraints projected onto a variable set; [`count_models`] computes
//! the exact count without materializing. Both share one pipeline:
//! optional component decomposition, optional provider-driven search-space
//! splitting, a blocking-clause loop at the bottom, and a commit/rollback
//! collector that keeps partial results consistent under cancellation.

use std::collections::BTreeSet;
use std::fmt;

use malachite::Natural;
use tracing::debug;

use crate::core::{Assignment, Variable};
use crate::engine::{is_auxiliary, EngineError, SatEngine, SolveOutcome};

mod collector;
mod components;
mod config;
mod core;
mod handler;
mod provider;
mod splitter;

pub use collector::{EnumerationCollector, ModelCountCollector, ModelListCollector};
pub use config::{ConfigError, IterationConfig};
pub use handler::{IterationHandler, ModelLimit, NoAbort};
pub use provider::{
    FixedSplitProvider, LeastCommonSplitProvider, RandomSplitProvider, SplitBounds,
    SplitVariableProvider,
};

use self::core::Step;

/// Failure of an enumeration or counting run. Cancellation is *not* an
/// error; a cancelled run returns its committed partial result.
#[derive(Debug)]
pub enum IterationError {
    Config(ConfigError),
    Engine(EngineError),
}

impl fmt::Display for IterationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterationError::Config(e) => write!(f, "invalid configuration: {e}"),
            IterationError::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IterationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IterationError::Config(e) => Some(e),
            IterationError::Engine(e) => Some(e),
        }
    }
}

impl From<ConfigError> for IterationError {
    fn from(e: ConfigError) -> IterationError {
        IterationError::Config(e)
    }
}

impl From<EngineError> for IterationError {
    fn from(e: EngineError) -> IterationError {
        IterationError::Engine(e)
    }
}

/// Enumerates all models of the engine's constraints projected onto the
/// configured variables. On incremental engines no clause added during the
/// run survives it.
pub fn enumerate_models<E: SatEngine>(
    engine: &mut E,
    config: &IterationConfig,
    handler: &mut dyn IterationHandler,
) -> Result<Vec<Assignment>, IterationError> {
    run::<E, ModelListCollector>(engine, config, handler)
}

/// Counts the models of the engine's constraints projected onto the
/// configured variables, without materializing them. Always equals the
/// length of the list [`enumerate_models`] would return.
pub fn count_models<E: SatEngine>(
    engine: &mut E,
    config: &IterationConfig,
    handler: &mut dyn IterationHandler,
) -> Result<Natural, IterationError> {
    run::<E, ModelCountCollector>(engine, config, handler)
}

fn run<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    handler: &mut dyn IterationHandler,
) -> Result<C::Result, IterationError> {
    config.validate()?;
    let known = engine.known_variables();

    let projection: BTreeSet<Variable> = match &config.variables {
        Some(vars) => vars.clone(),
        None => known.iter().filter(|v| !is_auxiliary(v.name())).cloned().collect(),
    };
    // auxiliary variables never make it into a projection
    let projection_known: BTreeSet<Variable> = projection
        .iter()
        .filter(|v| known.contains(*v) && !is_auxiliary(v.name()))
        .cloned()
        .collect();
    let dont_cares: BTreeSet<Variable> = projection
        .iter()
        .filter(|v| !known.contains(*v))
        .cloned()
        .collect();

    let additional: BTreeSet<Variable> = config
        .additional_variables
        .difference(&projection)
        .cloned()
        .collect();
    let additional_known: BTreeSet<Variable> =
        additional.iter().filter(|v| known.contains(*v)).cloned().collect();
    let missing_additional: BTreeSet<Variable> = additional
        .iter()
        .filter(|v| !known.contains(*v))
        .cloned()
        .collect();
    debug!(
        projection = projection_known.len(),
        dont_cares = dont_cares.len(),
        additional = additional_known.len(),
        "starting model iteration"
    );

    if config.compute_with_components && known.len() >= config.component_threshold {
        return run_with_components::<E, C>(
            engine,
            config,
            handler,
            &projection_known,
            &dont_cares,
            &additional_known,
            &missing_additional,
        );
    }

    let mut collector = C::new(dont_cares, missing_additional, config.fast_evaluable);
    iterate_set(
        engine,
        config,
        &projection_known,
        &additional_known,
        &mut collector,
        handler,
    )?;
    Ok(collector.into_result())
}

/// Per-component enumeration joined by cartesian product or count
/// multiplication. Variables in no constraint are free: they are expanded
/// (projection) or appended as negatives (additional) at the join.
fn run_with_components<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    handler: &mut dyn IterationHandler,
    projection_known: &BTreeSet<Variable>,
    dont_cares: &BTreeSet<Variable>,
    additional_known: &BTreeSet<Variable>,
    missing_additional: &BTreeSet<Variable>,
) -> Result<C::Result, IterationError> {
    let empty = || C::new(BTreeSet::new(), BTreeSet::new(), config.fast_evaluable).into_result();

    // a conflict living in no component, such as an empty clause, would
    // otherwise be missed by the per-component runs
    match engine.solve(&mut || handler.stop_solve()).map_err(IterationError::from)? {
        SolveOutcome::Sat => {}
        SolveOutcome::Unsat | SolveOutcome::Canceled => return Ok(empty()),
    }

    let interest: BTreeSet<Variable> =
        projection_known.union(additional_known).cloned().collect();
    let decomposition = components::decompose(engine, &interest);

    let mut parts: Vec<C::Result> = Vec::with_capacity(decomposition.components.len());
    for component in &decomposition.components {
        let comp_projection: BTreeSet<Variable> =
            component.intersection(projection_known).cloned().collect();
        let comp_additional: BTreeSet<Variable> =
            component.intersection(additional_known).cloned().collect();
        let mut collector = C::new(BTreeSet::new(), BTreeSet::new(), config.fast_evaluable);
        let step = iterate_set(
            engine,
            config,
            &comp_projection,
            &comp_additional,
            &mut collector,
            handler,
        )?;
        if step == Step::Abort {
            // a partially processed component cannot be joined soundly
            return Ok(empty());
        }
        parts.push(collector.into_result());
    }

    let free: BTreeSet<Variable> = decomposition
        .leftover
        .intersection(projection_known)
        .chain(dont_cares.iter())
        .cloned()
        .collect();
    let negatives: BTreeSet<Variable> = decomposition
        .leftover
        .intersection(additional_known)
        .chain(missing_additional.iter())
        .cloned()
        .collect();
    Ok(C::join(parts, &free, &negatives, config.fast_evaluable))
}

/// Dispatches one variable set to split-driven or direct enumeration. The
/// provider is cloned per pass so its randomness restarts from the seed.
fn iterate_set<E: SatEngine, C: EnumerationCollector>(
    engine: &mut E,
    config: &IterationConfig,
    variables: &BTreeSet<Variable>,
    additional: &BTreeSet<Variable>,
    collector: &mut C,
    handler: &mut dyn IterationHandler,
) -> Result<Step, IterationError> {
    match &config.split_provider {
        Some(provider) => {
            let mut provider = provider.clone_box();
            splitter::split_enumeration(
                engine,
                config,
                provider.as_mut(),
                variables,
                additional,
                collector,
                handler,
            )
        }
        None => core::enumerate_and_commit(
            engine,
            variables,
            additional,
            collector,
            handler,
            config.max_models,
        ),
    }
}
