//! Per-run configuration of enumeration and counting.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::Variable;

use super::provider::SplitVariableProvider;

/// Configuration record for a single enumeration or counting run.
///
/// The defaults enumerate over all non-auxiliary variables the engine
/// knows, without splitting and without component decomposition, and
/// commit collected models in batches of 1000.
#[derive(Clone)]
pub struct IterationConfig {
    /// Projection target. `None` projects onto every non-auxiliary
    /// variable known to the engine. Requested variables the engine does
    /// not know become don't-cares and are expanded over both values.
    pub variables: Option<BTreeSet<Variable>>,
    /// Variables reported alongside each model without taking part in the
    /// projection. Unknown additional variables are appended as negative
    /// literals.
    pub additional_variables: BTreeSet<Variable>,
    /// Decompose the constraint graph into independent components and
    /// combine the per-component results. Only applied once the engine
    /// knows at least `component_threshold` variables.
    pub compute_with_components: bool,
    /// Split strategy for the recursive splitter; `None` enumerates
    /// directly.
    pub split_provider: Option<Box<dyn SplitVariableProvider>>,
    /// Build collected assignments with a hash index for fast lookups.
    pub fast_evaluable: bool,
    /// Commit cadence: uncommitted models are committed every this many
    /// engine models during direct enumeration.
    pub max_models: usize,
    /// Minimum number of known variables before component decomposition
    /// kicks in.
    pub component_threshold: usize,
    /// Split assignments at least this large are split again instead of
    /// being enumerated directly.
    pub split_recursion_threshold: usize,
    /// Same cutoff for the nested levels of the splitter.
    pub split_again_threshold: usize,
    /// Hard cap on splitter nesting. Branches at this depth, and branches
    /// whose split no longer shrinks the candidate set, are enumerated
    /// directly.
    pub max_split_depth: u32,
}

impl Default for IterationConfig {
    fn default() -> IterationConfig {
        IterationConfig {
            variables: None,
            additional_variables: BTreeSet::new(),
            compute_with_components: false,
            split_provider: None,
            fast_evaluable: false,
            max_models: 1000,
            component_threshold: 15,
            split_recursion_threshold: 10,
            split_again_threshold: 4,
            max_split_depth: 16,
        }
    }
}

impl IterationConfig {
    /// Projects onto exactly `variables`.
    pub fn over(variables: impl IntoIterator<Item = Variable>) -> IterationConfig {
        IterationConfig {
            variables: Some(variables.into_iter().collect()),
            ..IterationConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_models == 0 {
            return Err(ConfigError::ZeroMaxModels);
        }
        if self.component_threshold == 0 {
            return Err(ConfigError::ZeroComponentThreshold);
        }
        if self.max_split_depth == 0 {
            return Err(ConfigError::ZeroSplitDepth);
        }
        if self.variables.is_none() && !self.additional_variables.is_empty() {
            return Err(ConfigError::AdditionalWithoutProjection);
        }
        Ok(())
    }
}

/// An invalid configuration record, rejected before touching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroMaxModels,
    ZeroComponentThreshold,
    ZeroSplitDepth,
    /// Additional variables only make sense relative to an explicit
    /// projection; with a full projection they would all be absorbed.
    AdditionalWithoutProjection,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxModels => write!(f, "max_models must be positive"),
            ConfigError::ZeroComponentThreshold => {
                write!(f, "component_threshold must be positive")
            }
            ConfigError::ZeroSplitDepth => write!(f, "max_split_depth must be positive"),
            ConfigError::AdditionalWithoutProjection => {
                write!(f, "additional variables require an explicit projection")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
