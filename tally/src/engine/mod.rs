//! Adapter contract for the underlying SAT engine.
//!
//! The enumeration layer never looks inside the search procedure: it talks
//! to the engine through [`SatEngine`] only — clause addition, synchronous
//! solving, model extraction, name/index mapping and LIFO state
//! snapshot/restore. Any CDCL or DPLL implementation with removable
//! clauses can be plugged in; [`dpll::DpllEngine`] is the built-in
//! reference implementation.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::Variable;

pub mod dpll;

/// Reserved name prefix for auxiliary variables of cardinality encodings.
pub const CC_AUX_PREFIX: &str = "@cc_";
/// Reserved name prefix for auxiliary variables of pseudo-boolean encodings.
pub const PB_AUX_PREFIX: &str = "@pb_";
/// Reserved name prefix for auxiliary variables of CNF conversion.
pub const CNF_AUX_PREFIX: &str = "@cnf_";

/// Recognizes internally-generated helper variables by their structural
/// origin (the reserved encoding prefixes). Such variables are excluded
/// from default projections.
pub fn is_auxiliary(name: &str) -> bool {
    name.starts_with(CC_AUX_PREFIX) || name.starts_with(PB_AUX_PREFIX) || name.starts_with(CNF_AUX_PREFIX)
}

/// An engine-level literal: a variable index with a polarity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawLit {
    pub index: usize,
    pub positive: bool,
}

impl RawLit {
    pub fn new(index: usize, positive: bool) -> RawLit {
        RawLit { index, positive }
    }

    pub fn negated(self) -> RawLit {
        RawLit::new(self.index, !self.positive)
    }
}

impl fmt::Debug for RawLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.index)
        } else {
            write!(f, "-{}", self.index)
        }
    }
}

/// Outcome of a synchronous solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat,
    Unsat,
    /// The stop signal fired mid-search. Only ever produced on
    /// handler-driven abort, never spontaneously.
    Canceled,
}

/// An opaque token for a saved engine state. Handles nest in strict LIFO
/// order: restoring a handle keeps it live but invalidates every handle
/// created after it.
pub type StateHandle = u32;

/// A failure inside the engine, propagated unchanged as fatal.
#[derive(Debug)]
pub struct EngineError {
    msg: String,
}

impl EngineError {
    pub fn new(msg: impl Into<String>) -> EngineError {
        EngineError { msg: msg.into() }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine failure: {}", self.msg)
    }
}

impl std::error::Error for EngineError {}

/// Read-only view on the constraints currently on the engine, used by
/// split variable providers and the component decomposer. Object safe so
/// that providers can be held as trait objects.
pub trait ConstraintView {
    /// Invokes `f` on every constraint currently loaded, as a slice of
    /// engine literals.
    fn for_each_constraint(&self, f: &mut dyn FnMut(&[RawLit]));

    /// The variable behind an engine index.
    fn variable_at(&self, index: usize) -> &Variable;

    /// The engine index of a variable name, if the engine knows it.
    fn index_of(&self, name: &str) -> Option<usize>;
}

/// The consumed contract of the SAT engine.
///
/// `solve` blocks the calling thread; there is no internal background
/// execution. All clauses added after a [`SatEngine::save_state`] call are
/// dropped again by the matching [`SatEngine::restore_state`].
pub trait SatEngine: ConstraintView {
    /// Asserts a disjunction of engine literals.
    fn add_clause(&mut self, clause: &[RawLit]) -> Result<(), EngineError>;

    /// Searches for a satisfying assignment. `stop` is polled
    /// periodically; returning `true` cancels the search and yields
    /// [`SolveOutcome::Canceled`].
    fn solve(&mut self, stop: &mut dyn FnMut() -> bool) -> Result<SolveOutcome, EngineError>;

    /// The raw model vector, one value per engine index. Valid only
    /// immediately after a [`SolveOutcome::Sat`] result.
    fn model(&self) -> &[bool];

    /// Number of variables the engine has indexed.
    fn num_vars(&self) -> usize;

    /// All variables known to the engine, sorted by name. Includes
    /// auxiliary variables.
    fn known_variables(&self) -> BTreeSet<Variable>;

    /// Snapshots the current clause set. Handles are LIFO: see
    /// [`StateHandle`].
    fn save_state(&mut self) -> StateHandle;

    /// Drops everything added since `handle` was created. Restoring a
    /// handle that was already invalidated is a programming error and
    /// panics.
    fn restore_state(&mut self, handle: StateHandle);

    /// Number of live snapshots.
    fn num_saved(&self) -> u32;

    /// Whether the engine supports cheap state restoration. Enumeration
    /// wraps itself in a private save/restore pair on incremental engines
    /// so that no blocking clause survives the call.
    fn is_incremental(&self) -> bool {
        true
    }
}
