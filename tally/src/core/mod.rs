//! Name-level data model: variables, literals and (partial) assignments.
//!
//! Variables are interned names, totally ordered by name so that every set
//! of variables and every assignment has a single canonical form. The
//! engine-level index representation lives in [`crate::engine`].

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use arcstr::ArcStr;
use hashbrown::HashMap;

/// An opaque named boolean unknown.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(ArcStr);

impl Variable {
    pub fn new(name: impl AsRef<str>) -> Variable {
        Variable(ArcStr::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Positive literal of this variable.
    pub fn pos(&self) -> Literal {
        Literal::new(self.clone(), true)
    }

    /// Negative literal of this variable.
    pub fn neg(&self) -> Literal {
        Literal::new(self.clone(), false)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Variable {
        Variable::new(name)
    }
}

// allows name-keyed lookups in hash maps keyed by Variable; consistent
// because ArcStr hashes and compares as its underlying str
impl std::borrow::Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        self.name()
    }
}

/// A variable together with a polarity.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    var: Variable,
    phase: bool,
}

impl Literal {
    pub fn new(var: Variable, phase: bool) -> Literal {
        Literal { var, phase }
    }

    pub fn variable(&self) -> &Variable {
        &self.var
    }

    pub fn phase(&self) -> bool {
        self.phase
    }

    pub fn negated(&self) -> Literal {
        Literal::new(self.var.clone(), !self.phase)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.phase {
            write!(f, "{}", self.var)
        } else {
            write!(f, "~{}", self.var)
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A consistent partial mapping from variables to boolean values, stored as
/// a literal set sorted by variable name.
///
/// Invariant: no variable appears with both polarities.
///
/// When built as *fast evaluable*, an internal hash index backs
/// [`Assignment::value_of`]; the index never takes part in equality or
/// hashing.
#[derive(Clone)]
pub struct Assignment {
    literals: Vec<Literal>,
    index: Option<HashMap<Variable, bool>>,
}

impl Assignment {
    /// The empty assignment.
    pub fn new() -> Assignment {
        Assignment {
            literals: Vec::new(),
            index: None,
        }
    }

    /// Builds an assignment from literals, sorting and deduplicating them.
    ///
    /// Panics if some variable occurs with both polarities.
    pub fn from_literals(literals: impl IntoIterator<Item = Literal>, fast_evaluable: bool) -> Assignment {
        let mut literals: Vec<Literal> = literals.into_iter().collect();
        literals.sort();
        literals.dedup();
        for pair in literals.windows(2) {
            assert!(
                pair[0].variable() != pair[1].variable(),
                "inconsistent assignment: {} and {}",
                pair[0],
                pair[1]
            );
        }
        let index = fast_evaluable.then(|| {
            literals
                .iter()
                .map(|l| (l.variable().clone(), l.phase()))
                .collect()
        });
        Assignment { literals, index }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Variables assigned to true.
    pub fn positive_variables(&self) -> BTreeSet<Variable> {
        self.literals
            .iter()
            .filter(|l| l.phase())
            .map(|l| l.variable().clone())
            .collect()
    }

    /// Variables assigned to false.
    pub fn negative_variables(&self) -> BTreeSet<Variable> {
        self.literals
            .iter()
            .filter(|l| !l.phase())
            .map(|l| l.variable().clone())
            .collect()
    }

    /// Value of `var` in this assignment, if assigned.
    pub fn value_of(&self, var: &Variable) -> Option<bool> {
        match &self.index {
            Some(index) => index.get(var).copied(),
            None => self
                .literals
                .binary_search_by(|l| l.variable().cmp(var))
                .ok()
                .map(|i| self.literals[i].phase()),
        }
    }

    /// Joins two assignments over disjoint variable sets.
    pub fn union(&self, other: &Assignment) -> Assignment {
        let fast = self.index.is_some() || other.index.is_some();
        Assignment::from_literals(
            self.literals.iter().chain(other.literals.iter()).cloned(),
            fast,
        )
    }
}

impl Default for Assignment {
    fn default() -> Assignment {
        Assignment::new()
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Assignment) -> bool {
        self.literals == other.literals
    }
}

impl Eq for Assignment {}

impl Hash for Assignment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literals.hash(state);
    }
}

impl PartialOrd for Assignment {
    fn partial_cmp(&self, other: &Assignment) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Assignment {
    fn cmp(&self, other: &Assignment) -> std::cmp::Ordering {
        self.literals.cmp(&other.literals)
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.literals.iter()).finish()
    }
}
