//! Built-in reference engine: an iterative DPLL procedure with unit
//! propagation and LIFO snapshot/restore of its clause set.
//!
//! The point of this engine is to make the crate usable and testable
//! standalone, not to compete with a tuned CDCL implementation. Search is
//! deterministic: decisions pick the lowest unassigned index, trying
//! `true` first.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::core::Variable;

use super::{ConstraintView, EngineError, RawLit, SatEngine, SolveOutcome, StateHandle};

type Clause = SmallVec<[RawLit; 4]>;

#[derive(Clone, Copy)]
struct Frame {
    clauses: usize,
    vars: usize,
}

/// A decision point on the search trail. `mark` is the trail length before
/// the decision was pushed; undoing to `mark` removes the decision and all
/// its propagations.
struct Decision {
    var: usize,
    mark: usize,
    flipped: bool,
}

pub struct DpllEngine {
    vars: Vec<Variable>,
    index: HashMap<Variable, usize>,
    clauses: Vec<Clause>,
    saved: Vec<Frame>,
    model: Vec<bool>,
}

impl DpllEngine {
    pub fn new() -> DpllEngine {
        DpllEngine {
            vars: Vec::new(),
            index: HashMap::new(),
            clauses: Vec::new(),
            saved: Vec::new(),
            model: Vec::new(),
        }
    }

    /// Interns `name` and returns its engine index.
    pub fn var(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let var = Variable::new(name);
        let idx = self.vars.len();
        self.vars.push(var.clone());
        self.index.insert(var, idx);
        idx
    }

    /// Interns `name` and returns a literal with the given polarity.
    pub fn lit(&mut self, name: &str, positive: bool) -> RawLit {
        RawLit::new(self.var(name), positive)
    }

    /// Convenience clause addition over variable names.
    pub fn add(&mut self, clause: &[(&str, bool)]) {
        let lits: Vec<RawLit> = clause.iter().map(|&(name, positive)| self.lit(name, positive)).collect();
        // the reference engine never fails on clause addition
        self.add_clause(&lits).expect("clause addition failed");
    }

    /// Runs unit propagation to fixpoint. Returns `false` on conflict.
    fn propagate(&self, values: &mut [Option<bool>], trail: &mut Vec<usize>) -> bool {
        loop {
            let mut changed = false;
            'clauses: for clause in &self.clauses {
                let mut unassigned = None;
                let mut open = 0;
                for &l in clause {
                    match values[l.index] {
                        Some(v) if v == l.positive => continue 'clauses,
                        Some(_) => {}
                        None => {
                            open += 1;
                            unassigned = Some(l);
                        }
                    }
                }
                match (open, unassigned) {
                    (0, _) => return false,
                    (1, Some(l)) => {
                        values[l.index] = Some(l.positive);
                        trail.push(l.index);
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }
}

impl Default for DpllEngine {
    fn default() -> DpllEngine {
        DpllEngine::new()
    }
}

impl ConstraintView for DpllEngine {
    fn for_each_constraint(&self, f: &mut dyn FnMut(&[RawLit])) {
        for clause in &self.clauses {
            f(clause);
        }
    }

    fn variable_at(&self, index: usize) -> &Variable {
        &self.vars[index]
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

impl SatEngine for DpllEngine {
    fn add_clause(&mut self, clause: &[RawLit]) -> Result<(), EngineError> {
        for l in clause {
            assert!(l.index < self.vars.len(), "literal over unknown index {}", l.index);
        }
        self.clauses.push(clause.iter().copied().collect());
        Ok(())
    }

    fn solve(&mut self, stop: &mut dyn FnMut() -> bool) -> Result<SolveOutcome, EngineError> {
        let n = self.vars.len();
        let mut values: Vec<Option<bool>> = vec![None; n];
        let mut trail: Vec<usize> = Vec::new();
        let mut decisions: Vec<Decision> = Vec::new();

        loop {
            if stop() {
                return Ok(SolveOutcome::Canceled);
            }
            if self.propagate(&mut values, &mut trail) {
                // consistent: extend the assignment or report the model
                match (0..n).find(|&v| values[v].is_none()) {
                    Some(v) => {
                        decisions.push(Decision {
                            var: v,
                            mark: trail.len(),
                            flipped: false,
                        });
                        values[v] = Some(true);
                        trail.push(v);
                    }
                    None => {
                        self.model = values.iter().map(|v| v.unwrap_or(false)).collect();
                        return Ok(SolveOutcome::Sat);
                    }
                }
            } else {
                // conflict: flip the deepest unflipped decision
                loop {
                    let Some(d) = decisions.pop() else {
                        return Ok(SolveOutcome::Unsat);
                    };
                    while trail.len() > d.mark {
                        let v = trail.pop().expect("trail shorter than its decision mark");
                        values[v] = None;
                    }
                    if !d.flipped {
                        values[d.var] = Some(false);
                        trail.push(d.var);
                        decisions.push(Decision {
                            var: d.var,
                            mark: d.mark,
                            flipped: true,
                        });
                        break;
                    }
                }
            }
        }
    }

    fn model(&self) -> &[bool] {
        &self.model
    }

    fn num_vars(&self) -> usize {
        self.vars.len()
    }

    fn known_variables(&self) -> BTreeSet<Variable> {
        self.vars.iter().cloned().collect()
    }

    fn save_state(&mut self) -> StateHandle {
        self.saved.push(Frame {
            clauses: self.clauses.len(),
            vars: self.vars.len(),
        });
        (self.saved.len() - 1) as StateHandle
    }

    fn restore_state(&mut self, handle: StateHandle) {
        let h = handle as usize;
        assert!(h < self.saved.len(), "restored a dead state handle {handle}");
        let frame = self.saved[h];
        self.clauses.truncate(frame.clauses);
        for var in self.vars.drain(frame.vars..) {
            self.index.remove(&var);
        }
        // the handle itself stays live for repeated restores
        self.saved.truncate(h + 1);
    }

    fn num_saved(&self) -> u32 {
        self.saved.len() as u32
    }
}
