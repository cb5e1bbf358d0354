//! Decomposition of the constraint graph into independent components.
//!
//! Two variables are connected when they occur in a common constraint;
//! auxiliary variables take part in the linking. Models of independent
//! components combine freely, so enumeration runs per component and the
//! results are joined by cartesian product (or, for counting, by
//! multiplication).

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::Variable;
use crate::engine::SatEngine;

/// Result of splitting the engine's variables along constraint
/// connectivity. Only *interest* variables (the projection plus additional
/// variables) are reported; auxiliary and other variables contribute to
/// connectivity but not to the output sets.
pub(crate) struct Decomposition {
    /// Interest variables per component, one entry per connected component
    /// of the constraint graph. A component with no interest variables
    /// still gets an (empty) entry.
    pub components: Vec<BTreeSet<Variable>>,
    /// Interest variables occurring in no constraint at all.
    pub leftover: BTreeSet<Variable>,
}

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    fn new(n: usize) -> UnionFind {
        UnionFind {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else {
            self.parent[rb] = ra;
            if self.rank[ra] == self.rank[rb] {
                self.rank[ra] += 1;
            }
        }
    }
}

/// Groups the engine's constraints into connected components and projects
/// each component onto `interest`.
pub(crate) fn decompose<E: SatEngine + ?Sized>(
    engine: &E,
    interest: &BTreeSet<Variable>,
) -> Decomposition {
    let n = engine.num_vars();
    let mut uf = UnionFind::new(n);
    let mut occurs = vec![false; n];
    engine.for_each_constraint(&mut |clause| {
        let mut first = None;
        for lit in clause {
            occurs[lit.index] = true;
            match first {
                Some(f) => uf.union(f, lit.index),
                None => first = Some(lit.index),
            }
        }
    });

    // slot components by their root, in ascending index order
    let mut slot_of_root = vec![usize::MAX; n];
    let mut components: Vec<BTreeSet<Variable>> = Vec::new();
    let mut leftover = BTreeSet::new();
    for idx in 0..n {
        let var = engine.variable_at(idx);
        if !occurs[idx] {
            if interest.contains(var) {
                leftover.insert(var.clone());
            }
            continue;
        }
        let root = uf.find(idx);
        let slot = if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(BTreeSet::new());
            components.len() - 1
        } else {
            slot_of_root[root]
        };
        if interest.contains(var) {
            components[slot].insert(var.clone());
        }
    }
    debug!(
        components = components.len(),
        leftover = leftover.len(),
        "decomposed constraint graph"
    );
    Decomposition {
        components,
        leftover,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dpll::DpllEngine;

    fn vars(names: &[&str]) -> BTreeSet<Variable> {
        names.iter().map(|name| Variable::from(*name)).collect()
    }

    #[test]
    fn disjoint_clauses_make_separate_components() {
        let mut e = DpllEngine::new();
        e.add(&[("a", true), ("b", true)]);
        e.add(&[("c", true), ("d", false)]);
        e.var("free");
        let d = decompose(&e, &vars(&["a", "b", "c", "d", "free"]));
        assert_eq!(d.components.len(), 2);
        assert_eq!(d.components[0], vars(&["a", "b"]));
        assert_eq!(d.components[1], vars(&["c", "d"]));
        assert_eq!(d.leftover, vars(&["free"]));
    }

    #[test]
    fn shared_variables_merge_components() {
        let mut e = DpllEngine::new();
        e.add(&[("a", true), ("b", true)]);
        e.add(&[("b", false), ("c", true)]);
        let d = decompose(&e, &vars(&["a", "b", "c"]));
        assert_eq!(d.components.len(), 1);
        assert_eq!(d.components[0], vars(&["a", "b", "c"]));
    }

    #[test]
    fn auxiliary_variables_link_but_are_not_reported() {
        let mut e = DpllEngine::new();
        e.add(&[("a", true), ("@cc_0", true)]);
        e.add(&[("@cc_0", false), ("b", true)]);
        let d = decompose(&e, &vars(&["a", "b"]));
        assert_eq!(d.components.len(), 1);
        assert_eq!(d.components[0], vars(&["a", "b"]));
    }

    #[test]
    fn component_without_interest_variables_is_kept() {
        let mut e = DpllEngine::new();
        e.add(&[("a", true)]);
        e.add(&[("x", true), ("y", true)]);
        let d = decompose(&e, &vars(&["a"]));
        assert_eq!(d.components.len(), 2);
        assert!(d.components[1].is_empty());
    }
}
