//! Shared formula builders for the integration tests.
#![allow(dead_code)]

use tally::engine::dpll::DpllEngine;

/// At least one of `names` is true.
pub fn at_least_one(e: &mut DpllEngine, names: &[&str]) {
    let clause: Vec<(&str, bool)> = names.iter().map(|&n| (n, true)).collect();
    e.add(&clause);
}

/// Pairwise at-most-one over `names`.
pub fn at_most_one(e: &mut DpllEngine, names: &[&str]) {
    for i in 0..names.len() {
        for j in i + 1..names.len() {
            e.add(&[(names[i], false), (names[j], false)]);
        }
    }
}

/// Exactly one of `names` is true.
pub fn exactly_one(e: &mut DpllEngine, names: &[&str]) {
    at_least_one(e, names);
    at_most_one(e, names);
}

/// Sequential at-most-one encoding, introducing `@cc_` helper variables
/// that link the inputs into one constraint component.
pub fn at_most_one_sequential(e: &mut DpllEngine, tag: &str, names: &[&str]) {
    if names.len() <= 1 {
        return;
    }
    let aux: Vec<String> = (0..names.len() - 1).map(|i| format!("@cc_{tag}_{i}")).collect();
    e.add(&[(names[0], false), (&aux[0], true)]);
    for i in 1..names.len() - 1 {
        e.add(&[(names[i], false), (&aux[i], true)]);
        e.add(&[(&aux[i - 1], false), (&aux[i], true)]);
        e.add(&[(names[i], false), (&aux[i - 1], false)]);
    }
    e.add(&[(names[names.len() - 1], false), (&aux[names.len() - 2], false)]);
}

/// Chain of equivalences `v0 = v1 = ... = v(n-1)`; has exactly two models.
pub fn equality_chain(e: &mut DpllEngine, prefix: &str, n: usize) -> Vec<String> {
    let names: Vec<String> = (0..n).map(|i| format!("{prefix}{i:02}")).collect();
    for pair in names.windows(2) {
        e.add(&[(&pair[0], false), (&pair[1], true)]);
        e.add(&[(&pair[0], true), (&pair[1], false)]);
    }
    names
}

/// The n-queens placement problem over variables `q_<row>_<col>`.
pub fn queens(e: &mut DpllEngine, n: usize) -> Vec<String> {
    let name = |r: usize, c: usize| format!("q_{r}_{c}");
    let mut names = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            names.push(name(r, c));
        }
    }
    fn as_refs(cells: &[String]) -> Vec<&str> {
        cells.iter().map(String::as_str).collect()
    }

    for r in 0..n {
        let row: Vec<String> = (0..n).map(|c| name(r, c)).collect();
        exactly_one(e, &as_refs(&row));
    }
    for c in 0..n {
        let col: Vec<String> = (0..n).map(|r| name(r, c)).collect();
        at_most_one(e, &as_refs(&col));
    }
    for d in 0..2 * n - 1 {
        let diag: Vec<String> = (0..n)
            .filter(|&r| d >= r && d - r < n)
            .map(|r| name(r, d - r))
            .collect();
        at_most_one(e, &as_refs(&diag));
        let anti: Vec<String> = (0..n)
            .filter_map(|r| (r + d).checked_sub(n - 1).filter(|&c| c < n).map(|c| name(r, c)))
            .collect();
        at_most_one(e, &as_refs(&anti));
    }
    names
}
