//! Counts and prints the solutions of the n-queens placement problem.
//!
//! Usage: `cargo run --example queens -- [N]` (default 6).

use anyhow::Result;
use tally::engine::dpll::DpllEngine;
use tally::enumeration::{count_models, enumerate_models, IterationConfig, NoAbort};

fn pairwise_at_most_one(engine: &mut DpllEngine, cells: &[String]) {
    for i in 0..cells.len() {
        for j in i + 1..cells.len() {
            engine.add(&[(&cells[i], false), (&cells[j], false)]);
        }
    }
}

fn build_queens(engine: &mut DpllEngine, n: usize) {
    let name = |r: usize, c: usize| format!("q_{r}_{c}");
    for r in 0..n {
        let row: Vec<String> = (0..n).map(|c| name(r, c)).collect();
        let at_least_one: Vec<(&str, bool)> = row.iter().map(|q| (q.as_str(), true)).collect();
        engine.add(&at_least_one);
        pairwise_at_most_one(engine, &row);
    }
    for c in 0..n {
        let col: Vec<String> = (0..n).map(|r| name(r, c)).collect();
        pairwise_at_most_one(engine, &col);
    }
    for d in 0..2 * n - 1 {
        let diag: Vec<String> = (0..n)
            .filter(|&r| d >= r && d - r < n)
            .map(|r| name(r, d - r))
            .collect();
        pairwise_at_most_one(engine, &diag);
        let anti: Vec<String> = (0..n)
            .filter_map(|r| (r + d).checked_sub(n - 1).filter(|&c| c < n).map(|c| name(r, c)))
            .collect();
        pairwise_at_most_one(engine, &anti);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let n: usize = std::env::args().nth(1).map(|s| s.parse()).transpose()?.unwrap_or(6);

    let mut engine = DpllEngine::new();
    build_queens(&mut engine, n);

    let config = IterationConfig::default();
    let count = count_models(&mut engine, &config, &mut NoAbort)?;
    println!("{n}-queens has {count} solutions");

    for (i, model) in enumerate_models(&mut engine, &config, &mut NoAbort)?
        .iter()
        .take(3)
        .enumerate()
    {
        let queens: Vec<String> = model
            .positive_variables()
            .iter()
            .map(|v| v.name().trim_start_matches("q_").replace('_', ","))
            .collect();
        println!("solution {}: ({})", i + 1, queens.join(") ("));
    }
    Ok(())
}
