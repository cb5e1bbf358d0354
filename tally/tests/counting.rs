mod common;

use std::collections::BTreeSet;

use anyhow::Result;
use malachite::Natural;
use tally::core::Variable;
use tally::engine::dpll::DpllEngine;
use tally::engine::SatEngine;
use tally::enumeration::{
    count_models, enumerate_models, IterationConfig, ModelLimit, NoAbort,
};

fn vars(names: &[&str]) -> BTreeSet<Variable> {
    names.iter().map(|name| Variable::from(*name)).collect()
}

#[test]
fn disjunction_projected_onto_its_variables() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true), ("b", true)]);
    e.add(&[("c", false)]);
    e.add(&[("d", true)]);
    let config = IterationConfig::over(vars(&["a", "b"]));
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(3u32));
    let models = enumerate_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(models.len(), 3);
    for m in &models {
        assert_eq!(m.len(), 2);
        assert!(m.value_of(&Variable::new("a")).is_some());
        assert!(m.value_of(&Variable::new("c")).is_none());
    }
    Ok(())
}

#[test]
fn default_projection_covers_all_known_variables() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true), ("b", true)]);
    e.add(&[("c", false)]);
    e.add(&[("d", true)]);
    let config = IterationConfig::default();
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(3u32));
    let models = enumerate_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(models.len(), 3);
    for m in &models {
        assert_eq!(m.len(), 4);
        assert_eq!(m.value_of(&Variable::new("c")), Some(false));
        assert_eq!(m.value_of(&Variable::new("d")), Some(true));
    }
    Ok(())
}

#[test]
fn unsatisfiable_formula_has_no_models() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true)]);
    e.add(&[("a", false)]);
    let config = IterationConfig::default();
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(0u32));
    assert!(enumerate_models(&mut e, &config, &mut NoAbort)?.is_empty());
    Ok(())
}

#[test]
fn empty_projection_counts_satisfiability() -> Result<()> {
    let mut sat = DpllEngine::new();
    sat.add(&[("a", true), ("b", true)]);
    let config = IterationConfig::over(vars(&[]));
    assert_eq!(count_models(&mut sat, &config, &mut NoAbort)?, Natural::from(1u32));
    let models = enumerate_models(&mut sat, &config, &mut NoAbort)?;
    assert_eq!(models.len(), 1);
    assert!(models[0].is_empty());

    let mut unsat = DpllEngine::new();
    unsat.add(&[]);
    assert_eq!(count_models(&mut unsat, &config, &mut NoAbort)?, Natural::from(0u32));
    Ok(())
}

#[test]
fn unknown_projection_variables_expand_over_both_values() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true), ("b", true)]);
    let config = IterationConfig::over(vars(&["a", "b", "x", "y"]));
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(12u32));
    let models = enumerate_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(models.len(), 12);
    let distinct: BTreeSet<_> = models.iter().cloned().collect();
    assert_eq!(distinct.len(), 12);
    for m in &models {
        assert!(m.value_of(&Variable::new("x")).is_some());
        assert!(m.value_of(&Variable::new("y")).is_some());
    }
    Ok(())
}

#[test]
fn additional_variables_are_reported_not_blocked_on() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true), ("b", true)]);
    // c is equivalent to a, so blocking on c would not change the count
    // but enumerating without it must still report it
    e.add(&[("c", true), ("a", false)]);
    e.add(&[("c", false), ("a", true)]);
    let config = IterationConfig {
        additional_variables: vars(&["c", "m"]),
        ..IterationConfig::over(vars(&["a", "b"]))
    };
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(3u32));
    let models = enumerate_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(models.len(), 3);
    for m in &models {
        // the known additional variable tracks a, the unknown one is negative
        assert_eq!(m.value_of(&Variable::new("c")), m.value_of(&Variable::new("a")));
        assert_eq!(m.value_of(&Variable::new("m")), Some(false));
    }
    Ok(())
}

#[test]
fn forced_units_leave_a_single_model() -> Result<()> {
    let mut e = DpllEngine::new();
    for name in ["a", "b", "c", "d"] {
        e.add(&[(name, true)]);
    }
    let config = IterationConfig::over(vars(&["a", "c"]));
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(1u32));
    Ok(())
}

#[test]
fn conflicting_cardinality_constraint_is_unsatisfiable() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true)]);
    e.add(&[("b", true)]);
    common::at_most_one_sequential(&mut e, "card", &["a", "b", "c", "d"]);
    let config = IterationConfig::default();
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(0u32));
    Ok(())
}

#[test]
fn count_always_matches_enumeration_length() -> Result<()> {
    let mut e = DpllEngine::new();
    let names = ["p", "q", "r", "s", "t"];
    common::at_most_one(&mut e, &names);
    let config = IterationConfig::default();
    let count = count_models(&mut e, &config, &mut NoAbort)?;
    let models = enumerate_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(count, Natural::from(models.len()));
    assert_eq!(models.len(), 6);
    Ok(())
}

#[test]
fn four_queens_has_two_solutions() -> Result<()> {
    let mut e = DpllEngine::new();
    common::queens(&mut e, 4);
    let config = IterationConfig::default();
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(2u32));
    Ok(())
}

#[test]
fn eight_queens_has_ninety_two_solutions() -> Result<()> {
    let mut e = DpllEngine::new();
    common::queens(&mut e, 8);
    let config = IterationConfig::default();
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, Natural::from(92u32));
    Ok(())
}

#[test]
fn cancellation_returns_the_committed_prefix() -> Result<()> {
    let mut e = DpllEngine::new();
    common::at_most_one(&mut e, &["p", "q", "r", "s"]);

    // committing after every model, the first two models survive the abort
    let config = IterationConfig {
        max_models: 1,
        ..IterationConfig::default()
    };
    let mut handler = ModelLimit::new(3);
    assert_eq!(count_models(&mut e, &config, &mut handler)?, Natural::from(2u32));
    assert_eq!(handler.models_seen(), 3);

    // with the default cadence nothing was committed at abort time
    let config = IterationConfig::default();
    let mut handler = ModelLimit::new(3);
    assert_eq!(count_models(&mut e, &config, &mut handler)?, Natural::from(0u32));
    Ok(())
}

#[test]
fn no_blocking_clauses_survive_a_run() -> Result<()> {
    let mut e = DpllEngine::new();
    e.add(&[("a", true), ("b", true)]);
    let vars_before = e.num_vars();
    let config = IterationConfig::default();
    let first = count_models(&mut e, &config, &mut NoAbort)?;
    assert_eq!(e.num_vars(), vars_before);
    // a second run sees no blocking clauses from the first
    assert_eq!(count_models(&mut e, &config, &mut NoAbort)?, first);
    Ok(())
}
