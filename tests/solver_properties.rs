//! Contract tests for the constraint-system solver: substitution,
//! graceful degradation, and the literal-formatting guarantees it relies
//! on.

use shape_constraints::{solve_system, Bindings, Equation, SolverConfig};

fn bindings(pairs: &[(&str, f64)]) -> Bindings {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn equations(texts: &[&str]) -> Vec<Equation> {
    texts
        .iter()
        .map(|t| Equation::parse(*t).expect("equation should parse"))
        .collect()
}

#[test]
fn test_zero_unknowns_returns_input_and_empty_flags() {
    let variables = bindings(&[("x", 1.0), ("y", 2.0)]);
    let result = solve_system(&[], &variables, &Bindings::new(), &SolverConfig::default());

    assert!(result.satisfied.is_empty());
    assert_eq!(result.values, variables);
}

#[test]
fn test_trivial_equation_solves_exactly() {
    let result = solve_system(
        &equations(&["x - 5"]),
        &bindings(&[("x", 0.0)]),
        &Bindings::new(),
        &SolverConfig::default(),
    );

    assert_eq!(result.satisfied, vec![true]);
    assert!(
        (result.values["x"] - 5.0).abs() < 1e-4,
        "x should be 5, got {}",
        result.values["x"]
    );
}

#[test]
fn test_conflicting_equations_never_both_satisfied() {
    let result = solve_system(
        &equations(&["x - 5", "x - 10"]),
        &bindings(&[("x", 0.0)]),
        &Bindings::new(),
        &SolverConfig::default(),
    );

    let true_count = result.satisfied.iter().filter(|s| **s).count();
    let false_count = result.satisfied.iter().filter(|s| !**s).count();
    assert_eq!(
        (true_count, false_count),
        (1, 1),
        "exactly one of the conflicting equations must survive, got {:?}",
        result.satisfied
    );

    let x = result.values["x"];
    assert!(
        (x - 5.0).abs() < 1e-3 || (x - 10.0).abs() < 1e-3,
        "x should settle near one target, got {}",
        x
    );
}

#[test]
fn test_forward_substituted_values_stay_in_output() {
    let result = solve_system(
        &equations(&["x - anchor_x", "y - anchor_y"]),
        &bindings(&[("x", 0.0), ("y", 0.0), ("anchor_x", 10.0), ("anchor_y", 20.0)]),
        &bindings(&[("anchor_x", 10.0), ("anchor_y", 20.0)]),
        &SolverConfig::default(),
    );

    assert_eq!(result.satisfied, vec![true, true]);
    // Substituted values must still be present for downstream consumers
    assert_eq!(result.values["anchor_x"], 10.0);
    assert_eq!(result.values["anchor_y"], 20.0);
    // And the free coordinates landed on them
    assert!((result.values["x"] - 10.0).abs() < 1e-4);
    assert!((result.values["y"] - 20.0).abs() < 1e-4);
}

#[test]
fn test_substitution_with_negative_values_never_breaks_equations() {
    // Negative knowns must render parenthesized when folded into the
    // equation text, never as a bare minus adjacent to an operator.
    let targets = [-0.5, -10.0, -123.456, -1e4];
    for target in targets {
        let equation = Equation::parse("x - target").unwrap();
        let bound = equation.with_known(&bindings(&[("target", target)]));

        assert!(
            !bound.text().contains("- -") && !bound.text().contains("--"),
            "substituted text must not contain doubled minus: {}",
            bound.text()
        );
        // The substituted text still parses on its own
        let reparsed = Equation::parse(bound.text()).unwrap();
        let residual = reparsed.residual(&bindings(&[("x", target)])).unwrap();
        assert!(
            residual.abs() < 1e-7,
            "substituted equation should be satisfied at x = {}, residual {}",
            target,
            residual
        );
    }
}

#[test]
fn test_degrade_keeps_independent_equations_satisfied() {
    let result = solve_system(
        &equations(&["x - 1", "x - 50", "y + 3"]),
        &bindings(&[("x", 0.0), ("y", 0.0)]),
        &Bindings::new(),
        &SolverConfig::default(),
    );

    assert_eq!(result.satisfied.len(), 3);
    assert!(
        result.satisfied[2],
        "the y equation does not conflict and must stay satisfied"
    );
    assert!((result.values["y"] + 3.0).abs() < 1e-3);
}

#[test]
fn test_solver_failure_degrades_instead_of_panicking() {
    // sqrt of a negative stays NaN throughout; the solver cannot improve
    // it, falls back, and reports the equation unsatisfied.
    let variables = bindings(&[("x", -4.0)]);
    let result = solve_system(
        &equations(&["sqrt(x)"]),
        &variables,
        &Bindings::new(),
        &SolverConfig::default(),
    );

    assert_eq!(result.satisfied, vec![false]);
    assert_eq!(result.values, variables);
}
