//! Constraint-system solving with graceful degradation
//!
//! Wraps the minimization loop with known-variable substitution and a
//! recursive equation-dropping strategy: when the equations cannot all be
//! satisfied, the first unsatisfied one is removed and the remainder is
//! re-solved, so the caller always receives a usable best-effort layout
//! together with per-equation satisfaction flags.

use crate::autodiff::{Bindings, Equation};
use crate::config::SolverConfig;

use super::levenberg;

/// Result of a constraint-system solve
#[derive(Debug, Clone)]
pub struct SystemSolution {
    /// One flag per input equation, in input order
    pub satisfied: Vec<bool>,
    /// All input variables, with unknowns replaced by solved values and
    /// known values re-attached unchanged
    pub values: Bindings,
}

/// Solve `equations` over `variables`, holding every variable named in
/// `known` fixed at its given value.
///
/// Known values are folded into the equations structurally (they become
/// literals in the compiled trees) and excluded from the unknown set.
/// Solver failures fall back to the unmodified input variables rather than
/// propagating; unsatisfiable equations are dropped one at a time, front
/// first, until the remainder solves.
pub fn solve_system(
    equations: &[Equation],
    variables: &Bindings,
    known: &Bindings,
    config: &SolverConfig,
) -> SystemSolution {
    if equations.is_empty() {
        return SystemSolution {
            satisfied: Vec::new(),
            values: variables.clone(),
        };
    }

    let mut unknowns = variables.clone();
    for name in known.keys() {
        unknowns.remove(name);
    }

    let bound: Vec<Equation> = equations.iter().map(|eq| eq.with_known(known)).collect();

    let mut values = match levenberg::minimize(&bound, &unknowns, config) {
        Ok(solution) => solution.values,
        Err(err) => {
            if config.trace {
                eprintln!("TRACE: system solve failed ({}), keeping input variables", err);
            }
            unknowns
        }
    };

    // Downstream consumers expect the full binding, knowns included.
    for (name, value) in known {
        values.insert(name.clone(), *value);
    }

    // Score every original equation at the solution.
    let threshold = config.epsilon.sqrt();
    let satisfied: Vec<bool> = equations
        .iter()
        .map(|eq| match eq.residual(&values) {
            Ok(residual) => residual * residual < threshold,
            Err(_) => false,
        })
        .collect();

    if satisfied.iter().all(|flag| *flag) {
        return SystemSolution { satisfied, values };
    }

    // Drop the first unsatisfied equation and re-solve the remainder.
    let drop_index = satisfied
        .iter()
        .position(|flag| !flag)
        .unwrap_or(0);
    if config.trace {
        eprintln!(
            "TRACE: dropping unsatisfiable equation #{} '{}'",
            drop_index, equations[drop_index]
        );
    }

    let mut reduced = equations.to_vec();
    reduced.remove(drop_index);

    let mut result = solve_system(&reduced, variables, known, config);
    result.satisfied.insert(drop_index, false);
    result
}
