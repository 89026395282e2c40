//! Damped nonlinear least-squares minimization (Levenberg-Marquardt)
//!
//! Minimizes `0.5 * sum(r_i^2)` over the binding's unknowns, where each
//! residual `r_i` is one equation evaluated with dual numbers (so every
//! evaluation also yields the Jacobian row). The damped step solves
//! `(J'J + lambda*I) delta = J'r`; accepted steps shrink the damping
//! toward Gauss-Newton behavior, rejected steps grow it toward gradient
//! descent and reuse the previous Jacobian.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::autodiff::{Bindings, Equation, EvalError};
use crate::config::SolverConfig;

use super::linear::{self, LinearError, LuMode};

/// Failures of the minimization loop
#[derive(Debug, Error)]
pub enum LmError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("linear step failed: {0}")]
    Linear(#[from] LinearError),

    /// The iteration bound was reached without meeting any convergence
    /// criterion.
    #[error("stalled after {iterations} iterations (cost {cost:.3e})")]
    Stalled { iterations: usize, cost: f64 },
}

/// A successful minimization
#[derive(Debug, Clone)]
pub struct Solution {
    pub values: Bindings,
    pub cost: f64,
    pub iterations: usize,
}

/// Minimize the summed squared residuals of `equations` starting from
/// `initial`. Every key of `initial` is an unknown.
pub fn minimize(
    equations: &[Equation],
    initial: &Bindings,
    config: &SolverConfig,
) -> Result<Solution, LmError> {
    if equations.is_empty() {
        return Ok(Solution {
            values: initial.clone(),
            cost: 0.0,
            iterations: 0,
        });
    }

    let names: Vec<String> = initial.keys().cloned().collect();
    let width = names.len();

    // The cost check uses epsilon squared: cost is half the squared
    // residual norm, so this keeps solved coordinates well inside the
    // per-equation acceptance tolerance. Gradient and improvement checks
    // use epsilon directly.
    let cost_epsilon = config.epsilon * config.epsilon;

    let mut values = initial.clone();
    let (mut residuals, mut jacobian) = evaluate_system(equations, &values)?;
    let mut cost = half_squared_norm(&residuals);
    if cost < cost_epsilon || width == 0 {
        return Ok(Solution {
            values,
            cost,
            iterations: 0,
        });
    }

    let mut lambda = config.lambda_init;

    for iteration in 1..=config.max_iterations {
        // A flat Jacobian means no step can improve the residuals.
        if jacobian.iter().all(|entry| entry.abs() < config.epsilon) {
            return Ok(Solution {
                values,
                cost,
                iterations: iteration - 1,
            });
        }

        let hessian = jacobian.transpose() * &jacobian;
        let gradient = jacobian.transpose() * &residuals;
        let damped = &hessian + DMatrix::identity(width, width) * lambda;

        let step = match linear::solve(&damped, &gradient, LuMode::Fast) {
            Ok(step) => step,
            Err(LinearError::Singular { .. }) => {
                linear::solve(&damped, &gradient, LuMode::Robust)?
            }
            Err(err) => return Err(err.into()),
        };

        let mut trial = values.clone();
        for (i, name) in names.iter().enumerate() {
            if let Some(value) = trial.get_mut(name) {
                *value -= step[i];
            }
        }

        let (trial_residuals, trial_jacobian) = evaluate_system(equations, &trial)?;
        let trial_cost = half_squared_norm(&trial_residuals);

        if trial_cost < cost {
            // Accept: commit the step and refresh the Jacobian.
            let improvement = cost - trial_cost;
            values = trial;
            residuals = trial_residuals;
            jacobian = trial_jacobian;
            cost = trial_cost;
            lambda /= config.lambda_down;

            if config.trace {
                eprintln!(
                    "TRACE: lm iter {} accepted, cost {:.3e}, lambda {:.1e}",
                    iteration, cost, lambda
                );
            }

            if cost < cost_epsilon || improvement < config.epsilon {
                return Ok(Solution {
                    values,
                    cost,
                    iterations: iteration,
                });
            }
        } else {
            // Reject: keep the point and the stale Jacobian, damp harder.
            lambda *= config.lambda_up;
        }
    }

    Err(LmError::Stalled {
        iterations: config.max_iterations,
        cost,
    })
}

/// Evaluate every equation at `bindings`, producing the residual vector and
/// the Jacobian (rows = equations, columns = sorted binding keys).
fn evaluate_system(
    equations: &[Equation],
    bindings: &Bindings,
) -> Result<(DVector<f64>, DMatrix<f64>), EvalError> {
    let width = bindings.len();
    let mut residuals = DVector::zeros(equations.len());
    let mut jacobian = DMatrix::zeros(equations.len(), width);

    for (row, equation) in equations.iter().enumerate() {
        let result = equation.evaluate(bindings)?;
        residuals[row] = result.value;
        for col in 0..width {
            jacobian[(row, col)] = result.deriv(col);
        }
    }

    Ok((residuals, jacobian))
}

fn half_squared_norm(residuals: &DVector<f64>) -> f64 {
    0.5 * residuals.iter().map(|r| r * r).sum::<f64>()
}
