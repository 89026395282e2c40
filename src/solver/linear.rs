//! Dense LU solve for the damped normal-equation step

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Factorization mode for the linear step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuMode {
    /// Partial-pivot LU. The default; cheapest for well-conditioned systems.
    Fast,
    /// Full-pivot LU. Slower, tolerates systems the fast path rejects.
    Robust,
}

/// Errors from the linear solver
#[derive(Debug, Error)]
pub enum LinearError {
    #[error("singular matrix: {size}x{size} system has no unique solution")]
    Singular { size: usize },

    #[error("dimension mismatch: matrix is {rows}x{cols}, rhs has {rhs_len} entries")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        rhs_len: usize,
    },
}

/// Solve the square system `matrix * x = rhs`.
pub fn solve(
    matrix: &DMatrix<f64>,
    rhs: &DVector<f64>,
    mode: LuMode,
) -> Result<DVector<f64>, LinearError> {
    if !matrix.is_square() || matrix.nrows() != rhs.len() {
        return Err(LinearError::DimensionMismatch {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
            rhs_len: rhs.len(),
        });
    }

    let solution = match mode {
        LuMode::Fast => matrix.clone().lu().solve(rhs),
        LuMode::Robust => matrix.clone().full_piv_lu().solve(rhs),
    };

    solution.ok_or(LinearError::Singular {
        size: matrix.nrows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_2x2() {
        // 2x + y = 5, x + 3y = 10  ->  x = 1, y = 3
        let matrix = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let rhs = DVector::from_row_slice(&[5.0, 10.0]);

        let x = solve(&matrix, &rhs, LuMode::Fast).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-10);
        assert!((x[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_robust_mode_agrees_with_fast() {
        let matrix = DMatrix::from_row_slice(2, 2, &[4.0, -2.0, 1.0, 1.0]);
        let rhs = DVector::from_row_slice(&[2.0, 4.0]);

        let fast = solve(&matrix, &rhs, LuMode::Fast).unwrap();
        let robust = solve(&matrix, &rhs, LuMode::Robust).unwrap();
        assert!((fast[0] - robust[0]).abs() < 1e-10);
        assert!((fast[1] - robust[1]).abs() < 1e-10);
    }

    #[test]
    fn test_singular_matrix_is_an_error() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let rhs = DVector::from_row_slice(&[1.0, 2.0]);

        let result = solve(&matrix, &rhs, LuMode::Robust);
        assert!(matches!(result, Err(LinearError::Singular { size: 2 })));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let rhs = DVector::from_row_slice(&[1.0, 2.0, 3.0]);

        let result = solve(&matrix, &rhs, LuMode::Fast);
        assert!(matches!(result, Err(LinearError::DimensionMismatch { .. })));
    }
}
