//! Numeric solving pipeline
//!
//! `linear` provides the dense LU step, `levenberg` the damped
//! least-squares loop built on it, and `system` the constraint-system
//! wrapper that adds known-variable substitution and graceful degradation.

pub mod levenberg;
pub mod linear;
pub mod system;

pub use levenberg::{LmError, Solution};
pub use linear::{LinearError, LuMode};
pub use system::{solve_system, SystemSolution};
