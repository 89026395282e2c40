//! Forward-mode automatic differentiation and equation evaluation

pub mod dual;
pub mod eval;

pub use dual::Dual;
pub use eval::{Bindings, Equation, EvalError};
