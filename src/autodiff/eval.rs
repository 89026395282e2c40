//! Compiled equations and gradient evaluation
//!
//! An [`Equation`] pairs its source text with the expression tree parsed
//! from it. Parsing happens once, when the equation is created; solver
//! iterations reuse the compiled tree.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::error::ParseError;
use crate::expr::{self, BinaryOp, Expr, Function, UnaryOp};

use super::dual::Dual;

/// Variable binding for evaluation. The sorted key order defines the fixed
/// variable ordering that derivative vectors are aligned to.
pub type Bindings = BTreeMap<String, f64>;

/// Evaluation failures. These are recoverable: the caller referenced a
/// variable the binding does not contain.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
}

/// An equation expected to equal zero at a solution, compiled for repeated
/// evaluation.
#[derive(Debug, Clone)]
pub struct Equation {
    text: String,
    ast: Expr,
}

impl Equation {
    /// Parse equation text into a compiled equation.
    pub fn parse(text: impl Into<String>) -> Result<Self, Vec<ParseError>> {
        let text = text.into();
        let ast = expr::parse(&text)?;
        Ok(Self { text, ast })
    }

    /// The original (or substituted) equation text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fold the given known values into the expression tree, removing them
    /// from the equation's free variables.
    pub fn with_known(&self, known: &Bindings) -> Equation {
        if known.is_empty() {
            return self.clone();
        }
        let ast = self.ast.substitute(known);
        Equation {
            text: ast.to_string(),
            ast,
        }
    }

    /// Evaluate at the given binding, producing the equation's value and
    /// its gradient with respect to the binding's sorted key order.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Dual, EvalError> {
        let index: HashMap<&str, usize> = bindings
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();
        eval_node(&self.ast, bindings, &index)
    }

    /// Evaluate just the residual value.
    pub fn residual(&self, bindings: &Bindings) -> Result<f64, EvalError> {
        self.evaluate(bindings).map(|d| d.value)
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn eval_node(
    expr: &Expr,
    bindings: &Bindings,
    index: &HashMap<&str, usize>,
) -> Result<Dual, EvalError> {
    match expr {
        Expr::Number(n) => Ok(Dual::constant(*n)),
        Expr::Symbol(name) => match index.get(name.as_str()) {
            Some(&i) => Ok(Dual::variable(bindings[name], i, bindings.len())),
            None => Err(EvalError::UnknownVariable { name: name.clone() }),
        },
        Expr::Unary(UnaryOp::Neg, inner) => Ok(-&eval_node(inner, bindings, index)?),
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval_node(lhs, bindings, index)?;
            let rhs = eval_node(rhs, bindings, index)?;
            Ok(match op {
                BinaryOp::Add => &lhs + &rhs,
                BinaryOp::Sub => &lhs - &rhs,
                BinaryOp::Mul => &lhs * &rhs,
                BinaryOp::Div => &lhs / &rhs,
                BinaryOp::Pow => lhs.pow(&rhs),
            })
        }
        Expr::Call(func, arg) => {
            let arg = eval_node(arg, bindings, index)?;
            Ok(match func {
                Function::Sin => arg.sin(),
                Function::Cos => arg.cos(),
                Function::Tan => arg.tan(),
                Function::Asin => arg.asin(),
                Function::Acos => arg.acos(),
                Function::Atan => arg.atan(),
                Function::Exp => arg.exp(),
                Function::Sqrt => arg.sqrt(),
                Function::Log => arg.ln(),
                Function::Neg => -&arg,
            })
        }
    }
}
