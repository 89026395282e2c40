//! Abstract syntax tree for equation expressions

use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `^` and `**` both parse to this
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// One-argument functions recognized in equation text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Sqrt,
    Log,
    Neg,
}

impl Function {
    /// Look up a function by its name in equation text
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "asin" => Some(Function::Asin),
            "acos" => Some(Function::Acos),
            "atan" => Some(Function::Atan),
            "exp" => Some(Function::Exp),
            "sqrt" => Some(Function::Sqrt),
            "log" => Some(Function::Log),
            "neg" => Some(Function::Neg),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
            Function::Log => "log",
            Function::Neg => "neg",
        }
    }
}

/// An equation expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Box<Expr>),
}

impl Expr {
    /// Replace every occurrence of the named symbols with numeric literals.
    ///
    /// This is the structural form of forward substitution: known values
    /// become number nodes, so the substituted variables vanish from the
    /// unknown set without any text rewriting.
    pub fn substitute(&self, values: &std::collections::BTreeMap<String, f64>) -> Expr {
        match self {
            Expr::Number(n) => Expr::Number(*n),
            Expr::Symbol(name) => match values.get(name) {
                Some(value) => Expr::Number(*value),
                None => Expr::Symbol(name.clone()),
            },
            Expr::Unary(op, inner) => Expr::Unary(*op, Box::new(inner.substitute(values))),
            Expr::Binary(op, lhs, rhs) => Expr::Binary(
                *op,
                Box::new(lhs.substitute(values)),
                Box::new(rhs.substitute(values)),
            ),
            Expr::Call(f, arg) => Expr::Call(*f, Box::new(arg.substitute(values))),
        }
    }

    /// Collect the symbol names referenced by this expression.
    pub fn symbols(&self, out: &mut std::collections::BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                out.insert(name.clone());
            }
            Expr::Unary(_, inner) | Expr::Call(_, inner) => inner.symbols(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.symbols(out);
                rhs.symbols(out);
            }
        }
    }
}

/// Format a numeric literal for embedding in equation text.
///
/// Negative values are parenthesized as `(0-|v|)` so the rendered text
/// never places a bare minus sign next to an operator.
pub fn format_literal(value: f64) -> String {
    if value < 0.0 {
        format!("(0-{:.8})", -value)
    } else {
        // abs() normalizes -0.0, which would otherwise print a minus sign
        format!("{:.8}", value.abs())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", format_literal(*n)),
            Expr::Symbol(name) => write!(f, "{}", name),
            Expr::Unary(UnaryOp::Neg, inner) => write!(f, "(0-{})", inner),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Call(func, arg) => write!(f, "{}({})", func.name(), arg),
        }
    }
}
