//! Constraint definitions and their residual-equation templates
//!
//! Each constraint kind expands into one or two equations over the
//! symbolic world coordinates of its two anchors. Equations are compiled
//! once when the constraint is created and reused for every solve.

use std::fmt;

use crate::autodiff::Equation;
use crate::expr::format_literal;
use crate::geometry::anchor_symbol;

use super::EngineError;

/// Reference to a named anchor on a named shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorRef {
    pub shape: String,
    pub key: String,
}

impl AnchorRef {
    pub fn new(shape: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            key: key.into(),
        }
    }

    /// Parse a `shape.anchor` reference. The anchor key is everything
    /// after the first dot.
    pub fn parse(text: &str) -> Option<Self> {
        let (shape, key) = text.split_once('.')?;
        if shape.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self::new(shape, key))
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.shape, self.key)
    }
}

/// The supported constraint kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Both anchors at the same world position
    Coincident,
    /// Anchors a fixed Euclidean distance apart
    Distance(f64),
    /// Anchors on the same horizontal line (equal y)
    Horizontal,
    /// Anchors on the same vertical line (equal x)
    Vertical,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Coincident => "coincident",
            ConstraintKind::Distance(_) => "distance",
            ConstraintKind::Horizontal => "horizontal",
            ConstraintKind::Vertical => "vertical",
        }
    }
}

/// The symbolic world-coordinate variable names of an anchor
pub(crate) fn coord_vars(anchor: &AnchorRef) -> (String, String) {
    let id = anchor_symbol(&anchor.shape, &anchor.key);
    (format!("x_{}", id), format!("y_{}", id))
}

/// A stored constraint between two anchors (which may belong to the same
/// shape), with its compiled residual equations
#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: u64,
    pub kind: ConstraintKind,
    pub a: AnchorRef,
    pub b: AnchorRef,
    equations: Vec<Equation>,
}

impl Constraint {
    /// Formulate and compile the residual equations for a constraint.
    pub fn new(
        id: u64,
        kind: ConstraintKind,
        a: AnchorRef,
        b: AnchorRef,
    ) -> Result<Self, EngineError> {
        let (xa, ya) = coord_vars(&a);
        let (xb, yb) = coord_vars(&b);

        let texts: Vec<String> = match &kind {
            ConstraintKind::Coincident => {
                vec![format!("{} - {}", xa, xb), format!("{} - {}", ya, yb)]
            }
            ConstraintKind::Distance(dist) => {
                vec![format!(
                    "sqrt(({xa} - {xb}) ^ 2 + ({ya} - {yb}) ^ 2) - {}",
                    format_literal(*dist)
                )]
            }
            ConstraintKind::Horizontal => vec![format!("{} - {}", ya, yb)],
            ConstraintKind::Vertical => vec![format!("{} - {}", xa, xb)],
        };

        let mut equations = Vec::with_capacity(texts.len());
        for text in texts {
            let equation =
                Equation::parse(&text).map_err(|errs| EngineError::equation(&text, &errs))?;
            equations.push(equation);
        }

        Ok(Self {
            id,
            kind,
            a,
            b,
            equations,
        })
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Whether this constraint references the named shape
    pub fn references(&self, shape_name: &str) -> bool {
        self.a.shape == shape_name || self.b.shape == shape_name
    }

    /// Human-readable label for constraint lists
    pub fn label(&self) -> String {
        match &self.kind {
            ConstraintKind::Distance(dist) => {
                format!("distance {} <-> {} = {}", self.a, self.b, dist)
            }
            kind => format!("{} {} = {}", kind.name(), self.a, self.b),
        }
    }
}
