//! Shape Constraints - geometric constraint solving for 2D parametric editors
//!
//! This library turns symbolic relationships between named anchor points
//! on shapes (coincident, distance, horizontal, vertical) into numeric
//! equation systems, solves them with a damped nonlinear least-squares
//! method, and maps the result back onto shape positions.
//!
//! Pipeline, leaves first: equation parsing ([`expr`]) feeds dual-number
//! gradient evaluation ([`autodiff`]), which feeds the Levenberg-Marquardt
//! loop and the degrading constraint-system wrapper ([`solver`]). The
//! [`engine`] orchestrates those over the anchor catalog ([`geometry`]).
//!
//! # Example
//!
//! ```rust
//! use shape_constraints::{AnchorRef, ConstraintEngine, Shape, ShapeSet};
//!
//! let mut shapes = ShapeSet::new();
//! shapes.insert(
//!     Shape::new("panel", "rect")
//!         .with_param("width", 80.0)
//!         .with_param("height", 40.0),
//! );
//! shapes.insert(
//!     Shape::new("knob", "circle")
//!         .with_param("radius", 10.0)
//!         .with_position(120.0, -30.0),
//! );
//!
//! let mut engine = ConstraintEngine::new();
//! engine
//!     .add_coincident(
//!         &mut shapes,
//!         AnchorRef::new("knob", "center"),
//!         AnchorRef::new("panel", "right"),
//!     )
//!     .unwrap();
//!
//! let knob = engine.anchor_world(&shapes, "knob", "center");
//! let panel = engine.anchor_world(&shapes, "panel", "right");
//! assert!((knob.position.x - panel.position.x).abs() < 1e-3);
//! assert!((knob.position.y - panel.position.y).abs() < 1e-3);
//! ```

pub mod autodiff;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod geometry;
pub mod scene;
pub mod solver;

pub use autodiff::{Bindings, Dual, Equation, EvalError};
pub use config::SolverConfig;
pub use engine::{
    AnchorRef, AnchorResolution, ConstraintEngine, ConstraintGeometry, ConstraintHandle,
    ConstraintKind, EngineError,
};
pub use error::ParseError;
pub use geometry::{AnchorPoint, Shape, ShapeSet, Transform, Vec2};
pub use scene::{Scene, SceneError};
pub use solver::{solve_system, SystemSolution};
