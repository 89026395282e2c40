//! Constraint engine orchestration
//!
//! The engine ties the pipeline together: it keeps the ordered constraint
//! list, rebuilds anchors fresh for every solve, formulates and solves one
//! constraint at a time, and writes solved world positions back onto shape
//! transforms as translations.
//!
//! ## Pairwise solving
//!
//! Constraints are deliberately NOT solved as one global system.
//! `apply_all` walks the stored list in declaration order and resolves
//! each constraint independently; a shape touched by several constraints
//! is moved once per constraint, so later constraints override earlier
//! ones on shared shapes. Callers depend on this order-dependent
//! behavior.
//!
//! ## Live enforcement
//!
//! The editor collaborator subscribes the engine to its shape-mutation
//! notifications by calling [`ConstraintEngine::shapes_edited`] after
//! edits. The engine diffs transforms against the last settled snapshot,
//! treats the most-changed shape as the one being edited, and re-enforces
//! every constraint with that shape held fixed. An internal `applying`
//! flag makes the notification a no-op while the engine itself is
//! mutating shapes.

pub mod constraint;
mod live;

use thiserror::Error;

use crate::autodiff::Bindings;
use crate::config::SolverConfig;
use crate::error::ParseError;
use crate::geometry::{anchor_points, rotate_offset, AnchorPoint, ShapeSet, Vec2};
use crate::solver::system::solve_system;

pub use constraint::{AnchorRef, Constraint, ConstraintKind};

use constraint::coord_vars;
use live::{TransformSnapshot, EDIT_THRESHOLD};

/// Errors from engine operations that take caller-supplied references
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reference to a shape the live shape list does not contain
    #[error("unknown shape '{name}'")]
    UnknownShape { name: String },

    /// Reference to an anchor the shape's catalog does not contain
    #[error("unknown anchor '{key}' on shape '{shape}' (valid anchors: {valid})")]
    UnknownAnchor {
        shape: String,
        key: String,
        valid: String,
    },

    /// A constraint template failed to compile. This indicates a bug in
    /// the template, not a caller mistake.
    #[error("malformed constraint equation '{text}': {message}")]
    Equation { text: String, message: String },

    /// Reference to a constraint id the engine does not hold
    #[error("unknown constraint id {id}")]
    UnknownConstraint { id: u64 },
}

impl EngineError {
    pub fn unknown_shape(name: impl Into<String>) -> Self {
        Self::UnknownShape { name: name.into() }
    }

    pub fn unknown_anchor(
        shape: impl Into<String>,
        key: impl Into<String>,
        valid: Vec<String>,
    ) -> Self {
        Self::UnknownAnchor {
            shape: shape.into(),
            key: key.into(),
            valid: valid.join(", "),
        }
    }

    pub(crate) fn equation(text: &str, errors: &[ParseError]) -> Self {
        Self::Equation {
            text: text.to_string(),
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Handle returned when a constraint is added
#[derive(Debug, Clone)]
pub struct ConstraintHandle {
    pub id: u64,
    pub label: String,
}

/// World-space anchor resolution. Lookups that miss return the origin
/// sentinel with `ok = false` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorResolution {
    pub position: Vec2,
    pub ok: bool,
}

impl AnchorResolution {
    fn missing() -> Self {
        Self {
            position: Vec2::ZERO,
            ok: false,
        }
    }
}

/// Endpoints and midpoint of a constraint, for overlay drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintGeometry {
    pub a: Vec2,
    pub b: Vec2,
    pub midpoint: Vec2,
}

type ListListener = Box<dyn FnMut(&[String])>;

/// The constraint engine. Owns the constraint list and solver
/// configuration; borrows the shape list per call.
pub struct ConstraintEngine {
    config: SolverConfig,
    constraints: Vec<Constraint>,
    /// Engine-instance id counter; ids are never reused within an engine
    next_id: u64,
    live_enforce: bool,
    applying: bool,
    settled: TransformSnapshot,
    list_listeners: Vec<ListListener>,
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            constraints: Vec::new(),
            next_id: 1,
            live_enforce: false,
            applying: false,
            settled: TransformSnapshot::default(),
            list_listeners: Vec::new(),
        }
    }

    /// Constrain two anchors to the same world position
    pub fn add_coincident(
        &mut self,
        shapes: &mut ShapeSet,
        a: AnchorRef,
        b: AnchorRef,
    ) -> Result<ConstraintHandle, EngineError> {
        self.add_constraint(shapes, ConstraintKind::Coincident, a, b)
    }

    /// Constrain two anchors to a fixed Euclidean distance
    pub fn add_distance(
        &mut self,
        shapes: &mut ShapeSet,
        a: AnchorRef,
        b: AnchorRef,
        distance: f64,
    ) -> Result<ConstraintHandle, EngineError> {
        self.add_constraint(shapes, ConstraintKind::Distance(distance), a, b)
    }

    /// Constrain two anchors to the same y coordinate
    pub fn add_horizontal(
        &mut self,
        shapes: &mut ShapeSet,
        a: AnchorRef,
        b: AnchorRef,
    ) -> Result<ConstraintHandle, EngineError> {
        self.add_constraint(shapes, ConstraintKind::Horizontal, a, b)
    }

    /// Constrain two anchors to the same x coordinate
    pub fn add_vertical(
        &mut self,
        shapes: &mut ShapeSet,
        a: AnchorRef,
        b: AnchorRef,
    ) -> Result<ConstraintHandle, EngineError> {
        self.add_constraint(shapes, ConstraintKind::Vertical, a, b)
    }

    /// Formulate, solve immediately, then store the constraint for future
    /// re-enforcement.
    fn add_constraint(
        &mut self,
        shapes: &mut ShapeSet,
        kind: ConstraintKind,
        a: AnchorRef,
        b: AnchorRef,
    ) -> Result<ConstraintHandle, EngineError> {
        self.validate_anchor(shapes, &a)?;
        self.validate_anchor(shapes, &b)?;

        let id = self.next_id;
        self.next_id += 1;
        let constraint = Constraint::new(id, kind, a, b)?;

        self.applying = true;
        self.solve_constraint(shapes, &constraint, None);
        self.applying = false;

        let handle = ConstraintHandle {
            id,
            label: constraint.label(),
        };
        self.constraints.push(constraint);
        self.settled = TransformSnapshot::capture(shapes);
        self.notify_list_changed();
        Ok(handle)
    }

    /// Remove a stored constraint by id
    pub fn remove_constraint(&mut self, id: u64) -> Result<(), EngineError> {
        let index = self
            .constraints
            .iter()
            .position(|c| c.id == id)
            .ok_or(EngineError::UnknownConstraint { id })?;
        self.constraints.remove(index);
        self.notify_list_changed();
        Ok(())
    }

    /// Remove every stored constraint
    pub fn clear_all(&mut self) {
        if self.constraints.is_empty() {
            return;
        }
        self.constraints.clear();
        self.notify_list_changed();
    }

    /// Human-readable labels for every stored constraint, in order
    pub fn constraint_list(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.label()).collect()
    }

    /// The stored constraints, in declaration order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Register a callback fired whenever the stored constraint list
    /// changes; it receives the current labels.
    pub fn on_list_changed(&mut self, listener: impl FnMut(&[String]) + 'static) {
        self.list_listeners.push(Box::new(listener));
    }

    /// Anchor catalog for a shape (empty if the shape is unknown)
    pub fn anchors_for_shape(&self, shapes: &ShapeSet, name: &str) -> Vec<AnchorPoint> {
        shapes.get(name).map(anchor_points).unwrap_or_default()
    }

    /// Resolve an anchor to world space:
    /// `world = position + rotate(offset, rotation)`
    pub fn anchor_world(&self, shapes: &ShapeSet, shape_name: &str, key: &str) -> AnchorResolution {
        let Some(shape) = shapes.get(shape_name) else {
            return AnchorResolution::missing();
        };
        let Some(anchor) = anchor_points(shape).into_iter().find(|a| a.key == key) else {
            return AnchorResolution::missing();
        };
        AnchorResolution {
            position: shape.transform.position
                + rotate_offset(anchor.offset, shape.transform.rotation),
            ok: true,
        }
    }

    /// Endpoints and midpoint of a stored constraint, for overlay drawing
    pub fn constraint_geometry(
        &self,
        shapes: &ShapeSet,
        id: u64,
    ) -> Option<ConstraintGeometry> {
        let constraint = self.constraints.iter().find(|c| c.id == id)?;
        let a = self
            .anchor_world(shapes, &constraint.a.shape, &constraint.a.key)
            .position;
        let b = self
            .anchor_world(shapes, &constraint.b.shape, &constraint.b.key)
            .position;
        Some(ConstraintGeometry {
            a,
            b,
            midpoint: Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
        })
    }

    /// Re-solve every stored constraint sequentially in declaration
    /// order. When `fixed` names a shape, that shape's anchors are held at
    /// their current world coordinates and only the other endpoints move.
    pub fn apply_all(&mut self, shapes: &mut ShapeSet, fixed: Option<&str>) {
        self.prune_dangling(shapes);

        self.applying = true;
        for constraint in &self.constraints {
            self.solve_constraint(shapes, constraint, fixed);
        }
        self.applying = false;

        self.settled = TransformSnapshot::capture(shapes);
    }

    /// Enable or disable live re-enforcement
    pub fn set_live_enforce(&mut self, enabled: bool) {
        self.live_enforce = enabled;
    }

    pub fn live_enforce(&self) -> bool {
        self.live_enforce
    }

    /// The editor's shape-mutated notification. A no-op unless live
    /// enforcement is on, and while the engine itself is applying results.
    pub fn shapes_edited(&mut self, shapes: &mut ShapeSet) {
        if !self.live_enforce || self.applying {
            return;
        }
        let edited = self.settled.most_changed(shapes, EDIT_THRESHOLD);
        let Some(edited) = edited else {
            return;
        };
        self.apply_all(shapes, Some(&edited));
    }

    /// Drop constraints whose shapes were removed by the collaborator
    fn prune_dangling(&mut self, shapes: &ShapeSet) {
        let before = self.constraints.len();
        self.constraints
            .retain(|c| shapes.get(&c.a.shape).is_some() && shapes.get(&c.b.shape).is_some());
        if self.constraints.len() != before {
            self.notify_list_changed();
        }
    }

    fn validate_anchor(&self, shapes: &ShapeSet, anchor: &AnchorRef) -> Result<(), EngineError> {
        let shape = shapes
            .get(&anchor.shape)
            .ok_or_else(|| EngineError::unknown_shape(&anchor.shape))?;
        let anchors = anchor_points(shape);
        if anchors.iter().any(|a| a.key == anchor.key) {
            Ok(())
        } else {
            Err(EngineError::unknown_anchor(
                &anchor.shape,
                &anchor.key,
                anchors.into_iter().map(|a| a.key).collect(),
            ))
        }
    }

    /// Solve one constraint and translate its shapes to the solution.
    ///
    /// Unknowns are the world coordinates of the two anchors, seeded from
    /// the live shapes. If `fixed` names a shape, that side's coordinates
    /// are known values instead of unknowns.
    fn solve_constraint(&self, shapes: &mut ShapeSet, constraint: &Constraint, fixed: Option<&str>) {
        let a_world = self.anchor_world(shapes, &constraint.a.shape, &constraint.a.key);
        let b_world = self.anchor_world(shapes, &constraint.b.shape, &constraint.b.key);
        if !a_world.ok || !b_world.ok {
            return;
        }

        let (xa, ya) = coord_vars(&constraint.a);
        let (xb, yb) = coord_vars(&constraint.b);

        let mut variables = Bindings::new();
        variables.insert(xa.clone(), a_world.position.x);
        variables.insert(ya.clone(), a_world.position.y);
        variables.insert(xb.clone(), b_world.position.x);
        variables.insert(yb.clone(), b_world.position.y);

        let mut known = Bindings::new();
        if let Some(name) = fixed {
            if constraint.a.shape == name {
                known.insert(xa.clone(), a_world.position.x);
                known.insert(ya.clone(), a_world.position.y);
            }
            if constraint.b.shape == name {
                known.insert(xb.clone(), b_world.position.x);
                known.insert(yb.clone(), b_world.position.y);
            }
        }

        let solution = solve_system(constraint.equations(), &variables, &known, &self.config);

        self.apply_anchor(shapes, &constraint.a, &solution.values, &known);
        self.apply_anchor(shapes, &constraint.b, &solution.values, &known);
    }

    /// Translate a shape so its anchor lands on the solved world position.
    /// Rotation is never mutated here.
    fn apply_anchor(
        &self,
        shapes: &mut ShapeSet,
        anchor: &AnchorRef,
        values: &Bindings,
        known: &Bindings,
    ) {
        let (xv, yv) = coord_vars(anchor);
        if known.contains_key(&xv) {
            return; // the fixed side does not move
        }
        let (Some(&solved_x), Some(&solved_y)) = (values.get(&xv), values.get(&yv)) else {
            return;
        };

        // Current world position re-resolved against the live shape, in
        // case an earlier application already translated it.
        let current = self.anchor_world(shapes, &anchor.shape, &anchor.key);
        if !current.ok {
            return;
        }

        if let Some(shape) = shapes.get_mut(&anchor.shape) {
            shape.transform.position.x += solved_x - current.position.x;
            shape.transform.position.y += solved_y - current.position.y;
        }
    }

    fn notify_list_changed(&mut self) {
        let labels: Vec<String> = self.constraints.iter().map(|c| c.label()).collect();
        for listener in &mut self.list_listeners {
            listener(&labels);
        }
    }
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::new()
    }
}
