//! Shape boundary types shared with the editor collaborator
//!
//! The engine never owns shapes: the editor keeps the live shape list and
//! lends it out per call. Shapes are described dynamically (a type string
//! plus a parameter map) so the editor can add shape kinds without
//! touching the solver.

use std::collections::HashMap;

use std::ops::{Add, Sub};

/// A 2D point or offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Placement of a shape in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in degrees, clockwise positive (SVG convention)
    pub rotation: f64,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

/// A shape as seen across the editor boundary. The solver reads `params`
/// and mutates only `transform.position`.
#[derive(Debug, Clone)]
pub struct Shape {
    pub name: String,
    pub shape_type: String,
    pub params: HashMap<String, f64>,
    pub transform: Transform,
}

impl Shape {
    pub fn new(name: impl Into<String>, shape_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape_type: shape_type.into(),
            params: HashMap::new(),
            transform: Transform::default(),
        }
    }

    /// Set a shape parameter (width, radius, sides, ...)
    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.transform.position = Vec2::new(x, y);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.transform.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.transform.scale = Vec2::new(sx, sy);
        self
    }

    /// Look up a shape parameter
    pub fn param(&self, key: &str) -> Option<f64> {
        self.params.get(key).copied()
    }
}

/// The live shape list. Owned by the editor collaborator; the engine only
/// borrows it to read parameters and translate positions.
#[derive(Debug, Clone, Default)]
pub struct ShapeSet {
    shapes: Vec<Shape>,
}

impl ShapeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape, replacing any existing shape with the same name
    pub fn insert(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.name == shape.name) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.name == name)
    }

    pub fn remove(&mut self, name: &str) {
        self.shapes.retain(|s| s.name != name);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(b - a, Vec2::new(2.0, -3.0));
    }

    #[test]
    fn test_vec2_length() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
    }

    #[test]
    fn test_default_transform() {
        let t = Transform::default();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_shape_builder() {
        let shape = Shape::new("box", "rect")
            .with_param("width", 80.0)
            .with_param("height", 40.0)
            .with_position(10.0, 20.0)
            .with_rotation(45.0);

        assert_eq!(shape.param("width"), Some(80.0));
        assert_eq!(shape.param("radius"), None);
        assert_eq!(shape.transform.position, Vec2::new(10.0, 20.0));
        assert_eq!(shape.transform.rotation, 45.0);
    }

    #[test]
    fn test_shape_set_insert_replaces_by_name() {
        let mut shapes = ShapeSet::new();
        shapes.insert(Shape::new("a", "rect"));
        shapes.insert(Shape::new("a", "circle"));

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes.get("a").unwrap().shape_type, "circle");
    }

    #[test]
    fn test_shape_set_lookup_and_remove() {
        let mut shapes = ShapeSet::new();
        shapes.insert(Shape::new("a", "rect"));
        shapes.insert(Shape::new("b", "circle"));

        assert!(shapes.get("a").is_some());
        shapes.remove("a");
        assert!(shapes.get("a").is_none());
        assert_eq!(shapes.len(), 1);
    }
}
