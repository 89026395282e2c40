//! TOML scene descriptions for driving the engine from files
//!
//! A scene lists shapes (standing in for the editor's live shape list)
//! and the constraints to apply to them:
//!
//! ```toml
//! [[shapes]]
//! name = "panel"
//! type = "rect"
//! position = [0.0, 0.0]
//! [shapes.params]
//! width = 80.0
//! height = 40.0
//!
//! [[constraints]]
//! type = "coincident"
//! a = "knob.center"
//! b = "panel.right"
//! ```
//!
//! The CLI reads a scene, solves it, writes the solved transforms back
//! into the entries, and prints the scene as TOML again.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{AnchorRef, ConstraintKind};
use crate::geometry::{Shape, ShapeSet, Transform, Vec2};

/// Errors that can occur when loading or interpreting scenes
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize scene TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("malformed anchor reference '{text}' (expected shape.anchor)")]
    BadAnchorRef { text: String },
    #[error("unknown constraint type '{kind}'")]
    UnknownConstraintType { kind: String },
    #[error("constraint type '{kind}' requires a distance")]
    MissingDistance { kind: String },
}

/// A complete scene: shapes plus the constraints between them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
}

/// One shape in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub shape_type: String,
    #[serde(default)]
    pub params: HashMap<String, f64>,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale: [f64; 2],
}

fn default_scale() -> [f64; 2] {
    [1.0, 1.0]
}

/// One constraint in a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintEntry {
    #[serde(rename = "type")]
    pub kind: String,
    /// First anchor, written `shape.anchor`
    pub a: String,
    /// Second anchor, written `shape.anchor`
    pub b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a scene from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the scene back to TOML
    pub fn to_toml(&self) -> Result<String, SceneError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the live shape list from the scene's shape entries
    pub fn shape_set(&self) -> ShapeSet {
        let mut shapes = ShapeSet::new();
        for entry in &self.shapes {
            shapes.insert(Shape {
                name: entry.name.clone(),
                shape_type: entry.shape_type.clone(),
                params: entry.params.clone(),
                transform: Transform {
                    position: Vec2::new(entry.position[0], entry.position[1]),
                    rotation: entry.rotation,
                    scale: Vec2::new(entry.scale[0], entry.scale[1]),
                },
            });
        }
        shapes
    }

    /// Copy solved transforms back into the scene's shape entries
    pub fn update_from(&mut self, shapes: &ShapeSet) {
        for entry in &mut self.shapes {
            if let Some(shape) = shapes.get(&entry.name) {
                entry.position = [shape.transform.position.x, shape.transform.position.y];
                entry.rotation = shape.transform.rotation;
                entry.scale = [shape.transform.scale.x, shape.transform.scale.y];
            }
        }
    }
}

impl ConstraintEntry {
    /// Parse both anchor references
    pub fn anchor_refs(&self) -> Result<(AnchorRef, AnchorRef), SceneError> {
        let a = AnchorRef::parse(&self.a).ok_or_else(|| SceneError::BadAnchorRef {
            text: self.a.clone(),
        })?;
        let b = AnchorRef::parse(&self.b).ok_or_else(|| SceneError::BadAnchorRef {
            text: self.b.clone(),
        })?;
        Ok((a, b))
    }

    /// Interpret the constraint type string
    pub fn constraint_kind(&self) -> Result<ConstraintKind, SceneError> {
        match self.kind.as_str() {
            "coincident" => Ok(ConstraintKind::Coincident),
            "distance" => match self.distance {
                Some(distance) => Ok(ConstraintKind::Distance(distance)),
                None => Err(SceneError::MissingDistance {
                    kind: self.kind.clone(),
                }),
            },
            "horizontal" => Ok(ConstraintKind::Horizontal),
            "vertical" => Ok(ConstraintKind::Vertical),
            _ => Err(SceneError::UnknownConstraintType {
                kind: self.kind.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
[[shapes]]
name = "panel"
type = "rect"
position = [10.0, 20.0]

[shapes.params]
width = 80.0
height = 40.0

[[shapes]]
name = "knob"
type = "circle"

[shapes.params]
radius = 10.0

[[constraints]]
type = "distance"
a = "knob.center"
b = "panel.center"
distance = 100.0
"#;

    #[test]
    fn test_parse_example_scene() {
        let scene = Scene::from_toml(EXAMPLE).unwrap();
        assert_eq!(scene.shapes.len(), 2);
        assert_eq!(scene.constraints.len(), 1);
        assert_eq!(scene.shapes[0].position, [10.0, 20.0]);
        assert_eq!(scene.shapes[1].scale, [1.0, 1.0]);
    }

    #[test]
    fn test_shape_set_conversion() {
        let scene = Scene::from_toml(EXAMPLE).unwrap();
        let shapes = scene.shape_set();
        let panel = shapes.get("panel").unwrap();
        assert_eq!(panel.param("width"), Some(80.0));
        assert_eq!(panel.transform.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_constraint_entry_interpretation() {
        let scene = Scene::from_toml(EXAMPLE).unwrap();
        let entry = &scene.constraints[0];
        let (a, b) = entry.anchor_refs().unwrap();
        assert_eq!(a.shape, "knob");
        assert_eq!(b.key, "center");
        assert_eq!(entry.constraint_kind().unwrap(), ConstraintKind::Distance(100.0));
    }

    #[test]
    fn test_distance_without_value_is_an_error() {
        let entry = ConstraintEntry {
            kind: "distance".to_string(),
            a: "a.center".to_string(),
            b: "b.center".to_string(),
            distance: None,
        };
        assert!(matches!(
            entry.constraint_kind(),
            Err(SceneError::MissingDistance { .. })
        ));
    }

    #[test]
    fn test_bad_anchor_ref_is_an_error() {
        let entry = ConstraintEntry {
            kind: "coincident".to_string(),
            a: "no_dot".to_string(),
            b: "b.center".to_string(),
            distance: None,
        };
        assert!(matches!(
            entry.anchor_refs(),
            Err(SceneError::BadAnchorRef { .. })
        ));
    }

    #[test]
    fn test_round_trip_preserves_shapes() {
        let scene = Scene::from_toml(EXAMPLE).unwrap();
        let rendered = scene.to_toml().unwrap();
        let reparsed = Scene::from_toml(&rendered).unwrap();
        assert_eq!(reparsed.shapes.len(), scene.shapes.len());
        assert_eq!(reparsed.constraints.len(), scene.constraints.len());
    }

    #[test]
    fn test_update_from_writes_back_positions() {
        let mut scene = Scene::from_toml(EXAMPLE).unwrap();
        let mut shapes = scene.shape_set();
        shapes.get_mut("knob").unwrap().transform.position = Vec2::new(42.0, -7.0);

        scene.update_from(&shapes);
        let knob = scene.shapes.iter().find(|s| s.name == "knob").unwrap();
        assert_eq!(knob.position, [42.0, -7.0]);
    }
}
