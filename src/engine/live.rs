//! Change detection for live constraint enforcement
//!
//! When the editor notifies the engine that shapes changed, the engine
//! compares the live transforms against a snapshot taken at the last
//! settled state. The shape with the largest weighted delta is treated as
//! the one the user is actively editing: it becomes the fixed side of that
//! round's constraint resolution, so the other endpoints move instead of
//! fighting the edit.

use std::collections::HashMap;

use crate::geometry::{ShapeSet, Transform};

/// Minimum weighted delta for a shape to count as actively edited
pub(crate) const EDIT_THRESHOLD: f64 = 1e-3;

/// Weighted difference between two transforms:
/// `|delta position| + 0.01 * |delta rotation| + 10 * |delta scale|`
fn transform_score(settled: &Transform, live: &Transform) -> f64 {
    let position = (live.position - settled.position).length();
    let rotation = (live.rotation - settled.rotation).abs();
    let scale = (live.scale - settled.scale).length();
    position + 0.01 * rotation + 10.0 * scale
}

/// Transforms of every shape at the last settled state
#[derive(Debug, Clone, Default)]
pub(crate) struct TransformSnapshot {
    transforms: HashMap<String, Transform>,
}

impl TransformSnapshot {
    pub fn capture(shapes: &ShapeSet) -> Self {
        Self {
            transforms: shapes
                .iter()
                .map(|s| (s.name.clone(), s.transform))
                .collect(),
        }
    }

    /// The shape most likely being edited by the user, if any moved more
    /// than `threshold`. Shapes absent from the snapshot (newly created)
    /// are ignored; they have no settled state to diff against.
    pub fn most_changed(&self, shapes: &ShapeSet, threshold: f64) -> Option<String> {
        let mut best: Option<(String, f64)> = None;
        for shape in shapes.iter() {
            let Some(settled) = self.transforms.get(&shape.name) else {
                continue;
            };
            let score = transform_score(settled, &shape.transform);
            if score <= threshold {
                continue;
            }
            match &best {
                Some((_, best_score)) if *best_score >= score => {}
                _ => best = Some((shape.name.clone(), score)),
            }
        }
        best.map(|(name, _)| name)
    }
}
