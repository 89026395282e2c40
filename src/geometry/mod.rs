//! Shape boundary types, anchor catalog, and rotation-aware resolution

pub mod anchors;
pub mod rotation;
pub mod shape;

pub use anchors::{anchor_points, anchor_symbol, AnchorPoint};
pub use rotation::rotate_offset;
pub use shape::{Shape, ShapeSet, Transform, Vec2};
