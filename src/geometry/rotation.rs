//! Rotation of local anchor offsets into world space
//!
//! Anchor offsets are computed in the shape's local frame, ignoring
//! rotation entirely. Rotation is applied exactly once, here, when an
//! offset is resolved to world coordinates:
//!
//! ```text
//! world = shape.position + rotate(offset, shape.rotation)
//! ```
//!
//! Rotation uses the SVG convention: clockwise positive angles in degrees,
//! Y axis pointing down.

use super::shape::Vec2;

/// Rotate a local offset around the shape origin.
///
/// In a Y-down coordinate system, clockwise rotation uses the standard
/// rotation matrix:
/// ```text
/// x' = x * cos(a) - y * sin(a)
/// y' = x * sin(a) + y * cos(a)
/// ```
pub fn rotate_offset(offset: Vec2, angle_degrees: f64) -> Vec2 {
    if angle_degrees.abs() < f64::EPSILON {
        return offset;
    }

    let radians = angle_degrees.to_radians();
    let (sin_a, cos_a) = radians.sin_cos();

    Vec2 {
        x: offset.x * cos_a - offset.y * sin_a,
        y: offset.x * sin_a + offset.y * cos_a,
    }
}
