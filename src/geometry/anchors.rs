//! Per-shape-type catalog of named attachment points
//!
//! Anchors are derived state: computed fresh from shape parameters every
//! time they are needed, never stored. Offsets live in the shape's local
//! frame and ignore rotation; world resolution applies rotation later
//! (see [`super::rotation`]).

use std::f64::consts::PI;

use super::shape::{Shape, Vec2};

/// A named local-space attachment point on a shape
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    pub key: String,
    pub offset: Vec2,
}

impl AnchorPoint {
    fn new(key: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            offset: Vec2::new(x, y),
        }
    }
}

/// Compute the anchor catalog for a shape.
///
/// Every shape gets a `center` anchor at the origin. The rest depend on
/// the shape type and its parameters; unknown types get only `center`.
pub fn anchor_points(shape: &Shape) -> Vec<AnchorPoint> {
    let mut anchors = vec![AnchorPoint::new("center", 0.0, 0.0)];
    let param = |key: &str| shape.param(key).unwrap_or(0.0);

    match shape.shape_type.as_str() {
        "rect" | "square" => {
            let hw = param("width") / 2.0;
            let hh = param("height") / 2.0;
            anchors.push(AnchorPoint::new("top_left", -hw, -hh));
            anchors.push(AnchorPoint::new("top_right", hw, -hh));
            anchors.push(AnchorPoint::new("bottom_left", -hw, hh));
            anchors.push(AnchorPoint::new("bottom_right", hw, hh));
            anchors.push(AnchorPoint::new("top", 0.0, -hh));
            anchors.push(AnchorPoint::new("bottom", 0.0, hh));
            anchors.push(AnchorPoint::new("left", -hw, 0.0));
            anchors.push(AnchorPoint::new("right", hw, 0.0));
        }
        "circle" => {
            let r = param("radius");
            push_cardinals(&mut anchors, "", r);
        }
        "ring" => {
            let outer = param("outer_radius");
            push_cardinals(&mut anchors, "", outer);
            let inner = param("inner_radius");
            if inner > 0.0 {
                push_cardinals(&mut anchors, "inner_", inner);
            }
        }
        "ellipse" => {
            let rx = param("radius_x");
            let ry = param("radius_y");
            anchors.push(AnchorPoint::new("right", rx, 0.0));
            anchors.push(AnchorPoint::new("left", -rx, 0.0));
            anchors.push(AnchorPoint::new("top", 0.0, -ry));
            anchors.push(AnchorPoint::new("bottom", 0.0, ry));
        }
        "polygon" => {
            let r = param("radius");
            let sides = (param("sides") as usize).max(3);
            let step = 2.0 * PI / sides as f64;
            for i in 0..sides {
                // First vertex at the top, stepping clockwise (Y-down)
                let angle = -PI / 2.0 + i as f64 * step;
                anchors.push(AnchorPoint::new(
                    format!("vertex_{}", i),
                    r * angle.cos(),
                    r * angle.sin(),
                ));
            }
        }
        "triangle" => {
            let hw = param("width") / 2.0;
            let hh = param("height") / 2.0;
            anchors.push(AnchorPoint::new("apex", 0.0, -hh));
            anchors.push(AnchorPoint::new("base_left", -hw, hh));
            anchors.push(AnchorPoint::new("base_right", hw, hh));
            anchors.push(AnchorPoint::new("base_mid", 0.0, hh));
        }
        "arc" => {
            let r = param("radius");
            let start = param("start_angle").to_radians();
            let end = param("end_angle").to_radians();
            let mid = (start + end) / 2.0;
            anchors.push(AnchorPoint::new("start", r * start.cos(), r * start.sin()));
            anchors.push(AnchorPoint::new("end", r * end.cos(), r * end.sin()));
            anchors.push(AnchorPoint::new("mid", r * mid.cos(), r * mid.sin()));
        }
        "arrow" => {
            let half = param("length") / 2.0;
            anchors.push(AnchorPoint::new("tail", -half, 0.0));
            anchors.push(AnchorPoint::new("tip", half, 0.0));
        }
        _ => {}
    }

    anchors
}

/// Symbolic id for an anchor, sanitized so it is always a valid equation
/// symbol. Unique within a solve as long as shape names are unique.
pub fn anchor_symbol(shape_name: &str, key: &str) -> String {
    format!("{}__{}", sanitize(shape_name), sanitize(key))
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn push_cardinals(anchors: &mut Vec<AnchorPoint>, prefix: &str, radius: f64) {
    anchors.push(AnchorPoint::new(format!("{}right", prefix), radius, 0.0));
    anchors.push(AnchorPoint::new(format!("{}left", prefix), -radius, 0.0));
    anchors.push(AnchorPoint::new(format!("{}top", prefix), 0.0, -radius));
    anchors.push(AnchorPoint::new(format!("{}bottom", prefix), 0.0, radius));
}
