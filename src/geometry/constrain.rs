use crate::foundation::{
    core::{Point, Vec2},
    math::snap_angle_45,
};

/// Aspect ratio above which a constrained drag reads as a circle.
pub const CIRCLE_ASPECT_RATIO: f64 = 0.85;
/// Both box dimensions must exceed this before circle intent is considered.
pub const CIRCLE_MIN_SIZE: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Shape a constrained drag resolved to.
pub enum ConstraintKind {
    /// Endpoint snapped to the nearest 45-degree ray.
    Line,
    /// Endpoint snapped to a square bounding box for circular rendering.
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of resolving a constrained drag.
pub struct Constraint {
    /// Unchanged drag origin.
    pub start: Point,
    /// Snapped endpoint.
    pub end: Point,
    /// Which snapping rule applied.
    pub kind: ConstraintKind,
}

/// Snap `current` relative to `start`.
pub fn resolve_constraint(start: Point, current: Point, force_circle: bool) -> Constraint {
    let d: Vec2 = current - start;
    let (ax, ay) = (d.x.abs(), d.y.abs());
    let longest = ax.max(ay);

    let squareish = longest > 0.0
        && ax.min(ay) / longest > CIRCLE_ASPECT_RATIO
        && ax > CIRCLE_MIN_SIZE
        && ay > CIRCLE_MIN_SIZE;

    if force_circle || squareish {
        let end = start + Vec2::new(longest * d.x.signum(), longest * d.y.signum());
        return Constraint {
            start,
            end,
            kind: ConstraintKind::Circle,
        };
    }

    let distance = d.hypot();
    let angle = snap_angle_45(d.y.atan2(d.x));
    Constraint {
        start,
        end: start + Vec2::new(angle.cos() * distance, angle.sin() * distance),
        kind: ConstraintKind::Line,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/constrain.rs"]
mod tests;
