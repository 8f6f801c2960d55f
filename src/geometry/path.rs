use std::f64::consts::{FRAC_PI_4, PI};

use crate::foundation::{
    core::{BezPath, Point, Vec2},
    math::{lerp, turn_angle},
};

/// Catmull-Rom to cubic Bezier conversion factor.
pub const CURVE_TENSION: f64 = 1.0 / 6.0;
/// Narrowest width a tapered stroke may reach.
pub const MIN_TAPER_WIDTH: f64 = 0.5;
/// Fraction of the base width removed at both ends at full taper.
pub const MAX_TAPER_REDUCTION: f64 = 0.7;

const FALLBACK_DIRECTION: Vec2 = Vec2::new(1.0, 0.0);

/// Degenerate zero-length path sitting on `p`.
pub fn dot_path(p: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(p);
    path.line_to(p);
    path
}

/// Smooth centerline through `points`.
///
/// Each segment is a cubic derived from the surrounding 4-point window, with out-of-range
/// neighbors reflected through the endpoint. The tension is halved next to turns sharper
/// than 45 degrees so corners do not overshoot.
pub fn uniform_path(points: &[Point]) -> BezPath {
    match points {
        [] => BezPath::new(),
        [p] => dot_path(*p),
        [a, b] => {
            let mut path = BezPath::new();
            path.move_to(*a);
            path.line_to(*b);
            path
        }
        _ => {
            let n = points.len();
            let mut path = BezPath::new();
            path.move_to(points[0]);
            for i in 0..n - 1 {
                let p1 = points[i];
                let p2 = points[i + 1];
                let p0 = if i == 0 {
                    p1 + (p1 - p2)
                } else {
                    points[i - 1]
                };
                let p3 = if i + 2 < n {
                    points[i + 2]
                } else {
                    p2 + (p2 - p1)
                };

                let t1 = local_tension(p0, p1, p2);
                let t2 = local_tension(p1, p2, p3);
                let c1 = p1 + (p2 - p0) * t1;
                let c2 = p2 - (p3 - p1) * t2;
                path.curve_to(c1, c2, p2);
            }
            path
        }
    }
}

fn local_tension(prev: Point, at: Point, next: Point) -> f64 {
    if turn_angle(at - prev, next - at) > FRAC_PI_4 {
        CURVE_TENSION * 0.5
    } else {
        CURVE_TENSION
    }
}

/// Half-width at `progress` in `[0, 1]` along a tapered stroke.
///
/// Thickest at the midpoint, thinnest at both ends, never below [`MIN_TAPER_WIDTH`].
/// Each outline edge sits this far from the centerline.
pub fn taper_width(progress: f64, base_width: f64, taper: f64) -> f64 {
    let thin = base_width * (1.0 - taper * MAX_TAPER_REDUCTION);
    lerp(thin, base_width, (progress * PI).sin()).max(MIN_TAPER_WIDTH)
}

/// Per-point half-widths used by [`tapered_outline`].
pub fn taper_widths(count: usize, base_width: f64, taper: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![taper_width(0.0, base_width, taper); count];
    }
    let last = (count - 1) as f64;
    (0..count)
        .map(|i| taper_width(i as f64 / last, base_width, taper))
        .collect()
}

/// Closed outline of a tapered stroke: left side forward, right side reversed.
pub fn tapered_outline(points: &[Point], base_width: f64, taper: f64) -> BezPath {
    let n = points.len();
    if n < 2 {
        let mut path = match points.first() {
            Some(p) => dot_path(*p),
            None => return BezPath::new(),
        };
        path.close_path();
        return path;
    }

    let widths = taper_widths(n, base_width, taper);
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    for (i, (p, half)) in points.iter().zip(&widths).enumerate() {
        let tangent = tangent_at(points, i);
        let normal = Vec2::new(-tangent.y, tangent.x) * *half;
        left.push(*p + normal);
        right.push(*p - normal);
    }

    let mut path = BezPath::new();
    path.move_to(left[0]);
    for p in &left[1..] {
        path.line_to(*p);
    }
    for p in right.iter().rev() {
        path.line_to(*p);
    }
    path.close_path();
    path
}

fn tangent_at(points: &[Point], i: usize) -> Vec2 {
    let n = points.len();
    let dir = if i == 0 {
        points[1] - points[0]
    } else if i == n - 1 {
        points[n - 1] - points[n - 2]
    } else {
        unit_or_zero(points[i] - points[i - 1]) + unit_or_zero(points[i + 1] - points[i])
    };
    let unit = unit_or_zero(dir);
    if unit == Vec2::ZERO {
        FALLBACK_DIRECTION
    } else {
        unit
    }
}

fn unit_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len <= f64::EPSILON { Vec2::ZERO } else { v / len }
}

/// Raw eraser path: quadratic joins through segment midpoints, no smoothing.
pub fn eraser_path(points: &[Point]) -> BezPath {
    match points {
        [] => BezPath::new(),
        [p] => dot_path(*p),
        [a, b] => {
            let mut path = BezPath::new();
            path.move_to(*a);
            path.line_to(*b);
            path
        }
        _ => {
            let n = points.len();
            let mut path = BezPath::new();
            path.move_to(points[0]);
            for i in 1..n - 1 {
                let mid = points[i].midpoint(points[i + 1]);
                path.quad_to(points[i], mid);
            }
            path.line_to(points[n - 1]);
            path
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
