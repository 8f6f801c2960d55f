use std::f64::consts::FRAC_PI_4;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Round an angle (radians) to the nearest multiple of 45 degrees.
pub(crate) fn snap_angle_45(angle: f64) -> f64 {
    (angle / FRAC_PI_4).round() * FRAC_PI_4
}

/// Angle between two direction vectors in `[0, PI]`; zero when either is degenerate.
pub(crate) fn turn_angle(a: kurbo::Vec2, b: kurbo::Vec2) -> f64 {
    let la = a.hypot();
    let lb = b.hypot();
    if la <= f64::EPSILON || lb <= f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
