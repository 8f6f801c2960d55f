use super::*;
use kurbo::Vec2;

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
    assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
    assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
}

#[test]
fn snap_angle_rounds_to_octants() {
    let a = snap_angle_45(0.05);
    assert!(a.abs() < 1e-12);
    let b = snap_angle_45(0.7);
    assert!((b - FRAC_PI_4).abs() < 1e-12);
    let c = snap_angle_45(-1.5);
    assert!((c + 2.0 * FRAC_PI_4).abs() < 1e-12);
}

#[test]
fn turn_angle_handles_degenerate_vectors() {
    assert_eq!(turn_angle(Vec2::ZERO, Vec2::new(1.0, 0.0)), 0.0);
    let right = turn_angle(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
    assert!((right - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}
