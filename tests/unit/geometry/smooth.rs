use super::*;

fn zigzag(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| Point::new(i as f64 * 10.0, if i % 2 == 0 { 0.0 } else { 10.0 }))
        .collect()
}

#[test]
fn first_sample_is_always_admitted() {
    assert!(admits(None, Point::new(3.0, 4.0), 100.0));
}

#[test]
fn admission_requires_distance_above_smoothing() {
    let last = Some(Point::new(0.0, 0.0));
    assert!(!admits(last, Point::new(3.0, 4.0), 5.0));
    assert!(admits(last, Point::new(3.0, 4.1), 5.0));
    assert!(!admits(last, Point::new(0.0, 0.0), 0.0));
}

#[test]
fn radius_bands() {
    assert_eq!(smoothing_radius(0.0), 0);
    assert_eq!(smoothing_radius(2.0), 0);
    assert_eq!(smoothing_radius(4.0), 1);
    assert_eq!(smoothing_radius(6.0), 2);
}

#[test]
fn zero_smoothing_is_identity() {
    let pts = zigzag(6);
    assert_eq!(smooth_points(&pts, 0.0), pts);
}

#[test]
fn strong_smoothing_preserves_count_and_endpoints() {
    let pts = zigzag(7);
    let out = smooth_points(&pts, 8.0);
    assert_eq!(out.len(), pts.len());
    assert_eq!(out[0], pts[0]);
    assert_eq!(out[6], pts[6]);
    assert!(out[1..6].iter().zip(&pts[1..6]).any(|(a, b)| a != b));
}

#[test]
fn weighted_average_for_radius_one() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(20.0, 0.0),
    ];
    let out = smooth_points(&pts, 4.0);
    // (0 + 2*10 + 20) / 4 = 10, (0 + 2*10 + 0) / 4 = 5
    assert_eq!(out[1], Point::new(10.0, 5.0));
}
