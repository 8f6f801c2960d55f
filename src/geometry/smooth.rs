use crate::foundation::core::Point;

/// True when `candidate` is far enough from the last admitted point to be kept.
///
/// The threshold is the smoothing parameter itself, so stronger smoothing admits fewer,
/// more widely spaced points.
pub fn admits(last: Option<Point>, candidate: Point, smoothing: f64) -> bool {
    match last {
        None => true,
        Some(last) => last.distance(candidate) > smoothing,
    }
}

/// Neighbor radius of the moving average for a smoothing strength.
pub fn smoothing_radius(smoothing: f64) -> usize {
    if smoothing <= 2.0 {
        0
    } else if smoothing <= 5.0 {
        1
    } else {
        2
    }
}

/// Centered weighted moving average (center weight 2, neighbors 1).
///
/// Point count is preserved and the first and last points are never moved.
pub fn smooth_points(points: &[Point], smoothing: f64) -> Vec<Point> {
    let radius = smoothing_radius(smoothing);
    let n = points.len();
    if radius == 0 || n < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(n);
    out.push(points[0]);
    for i in 1..n - 1 {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius).min(n - 1);
        let (mut sx, mut sy, mut wsum) = (0.0, 0.0, 0.0);
        for (j, p) in points.iter().enumerate().take(hi + 1).skip(lo) {
            let w = if j == i { 2.0 } else { 1.0 };
            sx += p.x * w;
            sy += p.y * w;
            wsum += w;
        }
        out.push(Point::new(sx / wsum, sy / wsum));
    }
    out.push(points[n - 1]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/smooth.rs"]
mod tests;
