//! Smooth interpolation of sampled points by Bézier control points.

use nalgebra::Vector2;

/// Catmull-Rom interpolation through `points`, as `3n + 1` cubic Bézier control points.
///
/// Every sample is an on-curve knot. Returns an empty list for fewer than two samples.
pub fn interpolate(points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let at = |i: isize| points[i.clamp(0, n as isize - 1) as usize];
    let mut cps = Vec::with_capacity(3 * (n - 1) + 1);
    cps.push(points[0]);
    for i in 0..(n - 1) as isize {
        let (prev, cur, next, after) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        cps.push(cur + (next - prev) / 6.0);
        cps.push(next - (after - cur) / 6.0);
        cps.push(next);
    }
    cps
}
