//! Chains of cubic Bézier pieces sharing endpoints.

use nalgebra::Vector2;

use super::bezier::CubicCurve;
use super::ranges::{collapse_ranges, Range};

/// A piecewise cubic curve in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Spline {
    curves: Vec<CubicCurve>,
}

impl Spline {
    /// Build from `3n + 1` control points; `None` for any other count.
    pub fn from_control_points(cps: &[Vector2<f64>]) -> Option<Self> {
        if cps.len() < 4 || (cps.len() - 1) % 3 != 0 {
            return None;
        }
        let curves = cps
            .windows(4)
            .step_by(3)
            .map(|w| CubicCurve::new(w[0], w[1], w[2], w[3]))
            .collect();
        Some(Self { curves })
    }

    #[inline]
    pub fn curves(&self) -> &[CubicCurve] {
        &self.curves
    }

    pub fn start(&self) -> Vector2<f64> {
        self.curves[0].p[0]
    }

    pub fn end(&self) -> Vector2<f64> {
        self.curves[self.curves.len() - 1].p[3]
    }

    pub fn is_defined_at(&self, x: f64) -> bool {
        self.curves.iter().any(|c| c.is_defined_at(x))
    }

    /// Value on the first piece that covers `x`.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        self.curves.iter().find_map(|c| c.value_at(x))
    }

    pub fn slope_at(&self, x: f64) -> Option<f64> {
        self.curves
            .iter()
            .find(|c| c.is_defined_at(x))
            .and_then(|c| c.slope_at(x))
    }

    pub fn extremes_between(&self, xmin: f64, xmax: f64) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .filter_map(|c| c.extremes_between(xmin, xmax))
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
    }

    pub fn horizontal_line_crossings(&self, y: f64) -> Vec<f64> {
        self.curves
            .iter()
            .flat_map(|c| c.horizontal_line_crossings(y))
            .collect()
    }

    pub fn vertical_line_crossings(&self, x: f64) -> Vec<f64> {
        self.curves
            .iter()
            .flat_map(|c| c.vertical_line_crossings(x))
            .collect()
    }

    pub fn exists_at_y(&self, y: f64) -> bool {
        self.curves.iter().any(|c| !c.ts_at_y(y).is_empty())
    }

    /// Effective domain: x-intervals where the spline runs inside `[ylo, yhi]`.
    pub fn domain(&self, ylo: f64, yhi: f64) -> Vec<Range> {
        let pieces: Vec<Range> = self
            .curves
            .iter()
            .flat_map(|c| c.ranges_in_band(ylo, yhi))
            .collect();
        collapse_ranges(&pieces)
    }

    /// Spline end nearest to `y` in height.
    pub fn closest_endpoint(&self, y: f64) -> Vector2<f64> {
        let (s, e) = (self.start(), self.end());
        if (s.y - y).abs() <= (e.y - y).abs() {
            s
        } else {
            e
        }
    }
}

#[cfg(test)]
impl Spline {
    /// Linearity test over `[xmin, xmax]` in pixel space.
    ///
    /// Samples the spline, fits a total-least-squares line and accepts when the largest
    /// perpendicular deviation stays below `0.4 · straight_line · length`.
    pub(crate) fn is_straight_between(
        &self,
        xmin: f64,
        xmax: f64,
        xscale: f64,
        yscale: f64,
        straight_line: f64,
    ) -> bool {
        use super::cfg::{STRAIGHT_FACTOR, STRAIGHT_SAMPLES};
        use nalgebra::{Matrix2, SymmetricEigen};

        let step = (xmax - xmin) / (STRAIGHT_SAMPLES + 1) as f64;
        let pts: Vec<Vector2<f64>> = (1..=STRAIGHT_SAMPLES)
            .filter_map(|i| {
                let x = xmin + step * i as f64;
                self.value_at(x).map(|y| Vector2::new(x * xscale, y * yscale))
            })
            .collect();
        if pts.len() < 2 {
            return false;
        }
        let n = pts.len() as f64;
        let mean = pts.iter().fold(Vector2::zeros(), |acc, p| acc + p) / n;
        let cov = pts.iter().fold(Matrix2::zeros(), |acc, p| {
            let d = p - mean;
            acc + d * d.transpose()
        }) / n;
        let eig = SymmetricEigen::new(cov);
        let weakest = if eig.eigenvalues[0] <= eig.eigenvalues[1] {
            0
        } else {
            1
        };
        let normal: Vector2<f64> = eig.eigenvectors.column(weakest).into_owned();
        let max_dist = pts
            .iter()
            .map(|p| (p - mean).dot(&normal).abs())
            .fold(0.0, f64::max);
        let length = (pts[pts.len() - 1] - pts[0]).norm();
        max_dist < STRAIGHT_FACTOR * straight_line * length
    }
}
