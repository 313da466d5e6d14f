//! Cubic Bézier pieces with cached power-basis polynomials.

use nalgebra::Vector2;

use super::cfg::T_THRESHOLD;
use super::ranges::Range;
use super::roots::{derivative, eval_cubic, roots_in_unit};

/// One cubic piece. `xc`/`yc` hold `x(t)`/`y(t)` as `[t³, t², t, 1]` coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCurve {
    pub p: [Vector2<f64>; 4],
    xc: [f64; 4],
    yc: [f64; 4],
    dxc: [f64; 4],
    dyc: [f64; 4],
}

fn power_basis(p0: f64, p1: f64, p2: f64, p3: f64) -> [f64; 4] {
    [
        -p0 + 3.0 * p1 - 3.0 * p2 + p3,
        3.0 * p0 - 6.0 * p1 + 3.0 * p2,
        -3.0 * p0 + 3.0 * p1,
        p0,
    ]
}

#[inline]
fn shifted(mut c: [f64; 4], v: f64) -> [f64; 4] {
    c[3] -= v;
    c
}

impl CubicCurve {
    pub fn new(p0: Vector2<f64>, p1: Vector2<f64>, p2: Vector2<f64>, p3: Vector2<f64>) -> Self {
        let xc = power_basis(p0.x, p1.x, p2.x, p3.x);
        let yc = power_basis(p0.y, p1.y, p2.y, p3.y);
        Self {
            p: [p0, p1, p2, p3],
            xc,
            yc,
            dxc: derivative(xc),
            dyc: derivative(yc),
        }
    }

    #[inline]
    pub fn x_at(&self, t: f64) -> f64 {
        eval_cubic(self.xc, t)
    }

    #[inline]
    pub fn y_at(&self, t: f64) -> f64 {
        eval_cubic(self.yc, t)
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vector2<f64> {
        Vector2::new(self.x_at(t), self.y_at(t))
    }

    /// Parameters where `x(t) = x`, ascending.
    pub fn ts_at_x(&self, x: f64) -> Vec<f64> {
        roots_in_unit(shifted(self.xc, x), T_THRESHOLD)
    }

    /// Parameters where `y(t) = y`, ascending.
    pub fn ts_at_y(&self, y: f64) -> Vec<f64> {
        roots_in_unit(shifted(self.yc, y), T_THRESHOLD)
    }

    #[inline]
    pub fn is_defined_at(&self, x: f64) -> bool {
        !self.ts_at_x(x).is_empty()
    }

    /// `y` at the first root of `x(t) = x`.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        self.ts_at_x(x).first().map(|&t| self.y_at(t))
    }

    /// `dy/dx` at the first root of `x(t) = x`; `None` where the tangent is vertical.
    pub fn slope_at(&self, x: f64) -> Option<f64> {
        let t = *self.ts_at_x(x).first()?;
        let dx = eval_cubic(self.dxc, t);
        let dy = eval_cubic(self.dyc, t);
        (dx.abs() > f64::EPSILON).then(|| dy / dx)
    }

    pub fn horizontal_line_crossings(&self, y: f64) -> Vec<f64> {
        self.ts_at_y(y).into_iter().map(|t| self.x_at(t)).collect()
    }

    pub fn vertical_line_crossings(&self, x: f64) -> Vec<f64> {
        self.ts_at_x(x).into_iter().map(|t| self.y_at(t)).collect()
    }

    /// Turning points of `x(t)` inside `(0, 1)` together with both ends.
    fn x_breaks(&self) -> Vec<f64> {
        let mut ts = vec![0.0, 1.0];
        ts.extend(roots_in_unit(self.dxc, 0.0));
        ts
    }

    /// `[min x, max x]` over the piece.
    pub fn x_extent(&self) -> Range {
        let xs = self.x_breaks().into_iter().map(|t| self.x_at(t));
        let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        Range { lo, hi }
    }

    /// `(min y, max y)` over the parts of the piece with `x ∈ [xmin, xmax]`.
    pub fn extremes_between(&self, xmin: f64, xmax: f64) -> Option<(f64, f64)> {
        let mut ts = self.x_breaks();
        ts.extend(self.ts_at_x(xmin));
        ts.extend(self.ts_at_x(xmax));
        ts.extend(roots_in_unit(self.dyc, 0.0));
        let slack = 1e-9 * (1.0 + xmin.abs().max(xmax.abs()));
        ts.into_iter()
            .filter(|&t| {
                let x = self.x_at(t);
                x >= xmin - slack && x <= xmax + slack
            })
            .map(|t| self.y_at(t))
            .fold(None, |acc, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((f64::min(lo, y), f64::max(hi, y))),
            })
    }

    /// x-intervals where the piece runs inside the horizontal band `[ylo, yhi]`.
    pub fn ranges_in_band(&self, ylo: f64, yhi: f64) -> Vec<Range> {
        let mut ts = self.x_breaks();
        ts.extend(roots_in_unit(shifted(self.yc, ylo), 0.0));
        ts.extend(roots_in_unit(shifted(self.yc, yhi), 0.0));
        ts.sort_by(|a, b| a.total_cmp(b));
        ts.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        ts.windows(2)
            .filter_map(|w| {
                let mid = self.y_at(0.5 * (w[0] + w[1]));
                (ylo <= mid && mid <= yhi).then(|| Range::new(self.x_at(w[0]), self.x_at(w[1])))
            })
            .collect()
    }
}
