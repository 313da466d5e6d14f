//! Real roots of polynomials up to degree three.
//!
//! Closed-form (Cardano / trigonometric) solutions followed by Newton polishing.
//! Complex pairs whose imaginary part is below `IMAG_THRESHOLD` contribute their
//! real part; all other complex roots are dropped.

use std::cmp::Ordering;
use std::f64::consts::PI;

use super::cfg::{IMAG_THRESHOLD, LEADING_EPS};

/// Evaluate `a t³ + b t² + c t + d`.
#[inline]
pub fn eval_cubic(coeffs: [f64; 4], t: f64) -> f64 {
    let [a, b, c, d] = coeffs;
    ((a * t + b) * t + c) * t + d
}

/// Coefficients of the derivative, still in cubic layout.
#[inline]
pub fn derivative(coeffs: [f64; 4]) -> [f64; 4] {
    let [a, b, c, _] = coeffs;
    [0.0, 3.0 * a, 2.0 * b, c]
}

/// Real roots of `a t³ + b t² + c t + d`, ascending, duplicates merged.
///
/// An identically zero polynomial has no isolated roots and yields an empty list.
pub fn real_roots(coeffs: [f64; 4]) -> Vec<f64> {
    let [a, b, c, d] = coeffs;
    let scale = a.abs().max(b.abs()).max(c.abs()).max(d.abs());
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }
    let mut roots = if a.abs() > LEADING_EPS * scale {
        cubic(b / a, c / a, d / a)
    } else if b.abs() > LEADING_EPS * scale {
        quadratic(b, c, d)
    } else if c.abs() > LEADING_EPS * scale {
        vec![-d / c]
    } else {
        Vec::new()
    };
    for r in roots.iter_mut() {
        *r = polish(coeffs, *r);
    }
    roots.retain(|r| r.is_finite());
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    roots.dedup_by(|x, y| (*x - *y).abs() <= 1e-12 * (1.0 + y.abs()));
    roots
}

/// Real roots that fall in `[-eps, 1 + eps]`, clamped into `[0, 1]`.
pub fn roots_in_unit(coeffs: [f64; 4], eps: f64) -> Vec<f64> {
    let mut ts: Vec<f64> = real_roots(coeffs)
        .into_iter()
        .filter(|t| *t >= -eps && *t <= 1.0 + eps)
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    ts.dedup_by(|x, y| (*x - *y).abs() <= 1e-12);
    ts
}

fn quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let imag = (-disc).sqrt() / (2.0 * a.abs());
        return if imag < IMAG_THRESHOLD {
            vec![-b / (2.0 * a)]
        } else {
            Vec::new()
        };
    }
    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    if q == 0.0 {
        // b == 0 and disc == 0, so c == 0 too: double root at zero.
        return vec![0.0];
    }
    vec![q / a, c / q]
}

/// Monic cubic `t³ + b t² + c t + d`.
fn cubic(b: f64, c: f64, d: f64) -> Vec<f64> {
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);
    if disc > 0.0 {
        let sq = disc.sqrt();
        let u = (-q / 2.0 + sq).cbrt();
        let v = (-q / 2.0 - sq).cbrt();
        let mut out = vec![u + v - shift];
        let imag = 3.0_f64.sqrt() / 2.0 * (u - v).abs();
        if imag < IMAG_THRESHOLD {
            out.push(-(u + v) / 2.0 - shift);
        }
        out
    } else if p == 0.0 {
        vec![-shift]
    } else {
        let r = 2.0 * (-p / 3.0).sqrt();
        let arg = (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let phi = arg.acos() / 3.0;
        (0..3)
            .map(|k| r * (phi - 2.0 * PI * k as f64 / 3.0).cos() - shift)
            .collect()
    }
}

/// A few Newton steps on the unreduced cubic; keeps the input if a step diverges.
fn polish(coeffs: [f64; 4], mut t: f64) -> f64 {
    let dc = derivative(coeffs);
    for _ in 0..3 {
        let f = eval_cubic(coeffs, t);
        let df = eval_cubic(dc, t);
        if df == 0.0 || !df.is_finite() {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() || eval_cubic(coeffs, next).abs() > f.abs() {
            break;
        }
        t = next;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn three_distinct_roots() {
        // (t-1)(t-2)(t-3)
        let r = real_roots([1.0, -6.0, 11.0, -6.0]);
        assert!(close(&r, &[1.0, 2.0, 3.0]), "{r:?}");
    }

    #[test]
    fn single_real_root_with_complex_pair() {
        // t³ + t = t(t² + 1)
        let r = real_roots([1.0, 0.0, 1.0, 0.0]);
        assert!(close(&r, &[0.0]), "{r:?}");
    }

    #[test]
    fn double_root_survives() {
        // (t-0.5)²(t+1)
        let r = real_roots([1.0, 0.0, -0.75, 0.25]);
        assert!(r.iter().any(|t| (t - 0.5).abs() < 1e-6), "{r:?}");
        assert!(r.iter().any(|t| (t + 1.0).abs() < 1e-9), "{r:?}");
    }

    #[test]
    fn degenerate_degrees() {
        assert!(close(&real_roots([0.0, 1.0, -3.0, 2.0]), &[1.0, 2.0]));
        assert!(close(&real_roots([0.0, 0.0, 2.0, -1.0]), &[0.5]));
        assert!(real_roots([0.0, 0.0, 0.0, 1.0]).is_empty());
        assert!(real_roots([0.0, 0.0, 0.0, 0.0]).is_empty());
        assert!(real_roots([0.0, 1.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn unit_window_clamps_near_misses() {
        // Root at t = 1.001, inside the slack.
        let ts = roots_in_unit([0.0, 0.0, 1.0, -1.001], 0.002);
        assert_eq!(ts, vec![1.0]);
        assert!(roots_in_unit([0.0, 0.0, 1.0, -1.01], 0.002).is_empty());
    }
}
