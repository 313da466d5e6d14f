//! Numerical constants of the geometry kernel (internal).
//!
//! Policy
//! - Fixed constants, not per-grader tolerances. Pixel thresholds that graders may
//!   tune live in `coords::Tolerances` instead.

/// Parameter slack when deciding whether a root lies on a Bézier piece.
pub(crate) const T_THRESHOLD: f64 = 0.002;
/// Complex roots with a smaller imaginary part are treated as real.
pub(crate) const IMAG_THRESHOLD: f64 = 1e-5;
/// Relative size below which a leading polynomial coefficient is treated as zero.
pub(crate) const LEADING_EPS: f64 = 1e-12;
/// Interior samples used by the straightness test.
#[cfg(test)]
pub(crate) const STRAIGHT_SAMPLES: usize = 25;
/// Maximum perpendicular deviation per unit length, before the `straight_line` factor.
#[cfg(test)]
pub(crate) const STRAIGHT_FACTOR: f64 = 0.4;
