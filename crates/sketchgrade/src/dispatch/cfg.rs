//! Fixed constants of grader dispatch (internal).

/// Grey margin (px) at each side of the canvas excluded from the grading x-range.
pub(crate) const EDGE_BUFFER_PX: f64 = 10.0;
/// Samples taken along a function for the monotonicity check.
pub(crate) const MONOTONE_SAMPLES: usize = 10;
/// Pieces a function is cut into for the concavity check.
pub(crate) const CONCAVE_SEGMENTS: usize = 5;
/// Share of a formula's domain a `match-fun` submission must cover.
pub(crate) const DOMAIN_COVERAGE: f64 = 0.9;
/// Width (px) of the windows scanned for a gap by single-x `undefined-in`.
pub(crate) const GAP_WINDOW_PX: f64 = 2.0;
/// Tool diameter (px) assumed when a point tool does not state one.
pub(crate) const POINT_DIAMETER_PX: f64 = 8.0;
/// Smallest tolerance a grader may state.
pub(crate) const MIN_TOLERANCE: f64 = 1.0;
/// Default `undefined-in` tolerance (px) on a range narrower than twice the usual one.
pub(crate) const NARROW_RANGE_TOLERANCE_PX: f64 = 2.0;
