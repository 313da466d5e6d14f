//! Fixed constants of the predicate layer (internal).
//!
//! Pixel values here are not grader-tunable; see `coords::Tolerances` for those.

/// Freehand points closer than this (px) to an earlier point are duplicates.
pub(crate) const POINT_DEDUP_PX: f64 = 10.0;
/// Half-width (px) of the x-interval a lone point counts as defining.
pub(crate) const POINT_MARGIN_PX: f64 = 6.0;
/// Formula values closer than this (px) to the canvas edge are ignored.
pub(crate) const FUNCTION_EDGE_PX: f64 = 10.0;
/// Evenly spaced divisions used when turning a formula into splines.
pub(crate) const FUNCTION_SAMPLES: usize = 102;
/// Pixel-scaled slope angle (radians) above which samples are matched along x.
pub(crate) const STEEP_ANGLE: f64 = 1.3;
/// Samples taken along a submission when comparing it with a formula.
pub(crate) const FORMULA_SAMPLES: usize = 20;
/// Overlap (px) a submission may have with a range still called empty, for formula matching.
pub(crate) const MATCH_EMPTY_PX: f64 = 2.0;
/// Same, for comparisons against a formula or a line.
pub(crate) const COMPARE_EMPTY_PX: f64 = 10.0;
/// Samples taken along each straight piece when comparing it with a formula.
pub(crate) const SEGMENT_SAMPLES: usize = 10;
