//! Pixel-denominated tolerance set with the grading defaults.

use serde::{Deserialize, Serialize};

/// Tolerances shared by every evaluator of one grade.
///
/// Distances are pixels; `angle` is degrees; the failure budgets are counts;
/// `straight_line` and the overlap fractions are dimensionless.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Positional tolerance, half the default 20 px grid.
    pub positional: f64,
    pub angle: f64,
    /// Asymptotes closer than this are merged into one.
    pub asym_same: f64,
    /// Maximum offset between an asymptote and its target value.
    pub asym_distance: f64,
    /// Largest gap in a spline chain still treated as continuous.
    pub gap: f64,
    /// Half-width of the window searched for a local extremum.
    pub extrema: f64,
    pub curve_failure: f64,
    pub inc_dec_failure: f64,
    pub straight_line: f64,
    pub min_percent_overlap: f64,
    pub max_percent_overlap: f64,
    /// Slack around a polygon edge still counted as inside.
    pub point_distance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            positional: 10.0,
            angle: 10.0,
            asym_same: 10.0,
            asym_distance: 20.0,
            gap: 40.0,
            extrema: 20.0,
            curve_failure: 1.0,
            inc_dec_failure: 2.0,
            straight_line: 0.1,
            min_percent_overlap: 0.10,
            max_percent_overlap: 0.95,
            point_distance: 10.0,
        }
    }
}
