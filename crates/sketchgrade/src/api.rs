//! Curated re-exports for code that works below the grader table.
//!
//! The prelude covers grading a submission end to end; this module adds the building
//! blocks for composing custom checks over one tool's marks.

// Coordinates
pub use crate::coords::{Axis, CanvasConfig, Frame, Tolerances};
// Geometry
pub use crate::geom::{
    collapse_ranges, covered_length, gap_length, CubicCurve, Polygon, Range, Segment, Spline,
};
// Per-tool predicates
pub use crate::grade::{
    function_splines, AsymptoteSet, Comparison, Debugger, Endpoint, FunctionSet, Orientation,
    PolygonSet, SegmentSet, Verdict,
};
// Primitives and elements
pub use crate::primitive::{
    angle_error, ErrorBox, LoadElement, Mark, PointElement, Primitive, RawMark, Submission,
    ToolKind, VectorElement,
};
// Dispatch
pub use crate::dispatch::{
    GradeReport, Grader, GraderKind, GraderOutcome, GraderSet, PartialScore, ToolInfo,
    ToolMarks, ToolRegistry,
};
// Formulas
pub use crate::expr::{EvalError, ExprError, Function, InvalidOpGuard};
