//! Geometric grading of sketched answers.
//!
//! A submission is a set of marks drawn with palette tools on a canvas whose pixel
//! grid maps onto a graph coordinate system. Graders authored with the question
//! (match a formula, be monotone on a range, count elements, ...) are evaluated
//! against those marks and combined into a weighted score with feedback.
//!
//! Layers, bottom-up:
//! - `coords`: axes, pixel↔graph mapping, tolerance set.
//! - `primitive`: typed drawing atoms and the submission wire format.
//! - `geom`: Bézier/spline evaluation, segments, polygons, interval unions.
//! - `expr`: sandboxed formulas in `x`.
//! - `grade`: predicates over the marks of one tool.
//! - `dispatch`: grader records, per-kind evaluators, staged weighted scoring.
//! - `drawing`: element-by-element grading of free-body style drawings.
//!
//! Entry points: [`dispatch::grade_encoded`], [`dispatch::grade`],
//! [`drawing::grade_drawing`].

pub mod api;
pub mod coords;
pub mod dispatch;
pub mod drawing;
pub mod error;
pub mod expr;
pub mod geom;
pub mod grade;
pub mod primitive;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GradeError, SubmissionError};

/// Common exports for callers grading sketches.
pub mod prelude {
    pub use crate::coords::{CanvasConfig, Frame, Tolerances};
    pub use crate::dispatch::{
        grade, grade_encoded, CountMode, GradeReport, Grader, GraderKind, GraderSet, ToolInfo,
    };
    pub use crate::drawing::{grade_drawing, Drawing, DrawingOptions, DrawingReport};
    pub use crate::error::{GradeError, SubmissionError};
    pub use crate::expr::Function;
    pub use crate::primitive::{Primitive, RawMark, Submission, ToolKind};
    pub use nalgebra::Vector2 as Vec2;
}
