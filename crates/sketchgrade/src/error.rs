//! Error types surfaced by the grading core.

use thiserror::Error;

use crate::expr::ExprError;

/// A submission that cannot be decoded or interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// Transport text is not valid base64 in either alphabet.
    #[error("submission is not valid base64: {0}")]
    Base64(String),

    /// Decoded bytes are not the expected JSON document.
    #[error("submission is not valid JSON: {0}")]
    Json(String),

    /// A mark carries none of the recognised geometry keys.
    #[error("mark carries no geometry")]
    EmptyMark,

    /// A spline mark whose control points do not form `3n + 1` pieces.
    #[error("spline has {0} control points, expected 3n+1 with n >= 1")]
    BadControlPointCount(usize),

    /// A polygon with fewer than three vertices.
    #[error("polygon has {0} vertices, expected at least 3")]
    DegeneratePolygon(usize),

    /// A coordinate is NaN or infinite.
    #[error("mark contains a non-finite coordinate")]
    NonFinite,

    /// Marks filed under a tool id the question does not define.
    #[error("unknown tool id: {0}")]
    UnknownTool(String),
}

/// Top-level grading error.
///
/// Only question-authoring problems escape `grade_encoded`; submission problems are
/// converted to a zero score with an explanation instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A grader record is missing a required field or names something unknown.
    #[error("grader {index} ({kind}) is invalid: {reason}")]
    InvalidGrader {
        index: usize,
        kind: String,
        reason: String,
    },

    /// The `fun` of a grader does not compile in the expression sandbox.
    #[error("grader {index} has an invalid function: {source}")]
    Expression { index: usize, source: ExprError },

    /// Canvas metadata cannot define an axis.
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
}
