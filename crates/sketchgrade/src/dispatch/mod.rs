//! Grader dispatch: from a question's grader records to a weighted score.
//!
//! Purpose
//! - Deserialize and validate grader records (`Grader`, `GraderSet`) and the tool
//!   palette they refer to (`ToolRegistry`).
//! - Interpret a submission per tool, run one evaluator per grader over the tools it
//!   selects, and combine the results with weights and stages into a `GradeReport`.
//!
//! Conventions
//! - The grading x-range of every grader is clamped to the canvas minus a 10 px edge
//!   buffer.
//! - A grader passes (1) or fails (0); failing graders report a message plus the
//!   debug lines they collected when `debug` is set.
//! - Stages run in ascending order. The first failure in a nonzero stage zeroes every
//!   grader of a later stage; graders of the same stage are unaffected.
//!
//! Code cross-refs: `grade` (predicates), `primitive::Submission`, `coords::Frame`

pub(crate) mod cfg;
mod grader;
mod modes;
mod score;
mod tools;

pub use grader::{CountMode, Grader, GraderKind, GraderSet, OpenRange, ToolIds};
pub use score::{grade, grade_encoded, GradeReport, GraderOutcome, PartialScore};
pub use tools::{ToolInfo, ToolMarks, ToolRegistry};
