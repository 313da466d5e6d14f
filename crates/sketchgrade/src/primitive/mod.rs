//! Primitive model: the typed drawing atoms a submission is made of.
//!
//! Purpose
//! - `Primitive` is the closed sum of everything a student can place on the canvas.
//! - `Mark`/`RawMark` are the sketch wire shapes; `Primitive::from_mark` interprets a
//!   mark according to the tool that produced it.
//! - Drawing elements (vectors, arcs, loads, controlled lines, points) carry their own
//!   grading geometry, including the `ErrorBox`.
//!
//! Coordinates are canvas pixels throughout this module.
//!
//! Code cross-refs: `Primitive`, `ErrorBox`, `Submission`, `ToolKind`

mod element;
mod mark;
mod submission;

pub use element::{
    angle_error, ArcVectorElement, ControlledCurvedLineElement, ControlledLineElement, ErrorBox,
    LoadElement, PointElement, VectorElement,
};
pub use mark::{linear_fit_r2, Mark, Primitive, RawMark, ToolKind};
pub use submission::{Submission, SubmissionMeta};

#[cfg(test)]
mod tests;
