//! Drawing-element grading: student objects against an answer drawing.
//!
//! Purpose
//! - Parse drawing objects (`gradingName`-tagged JSON) into element primitives.
//! - Pair each answer element with at most one student element of the same kind and
//!   score the pairing, penalizing extra elements once everything expected is there.
//!
//! All positions and tolerances are canvas pixels; angles are degrees.
//!
//! Code cross-refs: `primitive::ErrorBox`, `primitive::VectorElement::matches`

mod element;
mod score;

pub use element::{element_matches, grading_name, DrawnElement};
pub use score::{grade_drawing, Drawing, DrawingOptions, DrawingReport};

#[cfg(test)]
mod tests;
