//! Predicate building blocks: what a grader can ask of one tool's marks.
//!
//! Purpose
//! - Wrap the marks of a single tool in a set type (`FunctionSet`, `SegmentSet`,
//!   `PolygonSet`, `AsymptoteSet`) that answers graph-unit questions with pixel
//!   tolerances: where is it defined, does it pass through a point, is it monotone,
//!   does it stay above a line or a formula.
//! - Tri-valued answers use `Verdict`; `Ndef` means the marks have no data in the
//!   queried range and the dispatcher decides what that is worth.
//! - `Debugger` collects the explanation lines reported back when a grader asks for
//!   them.
//!
//! All sets work in graph coordinates. Tolerances passed to methods are pixels unless
//! the parameter name says otherwise.
//!
//! Code cross-refs: `dispatch::modes` (the only caller), `geom` (the geometry kernel)

mod asymptotes;
pub(crate) mod cfg;
mod comparer;
mod debugger;
mod function;
mod polygons;
mod segments;
mod verdict;

pub use asymptotes::{AsymptoteSet, Orientation};
pub use comparer::{always_holds, Comparison};
pub use debugger::Debugger;
pub use function::{function_splines, point_on_function, point_relative_to_function, FunctionSet};
pub use polygons::PolygonSet;
pub use segments::{Endpoint, SegmentSet};
pub use verdict::Verdict;

#[cfg(test)]
mod tests;
