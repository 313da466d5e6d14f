//! Geometry kernel: polynomial roots, Bézier pieces, splines, segments, polygons.
//!
//! Purpose
//! - Answer the questions predicates ask of a drawn shape: where is it defined, what is
//!   its value or extremum over an x-window, where does it cross a line, is it straight.
//! - Everything here works in graph coordinates. Pixel scales are passed in explicitly
//!   where a threshold is pixel-denominated.
//!
//! References
//! - Code cross-refs: `CubicCurve`, `Spline`, `Segment`, `Polygon`, `Range`, `collapse_ranges`

pub(crate) mod cfg;
pub mod bezier;
pub mod fit;
pub mod polygon;
pub mod ranges;
pub mod roots;
pub mod segment;
pub mod spline;

pub use bezier::CubicCurve;
pub use polygon::Polygon;
pub use ranges::{collapse_ranges, covered_length, gap_length, Range};
pub use segment::Segment;
pub use spline::Spline;
