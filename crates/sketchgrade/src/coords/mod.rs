//! Coordinate model: canvas axes, pixel↔graph conversion, tolerance scaling.
//!
//! Purpose
//! - Map the canvas pixel grid onto graph coordinates with one linear map per axis.
//! - Carry the pixel-denominated tolerance set next to the axes so evaluators can
//!   convert thresholds to graph units at the point of use.
//!
//! Conventions
//! - The y-axis is stored with an inverted domain: pixel row 0 is the top of the
//!   canvas and maps to `yrange[1]`.
//! - All geometric reasoning downstream happens in graph units; pixels only appear
//!   in user-facing distance thresholds.
//!
//! Code cross-refs: `Axis`, `CanvasConfig`, `Frame`, `Tolerances`

mod axis;
mod tolerance;

pub use axis::{Axis, CanvasConfig, Frame};
pub use tolerance::Tolerances;

#[cfg(test)]
mod tests;
