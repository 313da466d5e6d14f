//! Linear axes and the per-submission frame.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::Tolerances;
use crate::error::GradeError;

/// One canvas axis: a linear map from `[0, pixels]` onto `domain`.
///
/// Invariants: `pixels > 0`, `low != high`, both finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis {
    low: f64,
    high: f64,
    pixels: f64,
}

impl Axis {
    pub fn new(domain: (f64, f64), pixels: u32) -> Result<Self, GradeError> {
        let (low, high) = domain;
        if pixels == 0 {
            return Err(GradeError::InvalidCanvas("axis has zero pixels".into()));
        }
        if !low.is_finite() || !high.is_finite() || low == high {
            return Err(GradeError::InvalidCanvas(format!(
                "degenerate axis domain [{low}, {high}]"
            )));
        }
        Ok(Self {
            low,
            high,
            pixels: pixels as f64,
        })
    }

    #[inline]
    pub fn pixel_to_coord(&self, px: f64) -> f64 {
        self.low + px * (self.high - self.low) / self.pixels
    }

    #[inline]
    pub fn coord_to_pixel(&self, v: f64) -> f64 {
        (v - self.low) * self.pixels / (self.high - self.low)
    }

    /// Pixels per graph unit (always positive).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.pixels / (self.high - self.low).abs()
    }

    /// Convert a pixel distance to a graph-unit distance.
    #[inline]
    pub fn px_to_units(&self, px: f64) -> f64 {
        px / self.scale()
    }

    /// Convert a graph-unit distance to a pixel distance.
    #[inline]
    pub fn units_to_px(&self, units: f64) -> f64 {
        units * self.scale()
    }

    /// Domain as `(min, max)` regardless of orientation.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.low.min(self.high), self.low.max(self.high))
    }

    #[inline]
    pub fn pixels(&self) -> f64 {
        self.pixels
    }
}

/// Canvas metadata shipped with every submission.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub xrange: [f64; 2],
    pub yrange: [f64; 2],
    pub width: u32,
    pub height: u32,
}

impl CanvasConfig {
    pub fn x_axis(&self) -> Result<Axis, GradeError> {
        Axis::new((self.xrange[0], self.xrange[1]), self.width)
    }

    /// The y-axis runs top-down on screen, so its domain is inverted.
    pub fn y_axis(&self) -> Result<Axis, GradeError> {
        Axis::new((self.yrange[1], self.yrange[0]), self.height)
    }

    /// The canvas with x and y exchanged, used for xy-flipped grading.
    pub fn flipped(&self) -> Self {
        Self {
            xrange: self.yrange,
            yrange: self.xrange,
            width: self.height,
            height: self.width,
        }
    }
}

/// Both axes of one submission plus the tolerance set in force.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub x: Axis,
    pub y: Axis,
    pub tol: Tolerances,
}

impl Frame {
    pub fn new(canvas: &CanvasConfig, tol: Tolerances) -> Result<Self, GradeError> {
        Ok(Self {
            x: canvas.x_axis()?,
            y: canvas.y_axis()?,
            tol,
        })
    }

    /// Pixels per graph unit along x.
    #[inline]
    pub fn xscale(&self) -> f64 {
        self.x.scale()
    }

    /// Pixels per graph unit along y.
    #[inline]
    pub fn yscale(&self) -> f64 {
        self.y.scale()
    }

    #[inline]
    pub fn to_graph(&self, px: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(self.x.pixel_to_coord(px.x), self.y.pixel_to_coord(px.y))
    }

    #[inline]
    pub fn to_pixel(&self, p: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(self.x.coord_to_pixel(p.x), self.y.coord_to_pixel(p.y))
    }

    /// Euclidean distance between two graph points, measured in pixels.
    #[inline]
    pub fn px_distance(&self, a: Vector2<f64>, b: Vector2<f64>) -> f64 {
        let dx = (a.x - b.x) * self.xscale();
        let dy = (a.y - b.y) * self.yscale();
        dx.hypot(dy)
    }

    pub fn within_x_range(&self, x: f64) -> bool {
        let (lo, hi) = self.x.bounds();
        lo <= x && x <= hi
    }

    /// True iff `y` lies in the y-domain shrunk by `neg_px` and expanded by `pos_px`.
    pub fn within_y_range(&self, y: f64, neg_px: f64, pos_px: f64) -> bool {
        let (lo, hi) = self.y_band(neg_px, pos_px);
        lo <= y && y <= hi
    }

    /// The y-domain shrunk by `neg_px` and expanded by `pos_px`, in graph units.
    pub fn y_band(&self, neg_px: f64, pos_px: f64) -> (f64, f64) {
        let (lo, hi) = self.y.bounds();
        let d = (neg_px - pos_px) / self.yscale();
        (lo + d, hi - d)
    }
}
