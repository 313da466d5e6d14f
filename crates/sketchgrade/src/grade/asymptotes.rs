//! Vertical and horizontal lines of one tool.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::cfg::SEGMENT_SAMPLES;
use super::function::point_relative_to_function;
use super::{Debugger, Verdict};
use crate::coords::Frame;
use crate::expr::Function;
use crate::geom::{collapse_ranges, Range};
use crate::primitive::Primitive;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Lines `x = c`.
    Vertical,
    /// Lines `y = c`.
    Horizontal,
}

/// Asymptote positions (graph units) of one orientation, duplicates merged.
#[derive(Clone, Debug)]
pub struct AsymptoteSet {
    frame: Frame,
    orientation: Orientation,
    values: Vec<f64>,
}

impl AsymptoteSet {
    /// Lines closer than the `asym_same` tolerance to an earlier one are merged into it.
    pub fn new(frame: Frame, orientation: Orientation, primitives: &[Primitive]) -> Self {
        let mut raw: Vec<f64> = primitives
            .iter()
            .filter_map(|p| match (orientation, p) {
                (Orientation::Vertical, Primitive::VerticalAsymptote(px)) => {
                    Some(frame.x.pixel_to_coord(*px))
                }
                (Orientation::Horizontal, Primitive::HorizontalAsymptote(py)) => {
                    Some(frame.y.pixel_to_coord(*py))
                }
                _ => None,
            })
            .collect();
        raw.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mut set = Self {
            frame,
            orientation,
            values: Vec::with_capacity(raw.len()),
        };
        let same = frame.tol.asym_same;
        for v in raw {
            if set.values.iter().all(|&w| set.px(v - w) >= same) {
                set.values.push(v);
            }
        }
        set
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Graph-unit distance along this orientation's axis, in pixels.
    fn px(&self, d: f64) -> f64 {
        match self.orientation {
            Orientation::Vertical => d.abs() * self.frame.xscale(),
            Orientation::Horizontal => d.abs() * self.frame.yscale(),
        }
    }

    fn on_canvas(&self, v: f64) -> bool {
        match self.orientation {
            Orientation::Vertical => self.frame.within_x_range(v),
            Orientation::Horizontal => self.frame.within_y_range(v, 0.0, 0.0),
        }
    }

    /// Some line within `tol_px` of `value`.
    pub fn has_asym_at(&self, value: f64, tol_px: f64, dbg: &mut Debugger) -> bool {
        let best = self
            .values
            .iter()
            .map(|&v| self.px(v - value))
            .fold(f64::INFINITY, f64::min);
        if best <= tol_px {
            return true;
        }
        if best.is_finite() {
            dbg.note(|| format!("Closest line is {best} pixels away from {value}."));
            dbg.note(|| format!("Max allowed is {tol_px} pixels."));
        } else {
            dbg.note(|| "No line found.".to_string());
        }
        false
    }

    /// A horizontal line on the canvas spans the whole x-domain; a vertical one is a
    /// single x.
    pub fn range_defined(&self) -> Vec<Range> {
        let (xlo, xhi) = self.frame.x.bounds();
        let pieces: Vec<Range> = self
            .values
            .iter()
            .filter(|&&v| self.on_canvas(v))
            .map(|&v| match self.orientation {
                Orientation::Vertical => Range::new(v, v),
                Orientation::Horizontal => Range::new(xlo, xhi),
            })
            .collect();
        collapse_ranges(&pieces)
    }

    /// Every on-canvas horizontal line lies above (`greater`) or below `y`, within
    /// `tol_px`.
    pub fn compare_to_y(&self, y: f64, tol_px: f64, greater: bool, dbg: &mut Debugger) -> Verdict {
        let lines: Vec<f64> = self.values.iter().copied().filter(|&v| self.on_canvas(v)).collect();
        if lines.is_empty() || self.orientation == Orientation::Vertical {
            dbg.note(|| "No horizontal line found.".to_string());
            return Verdict::Ndef;
        }
        let g = self.frame.y.px_to_units(tol_px);
        match lines.iter().find(|&&v| if greater { v < y - g } else { v > y + g }) {
            None => Verdict::Pass,
            Some(v) => {
                dbg.note(|| format!("Line y = {v} is on the wrong side of y = {y}."));
                Verdict::Fail
            }
        }
    }

    /// Every on-canvas horizontal line stays above (`greater`) or below a formula over
    /// `[x1, x2]`, within `tol_px`.
    pub fn compare_to_function(
        &self,
        f: &Function,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let lines: Vec<f64> = self.values.iter().copied().filter(|&v| self.on_canvas(v)).collect();
        if lines.is_empty() || self.orientation == Orientation::Vertical {
            dbg.note(|| "No horizontal line found.".to_string());
            return Verdict::Ndef;
        }
        let step = (x2 - x1) / (SEGMENT_SAMPLES - 1) as f64;
        for v in lines {
            for i in 0..SEGMENT_SAMPLES {
                let p = Vector2::new(x1 + step * i as f64, v);
                if !point_relative_to_function(&self.frame, p, f, greater, tol_px) {
                    dbg.note(|| format!("Line y = {v} crosses the function near x = {}.", p.x));
                    return Verdict::Fail;
                }
            }
        }
        Verdict::Pass
    }
}
