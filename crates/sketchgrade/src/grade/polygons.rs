//! Filled regions of one tool.

use nalgebra::Vector2;

use super::cfg::SEGMENT_SAMPLES;
use super::function::point_relative_to_function;
use super::{Debugger, Verdict};
use crate::coords::Frame;
use crate::expr::Function;
use crate::geom::{collapse_ranges, Polygon, Range, Segment};
use crate::primitive::Primitive;

/// Polygons drawn with one tool, in graph coordinates.
#[derive(Clone, Debug)]
pub struct PolygonSet {
    frame: Frame,
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new(frame: Frame, primitives: &[Primitive]) -> Self {
        let polygons = primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Polygon(vs) => {
                    Polygon::new(vs.iter().map(|&v| frame.to_graph(v)).collect())
                }
                _ => None,
            })
            .collect();
        Self { frame, polygons }
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// x-intervals where some polygon meets the canvas band.
    pub fn range_defined(&self) -> Vec<Range> {
        let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
        let pieces: Vec<Range> = self
            .polygons
            .iter()
            .flat_map(|p| p.ranges_in_band(ylo, yhi))
            .collect();
        collapse_ranges(&pieces)
    }

    /// `match` on a polygon tool: inside or within `tol_px` of a polygon; with one
    /// coordinate, some polygon spans it.
    pub fn contains_point(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        let (xs, ys) = (self.frame.xscale(), self.frame.yscale());
        let hit = match (x, y) {
            (Some(x), Some(y)) => {
                let p = Vector2::new(x, y);
                self.polygons.iter().any(|poly| poly.contains_within(p, tol_px, xs, ys))
            }
            (Some(x), None) => {
                let g = self.frame.x.px_to_units(tol_px);
                self.polygons
                    .iter()
                    .any(|poly| distance_to(poly.x_span(), x) <= g)
            }
            (None, Some(y)) => {
                let g = self.frame.y.px_to_units(tol_px);
                self.polygons
                    .iter()
                    .any(|poly| distance_to(poly.y_span(), y) <= g)
            }
            (None, None) => false,
        };
        if !hit {
            dbg.note(|| format!("No polygon found within {tol_px} pixels of the expected position."));
        }
        hit
    }

    /// Polygon edges cut to `[x1, x2]` and to the canvas band.
    fn edges_in_range(&self, x1: f64, x2: f64) -> Vec<Segment> {
        let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
        self.polygons
            .iter()
            .filter(|p| p.x_span().overlap(x1, x2) > 0.0)
            .flat_map(|p| p.edges())
            .filter_map(|e| e.cut_to_x(x1, x2))
            .filter_map(|e| e.cut_to_y(ylo, yhi))
            .collect()
    }

    /// Every retained edge end lies above (`greater`) or below height `y`, within `tol_px`.
    pub fn compare_to_y(
        &self,
        y: f64,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let edges = self.edges_in_range(x1, x2);
        if edges.is_empty() {
            dbg.note(|| "No values found within range.".to_string());
            return Verdict::Ndef;
        }
        let g = self.frame.y.px_to_units(tol_px);
        let bad = edges
            .iter()
            .flat_map(|e| [e.start, e.end])
            .find(|p| if greater { p.y < y - g } else { p.y > y + g });
        match bad {
            None => Verdict::Pass,
            Some(p) => {
                let off = (p.y - y).abs() * self.frame.yscale();
                dbg.note(|| format!("Point ({}, {}) on polygon is past y = {y} by {off} pixels.", p.x, p.y));
                dbg.note(|| format!("Max allowed is {tol_px} pixels."));
                Verdict::Fail
            }
        }
    }

    /// Every retained edge stays above (`greater`) or below a formula, within `tol_px`.
    pub fn compare_to_function(
        &self,
        f: &Function,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let edges = self.edges_in_range(x1, x2);
        if edges.is_empty() {
            dbg.note(|| "No values found within range.".to_string());
            return Verdict::Ndef;
        }
        for e in edges {
            for i in 0..SEGMENT_SAMPLES {
                let p = e.point_at(i as f64 / (SEGMENT_SAMPLES - 1) as f64);
                if !point_relative_to_function(&self.frame, p, f, greater, tol_px) {
                    dbg.note(|| format!("Polygon at ({}, {}) is on the wrong side of the function.", p.x, p.y));
                    return Verdict::Fail;
                }
            }
        }
        Verdict::Pass
    }
}

/// Distance from `v` to the interval `r`; zero inside.
fn distance_to(r: Range, v: f64) -> f64 {
    if v < r.lo {
        r.lo - v
    } else if v > r.hi {
        v - r.hi
    } else {
        0.0
    }
}
