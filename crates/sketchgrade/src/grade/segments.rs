//! Straight marks of one tool: line segments and polyline pieces.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::cfg::{COMPARE_EMPTY_PX, SEGMENT_SAMPLES};
use super::function::point_relative_to_function;
use super::{Debugger, Verdict};
use crate::coords::Frame;
use crate::expr::Function;
use crate::geom::{collapse_ranges, Range, Segment};
use crate::primitive::{angle_error, Primitive};

/// Which end of a segment a `match` grader checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
    Either,
}

/// Straight pieces drawn with one tool, in graph coordinates.
#[derive(Clone, Debug)]
pub struct SegmentSet {
    frame: Frame,
    segments: Vec<Segment>,
}

impl SegmentSet {
    /// Collect line segments and polyline pieces; anything else is ignored.
    pub fn new(frame: Frame, primitives: &[Primitive]) -> Self {
        let segments = primitives
            .iter()
            .flat_map(Primitive::segments)
            .map(|(a, b)| Segment::new(frame.to_graph(a), frame.to_graph(b)))
            .collect();
        Self { frame, segments }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn on_canvas(&self, seg: &Segment) -> Option<Segment> {
        let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
        seg.cut_to_y(ylo, yhi)
    }

    /// x-extents of the on-canvas parts.
    pub fn range_defined(&self) -> Vec<Range> {
        let pieces: Vec<Range> = self
            .segments
            .iter()
            .filter_map(|s| self.on_canvas(s))
            .map(|s| Range::new(s.start.x, s.end.x))
            .collect();
        collapse_ranges(&pieces)
    }

    /// Some part of `seg` over `[x1, x2]` ends inside the canvas shrunk by `neg_px`.
    fn within_y_between_x(&self, seg: &Segment, x1: f64, x2: f64, neg_px: f64) -> bool {
        seg.cut_to_x(x1, x2).is_some_and(|c| {
            self.frame.within_y_range(c.start.y, neg_px, 0.0)
                || self.frame.within_y_range(c.end.y, neg_px, 0.0)
        })
    }

    fn percent_overlap(&self, seg: &Segment, xmin: f64, xmax: f64) -> f64 {
        if xmax <= xmin {
            return 0.0;
        }
        self.on_canvas(seg)
            .map_or(0.0, |c| c.overlap_length(xmin, xmax) / (xmax - xmin))
    }

    /// Pieces covering more than `min_percent_overlap` of `[xmin, xmax]` on the canvas.
    pub fn strict_between(&self, xmin: f64, xmax: f64) -> Vec<Segment> {
        let min_share = self.frame.tol.min_percent_overlap;
        self.segments
            .iter()
            .filter(|s| {
                self.percent_overlap(s, xmin, xmax) > min_share
                    && self.within_y_between_x(s, xmin, xmax, 0.0)
            })
            .copied()
            .collect()
    }

    /// Pieces touching `[xmin, xmax]` widened by `slack_px` whose part in the range
    /// comes onto the canvas.
    pub fn between(&self, xmin: f64, xmax: f64, slack_px: f64) -> Vec<Segment> {
        let g = self.frame.x.px_to_units(slack_px);
        self.segments
            .iter()
            .filter(|s| {
                s.max_x() >= xmin - g
                    && s.min_x() <= xmax + g
                    && self.within_y_between_x(s, xmin - g, xmax + g, COMPARE_EMPTY_PX)
            })
            .copied()
            .collect()
    }

    /// Every piece in range rises (`increasing`) or falls from left to right.
    pub fn monotone_between(
        &self,
        xmin: f64,
        xmax: f64,
        increasing: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let segs = self.strict_between(xmin, xmax);
        if segs.is_empty() {
            dbg.note(|| "Line not within range.".to_string());
            return Verdict::Ndef;
        }
        for seg in segs {
            let on = |y: f64| self.frame.within_y_range(y, 0.0, 0.0);
            if !on(seg.start.y) && !on(seg.end.y) {
                continue;
            }
            let s = seg.ordered_by_x();
            let ok = if increasing {
                s.end.y > s.start.y
            } else {
                s.end.y < s.start.y
            };
            if !ok {
                dbg.note(|| format!("Start point: ({}, {}).", s.start.x, s.start.y));
                dbg.note(|| format!("End point: ({}, {}).", s.end.x, s.end.y));
                return Verdict::Fail;
            }
        }
        Verdict::Pass
    }

    /// `match` on a line-segment tool: either coordinate may be left out.
    pub fn has_value_at(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        let (xs, ys) = (self.frame.xscale(), self.frame.yscale());
        match (x, y) {
            (Some(x), Some(y)) => {
                let xt = self.frame.x.px_to_units(tol_px / 2.0);
                let yt = self.frame.y.px_to_units(tol_px);
                let hit = self.segments.iter().any(|s| {
                    s.cut_to_x(x - xt, x + xt)
                        .is_some_and(|c| c.max_y() > y - yt && c.min_y() < y + yt)
                });
                if !hit {
                    dbg.note(|| format!("Line does not pass within {tol_px} pixels of ({x}, {y})."));
                }
                hit
            }
            (Some(x), None) => {
                let mut best = f64::INFINITY;
                for c in self.segments.iter().filter_map(|s| self.on_canvas(s)) {
                    if c.min_x() <= x && x <= c.max_x() {
                        return true;
                    }
                    best = best.min((c.min_x() - x).abs().min((c.max_x() - x).abs()) * xs);
                }
                if best <= tol_px {
                    return true;
                }
                dbg.note(|| format!("Line is {best} pixels away from x = {x}."));
                false
            }
            (None, Some(y)) => {
                let (xlo, xhi) = self.frame.x.bounds();
                let mut best = f64::INFINITY;
                for c in self.segments.iter().filter_map(|s| s.cut_to_x(xlo, xhi)) {
                    if c.min_y() <= y && y <= c.max_y() {
                        return true;
                    }
                    for v in [c.start.y, c.end.y] {
                        if self.frame.within_y_range(v, 0.0, 0.0) {
                            best = best.min((v - y).abs() * ys);
                        }
                    }
                }
                if best <= tol_px {
                    return true;
                }
                dbg.note(|| format!("Line is {best} pixels away from y = {y}."));
                false
            }
            (None, None) => false,
        }
    }

    /// Some piece starts and/or ends within `tol_px` of `point`.
    pub fn check_endpoint(
        &self,
        point: Vector2<f64>,
        mode: Endpoint,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        let near = |p: Vector2<f64>| self.frame.px_distance(p, point) <= tol_px;
        let hit = self.segments.iter().any(|s| match mode {
            Endpoint::Start => near(s.start),
            Endpoint::End => near(s.end),
            Endpoint::Either => near(s.start) || near(s.end),
        });
        if !hit {
            let best = self
                .segments
                .iter()
                .flat_map(|s| [s.start, s.end])
                .map(|p| self.frame.px_distance(p, point))
                .fold(f64::INFINITY, f64::min);
            dbg.note(|| format!("Closest end point is {best} pixels away from the expected point."));
            dbg.note(|| format!("Max allowed is {tol_px} pixels."));
        }
        hit
    }

    /// Above (`greater`) or below height `y` over `[x1, x2]`, within `tol_px`.
    pub fn compare_to_y(
        &self,
        y: f64,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
        let extremes = self
            .between(x1, x2, tol_px)
            .iter()
            .filter_map(|s| s.cut_to_x(x1, x2))
            .map(|c| (c.min_y(), c.max_y()))
            .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)));
        let Some((lo, hi)) = extremes else {
            dbg.note(|| "Line not within range.".to_string());
            return Verdict::Ndef;
        };
        let g = self.frame.y.px_to_units(tol_px);
        let (lo, hi) = (lo.max(ylo), hi.min(yhi));
        let ok = if greater { lo > y - g } else { hi < y + g };
        if !ok {
            let off = (if greater { y - lo } else { hi - y }) * self.frame.yscale();
            dbg.note(|| format!("Line passes y = {y} by {off} pixels."));
            dbg.note(|| format!("Max allowed is {tol_px} pixels."));
        }
        Verdict::from_bool(ok)
    }

    /// Above (`greater`) or below a formula over `[x1, x2]`, within `tol_px`.
    pub fn compare_to_function(
        &self,
        f: &Function,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let segs = self.strict_between(x1, x2);
        if segs.is_empty() {
            dbg.note(|| "Line not within range.".to_string());
            return Verdict::Ndef;
        }
        for seg in segs {
            let Some(c) = seg.ordered_by_x().cut_to_x(x1, x2) else {
                continue;
            };
            let step = (c.end.x - c.start.x) / (SEGMENT_SAMPLES - 1) as f64;
            for i in 0..SEGMENT_SAMPLES {
                let x = c.start.x + step * i as f64;
                let Some(y) = c.y_at(x) else {
                    continue;
                };
                if !point_relative_to_function(&self.frame, Vector2::new(x, y), f, greater, tol_px) {
                    dbg.note(|| format!("Line at ({x}, {y}) is on the wrong side of the function."));
                    return Verdict::Fail;
                }
            }
        }
        Verdict::Pass
    }

    /// Pieces meeting `[x1, x2]`; empty means `Ndef` for the length and angle checks.
    fn touching(&self, x1: f64, x2: f64) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| s.max_x() >= x1 && s.min_x() <= x2)
            .copied()
            .collect()
    }

    /// Every piece in range has graph length within `tol_px` of `length`.
    pub fn match_length(
        &self,
        length: f64,
        x1: f64,
        x2: f64,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> Verdict {
        let segs = self.touching(x1, x2);
        if segs.is_empty() {
            dbg.note(|| "Line not within range.".to_string());
            return Verdict::Ndef;
        }
        for s in segs {
            let graph = s.length();
            let px = s.length_px(self.frame.xscale(), self.frame.yscale());
            let off = if graph > 0.0 {
                (length - graph).abs() * px / graph
            } else {
                f64::INFINITY
            };
            if off > tol_px {
                dbg.note(|| format!("Submitted length {graph:.3} differs from expected length {length} by {off:.3} pixels."));
                dbg.note(|| format!("Max allowed is {tol_px} pixels."));
                return Verdict::Fail;
            }
        }
        Verdict::Pass
    }

    /// Every piece in range points within `tol_deg` of `angle` (degrees, graph
    /// orientation); `allow_flip` also accepts the reverse direction.
    pub fn match_angle(
        &self,
        angle: f64,
        allow_flip: bool,
        x1: f64,
        x2: f64,
        tol_deg: f64,
        dbg: &mut Debugger,
    ) -> Verdict {
        let segs = self.touching(x1, x2);
        if segs.is_empty() {
            dbg.note(|| "Line not found.".to_string());
            return Verdict::Ndef;
        }
        let expected = angle.rem_euclid(360.0);
        for s in segs {
            let a = s.angle_deg().rem_euclid(360.0);
            let mut off = angle_error(expected, a);
            if allow_flip {
                off = off.min(angle_error(expected + 180.0, a));
            }
            if off > tol_deg {
                dbg.note(|| format!("Submitted angle {a:.3} differs from the expected angle {expected} by {off:.3} degrees."));
                dbg.note(|| format!("Max allowed difference is {tol_deg} degrees."));
                return Verdict::Fail;
            }
        }
        Verdict::Pass
    }
}
