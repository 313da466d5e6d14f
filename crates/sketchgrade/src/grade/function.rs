//! Function-like marks of one tool: splines, freehand strokes and points.

use nalgebra::Vector2;

use super::cfg::{
    COMPARE_EMPTY_PX, FORMULA_SAMPLES, FUNCTION_EDGE_PX, FUNCTION_SAMPLES, MATCH_EMPTY_PX,
    POINT_DEDUP_PX, POINT_MARGIN_PX, STEEP_ANGLE,
};
use super::comparer::{always_holds, Comparison};
use super::{Debugger, Verdict};
use crate::coords::Frame;
use crate::expr::{Function, InvalidOpGuard};
use crate::geom::{collapse_ranges, fit, Range, Spline};
use crate::primitive::Primitive;

/// Number of one-pixel steps covering `[-tol_px, tol_px]`.
#[inline]
fn pixel_steps(tol_px: f64) -> usize {
    (2.0 * tol_px.max(0.0)).floor() as usize + 1
}

/// Straight cubic through `a` and `b`.
fn straight_piece(a: Vector2<f64>, b: Vector2<f64>) -> [Vector2<f64>; 4] {
    let d = (b - a) / 3.0;
    [a, a + d, a + 2.0 * d, b]
}

/// True when some formula value within `tol_px` columns of `p` lies within `tol_px`
/// rows of it. Values near the canvas edge do not count.
pub fn point_on_function(frame: &Frame, p: Vector2<f64>, f: &Function, tol_px: f64) -> bool {
    let _quiet = InvalidOpGuard::suppress();
    let x0 = p.x - frame.x.px_to_units(tol_px);
    let unit = frame.x.px_to_units(1.0);
    (0..pixel_steps(tol_px)).any(|i| {
        f.eval(x0 + unit * i as f64)
            .filter(|&v| frame.within_y_range(v, FUNCTION_EDGE_PX, 0.0))
            .is_some_and(|v| (p.y - v).abs() * frame.yscale() <= tol_px)
    })
}

/// True when `p` lies above (`greater`) or below the formula within `tol_px`, at some
/// column within `tol_px` of it.
pub fn point_relative_to_function(
    frame: &Frame,
    p: Vector2<f64>,
    f: &Function,
    greater: bool,
    tol_px: f64,
) -> bool {
    let _quiet = InvalidOpGuard::suppress();
    let x0 = p.x - frame.x.px_to_units(tol_px);
    let unit = frame.x.px_to_units(1.0);
    let g = frame.y.px_to_units(tol_px);
    (0..pixel_steps(tol_px)).any(|i| {
        f.eval(x0 + unit * i as f64).is_some_and(|v| {
            if greater {
                p.y >= v - g
            } else {
                p.y <= v + g
            }
        })
    })
}

/// Splines through a formula over the open interval `(xmin, xmax)`.
///
/// The formula is sampled at evenly spaced interior points; every undefined sample
/// breaks the curve, and each defined run of two or more samples is interpolated.
pub fn function_splines(f: &Function, xmin: f64, xmax: f64) -> Vec<Spline> {
    let _quiet = InvalidOpGuard::suppress();
    let step = (xmax - xmin) / FUNCTION_SAMPLES as f64;
    let mut runs: Vec<Vec<Vector2<f64>>> = Vec::new();
    let mut run = Vec::new();
    for i in 1..FUNCTION_SAMPLES {
        let x = xmin + step * i as f64;
        match f.eval(x) {
            Some(y) => run.push(Vector2::new(x, y)),
            None if !run.is_empty() => runs.push(std::mem::take(&mut run)),
            None => {}
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs.iter()
        .filter(|r| r.len() >= 2)
        .filter_map(|r| Spline::from_control_points(&fit::interpolate(r)))
        .collect()
}

/// Splines and points drawn with one tool, in graph coordinates.
#[derive(Clone, Debug)]
pub struct FunctionSet {
    frame: Frame,
    splines: Vec<Spline>,
    points: Vec<Vector2<f64>>,
    domain: Vec<Range>,
}

impl FunctionSet {
    /// Collect the function-like primitives; anything else is ignored.
    ///
    /// Points within `POINT_DEDUP_PX` of an earlier point are dropped.
    pub fn new(frame: Frame, primitives: &[Primitive]) -> Self {
        let mut splines = Vec::new();
        let mut points: Vec<Vector2<f64>> = Vec::new();
        for prim in primitives {
            let cps: Vec<Vector2<f64>> = match prim {
                Primitive::Spline(cps) | Primitive::Polyline(cps) => cps.clone(),
                Primitive::LineSegment(a, b) => straight_piece(*a, *b).to_vec(),
                Primitive::Point(pt) => {
                    let p = frame.to_graph(pt.position());
                    if points
                        .iter()
                        .all(|q| frame.px_distance(*q, p) >= POINT_DEDUP_PX)
                    {
                        points.push(p);
                    }
                    continue;
                }
                _ => continue,
            };
            let graph: Vec<Vector2<f64>> = cps.into_iter().map(|p| frame.to_graph(p)).collect();
            if let Some(s) = Spline::from_control_points(&graph) {
                splines.push(s);
            }
        }
        Self::from_parts(frame, splines, points)
    }

    /// A set made of graph-coordinate splines and points.
    pub fn from_parts(frame: Frame, splines: Vec<Spline>, points: Vec<Vector2<f64>>) -> Self {
        let (ylo, yhi) = frame.y_band(0.0, 0.0);
        let pieces: Vec<Range> = splines.iter().flat_map(|s| s.domain(ylo, yhi)).collect();
        Self {
            frame,
            splines,
            points,
            domain: collapse_ranges(&pieces),
        }
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn splines(&self) -> &[Spline] {
        &self.splines
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.splines.is_empty() && self.points.is_empty()
    }

    /// Effective x-domain of the splines: where they run on the canvas.
    #[inline]
    pub fn domain(&self) -> &[Range] {
        &self.domain
    }

    /// x-intervals this set occupies: the spline domain, or `±6 px` around each
    /// on-canvas point when there are no splines.
    pub fn range_defined(&self) -> Vec<Range> {
        if !self.splines.is_empty() {
            return self.domain.clone();
        }
        let m = self.frame.x.px_to_units(POINT_MARGIN_PX);
        let pieces: Vec<Range> = self
            .points
            .iter()
            .filter(|p| self.frame.within_y_range(p.y, 0.0, 0.0))
            .map(|p| Range::new(p.x - m, p.x + m))
            .collect();
        collapse_ranges(&pieces)
    }

    /// Points with `x ∈ [xmin, xmax]` that are on the canvas.
    pub fn points_in_range(&self, xmin: f64, xmax: f64) -> Vec<Vector2<f64>> {
        self.points
            .iter()
            .copied()
            .filter(|p| p.x >= xmin && p.x <= xmax && self.frame.within_y_range(p.y, 0.0, 0.0))
            .collect()
    }

    fn in_domain(&self, x: f64) -> bool {
        self.domain.iter().any(|r| r.contains(x))
    }

    /// `(x, x)` inside the domain; otherwise the nearest domain ends left and right of
    /// `x`, infinite where there is none.
    pub fn closest_xvals(&self, x: f64) -> (f64, f64) {
        if self.in_domain(x) {
            return (x, x);
        }
        let left = self
            .domain
            .iter()
            .map(|r| r.hi)
            .filter(|&h| h <= x)
            .fold(f64::NEG_INFINITY, f64::max);
        let right = self
            .domain
            .iter()
            .map(|r| r.lo)
            .filter(|&l| l >= x)
            .fold(f64::INFINITY, f64::min);
        (left, right)
    }

    /// First defined x at or after `xmin` and last defined x at or before `xmax`.
    pub fn between_vals(&self, xmin: f64, xmax: f64) -> (f64, f64) {
        (self.closest_xvals(xmin).1, self.closest_xvals(xmax).0)
    }

    /// Value of the first spline defined at `x`.
    pub fn value_at(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }
        self.splines.iter().find_map(|s| s.value_at(x))
    }

    /// Value at `x`, interpolated across a gap in the domain.
    ///
    /// The flag is false when `x` sits in a gap wider than the `gap` tolerance or next
    /// to an undefined side.
    pub fn value_at_gap(&self, x: f64) -> (bool, Option<f64>) {
        let (l, r) = self.closest_xvals(x);
        if l == r {
            return (true, self.value_at(x));
        }
        match (self.value_at(l), self.value_at(r)) {
            (Some(a), Some(b)) => {
                let no_gap = (r - l) * self.frame.xscale() < self.frame.tol.gap;
                (no_gap, Some(a + (x - l) * (b - a) / (r - l)))
            }
            (None, other) | (other, None) => (false, other),
        }
    }

    /// Slope angle in pixel space (radians) at `x`, or across the gap around it.
    pub fn angle_at_gap(&self, x: f64) -> (bool, Option<f64>) {
        let (xs, ys) = (self.frame.xscale(), self.frame.yscale());
        let (l, r) = self.closest_xvals(x);
        if l == r {
            let slope = self.splines.iter().find_map(|s| s.slope_at(x));
            return (true, slope.map(|m| (m * ys / xs).atan()));
        }
        let no_gap = (r - l) * xs < self.frame.tol.gap;
        match (self.value_at(l), self.value_at(r)) {
            (Some(a), Some(b)) => (no_gap, Some((ys * (b - a)).atan2(xs * (r - l)))),
            _ => (false, None),
        }
    }

    /// `n` evenly spaced samples between the defined x-values nearest to `xmin` and
    /// `xmax`, with the x-step between them.
    pub fn sample_points(&self, n: usize, xmin: f64, xmax: f64) -> (Vec<(f64, Option<f64>)>, f64) {
        let (start, end) = self.between_vals(xmin, xmax);
        if n == 0 || !start.is_finite() || !end.is_finite() {
            return (Vec::new(), 0.0);
        }
        let step = if n > 1 {
            (end - start) / (n - 1) as f64
        } else {
            0.0
        };
        let samples = (0..n)
            .map(|i| {
                let x = start + step * i as f64;
                (x, self.value_at_gap(x).1)
            })
            .collect();
        (samples, step)
    }

    /// True when nothing is defined in `[xmin, xmax]`, ignoring overlaps of up to
    /// `tol_px` at either end.
    pub fn does_not_exist_between(&self, xmin: f64, xmax: f64, tol_px: f64) -> bool {
        let g = self.frame.x.px_to_units(tol_px);
        !self.range_defined().iter().any(|r| {
            (xmin >= r.lo && xmin < r.hi - g)
                || (xmax > r.lo + g && xmax <= r.hi)
                || (xmin < r.lo && xmax > r.hi)
        })
    }

    /// On-canvas samples over `[xmin, xmax]` and the x-step between them, or a
    /// verdict when the range holds no data.
    fn samples_in_range(
        &self,
        n: usize,
        xmin: f64,
        xmax: f64,
        empty_px: f64,
        dbg: &mut Debugger,
    ) -> Result<(Vec<(f64, f64)>, f64), Verdict> {
        if self.does_not_exist_between(xmin, xmax, empty_px) {
            dbg.note(|| format!("No values found within range [{xmin}, {xmax}]."));
            return Err(Verdict::Ndef);
        }
        let (l, r) = self.between_vals(xmin, xmax);
        if l > r {
            dbg.note(|| format!("No values found within range [{xmin}, {xmax}]."));
            return Err(Verdict::Ndef);
        }
        let (samples, step) = self.sample_points(n, l, r);
        let kept = samples
            .into_iter()
            .filter_map(|(x, y)| y.map(|y| (x, y)))
            .filter(|&(_, y)| self.frame.within_y_range(y, 0.0, 0.0))
            .collect();
        Ok((kept, step))
    }

    fn scale(&self) -> f64 {
        self.frame.xscale() / self.frame.yscale()
    }

    /// Monotonicity over `[xmin, xmax]`: `LesserOrEqual` for increasing.
    ///
    /// `budget` is the failure budget of the sample comparator; `empty_px` the overlap
    /// below which the range counts as empty.
    pub fn monotone_between(
        &self,
        cmp: Comparison,
        xmin: f64,
        xmax: f64,
        samples: usize,
        budget: f64,
        empty_px: f64,
        dbg: &mut Debugger,
    ) -> Verdict {
        let (kept, step) = match self.samples_in_range(samples, xmin, xmax, empty_px, dbg) {
            Ok(v) => v,
            Err(v) => return v,
        };
        if kept.len() < 2 {
            dbg.note(|| "Fewer than two samples on the canvas.".to_string());
            return Verdict::Fail;
        }
        let ys: Vec<f64> = kept.iter().map(|&(_, y)| y).collect();
        let deltas = vec![step; ys.len()];
        match always_holds(cmp, &ys, &deltas, self.scale(), budget) {
            Ok(()) => Verdict::Pass,
            Err(failed) => {
                dbg.note(|| format!("More than {budget} sample pairs failed."));
                dbg.note(|| {
                    let xs: Vec<f64> = failed.iter().map(|&i| kept[i].0).collect();
                    format!("Failures at x = {xs:?}.")
                });
                Verdict::Fail
            }
        }
    }

    /// Concavity over `[xmin, xmax]`: consecutive rises compared with `cmp`
    /// (`LesserOrEqual` for concave up).
    pub fn curvature_between(
        &self,
        cmp: Comparison,
        xmin: f64,
        xmax: f64,
        segments: usize,
        budget: f64,
        empty_px: f64,
        dbg: &mut Debugger,
    ) -> Verdict {
        let (kept, step) = match self.samples_in_range(segments + 1, xmin, xmax, empty_px, dbg)
        {
            Ok(v) => v,
            Err(v) => return v,
        };
        let rises: Vec<f64> = kept.windows(2).map(|w| w[1].1 - w[0].1).collect();
        if rises.len() < 2 {
            dbg.note(|| format!("Too few points to compare within range [{xmin}, {xmax}]."));
            return Verdict::Fail;
        }
        let deltas = vec![step; rises.len()];
        match always_holds(cmp, &rises, &deltas, self.scale(), budget) {
            Ok(()) => Verdict::Pass,
            Err(failed) => {
                dbg.note(|| format!("{} of {} segments have the wrong curvature.", failed.len(), rises.len()));
                Verdict::Fail
            }
        }
    }

    /// Defined at, or within `tol_px` of, the vertical line at `x`.
    pub fn defined_at_x(&self, x: f64, tol_px: f64, dbg: &mut Debugger) -> bool {
        let xs = self.frame.xscale();
        let mut best = f64::INFINITY;
        if !self.splines.is_empty() {
            let (l, r) = self.closest_xvals(x);
            if l == r {
                return true;
            }
            best = ((x - l).abs() * xs).min((r - x).abs() * xs);
        }
        for p in self.points_in_range(f64::NEG_INFINITY, f64::INFINITY) {
            best = best.min((p.x - x).abs() * xs);
        }
        if best <= tol_px {
            return true;
        }
        dbg.note(|| format!("Function is {best} pixels away from x = {x}."));
        dbg.note(|| format!("Max allowed difference is {tol_px} pixels."));
        false
    }

    /// Reaches, or comes within `tol_px` of, the horizontal line at `y`.
    pub fn defined_at_y(&self, y: f64, tol_px: f64, dbg: &mut Debugger) -> bool {
        let ys = self.frame.yscale();
        let (xlo, xhi) = self.frame.x.bounds();
        let mut best = f64::INFINITY;
        for s in &self.splines {
            if let Some((lo, hi)) = s.extremes_between(xlo, xhi) {
                if lo <= y && y <= hi {
                    return true;
                }
                for v in [lo, hi] {
                    if self.frame.within_y_range(v, 0.0, 0.0) {
                        best = best.min((v - y).abs() * ys);
                    }
                }
            }
        }
        for p in self.points_in_range(xlo, xhi) {
            best = best.min((p.y - y).abs() * ys);
        }
        if best <= tol_px {
            return true;
        }
        dbg.note(|| format!("Function is {best} pixels away from y = {y}."));
        dbg.note(|| format!("Max allowed difference is {tol_px} pixels."));
        false
    }

    /// Passes within `tol_px` of `(x, y)`: some column within `tol_px` of `x` has a
    /// value within `tol_px` of `y`, or the curve crosses height `y` near `x`.
    pub fn has_value_y_at_x(&self, x: f64, y: f64, tol_px: f64, dbg: &mut Debugger) -> bool {
        let (xs, ys) = (self.frame.xscale(), self.frame.yscale());
        let x0 = x - self.frame.x.px_to_units(tol_px);
        let unit = self.frame.x.px_to_units(1.0);
        let mut best = f64::INFINITY;
        for i in 0..pixel_steps(tol_px) {
            let xi = x0 + unit * i as f64;
            for s in &self.splines {
                for v in s.vertical_line_crossings(xi) {
                    best = best.min((v - y).abs() * ys);
                }
            }
        }
        if best <= tol_px {
            return true;
        }
        let crosses_near = self.splines.iter().any(|s| {
            s.horizontal_line_crossings(y)
                .into_iter()
                .any(|cx| (cx - x).abs() * xs <= tol_px)
        });
        if crosses_near {
            return true;
        }
        if best.is_finite() {
            dbg.note(|| format!("Function is {best} pixels away from ({x}, {y})."));
        } else {
            dbg.note(|| format!("Function is not defined near x = {x}."));
        }
        dbg.note(|| format!("Max allowed is {tol_px} pixels."));
        false
    }

    /// `match` on a function tool: either coordinate may be left out.
    pub fn has_value_at(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        match (x, y) {
            (Some(x), Some(y)) => self.has_value_y_at_x(x, y, tol_px, dbg),
            (Some(x), None) => self.defined_at_x(x, tol_px, dbg),
            (None, Some(y)) => self.defined_at_y(y, tol_px, dbg),
            (None, None) => false,
        }
    }

    /// A drawn point at `(x, y)`, or nearest in the given coordinate, within `tol_px`.
    pub fn has_point_at(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        let (xs, ys) = (self.frame.xscale(), self.frame.yscale());
        let on_canvas = self
            .points
            .iter()
            .copied()
            .filter(|p| self.frame.within_x_range(p.x) && self.frame.within_y_range(p.y, 0.0, 0.0));
        let best = match (x, y) {
            (Some(x), Some(y)) => {
                let target = Vector2::new(x, y);
                on_canvas
                    .map(|p| self.frame.px_distance(p, target))
                    .fold(f64::INFINITY, f64::min)
            }
            (Some(x), None) => on_canvas
                .map(|p| (p.x - x).abs() * xs)
                .fold(f64::INFINITY, f64::min),
            (None, Some(y)) => on_canvas
                .map(|p| (p.y - y).abs() * ys)
                .fold(f64::INFINITY, f64::min),
            (None, None) => f64::INFINITY,
        };
        if best < tol_px {
            return true;
        }
        if best.is_finite() {
            dbg.note(|| format!("Closest point is {best} pixels away."));
            dbg.note(|| format!("Max allowed is {tol_px} pixels."));
        } else {
            dbg.note(|| "No point found.".to_string());
        }
        false
    }

    /// Samples (or drawn points) over `[x1, x2]` to test against a formula, with the
    /// number of misses allowed.
    fn formula_targets(&self, x1: f64, x2: f64, max_points_exact: usize) -> (Vec<Vector2<f64>>, usize) {
        if !self.splines.is_empty() {
            let (samples, _) = self.sample_points(FORMULA_SAMPLES, x1, x2);
            let targets = samples
                .into_iter()
                .filter_map(|(x, y)| y.map(|y| Vector2::new(x, y)))
                .collect();
            (targets, 0)
        } else {
            let pts = self.points_in_range(x1, x2);
            let allowed = usize::from(pts.len() >= max_points_exact);
            (pts, allowed)
        }
    }

    /// Whether the marks follow the formula over `[x1, x2]` within `tol_px`.
    ///
    /// Samples at steep slopes or inside gaps are matched along x against splines
    /// built from the formula.
    pub fn matches_function(
        &self,
        f: &Function,
        x1: f64,
        x2: f64,
        tol_px: f64,
        dbg: &mut Debugger,
    ) -> bool {
        if !self.splines.is_empty() && self.does_not_exist_between(x1, x2, MATCH_EMPTY_PX) {
            dbg.note(|| format!("Nothing drawn within range [{x1}, {x2}]."));
            return false;
        }
        let (targets, allowed) = self.formula_targets(x1, x2, 5);
        if targets.is_empty() {
            dbg.note(|| "No submitted values to compare.".to_string());
            return false;
        }
        let pad = self.frame.x.px_to_units(tol_px);
        let mut reference: Option<Vec<Spline>> = None;
        let mut misses = 0;
        for p in targets {
            let ok = if self.splines.is_empty() {
                point_on_function(&self.frame, p, f, tol_px)
            } else {
                let (no_gap, angle) = self.angle_at_gap(p.x);
                let steep = angle.map_or(true, |a| a.abs() > STEEP_ANGLE);
                if steep || !no_gap {
                    let splines =
                        reference.get_or_insert_with(|| function_splines(f, x1 - pad, x2 + pad));
                    self.point_on_splines_x(p, splines, tol_px)
                } else {
                    point_on_function(&self.frame, p, f, tol_px)
                }
            };
            if !ok {
                misses += 1;
                dbg.note(|| format!("Submitted point ({}, {}) is off the function.", p.x, p.y));
                if misses > allowed {
                    return false;
                }
            }
        }
        true
    }

    /// Match `p` against `splines` along x: some crossing at a height within `tol_px`
    /// of `p.y` must lie within `tol_px` of `p.x`.
    fn point_on_splines_x(&self, p: Vector2<f64>, splines: &[Spline], tol_px: f64) -> bool {
        let xs = self.frame.xscale();
        let y0 = p.y - self.frame.y.px_to_units(tol_px);
        let unit = self.frame.y.px_to_units(1.0);
        let mut crossed = false;
        for s in splines {
            for i in 0..pixel_steps(tol_px) {
                let y = y0 + unit * i as f64;
                if !s.exists_at_y(y) {
                    continue;
                }
                crossed = true;
                let crossings = s.horizontal_line_crossings(y);
                for cx in crossings.into_iter().filter(|&cx| self.frame.within_x_range(cx)) {
                    if (cx - p.x).abs() * xs <= tol_px {
                        return true;
                    }
                }
            }
        }
        if crossed {
            return false;
        }
        // The formula never reaches this height: compare with its nearest end.
        splines
            .iter()
            .map(|s| s.closest_endpoint(p.y))
            .min_by(|a, b| (a.y - p.y).abs().total_cmp(&(b.y - p.y).abs()))
            .is_some_and(|ep| (ep.x - p.x).abs() * xs <= tol_px)
    }

    /// Share (0..=1) of the formula's on-canvas extent over `[x1, x2]` that the
    /// submission domain covers must reach `fraction`.
    pub fn covers_function_domain(
        &self,
        f: &Function,
        x1: f64,
        x2: f64,
        fraction: f64,
        dbg: &mut Debugger,
    ) -> bool {
        let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
        let pieces: Vec<Range> = function_splines(f, x1, x2)
            .iter()
            .flat_map(|s| s.domain(ylo, yhi))
            .collect();
        let needed = collapse_ranges(&pieces);
        let total: f64 = needed.iter().map(Range::len).sum();
        if total <= 0.0 {
            return true;
        }
        let covered: f64 = self
            .domain
            .iter()
            .flat_map(|d| needed.iter().map(move |r| r.overlap(d.lo, d.hi)))
            .sum();
        let share = covered / total;
        if share >= fraction {
            return true;
        }
        dbg.note(|| format!("Submission covered only {:.1}% of the function domain.", share * 100.0));
        dbg.note(|| format!("Lowest allowed is {:.1}%.", fraction * 100.0));
        false
    }

    /// Above (`greater`) or below the line at height `y` over `[x1, x2]`, within `tol_px`.
    ///
    /// Spline extremes are clamped to the canvas; no data in the range gives `Ndef`.
    pub fn compare_to_y(
        &self,
        y: f64,
        x1: f64,
        x2: f64,
        tol_px: f64,
        greater: bool,
        dbg: &mut Debugger,
    ) -> Verdict {
        let g = self.frame.y.px_to_units(tol_px);
        let ys = self.frame.yscale();
        if !self.splines.is_empty() {
            let (ylo, yhi) = self.frame.y_band(0.0, 0.0);
            let Some((lo, hi)) = self
                .splines
                .iter()
                .filter_map(|s| s.extremes_between(x1, x2))
                .reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
            else {
                dbg.note(|| format!("No values found within range [{x1}, {x2}]."));
                return Verdict::Ndef;
            };
            let (lo, hi) = (lo.max(ylo), hi.min(yhi));
            return if greater {
                if lo >= y - g {
                    Verdict::Pass
                } else {
                    dbg.note(|| format!("Function is below y = {y} by {} pixels.", (y - lo) * ys));
                    Verdict::Fail
                }
            } else if hi <= y + g {
                Verdict::Pass
            } else {
                dbg.note(|| format!("Function is above y = {y} by {} pixels.", (hi - y) * ys));
                Verdict::Fail
            };
        }
        let pts = self.points_in_range(x1, x2);
        if pts.is_empty() {
            dbg.note(|| "No points found in range.".to_string());
            return Verdict::Ndef;
        }
        let bad = pts
            .iter()
            .find(|p| if greater { p.y < y - g } else { p.y > y + g });
        match bad {
            None => Verdict::Pass,
            Some(p) => {
                dbg.note(|| format!("Point ({}, {}) is {} pixels past y = {y}.", p.x, p.y, (p.y - y).abs() * ys));
                Verdict::Fail
            }
        }
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
        if !self.splines.is_empty() && self.does_not_exist_between(x1, x2, COMPARE_EMPTY_PX) {
            dbg.note(|| "No values found in range.".to_string());
            return Verdict::Ndef;
        }
        let (targets, allowed) = self.formula_targets(x1, x2, 10);
        if targets.is_empty() {
            dbg.note(|| "No values found in range.".to_string());
            return Verdict::Ndef;
        }
        let mut misses = 0;
        for p in targets {
            if !point_relative_to_function(&self.frame, p, f, greater, tol_px) {
                misses += 1;
                let side = if greater { "below" } else { "above" };
                dbg.note(|| format!("Point ({}, {}) is {side} the function.", p.x, p.y));
                if misses > allowed {
                    return Verdict::Fail;
                }
            }
        }
        Verdict::Pass
    }
}
