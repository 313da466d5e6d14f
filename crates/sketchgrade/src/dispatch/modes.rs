//! One evaluator per grader kind, over the tools a grader selects.

use nalgebra::Vector2;

use super::cfg::{
    CONCAVE_SEGMENTS, DOMAIN_COVERAGE, EDGE_BUFFER_PX, GAP_WINDOW_PX, MONOTONE_SAMPLES,
};
use super::grader::{CountMode, Grader, GraderKind};
use super::tools::{ToolInfo, ToolMarks, ToolRegistry};
use crate::coords::{Frame, Tolerances};
use crate::error::GradeError;
use crate::expr::Function;
use crate::geom::{collapse_ranges, covered_length, gap_length, Range};
use crate::grade::{
    AsymptoteSet, Comparison, Debugger, FunctionSet, Orientation, PolygonSet, SegmentSet,
    Verdict,
};
use crate::primitive::{Primitive, RawMark, Submission, ToolKind as T};

/// A submission prepared for grading: its frame and the primitives of every tool.
#[derive(Clone, Debug)]
pub(crate) struct Sheet {
    pub submission: Submission,
    pub frame: Frame,
    pub marks: ToolMarks,
}

impl Sheet {
    pub fn new(
        submission: Submission,
        tol: Tolerances,
        registry: &ToolRegistry,
    ) -> Result<Self, GradeError> {
        let frame = Frame::new(submission.config(), tol)?;
        let marks = registry.primitives(&submission)?;
        Ok(Self {
            submission,
            frame,
            marks,
        })
    }

    pub fn prims(&self, id: &str) -> &[Primitive] {
        self.marks.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The effective `[x1, x2]`: the grader range clamped to the canvas minus its edge
/// buffer. Open ends take the buffered canvas bound.
pub(crate) fn grading_range(grader: &Grader, frame: &Frame) -> (f64, f64) {
    let buffer = frame.x.px_to_units(EDGE_BUFFER_PX);
    let (lo, hi) = frame.x.bounds();
    let (lo, hi) = (lo + buffer, hi - buffer);
    let [a, b] = grader.range().unwrap_or([None, None]);
    (a.map_or(lo, |a| a.max(lo)), b.map_or(hi, |b| b.min(hi)))
}

/// Everything one grader run reads.
pub(crate) struct Context<'a> {
    pub grader: &'a Grader,
    pub sheet: &'a Sheet,
    pub tools: Vec<&'a ToolInfo>,
    pub fun: Option<Function>,
    pub tol: f64,
    pub x1: f64,
    pub x2: f64,
}

impl<'a> Context<'a> {
    pub fn new(
        grader: &'a Grader,
        sheet: &'a Sheet,
        registry: &'a ToolRegistry,
        fun: Option<Function>,
    ) -> Self {
        let tools = registry
            .iter()
            .filter(|t| {
                if !grader.selects(t) {
                    tracing::debug!(tool = %t.id, kind = t.kind().as_str(), "tool not graded");
                    return false;
                }
                if sheet.prims(&t.id).is_empty() {
                    tracing::debug!(tool = %t.id, "tool has no marks");
                    return false;
                }
                true
            })
            .collect();
        let (x1, x2) = grading_range(grader, &sheet.frame);
        Self {
            grader,
            sheet,
            tools,
            fun,
            tol: grader.tolerance_on(&sheet.frame.x),
            x1,
            x2,
        }
    }

    #[inline]
    fn frame(&self) -> Frame {
        self.sheet.frame
    }

    #[inline]
    fn prims(&self, tool: &ToolInfo) -> &'a [Primitive] {
        self.sheet.prims(&tool.id)
    }

    fn note_empty(&self, dbg: &mut Debugger) {
        if self.tools.is_empty() {
            dbg.note(|| "No submission found.".to_string());
        }
    }

    /// Every selected tool must pass or have nothing in range (`Ndef`), and at least
    /// one must pass.
    fn all_in_range(
        &self,
        dbg: &mut Debugger,
        mut check: impl FnMut(&ToolInfo, &'a [Primitive], &mut Debugger) -> Verdict,
    ) -> bool {
        self.note_empty(dbg);
        let mut in_range = 0;
        for &tool in &self.tools {
            match check(tool, self.prims(tool), dbg) {
                Verdict::Fail => return false,
                Verdict::Pass => in_range += 1,
                Verdict::Ndef => {}
            }
        }
        if in_range == 0 && !self.tools.is_empty() {
            dbg.note(|| format!("Nothing drawn within [{}, {}].", self.x1, self.x2));
        }
        in_range > 0
    }
}

/// Result of one evaluator; `note` is appended to the default failure message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Finding {
    pub pass: bool,
    pub note: Option<&'static str>,
}

impl From<bool> for Finding {
    fn from(pass: bool) -> Self {
        Self { pass, note: None }
    }
}

/// Run the evaluator of the grader's kind.
pub(crate) fn evaluate(ctx: &Context<'_>, dbg: &mut Debugger) -> Finding {
    match ctx.grader.kind {
        GraderKind::Match => match_position(ctx, dbg).into(),
        GraderKind::Count => count(ctx, dbg).into(),
        GraderKind::MatchFun => match_function(ctx, dbg),
        GraderKind::MonotIncreasing => monotone(ctx, dbg, true).into(),
        GraderKind::MonotDecreasing => monotone(ctx, dbg, false).into(),
        GraderKind::ConcaveUp => concave(ctx, dbg, true).into(),
        GraderKind::ConcaveDown => concave(ctx, dbg, false).into(),
        GraderKind::DefinedIn => defined_in(ctx, dbg).into(),
        GraderKind::UndefinedIn => undefined_in(ctx, dbg).into(),
        GraderKind::GreaterThan => compare(ctx, dbg, true).into(),
        GraderKind::LessThan => compare(ctx, dbg, false).into(),
        GraderKind::MatchLength => match_length(ctx, dbg).into(),
        GraderKind::MatchAngle => match_angle(ctx, dbg).into(),
    }
}

/// Failure message used when the grader carries no `feedback`.
pub(crate) fn default_feedback(grader: &Grader) -> String {
    match grader.kind {
        GraderKind::Match => {
            let at = match (grader.x, grader.y) {
                (Some(x), _) => format!("x = {x}"),
                (None, Some(y)) => format!("y = {y}"),
                (None, None) => "the expected position".to_string(),
            };
            format!("Missing expected element at {at}.")
        }
        GraderKind::Count => "Incorrect number of elements used.".into(),
        GraderKind::MatchFun => "Does not match function.".into(),
        GraderKind::MonotIncreasing => {
            "Function is not monotonically increasing in the correct domain(s).".into()
        }
        GraderKind::MonotDecreasing => {
            "Function is not monotonically decreasing in the correct domain(s).".into()
        }
        GraderKind::ConcaveUp | GraderKind::ConcaveDown => {
            "Function has an incorrect shape.".into()
        }
        GraderKind::DefinedIn => "Function is not defined over expected range(s).".into(),
        GraderKind::UndefinedIn => "Graph is not undefined over expected domain(s).".into(),
        GraderKind::GreaterThan => {
            "An element is not greater than a specific function or y value in a certain range."
                .into()
        }
        GraderKind::LessThan => {
            "An element is not less than a specific function or y value in a certain range."
                .into()
        }
        GraderKind::MatchLength => "Vector has incorrect length.".into(),
        GraderKind::MatchAngle => "Vector has incorrect angle with respect to the x-axis.".into(),
    }
}

fn match_position(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    let g = ctx.grader;
    let (x, y) = (g.x, g.y);
    let frame = ctx.frame();
    let asym_tol = g.tolerance.unwrap_or(frame.tol.asym_distance);
    ctx.note_empty(dbg);
    ctx.tools.iter().any(|&tool| {
        let prims = ctx.prims(tool);
        match tool.kind() {
            T::Polygon => PolygonSet::new(frame, prims).contains_point(x, y, ctx.tol, dbg),
            T::Point => {
                FunctionSet::new(frame, prims).has_point_at(x, y, g.point_tolerance(tool), dbg)
            }
            T::Spline | T::Freeform | T::Polyline => {
                FunctionSet::new(frame, prims).has_value_at(x, y, ctx.tol, dbg)
            }
            T::VerticalLine => x.is_some_and(|x| {
                AsymptoteSet::new(frame, Orientation::Vertical, prims).has_asym_at(x, asym_tol, dbg)
            }),
            T::HorizontalLine => y.is_some_and(|y| {
                AsymptoteSet::new(frame, Orientation::Horizontal, prims)
                    .has_asym_at(y, asym_tol, dbg)
            }),
            T::LineSegment => {
                let set = SegmentSet::new(frame, prims);
                match (g.endpoint, x, y) {
                    (Some(mode), Some(x), Some(y)) => {
                        set.check_endpoint(Vector2::new(x, y), mode, ctx.tol, dbg)
                    }
                    _ => set.has_value_at(x, y, ctx.tol, dbg),
                }
            }
        }
    })
}

/// Corner points of a raw mark: every third control point of a chain.
fn knots(mark: &RawMark) -> Vec<Vector2<f64>> {
    if let Some([x, y]) = mark.point {
        return vec![Vector2::new(x, y)];
    }
    let chain = mark.spline.as_ref().or(mark.polyline.as_ref());
    let pts: Vec<[f64; 2]> = match (chain, &mark.polygon) {
        (Some(cps), _) => cps.iter().step_by(3).copied().collect(),
        (None, Some(vs)) => vs.clone(),
        (None, None) => Vec::new(),
    };
    pts.into_iter().map(|[x, y]| Vector2::new(x, y)).collect()
}

/// Distinct marks with a corner in `r` on the canvas. Horizontal lines count by height
/// alone and vertical lines by position alone.
fn count_in_range(frame: &Frame, kind: T, marks: &[RawMark], r: Range) -> usize {
    let mut seen: Vec<&RawMark> = Vec::new();
    for mark in marks {
        if seen.contains(&mark) {
            continue;
        }
        let inside = knots(mark).into_iter().map(|p| frame.to_graph(p)).any(|p| {
            let on_canvas = frame.within_y_range(p.y, 0.0, 0.0);
            match kind {
                T::HorizontalLine => on_canvas,
                T::VerticalLine => r.contains(p.x),
                _ => on_canvas && r.contains(p.x),
            }
        });
        if inside {
            seen.push(mark);
        }
    }
    seen.len()
}

fn count(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    let g = ctx.grader;
    let want = g.count.unwrap_or(0) as usize;
    if ctx.tools.is_empty() {
        let nothing_ok = g.mode == CountMode::AtMost || want == 0;
        if !nothing_ok {
            dbg.note(|| "No submission found.".to_string());
        }
        return nothing_ok;
    }
    let frame = ctx.frame();
    let d = frame.x.px_to_units(ctx.tol);
    let (x1, x2) = (ctx.x1, ctx.x2);
    let expanded = Range::new(x1 - d, x2 + d);
    // Flips rather than vanishes when the range is narrower than twice the tolerance.
    let shrunk = Range::new(x1 + d, x2 - d);
    let exact = Range::new(x1, x2);
    let tol = ctx.tol;
    ctx.tools.iter().all(|&tool| {
        let marks = ctx.sheet.submission.marks(&tool.id);
        let n = |r: Range| count_in_range(&frame, tool.kind(), marks, r);
        match g.mode {
            CountMode::Exact => {
                let found = [n(expanded), n(shrunk), n(exact)];
                let ok = found.contains(&want);
                if !ok {
                    dbg.note(|| {
                        format!(
                            "Found counts: {}, {}, {} with xrange expanded by {tol} pixels, shrunk by {tol} pixels, and kept the same, respectively.",
                            found[0], found[1], found[2]
                        )
                    });
                    dbg.note(|| format!("Required exactly {want}."));
                }
                ok
            }
            CountMode::AtLeast => {
                let found = n(expanded);
                if found < want {
                    dbg.note(|| format!("Found count: {found} with xrange expanded by {tol} pixels."));
                    dbg.note(|| format!("Required at least {want}."));
                }
                found >= want
            }
            CountMode::AtMost => {
                let found = n(shrunk);
                if found > want {
                    dbg.note(|| format!("Found count: {found} with xrange shrunk by {tol} pixels."));
                    dbg.note(|| format!("Required at most {want}."));
                }
                found <= want
            }
        }
    })
}

const NOT_COVERED: &str = "Your function does not cover the entire domain of the specified curve.";

fn match_function(ctx: &Context<'_>, dbg: &mut Debugger) -> Finding {
    let g = ctx.grader;
    if ctx.tools.is_empty() {
        ctx.note_empty(dbg);
        return false.into();
    }
    let Some(f) = &ctx.fun else {
        return false.into();
    };
    let frame = ctx.frame();
    for &tool in &ctx.tools {
        let set = FunctionSet::new(frame, ctx.prims(tool));
        let point_tool = tool.kind() == T::Point;
        let tol = if point_tool {
            g.point_tolerance(tool)
        } else {
            ctx.tol
        };
        if !set.matches_function(f, ctx.x1, ctx.x2, tol, dbg) {
            return false.into();
        }
        if !g.allowundefined
            && !point_tool
            && !set.covers_function_domain(f, ctx.x1, ctx.x2, DOMAIN_COVERAGE, dbg)
        {
            return Finding {
                pass: false,
                note: Some(NOT_COVERED),
            };
        }
    }
    true.into()
}

fn monotone(ctx: &Context<'_>, dbg: &mut Debugger, increasing: bool) -> bool {
    let frame = ctx.frame();
    let cmp = if increasing {
        Comparison::LesserOrEqual
    } else {
        Comparison::GreaterOrEqual
    };
    let (x1, x2) = (ctx.x1, ctx.x2);
    ctx.all_in_range(dbg, |tool, prims, dbg| match tool.kind() {
        T::LineSegment => SegmentSet::new(frame, prims).monotone_between(x1, x2, increasing, dbg),
        _ => FunctionSet::new(frame, prims).monotone_between(
            cmp,
            x1,
            x2,
            MONOTONE_SAMPLES,
            frame.tol.inc_dec_failure,
            ctx.tol,
            dbg,
        ),
    })
}

fn concave(ctx: &Context<'_>, dbg: &mut Debugger, up: bool) -> bool {
    let frame = ctx.frame();
    let cmp = if up {
        Comparison::LesserOrEqual
    } else {
        Comparison::GreaterOrEqual
    };
    let (x1, x2) = (ctx.x1, ctx.x2);
    ctx.all_in_range(dbg, |tool, prims, dbg| match tool.kind() {
        T::LineSegment => {
            if SegmentSet::new(frame, prims).strict_between(x1, x2).is_empty() {
                Verdict::Ndef
            } else {
                dbg.note(|| "Found a line segment.".to_string());
                Verdict::Fail
            }
        }
        T::Polyline => {
            if FunctionSet::new(frame, prims).does_not_exist_between(x1, x2, ctx.tol) {
                Verdict::Ndef
            } else {
                dbg.note(|| "Found a polyline.".to_string());
                Verdict::Fail
            }
        }
        _ => FunctionSet::new(frame, prims).curvature_between(
            cmp,
            x1,
            x2,
            CONCAVE_SEGMENTS,
            frame.tol.curve_failure,
            ctx.tol,
            dbg,
        ),
    })
}

/// x-intervals where the marks of one tool are drawn on the canvas.
fn ranges_of(frame: Frame, kind: T, prims: &[Primitive]) -> Vec<Range> {
    match kind {
        T::Polygon => PolygonSet::new(frame, prims).range_defined(),
        T::LineSegment => SegmentSet::new(frame, prims).range_defined(),
        T::HorizontalLine => {
            AsymptoteSet::new(frame, Orientation::Horizontal, prims).range_defined()
        }
        T::VerticalLine => AsymptoteSet::new(frame, Orientation::Vertical, prims).range_defined(),
        T::Point | T::Spline | T::Freeform | T::Polyline => {
            FunctionSet::new(frame, prims).range_defined()
        }
    }
}

fn defined_ranges(ctx: &Context<'_>) -> Vec<Range> {
    let pieces: Vec<Range> = ctx
        .tools
        .iter()
        .flat_map(|&tool| ranges_of(ctx.frame(), tool.kind(), ctx.prims(tool)))
        .collect();
    collapse_ranges(&pieces)
}

fn defined_in(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    if ctx.tools.is_empty() {
        ctx.note_empty(dbg);
        return false;
    }
    let rd = defined_ranges(ctx);
    let gap = gap_length(&rd, ctx.x1, ctx.x2) * ctx.frame().xscale();
    let tol = ctx.tol;
    dbg.note(|| format!("Gap length is {gap} pixels."));
    dbg.note(|| format!("Max allowed is {tol} pixels."));
    gap <= tol
}

fn undefined_in(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    let rd = defined_ranges(ctx);
    let frame = ctx.frame();
    let covered = |a: f64, b: f64| covered_length(&rd, a, b) * frame.xscale();
    let (x1, x2, tol) = (ctx.x1, ctx.x2, ctx.tol);
    if x1 == x2 {
        // A single x: some 2 px window within the tolerance must be empty.
        let start = x1 - frame.x.px_to_units(tol);
        let w = frame.x.px_to_units(GAP_WINDOW_PX);
        let windows = (2.0 * tol / GAP_WINDOW_PX).ceil().max(1.0) as usize;
        let found = (0..windows).any(|i| {
            let a = start + w * i as f64;
            covered(a, a + w) <= 0.0
        });
        if !found {
            dbg.note(|| format!("No gap found within {tol} pixels of x = {x1}."));
        }
        return found;
    }
    let c = covered(x1, x2);
    if c > tol {
        dbg.note(|| format!("{c} pixels not empty in xrange."));
        dbg.note(|| format!("Max allowed coverage is {tol} pixels."));
    }
    c <= tol
}

fn compare(ctx: &Context<'_>, dbg: &mut Debugger, greater: bool) -> bool {
    let frame = ctx.frame();
    let (x1, x2, tol) = (ctx.x1, ctx.x2, ctx.tol);
    let y = ctx.grader.y;
    let fun = ctx.fun.as_ref();
    ctx.all_in_range(dbg, |tool, prims, dbg| match (tool.kind(), fun, y) {
        (T::LineSegment, Some(f), _) => {
            SegmentSet::new(frame, prims).compare_to_function(f, x1, x2, tol, greater, dbg)
        }
        (T::LineSegment, None, Some(y)) => {
            SegmentSet::new(frame, prims).compare_to_y(y, x1, x2, tol, greater, dbg)
        }
        (T::HorizontalLine, Some(f), _) => AsymptoteSet::new(frame, Orientation::Horizontal, prims)
            .compare_to_function(f, x1, x2, tol, greater, dbg),
        (T::HorizontalLine, None, Some(y)) => {
            AsymptoteSet::new(frame, Orientation::Horizontal, prims).compare_to_y(y, tol, greater, dbg)
        }
        (T::Polygon, Some(f), _) => {
            PolygonSet::new(frame, prims).compare_to_function(f, x1, x2, tol, greater, dbg)
        }
        (T::Polygon, None, Some(y)) => {
            PolygonSet::new(frame, prims).compare_to_y(y, x1, x2, tol, greater, dbg)
        }
        (_, Some(f), _) => {
            FunctionSet::new(frame, prims).compare_to_function(f, x1, x2, tol, greater, dbg)
        }
        (_, None, Some(y)) => {
            FunctionSet::new(frame, prims).compare_to_y(y, x1, x2, tol, greater, dbg)
        }
        (_, None, None) => Verdict::Ndef,
    })
}

fn match_length(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    let Some(length) = ctx.grader.length else {
        return false;
    };
    let frame = ctx.frame();
    ctx.all_in_range(dbg, |_, prims, dbg| {
        SegmentSet::new(frame, prims).match_length(length, ctx.x1, ctx.x2, ctx.tol, dbg)
    })
}

fn match_angle(ctx: &Context<'_>, dbg: &mut Debugger) -> bool {
    let Some(angle) = ctx.grader.angle else {
        return false;
    };
    let frame = ctx.frame();
    let flip = ctx.grader.allowflip;
    ctx.all_in_range(dbg, |_, prims, dbg| {
        SegmentSet::new(frame, prims).match_angle(angle, flip, ctx.x1, ctx.x2, ctx.tol, dbg)
    })
}
