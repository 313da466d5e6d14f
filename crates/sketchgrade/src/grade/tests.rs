use super::*;
use crate::coords::{CanvasConfig, Frame, Tolerances};
use crate::expr::Function;
use crate::geom::{gap_length, CubicCurve, Spline};
use crate::primitive::{PointElement, Primitive};
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

/// 100 px per unit on both axes, x ∈ [-3, 3], y ∈ [-1, 5].
fn parabola_frame() -> Frame {
    let canvas = CanvasConfig {
        xrange: [-3.0, 3.0],
        yrange: [-1.0, 5.0],
        width: 600,
        height: 600,
    };
    Frame::new(&canvas, Tolerances::default()).unwrap()
}

/// 50 px per unit on both axes, x ∈ [-1, 11], y ∈ [-2, 14].
fn wide_frame() -> Frame {
    let canvas = CanvasConfig {
        xrange: [-1.0, 11.0],
        yrange: [-2.0, 14.0],
        width: 600,
        height: 800,
    };
    Frame::new(&canvas, Tolerances::default()).unwrap()
}

/// One cubic piece tracing `y = x² + shift` exactly on `[a, b]`.
fn parabola(a: f64, b: f64, shift: f64) -> Spline {
    let q0 = vector![a, a * a + shift];
    let q1 = vector![(a + b) / 2.0, a * b + shift];
    let q2 = vector![b, b * b + shift];
    let c = CubicCurve::new(q0, q0 + 2.0 / 3.0 * (q1 - q0), q2 + 2.0 / 3.0 * (q1 - q2), q2);
    Spline::from_control_points(&c.p).unwrap()
}

/// Straight pieces through `knots`.
fn broken_line(knots: &[Vector2<f64>]) -> Spline {
    let mut cps = vec![knots[0]];
    for w in knots.windows(2) {
        let d = (w[1] - w[0]) / 3.0;
        cps.extend([w[0] + d, w[0] + 2.0 * d, w[1]]);
    }
    Spline::from_control_points(&cps).unwrap()
}

/// Knots at the ten sample positions over `[0, 10]`, rising by one per step, with
/// the listed knots dropped one unit below their left neighbour.
fn rising_with_dips(dips: &[usize]) -> Spline {
    let mut ys: Vec<f64> = (0..10).map(|i| i as f64).collect();
    for &i in dips {
        ys[i] = ys[i - 1] - 1.0;
    }
    let knots: Vec<Vector2<f64>> = ys
        .iter()
        .enumerate()
        .map(|(i, &y)| vector![10.0 * i as f64 / 9.0, y])
        .collect();
    broken_line(&knots)
}

#[test]
fn parabola_matches_its_formula() {
    let frame = parabola_frame();
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let f = Function::parse("x*x").unwrap();
    let mut dbg = Debugger::new(true);
    assert!(set.matches_function(&f, -2.0, 2.0, 5.0, &mut dbg), "{:?}", dbg.lines());
}

#[test]
fn shifted_parabola_does_not_match() {
    let frame = parabola_frame();
    // 0.5 units is 50 px, well past a 5 px tolerance.
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.5)], vec![]);
    let f = Function::parse("x*x").unwrap();
    let mut dbg = Debugger::new(true);
    assert!(!set.matches_function(&f, -2.0, 2.0, 5.0, &mut dbg));
    assert!(!dbg.lines().is_empty());
}

#[test]
fn coverage_of_formula_domain() {
    let frame = parabola_frame();
    let f = Function::parse("x*x").unwrap();
    let full = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let half = FunctionSet::from_parts(frame, vec![parabola(0.0, 2.2, 0.0)], vec![]);
    let mut dbg = Debugger::new(false);
    assert!(full.covers_function_domain(&f, -2.0, 2.0, 0.9, &mut dbg));
    assert!(!half.covers_function_domain(&f, -2.0, 2.0, 0.9, &mut dbg));
    assert!(dbg.lines().is_empty(), "disabled debugger keeps nothing");
}

#[test]
fn formula_splines_break_where_undefined() {
    let f = Function::parse("sqrt(x)").unwrap();
    let splines = function_splines(&f, -1.0, 1.0);
    assert_eq!(splines.len(), 1);
    assert!(splines[0].start().x >= 0.0);
    let g = Function::parse("1/x").unwrap();
    // Only x = 0 exactly is undefined, and no sample lands there.
    assert_eq!(function_splines(&g, -1.0, 1.02).len(), 1);
}

#[test]
fn monotone_tolerates_dips_within_budget() {
    let frame = wide_frame();
    let budget = frame.tol.inc_dec_failure;
    let check = |dips: &[usize]| {
        let set = FunctionSet::from_parts(frame, vec![rising_with_dips(dips)], vec![]);
        let mut dbg = Debugger::new(true);
        set.monotone_between(Comparison::LesserOrEqual, 0.0, 10.0, 10, budget, 5.0, &mut dbg)
    };
    assert_eq!(check(&[]), Verdict::Pass);
    assert_eq!(check(&[5]), Verdict::Pass);
    assert_eq!(check(&[3, 7]), Verdict::Pass);
    assert_eq!(check(&[3, 5, 7]), Verdict::Fail);
}

#[test]
fn monotone_is_ndef_without_data() {
    let frame = wide_frame();
    let set = FunctionSet::from_parts(frame, vec![rising_with_dips(&[])], vec![]);
    let mut dbg = Debugger::new(false);
    let v = set.monotone_between(Comparison::GreaterOrEqual, 0.0, 10.0, 10, 2.0, 5.0, &mut dbg);
    assert_eq!(v, Verdict::Fail);
    let empty = FunctionSet::from_parts(frame, vec![], vec![]);
    let v = empty.monotone_between(Comparison::LesserOrEqual, 0.0, 10.0, 10, 2.0, 5.0, &mut dbg);
    assert_eq!(v, Verdict::Ndef);
}

#[test]
fn parabola_is_concave_up() {
    let frame = parabola_frame();
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let mut dbg = Debugger::new(false);
    let up = set.curvature_between(Comparison::LesserOrEqual, -2.0, 2.0, 5, 1.0, 10.0, &mut dbg);
    let down = set.curvature_between(Comparison::GreaterOrEqual, -2.0, 2.0, 5, 1.0, 10.0, &mut dbg);
    assert_eq!(up, Verdict::Pass);
    assert_eq!(down, Verdict::Fail);
}

#[test]
fn parabola_against_horizontal_lines() {
    let frame = parabola_frame();
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let mut dbg = Debugger::new(false);
    assert_eq!(set.compare_to_y(-0.5, -1.0, 1.0, 15.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_y(0.5, -1.0, 1.0, 15.0, true, &mut dbg), Verdict::Fail);
    // 60 px of slack reaches 0.6 units below the line.
    assert_eq!(set.compare_to_y(0.5, -1.0, 1.0, 60.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_y(1.5, -1.0, 1.0, 15.0, false, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_y(0.0, 2.5, 2.9, 15.0, true, &mut dbg), Verdict::Ndef);
}

#[test]
fn parabola_against_formula() {
    let frame = parabola_frame();
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let below = Function::parse("x*x - 1").unwrap();
    let mut dbg = Debugger::new(false);
    assert_eq!(set.compare_to_function(&below, -2.0, 2.0, 5.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_function(&below, -2.0, 2.0, 5.0, false, &mut dbg), Verdict::Fail);
}

#[test]
fn value_lookup_by_coordinate() {
    let frame = parabola_frame();
    let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
    let mut dbg = Debugger::new(false);
    assert!(set.has_value_at(Some(1.0), Some(1.0), 10.0, &mut dbg));
    assert!(!set.has_value_at(Some(1.0), Some(2.0), 10.0, &mut dbg));
    assert!(set.has_value_at(Some(2.25), None, 10.0, &mut dbg));
    assert!(!set.has_value_at(Some(2.5), None, 10.0, &mut dbg));
    assert!(set.has_value_at(None, Some(3.0), 10.0, &mut dbg));
    assert!(!set.has_value_at(None, None, 10.0, &mut dbg));
}

#[test]
fn gap_in_domain_is_measured() {
    let frame = wide_frame();
    let left = broken_line(&[vector![0.0, 1.0], vector![4.0, 2.0]]);
    let right = broken_line(&[vector![6.0, 2.0], vector![10.0, 3.0]]);
    let set = FunctionSet::from_parts(frame, vec![left, right], vec![]);
    let rd = set.range_defined();
    assert_eq!(rd.len(), 2);
    let gap_px = gap_length(&rd, 0.0, 10.0) * frame.xscale();
    assert!((gap_px - 100.0).abs() < 1e-6);
    let (no_gap, y) = set.value_at_gap(5.0);
    assert!(!no_gap, "100 px is wider than the 40 px gap tolerance");
    assert!((y.unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn points_are_deduplicated_and_looked_up() {
    let frame = wide_frame();
    let prims = vec![
        Primitive::Point(PointElement::at(vector![100.0, 100.0])),
        Primitive::Point(PointElement::at(vector![104.0, 103.0])),
        Primitive::Point(PointElement::at(vector![300.0, 100.0])),
    ];
    let set = FunctionSet::new(frame, &prims);
    assert_eq!(set.points().len(), 2);
    let p = set.points()[0];
    let mut dbg = Debugger::new(false);
    assert!(set.has_point_at(Some(p.x), Some(p.y), 5.0, &mut dbg));
    assert!(set.has_point_at(Some(p.x + 0.05), None, 5.0, &mut dbg));
    assert!(!set.has_point_at(Some(p.x + 0.5), Some(p.y), 5.0, &mut dbg));
    // Points alone define ±6 px around themselves.
    let rd = set.range_defined();
    assert_eq!(rd.len(), 2);
    assert!((rd[0].len() * frame.xscale() - 12.0).abs() < 1e-9);
}

#[test]
fn segments_monotone_and_measured() {
    let frame = wide_frame();
    let px = |x: f64, y: f64| frame.to_pixel(vector![x, y]);
    let prims = vec![Primitive::LineSegment(px(0.0, 0.0), px(6.0, 8.0))];
    let set = SegmentSet::new(frame, &prims);
    let mut dbg = Debugger::new(false);
    assert_eq!(set.monotone_between(0.0, 10.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.monotone_between(0.0, 10.0, false, &mut dbg), Verdict::Fail);
    assert_eq!(set.monotone_between(8.0, 10.0, true, &mut dbg), Verdict::Ndef);
    assert_eq!(set.match_length(10.0, 0.0, 10.0, 5.0, &mut dbg), Verdict::Pass);
    assert_eq!(set.match_length(11.0, 0.0, 10.0, 5.0, &mut dbg), Verdict::Fail);
    let angle = 8.0f64.atan2(6.0).to_degrees();
    assert_eq!(set.match_angle(angle, false, 0.0, 10.0, 2.0, &mut dbg), Verdict::Pass);
    assert_eq!(set.match_angle(angle + 180.0, false, 0.0, 10.0, 2.0, &mut dbg), Verdict::Fail);
    assert_eq!(set.match_angle(angle + 180.0, true, 0.0, 10.0, 2.0, &mut dbg), Verdict::Pass);
    assert!(set.check_endpoint(vector![6.0, 8.0], Endpoint::End, 5.0, &mut dbg));
    assert!(!set.check_endpoint(vector![6.0, 8.0], Endpoint::Start, 5.0, &mut dbg));
    assert!(set.check_endpoint(vector![6.0, 8.0], Endpoint::Either, 5.0, &mut dbg));
    assert!(set.has_value_at(Some(3.0), Some(4.0), 10.0, &mut dbg));
    assert!(!set.has_value_at(Some(3.0), Some(6.0), 10.0, &mut dbg));
}

#[test]
fn segments_against_lines() {
    let frame = wide_frame();
    let px = |x: f64, y: f64| frame.to_pixel(vector![x, y]);
    let prims = vec![Primitive::LineSegment(px(0.0, 2.0), px(10.0, 4.0))];
    let set = SegmentSet::new(frame, &prims);
    let mut dbg = Debugger::new(false);
    assert_eq!(set.compare_to_y(1.0, 0.0, 10.0, 15.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_y(3.0, 0.0, 10.0, 15.0, true, &mut dbg), Verdict::Fail);
    assert_eq!(set.compare_to_y(5.0, 0.0, 10.0, 15.0, false, &mut dbg), Verdict::Pass);
    let f = Function::parse("x/5 + 1").unwrap();
    assert_eq!(set.compare_to_function(&f, 0.0, 10.0, 5.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_function(&f, 0.0, 10.0, 5.0, false, &mut dbg), Verdict::Fail);
}

#[test]
fn polygon_containment_and_bounds() {
    let frame = wide_frame();
    let px = |x: f64, y: f64| frame.to_pixel(vector![x, y]);
    let square = vec![px(2.0, 2.0), px(6.0, 2.0), px(6.0, 6.0), px(2.0, 6.0)];
    let set = PolygonSet::new(frame, &[Primitive::Polygon(square)]);
    let mut dbg = Debugger::new(false);
    assert!(set.contains_point(Some(4.0), Some(4.0), 10.0, &mut dbg));
    assert!(set.contains_point(Some(6.1), Some(4.0), 10.0, &mut dbg));
    assert!(!set.contains_point(Some(7.0), Some(4.0), 10.0, &mut dbg));
    assert!(set.contains_point(None, Some(5.0), 10.0, &mut dbg));
    assert_eq!(set.compare_to_y(1.0, 0.0, 10.0, 15.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(set.compare_to_y(4.0, 0.0, 10.0, 15.0, true, &mut dbg), Verdict::Fail);
    assert_eq!(set.compare_to_y(4.0, 8.0, 10.0, 15.0, true, &mut dbg), Verdict::Ndef);
    let rd = set.range_defined();
    assert_eq!(rd.len(), 1);
    assert!((rd[0].lo - 2.0).abs() < 1e-9 && (rd[0].hi - 6.0).abs() < 1e-9);
}

#[test]
fn asymptotes_merge_and_match() {
    let frame = wide_frame();
    let x_px = |x: f64| frame.x.coord_to_pixel(x);
    let prims = vec![
        Primitive::VerticalAsymptote(x_px(3.0)),
        Primitive::VerticalAsymptote(x_px(3.0) + 4.0),
        Primitive::VerticalAsymptote(x_px(7.0)),
        Primitive::HorizontalAsymptote(frame.y.coord_to_pixel(2.0)),
    ];
    let vertical = AsymptoteSet::new(frame, Orientation::Vertical, &prims);
    assert_eq!(vertical.values().len(), 2);
    let mut dbg = Debugger::new(false);
    assert!(vertical.has_asym_at(3.2, 20.0, &mut dbg));
    assert!(!vertical.has_asym_at(5.0, 20.0, &mut dbg));
    let horizontal = AsymptoteSet::new(frame, Orientation::Horizontal, &prims);
    assert_eq!(horizontal.values().len(), 1);
    assert_eq!(horizontal.compare_to_y(1.0, 15.0, true, &mut dbg), Verdict::Pass);
    assert_eq!(horizontal.compare_to_y(3.0, 15.0, true, &mut dbg), Verdict::Fail);
    let (xlo, xhi) = frame.x.bounds();
    assert_eq!(horizontal.range_defined()[0].len(), xhi - xlo);
}

proptest! {
    #[test]
    fn points_on_the_curve_always_match(x in -1.8f64..1.8, tol in 1.0f64..40.0) {
        let frame = parabola_frame();
        let set = FunctionSet::from_parts(frame, vec![parabola(-2.2, 2.2, 0.0)], vec![]);
        let mut dbg = Debugger::new(false);
        prop_assert!(set.has_value_at(Some(x), Some(x * x), tol, &mut dbg));
    }
}
