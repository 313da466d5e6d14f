use super::*;
use crate::coords::CanvasConfig;
use crate::error::SubmissionError;
use nalgebra::vector;

fn canvas() -> CanvasConfig {
    CanvasConfig {
        xrange: [0.0, 400.0],
        yrange: [0.0, 160.0],
        width: 400,
        height: 160,
    }
}

#[test]
fn angle_error_folds_into_half_turn() {
    assert!((angle_error(0.0, 350.0) - 10.0).abs() < 1e-12);
    assert!((angle_error(180.0, 0.0) - 180.0).abs() < 1e-12);
    assert!((angle_error(90.0, -270.0)).abs() < 1e-12);
    assert!((angle_error(10.0, 20.0) - 10.0).abs() < 1e-12);
}

#[test]
fn vector_exact_match() {
    let mut reference = VectorElement::new(100.0, 80.0, 60.0, 0.0);
    reference.offset_forward = Some(0.0);
    reference.offset_backward = Some(60.0);
    let submitted = VectorElement::new(100.0, 80.0, 60.0, 0.0);
    assert!(reference.matches(&submitted, 10.0, 10.0, false));
}

#[test]
fn vector_sense_mismatch() {
    let mut reference = VectorElement::new(100.0, 80.0, 60.0, 0.0);
    reference.offset_forward = Some(0.0);
    reference.offset_backward = Some(60.0);
    let submitted = VectorElement::new(100.0, 80.0, 60.0, 180.0);
    assert!(!reference.matches(&submitted, 10.0, 10.0, false));
    reference.disregard_sense = true;
    assert!(reference.matches(&submitted, 10.0, 10.0, false));
    reference.disregard_sense = false;
    assert!(reference.matches(&submitted, 10.0, 10.0, true));
}

#[test]
fn error_box_boundary_is_closed() {
    let b = ErrorBox::new(vector![100.0, 80.0], 0.0, 10.0, 0.0, 60.0);
    assert!(b.contains(vector![110.0, 80.0]));
    assert!(b.contains(vector![30.0, 90.0]));
    assert!(b.contains(vector![30.0, 70.0]));
    assert!(!b.contains(vector![110.5, 80.0]));
    assert!(!b.contains(vector![100.0, 90.5]));
    let (len, h) = b.size();
    assert_eq!((len, h), (80.0, 20.0));
    assert!((b.center() - vector![70.0, 80.0]).norm() < 1e-12);
}

#[test]
fn error_box_follows_rotation() {
    // Pointing down the screen: forward is +y.
    let b = ErrorBox::new(vector![0.0, 0.0], std::f64::consts::FRAC_PI_2, 5.0, 20.0, 0.0);
    assert!(b.contains(vector![0.0, 25.0]));
    assert!(!b.contains(vector![0.0, -6.0]));
    assert!(!b.contains(vector![6.0, 10.0]));
}

#[test]
fn head_anchored_vector_reports_tail() {
    let mut v = VectorElement::new(100.0, 80.0, 60.0, 0.0);
    v.anchor_is_tail = false;
    assert!((v.tail() - vector![40.0, 80.0]).norm() < 1e-12);
}

#[test]
fn load_profile_ordering() {
    let reference = LoadElement {
        x1: 100.0,
        y1: 100.0,
        range: 80.0,
        angle: 0.0,
        w1: 20.0,
        w2: 60.0,
        disregard_sense: false,
        offset_forward: None,
        offset_backward: None,
        flipped: false,
        optional_grading: false,
    };
    let mut submitted = reference;
    assert!(reference.matches(&submitted, 10.0, 10.0));
    submitted.w1 = 60.0;
    submitted.w2 = 20.0;
    assert!(!reference.matches(&submitted, 10.0, 10.0));
    submitted.flipped = true;
    assert!(reference.matches(&submitted, 10.0, 10.0));
    submitted.range = 120.0;
    assert!(!reference.matches(&submitted, 10.0, 10.0));
}

#[test]
fn controlled_line_accepts_either_order() {
    let reference = ControlledLineElement {
        x1: 10.0,
        y1: 10.0,
        x2: 50.0,
        y2: 40.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
    let reversed = ControlledLineElement {
        x1: 52.0,
        y1: 38.0,
        x2: 9.0,
        y2: 11.0,
        ..reference
    };
    assert!(reference.matches(&reversed, 5.0));
    assert!(!reference.matches(&reversed, 1.0));
}

#[test]
fn straight_four_point_spline_is_a_segment() {
    let cps = vec![
        vector![0.0, 0.0],
        vector![10.0, 10.0],
        vector![20.0, 20.0],
        vector![30.0, 30.0],
    ];
    assert!((linear_fit_r2(&cps) - 1.0).abs() < 1e-12);
    let p = Primitive::from_mark(ToolKind::LineSegment, false, Mark::Spline(cps));
    assert!(matches!(p, Primitive::LineSegment(_, _)));

    let bent = vec![
        vector![0.0, 0.0],
        vector![10.0, 40.0],
        vector![20.0, -40.0],
        vector![30.0, 0.0],
    ];
    let q = Primitive::from_mark(ToolKind::LineSegment, false, Mark::Spline(bent));
    assert!(matches!(q, Primitive::Spline(_)));
}

#[test]
fn closed_polyline_becomes_polygon() {
    let cps = vec![
        vector![0.0, 0.0],
        vector![3.0, 0.0],
        vector![6.0, 0.0],
        vector![9.0, 0.0],
        vector![9.0, 3.0],
        vector![9.0, 6.0],
        vector![9.0, 9.0],
        vector![6.0, 6.0],
        vector![3.0, 3.0],
        vector![0.0, 0.0],
    ];
    let open = Primitive::from_mark(ToolKind::Polyline, false, Mark::Spline(cps.clone()));
    assert_eq!(open.segments().len(), 3);
    match Primitive::from_mark(ToolKind::Polyline, true, Mark::Spline(cps)) {
        Primitive::Polygon(vs) => assert_eq!(vs.len(), 3),
        other => panic!("expected polygon, got {other:?}"),
    }
}

#[test]
fn raw_marks_validate_control_point_counts() {
    assert!(matches!(
        RawMark::spline(&[[0.0, 0.0], [1.0, 1.0]]).parse(),
        Err(SubmissionError::BadControlPointCount(2))
    ));
    assert!(matches!(
        RawMark::spline(&[[4.0, 5.0]]).parse(),
        Ok(Mark::Point(_))
    ));
    assert!(matches!(
        RawMark::default().parse(),
        Err(SubmissionError::EmptyMark)
    ));
    assert!(matches!(
        RawMark::point(f64::NAN, 0.0).parse(),
        Err(SubmissionError::NonFinite)
    ));
}

#[test]
fn submission_decodes_from_transport_text() {
    let sub = Submission::new(canvas()).with_marks("pt", vec![RawMark::point(10.0, 20.0)]);
    let encoded = sub.encode().unwrap();
    assert_eq!(Submission::decode(&encoded).unwrap(), sub);
    let json = r#"{"meta":{"config":{"xrange":[0,1],"yrange":[0,1],"width":10,"height":10}},
                   "gradeable":{"fd":[{"spline":[[0,0],[1,1],[2,2],[3,3]]}]}}"#;
    let parsed = Submission::from_json(json.as_bytes()).unwrap();
    assert_eq!(parsed.marks("fd").len(), 1);
    assert!(parsed.marks("missing").is_empty());
    assert!(matches!(
        Submission::decode("***"),
        Err(SubmissionError::Base64(_))
    ));
}

#[test]
fn flipping_twice_is_identity() {
    let sub = Submission::new(canvas()).with_marks(
        "fd",
        vec![RawMark::spline(&[
            [0.0, 0.0],
            [10.0, 5.0],
            [20.0, 7.0],
            [30.0, 40.0],
        ])],
    );
    let back = sub.flipped().flipped();
    assert_eq!(back, sub);
    let once = sub.flipped();
    assert_eq!(once.config().width, 160);
    assert_eq!(once.marks("fd")[0].spline.as_ref().unwrap()[1], [155.0, 390.0]);
}
