use super::*;
use crate::primitive::{Primitive, VectorElement};
use proptest::prelude::*;
use serde_json::{json, Value};

fn reference_vector(disregard_sense: bool) -> Value {
    json!({
        "id": 1,
        "gradingName": "vector",
        "graded": true,
        "left": 100, "top": 80, "x1": 100, "y1": 80,
        "width": 60,
        "angle": 0,
        "offset_forward": 0,
        "offset_backward": 60,
        "disregard_sense": disregard_sense,
    })
}

fn student_vector(left: f64, top: f64, angle: f64) -> Value {
    json!({
        "gradingName": "vector",
        "graded": true,
        "left": left, "top": top,
        "width": 60,
        "angle": angle,
    })
}

fn drawing(objects: Vec<Value>) -> Drawing {
    Drawing::from_value(&json!({ "objects": objects })).unwrap()
}

fn score(reference: &Drawing, submitted: Vec<Value>) -> f64 {
    grade_drawing(reference, Some(&drawing(submitted)), &DrawingOptions::default()).score
}

#[test]
fn exact_vector_matches() {
    let reference = drawing(vec![reference_vector(false)]);
    let report = grade_drawing(
        &reference,
        Some(&drawing(vec![student_vector(100.0, 80.0, 0.0)])),
        &DrawingOptions::default(),
    );
    assert_eq!(report.score, 1.0);
    assert!(report.correct);
    assert_eq!(report.matches.get("1"), Some(&true));
    assert!(report.feedback.is_empty());
}

#[test]
fn vector_sense_must_agree_unless_disregarded() {
    let strict = drawing(vec![reference_vector(false)]);
    assert_eq!(score(&strict, vec![student_vector(100.0, 80.0, 180.0)]), 0.0);
    let lenient = drawing(vec![reference_vector(true)]);
    assert_eq!(score(&lenient, vec![student_vector(100.0, 80.0, 180.0)]), 1.0);
}

#[test]
fn anchor_keys_prefer_the_grading_anchor() {
    let el = DrawnElement::from_value(&json!({
        "gradingName": "vector", "left": 5, "top": 6, "x1": 100, "y1": 80, "angle": 90
    }))
    .unwrap();
    match el.primitive {
        Some(Primitive::Vector(v)) => {
            assert_eq!((v.x1, v.y1), (100.0, 80.0));
            assert_eq!(v.width, 60.0);
            assert!(v.anchor_is_tail);
        }
        other => panic!("expected a vector, got {other:?}"),
    }
}

#[test]
fn ungradeable_objects_are_ignored() {
    let reference = drawing(vec![
        reference_vector(false),
        json!({"gradingName": "rod", "left": 0, "top": 0}),
        json!({"gradingName": "point", "left": 40, "top": 40, "graded": false}),
    ]);
    assert_eq!(reference.elements.len(), 3);
    let report = grade_drawing(
        &reference,
        Some(&drawing(vec![
            student_vector(104.0, 78.0, 5.0),
            json!({"gradingName": "rod", "left": 300, "top": 300}),
        ])),
        &DrawingOptions::default(),
    );
    assert_eq!(report.score, 1.0);
    assert_eq!(report.matches.len(), 1);
}

#[test]
fn missing_submission_scores_zero() {
    let reference = drawing(vec![reference_vector(false)]);
    let report = grade_drawing(&reference, None, &DrawingOptions::default());
    assert_eq!(report.score, 0.0);
    assert_eq!(report.feedback, vec!["No submitted answer.".to_string()]);
    assert!(Drawing::from_submission(&json!({"answer": 1})).is_none());
    assert!(Drawing::from_submission(&json!("nothing")).is_none());
}

#[test]
fn partial_and_extra_elements() {
    let reference = drawing(vec![
        reference_vector(false),
        json!({"id": "p", "gradingName": "point", "left": 200, "top": 50}),
    ]);
    // Half the expected elements.
    assert_eq!(score(&reference, vec![student_vector(100.0, 80.0, 0.0)]), 0.5);
    // Everything plus one extra.
    let report = grade_drawing(
        &reference,
        Some(&drawing(vec![
            student_vector(100.0, 80.0, 0.0),
            json!({"gradingName": "point", "left": 205, "top": 45}),
            json!({"gradingName": "point", "left": 10, "top": 10}),
        ])),
        &DrawingOptions::default(),
    );
    assert_eq!(report.score, 0.5);
    assert_eq!(report.feedback, vec!["1 extra element(s) drawn.".to_string()]);
    // Extra elements never push the score below zero.
    let mut many = vec![
        student_vector(100.0, 80.0, 0.0),
        json!({"gradingName": "point", "left": 200, "top": 50}),
    ];
    many.extend((0..5).map(|i| json!({"gradingName": "point", "left": 10 * i, "top": 0})));
    assert_eq!(score(&reference, many), 0.0);
}

#[test]
fn each_reference_is_consumed_once() {
    let reference = drawing(vec![json!({"gradingName": "point", "left": 50, "top": 50})]);
    let twice = || {
        vec![
            json!({"gradingName": "point", "left": 50, "top": 50}),
            json!({"gradingName": "point", "left": 52, "top": 49}),
        ]
    };
    assert_eq!(score(&reference, twice()), 0.0);
    let opts = DrawingOptions {
        disregard_extra: true,
        ..DrawingOptions::default()
    };
    let report = grade_drawing(&reference, Some(&drawing(twice())), &opts);
    assert_eq!(report.score, 1.0);
}

#[test]
fn optional_references_do_not_count() {
    let reference = drawing(vec![
        reference_vector(false),
        json!({"gradingName": "point", "left": 200, "top": 50, "optional_grading": true}),
    ]);
    assert_eq!(score(&reference, vec![student_vector(100.0, 80.0, 0.0)]), 1.0);
    let with_optional = vec![
        student_vector(100.0, 80.0, 0.0),
        json!({"gradingName": "point", "left": 200, "top": 50}),
    ];
    assert_eq!(score(&reference, with_optional), 1.0);
}

#[test]
fn kinds_never_cross_match() {
    let reference = drawing(vec![json!({
        "gradingName": "double_headed_vector", "left": 100, "top": 80, "width": 60, "angle": 0
    })]);
    assert_eq!(score(&reference, vec![student_vector(100.0, 80.0, 0.0)]), 0.0);
    let double = json!({
        "gradingName": "double_headed_vector", "left": 100, "top": 80, "width": 60, "angle": 180
    });
    assert_eq!(score(&reference, vec![double]), 1.0);
}

#[test]
fn malformed_objects() {
    let bad = json!({"gradingName": "vector", "left": "far", "top": 3});
    assert!(DrawnElement::from_value(&bad).is_err());
    assert!(Drawing::from_value(&json!({ "objects": [bad.clone()] })).is_err());
    let lenient = Drawing::from_submission(&json!([bad, student_vector(1.0, 2.0, 0.0)])).unwrap();
    assert_eq!(lenient.elements.len(), 1);
}

#[test]
fn empty_reference_accepts_anything() {
    let reference = Drawing::default();
    assert_eq!(score(&reference, vec![student_vector(1.0, 1.0, 0.0)]), 1.0);
}

proptest! {
    #[test]
    fn anchors_on_the_error_box_boundary_match(
        angle in 0.0f64..360.0,
        tol in 1.0f64..30.0,
        along in 0.0f64..1.0,
        side in prop_oneof![Just(-1.0f64), Just(1.0f64)],
    ) {
        let mut r = VectorElement::new(200.0, 150.0, 60.0, angle);
        r.offset_forward = Some(0.0);
        r.offset_backward = Some(60.0);
        let b = r.error_box(tol);
        let theta = angle.to_radians();
        let dir = nalgebra::Vector2::new(theta.cos(), theta.sin());
        let perp = nalgebra::Vector2::new(-theta.sin(), theta.cos());
        let a = -b.max_backward + along * (b.max_forward + b.max_backward);
        let p = b.anchor + a * dir + side * b.max_perp * perp;
        let s = VectorElement::new(p.x, p.y, 60.0, angle);
        let reference = Drawing::new(vec![DrawnElement::new(Primitive::Vector(r))]);
        let submitted = Drawing::new(vec![DrawnElement::new(Primitive::Vector(s))]);
        let opts = DrawingOptions { tol, ..DrawingOptions::default() };
        prop_assert_eq!(grade_drawing(&reference, Some(&submitted), &opts).score, 1.0);
    }
}
