use super::*;
use nalgebra::vector;

fn canvas() -> CanvasConfig {
    CanvasConfig {
        xrange: [-2.0, 2.0],
        yrange: [-1.0, 3.0],
        width: 400,
        height: 200,
    }
}

#[test]
fn axis_rejects_degenerate_domains() {
    assert!(Axis::new((0.0, 0.0), 10).is_err());
    assert!(Axis::new((0.0, 1.0), 0).is_err());
    assert!(Axis::new((0.0, f64::NAN), 10).is_err());
    assert!(Axis::new((1.0, 0.0), 10).is_ok());
}

#[test]
fn pixel_coord_maps_are_inverse() {
    let ax = canvas().x_axis().unwrap();
    for px in [0.0, 13.5, 200.0, 400.0] {
        let v = ax.pixel_to_coord(px);
        assert!((ax.coord_to_pixel(v) - px).abs() < 1e-9);
    }
    assert!((ax.pixel_to_coord(200.0)).abs() < 1e-12);
    assert!((ax.scale() - 100.0).abs() < 1e-12);
    assert!((ax.px_to_units(50.0) - 0.5).abs() < 1e-12);
}

#[test]
fn y_axis_is_inverted() {
    let ay = canvas().y_axis().unwrap();
    assert!((ay.pixel_to_coord(0.0) - 3.0).abs() < 1e-12);
    assert!((ay.pixel_to_coord(200.0) + 1.0).abs() < 1e-12);
    assert!((ay.scale() - 50.0).abs() < 1e-12);
    assert_eq!(ay.bounds(), (-1.0, 3.0));
}

#[test]
fn frame_round_trips_points() {
    let f = Frame::new(&canvas(), Tolerances::default()).unwrap();
    let g = f.to_graph(vector![100.0, 50.0]);
    assert!((g.x + 1.0).abs() < 1e-12);
    assert!((g.y - 2.0).abs() < 1e-12);
    let back = f.to_pixel(g);
    assert!((back - vector![100.0, 50.0]).norm() < 1e-9);
}

#[test]
fn within_y_range_shrinks_and_expands() {
    let f = Frame::new(&canvas(), Tolerances::default()).unwrap();
    // 10 px on y is 0.2 graph units.
    assert!(f.within_y_range(3.0, 0.0, 0.0));
    assert!(!f.within_y_range(3.0, 10.0, 0.0));
    assert!(f.within_y_range(2.79, 10.0, 0.0));
    assert!(f.within_y_range(3.15, 0.0, 10.0));
    assert!(!f.within_y_range(3.25, 0.0, 10.0));
}

#[test]
fn flipped_canvas_swaps_axes() {
    let c = canvas().flipped();
    assert_eq!(c.xrange, [-1.0, 3.0]);
    assert_eq!(c.width, 200);
    assert_eq!(c.height, 400);
}

#[test]
fn default_tolerances_follow_grid() {
    let t = Tolerances::default();
    assert_eq!(t.positional, 10.0);
    assert_eq!(t.inc_dec_failure, 2.0);
    let parsed: Tolerances = serde_json::from_str(r#"{"gap": 12}"#).unwrap();
    assert_eq!(parsed.gap, 12.0);
    assert_eq!(parsed.asym_same, 10.0);
}
