use crate::curve::{Arc, BsplineCurve, CurveGeometry, CurvePrimitive, Segment};
use crate::geometry::{ApproxEq, Matrix4, Point3, Vector3, EPSILON};
use crate::intersect::{intersect_projected_xy, intersect_xy, CurveExtension};

fn make_segment(x0: f64, y0: f64, x1: f64, y1: f64) -> CurvePrimitive {
    Segment::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0)).into()
}

#[test]
fn test_translation_matches_untransformed_query() {
    // Intersection structure is invariant under an affine map; the records
    // still carry world coordinates of the original curves.
    let a = make_segment(0.0, 0.0, 10.0, 10.0);
    let b: CurveGeometry = make_segment(0.0, 10.0, 10.0, 0.0).into();
    let m = Matrix4::new_translation(&Vector3::new(100.0, 50.0, 0.0));

    let set = intersect_projected_xy(&m, &a, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 1);
    let pair = &set.pairs()[0];
    assert!((pair.a.fraction - 0.5).abs() < EPSILON);
    assert!((pair.b.fraction - 0.5).abs() < EPSILON);
    assert!(pair.a.point.approx_eq(&Point3::new(5.0, 5.0, 0.0)));
}

#[test]
fn test_rotation_with_arc() {
    let arc: CurvePrimitive = Arc::full_circle(Point3::origin(), 5.0).into();
    let b: CurveGeometry = make_segment(-10.0, 0.0, 10.0, 0.0).into();
    let m = Matrix4::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);

    let set = intersect_projected_xy(&m, &arc, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    let mut xs: Vec<f64> = set.iter().map(|p| p.a.point.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((xs[0] - -5.0).abs() < EPSILON);
    assert!((xs[1] - 5.0).abs() < EPSILON);
    for pair in &set {
        // World coordinates, not view coordinates.
        assert!(pair.a.point.approx_eq(&pair.b.point));
        assert!(pair.a.point.y.abs() < EPSILON);
    }
}

#[test]
fn test_perspective_fraction_correction() {
    // w = 1 + 0.1*x. The first segment's endpoints project to (0,0) and
    // (5,0); the view-space crossing at x' = 2 corresponds to world
    // fraction 0.25, not the projected parameter 0.4.
    let mut m = Matrix4::identity();
    m[(3, 0)] = 0.1;

    let a = make_segment(0.0, 0.0, 10.0, 0.0);
    let b: CurveGeometry = make_segment(2.5, -5.0, 2.5, 5.0).into();

    let set = intersect_projected_xy(&m, &a, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 1);
    let pair = &set.pairs()[0];
    assert!((pair.a.fraction - 0.25).abs() < 1e-9);
    assert!((pair.b.fraction - 0.5).abs() < 1e-9);
    assert!(pair.a.point.approx_eq(&Point3::new(2.5, 0.0, 0.0)));
    assert!(pair.b.point.approx_eq(&Point3::new(2.5, 0.0, 0.0)));

    // The same query without the transform agrees on the world point.
    let plain = intersect_xy(&a, CurveExtension::None, &b, CurveExtension::None);
    assert!(plain.pairs()[0].a.point.approx_eq(&pair.a.point));
}

#[test]
fn test_affine_scale_with_bspline() {
    let spline: CurvePrimitive = BsplineCurve::open_uniform(
        2,
        vec![
            Point3::new(0.0, -5.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(10.0, -5.0, 0.0),
        ],
    )
    .unwrap()
    .into();
    let b: CurveGeometry = make_segment(0.0, -1.0, 10.0, -1.0).into();
    let m = Matrix4::new_scaling(2.0);

    let set = intersect_projected_xy(&m, &spline, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    let mut fracs: Vec<f64> = set.iter().map(|p| p.a.fraction).collect();
    fracs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((fracs[0] - 0.2763932).abs() < 1e-6);
    assert!((fracs[1] - 0.7236068).abs() < 1e-6);
    for pair in &set {
        assert!((pair.a.point.y - -1.0).abs() < 1e-6);
    }
}
