use crate::curve::{Arc, BsplineCurve, CurveGeometry, CurvePrimitive, LineString, Segment};
use crate::geometry::{ApproxEq, Point3, EPSILON};
use crate::intersect::{intersect_xy, CurveExtension, ExtendMode};

/// Clamped quadratic through (0,-5), (5,5), (10,-5): a parabola-shaped
/// Bezier with x(t) = 10t and y(t) = -5 + 20t - 20t^2.
fn hump_spline() -> CurvePrimitive {
    BsplineCurve::open_uniform(
        2,
        vec![
            Point3::new(0.0, -5.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(10.0, -5.0, 0.0),
        ],
    )
    .unwrap()
    .into()
}

fn make_segment(x0: f64, y0: f64, x1: f64, y1: f64) -> CurvePrimitive {
    Segment::new(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0)).into()
}

#[test]
fn test_segment_bspline_two_crossings() {
    let spline = hump_spline();
    let b: CurveGeometry = make_segment(0.0, -1.0, 10.0, -1.0).into();

    let set = intersect_xy(&spline, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);

    // y = -1 at 20t^2 - 20t + 4 = 0.
    let mut fracs: Vec<f64> = set.iter().map(|p| p.a.fraction).collect();
    fracs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((fracs[0] - 0.2763932).abs() < 1e-6);
    assert!((fracs[1] - 0.7236068).abs() < 1e-6);

    for pair in &set {
        assert!((pair.a.point.y - -1.0).abs() < EPSILON);
        assert!((pair.a.point - pair.b.point).norm() < EPSILON);
        // For this control polygon the segment fraction equals the spline's.
        assert!((pair.a.fraction - pair.b.fraction).abs() < 1e-6);
    }
}

#[test]
fn test_segment_bspline_no_crossing() {
    let spline = hump_spline();
    // The hump tops out at y = 0; a line above it never crosses.
    let b: CurveGeometry = make_segment(0.0, 1.0, 10.0, 1.0).into();
    assert!(intersect_xy(&spline, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_segment_rational_bspline() {
    // Rational quadratic quarter circle; homogeneous weights must flow
    // through evaluation for the hit to land on the unit circle.
    let w = std::f64::consts::FRAC_1_SQRT_2;
    let quarter: CurvePrimitive = BsplineCurve::new(
        2,
        vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        Some(vec![1.0, w, 1.0]),
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
    )
    .unwrap()
    .into();
    let b: CurveGeometry = make_segment(0.0, 0.0, 2.0, 2.0).into();

    let set = intersect_xy(&quarter, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 1);
    let pair = &set.pairs()[0];
    assert!(pair.a.point.approx_eq(&Point3::new(w, w, 0.0)));
    assert!((pair.a.fraction - 0.5).abs() < 1e-6);
    assert!((pair.b.fraction - w / 2.0).abs() < 1e-6);
}

#[test]
fn test_arc_bspline_crossings() {
    let spline = hump_spline();
    let circle: CurvePrimitive = Arc::full_circle(Point3::new(5.0, 0.0, 0.0), 2.0).into();
    let b: CurveGeometry = spline.clone().into();

    let set = intersect_xy(&circle, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    for pair in &set {
        assert!((pair.a.point - pair.b.point).norm() < 1e-4);
        let d = (pair.a.point - Point3::new(5.0, 0.0, 0.0)).norm();
        assert!((d - 2.0).abs() < 1e-6);
        assert!((pair.a.point.y - -0.7015621).abs() < 1e-4);
    }
    let mut fracs: Vec<f64> = set.iter().map(|p| p.b.fraction).collect();
    fracs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((fracs[0] - 0.3127086).abs() < 1e-4);
    assert!((fracs[1] - 0.6872914).abs() < 1e-4);

    // Swapped operands find the same points.
    let gb: CurveGeometry = circle.clone().into();
    let swapped = intersect_xy(&spline, CurveExtension::None, &gb, CurveExtension::None);
    assert_eq!(swapped.len(), 2);
    for pair in &swapped {
        let d = (pair.b.point - Point3::new(5.0, 0.0, 0.0)).norm();
        assert!((d - 2.0).abs() < 1e-6);
    }
}

#[test]
fn test_bspline_tangent_extension() {
    // The spline's end tangent ray from (10,-5) along (10,-20) meets the
    // segment at ray parameter 0.16, i.e. spline fraction 1.16.
    let spline = hump_spline();
    let b: CurveGeometry = make_segment(11.0, -10.0, 13.0, -4.0).into();

    let extended = intersect_xy(
        &spline,
        CurveExtension::Both(ExtendMode::OnTangent),
        &b,
        CurveExtension::None,
    );
    assert_eq!(extended.len(), 1);
    let pair = &extended.pairs()[0];
    assert!(pair.a.extrapolated);
    assert!((pair.a.fraction - 1.16).abs() < 1e-4);
    assert!((pair.b.fraction - 0.3).abs() < 1e-4);
    assert!((pair.a.point.x - 11.6).abs() < 1e-4);
    assert!((pair.a.point.y - -8.2).abs() < 1e-4);

    // Without extension the candidate is rejected.
    assert!(intersect_xy(&spline, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_bspline_bspline_is_a_stub() {
    let a = hump_spline();
    let mirrored: CurvePrimitive = BsplineCurve::open_uniform(
        2,
        vec![
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(5.0, -5.0, 0.0),
            Point3::new(10.0, 5.0, 0.0),
        ],
    )
    .unwrap()
    .into();
    let b: CurveGeometry = mirrored.into();
    // The curves cross twice geometrically, but this pairing is a
    // documented stub with no solver.
    assert!(intersect_xy(&a, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_linestring_bspline_is_a_gap() {
    let spline = hump_spline();
    let ls: CurvePrimitive = LineString::new(vec![
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(10.0, -1.0, 0.0),
    ])
    .into();
    let gb: CurveGeometry = spline.clone().into();
    assert!(intersect_xy(&ls, CurveExtension::None, &gb, CurveExtension::None).is_empty());
    let gb: CurveGeometry = ls.clone().into();
    assert!(intersect_xy(&spline, CurveExtension::None, &gb, CurveExtension::None).is_empty());
}
