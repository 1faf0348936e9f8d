use crate::curve::{Arc, BsplineCurve, CurveGeometry, CurvePrimitive, LineString, Segment};
use crate::geometry::{ApproxEq, Point3, Vector3, EPSILON};
use crate::intersect::{closest_approach_xyz, intersect_xyz, CurveExtension};

fn seg3(p0: [f64; 3], p1: [f64; 3]) -> CurvePrimitive {
    Segment::new(
        Point3::new(p0[0], p0[1], p0[2]),
        Point3::new(p1[0], p1[1], p1[2]),
    )
    .into()
}

#[test]
fn test_segments_meeting_in_space() {
    let a = seg3([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
    let b: CurveGeometry = seg3([2.0, 0.0, 0.0], [0.0, 2.0, 2.0]).into();

    let set = intersect_xyz(&a, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 1);
    let pair = &set.pairs()[0];
    assert!(pair.a.point.approx_eq(&Point3::new(1.0, 1.0, 1.0)));
    assert!(pair.b.point.approx_eq(&Point3::new(1.0, 1.0, 1.0)));
    assert!((pair.a.fraction - 0.5).abs() < EPSILON);
    assert!((pair.b.fraction - 0.5).abs() < EPSILON);
}

#[test]
fn test_skew_segments_do_not_meet() {
    // Closest approach distance is 1; the lines never touch.
    let a = seg3([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let b: CurveGeometry = seg3([1.0, -1.0, 1.0], [1.0, 1.0, 1.0]).into();
    assert!(intersect_xyz(&a, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_segment_pierces_arc_plane() {
    let arc: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    let b: CurveGeometry = seg3([1.0, -1.0, -1.0], [1.0, 1.0, 1.0]).into();

    let set = intersect_xyz(&arc, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 1);
    let pair = &set.pairs()[0];
    assert!(pair.a.point.approx_eq(&Point3::new(1.0, 0.0, 0.0)));
    assert!(pair.b.point.approx_eq(&Point3::new(1.0, 0.0, 0.0)));
    assert!((pair.b.fraction - 0.5).abs() < EPSILON);
}

#[test]
fn test_segment_pierce_off_conic_is_empty() {
    let arc: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    // Pierces the plane at (3, 0, 0), well off the circle.
    let b: CurveGeometry = seg3([3.0, 0.0, -1.0], [3.0, 0.0, 1.0]).into();
    assert!(intersect_xyz(&arc, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_segment_in_arc_plane() {
    let arc: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    let b: CurveGeometry = seg3([-2.0, 0.0, 0.0], [2.0, 0.0, 0.0]).into();

    let set = intersect_xyz(&arc, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    let mut xs: Vec<f64> = set.iter().map(|p| p.a.point.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((xs[0] - -1.0).abs() < EPSILON);
    assert!((xs[1] - 1.0).abs() < EPSILON);
    for pair in &set {
        assert!(pair.a.point.approx_eq(&pair.b.point));
    }
}

#[test]
fn test_arc_arc_coplanar() {
    let a: CurvePrimitive = Arc::full_circle(Point3::origin(), 5.0).into();
    let b: CurveGeometry =
        CurveGeometry::Single(Arc::full_circle(Point3::new(6.0, 0.0, 0.0), 5.0).into());

    let set = intersect_xyz(&a, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    for pair in &set {
        assert!(pair.a.point.approx_eq(&pair.b.point));
        assert!((pair.a.point.x - 3.0).abs() < EPSILON);
        assert!((pair.a.point.y.abs() - 4.0).abs() < EPSILON);
        assert!(pair.a.point.z.abs() < EPSILON);
    }
}

#[test]
fn test_arc_arc_skew_planes() {
    // Unit circles in the XY and XZ planes share the points (1,0,0), (-1,0,0).
    let a: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    let xz: CurvePrimitive = Arc::new(
        Point3::origin(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        0.0,
        std::f64::consts::TAU,
    )
    .into();
    let b = CurveGeometry::Single(xz);

    let set = intersect_xyz(&a, CurveExtension::None, &b, CurveExtension::None);
    assert_eq!(set.len(), 2);
    let mut xs: Vec<f64> = set.iter().map(|p| p.a.point.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((xs[0] - -1.0).abs() < EPSILON);
    assert!((xs[1] - 1.0).abs() < EPSILON);
    for pair in &set {
        assert!(pair.a.point.approx_eq(&pair.b.point));
        assert!(pair.a.point.y.abs() < EPSILON);
        assert!(pair.a.point.z.abs() < EPSILON);
    }
}

#[test]
fn test_arc_arc_parallel_planes_empty() {
    let a: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    let b: CurveGeometry =
        CurveGeometry::Single(Arc::full_circle(Point3::new(0.0, 0.0, 2.0), 1.0).into());
    assert!(intersect_xyz(&a, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_bspline_unsupported_in_spatial_variant() {
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
    let seg = seg3([0.0, -1.0, 0.0], [10.0, -1.0, 0.0]);

    let b: CurveGeometry = spline.clone().into();
    assert!(intersect_xyz(&seg, CurveExtension::None, &b, CurveExtension::None).is_empty());
    let b: CurveGeometry = seg.clone().into();
    assert!(intersect_xyz(&spline, CurveExtension::None, &b, CurveExtension::None).is_empty());
}

#[test]
fn test_closest_approach_skew_segments() {
    let a = seg3([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let b = seg3([1.0, -1.0, 1.0], [1.0, 1.0, 1.0]);

    let pair = closest_approach_xyz(&a, &b).unwrap();
    assert!(pair.a.point.approx_eq(&Point3::new(1.0, 0.0, 0.0)));
    assert!(pair.b.point.approx_eq(&Point3::new(1.0, 0.0, 1.0)));
    assert!((pair.a.fraction - 0.5).abs() < EPSILON);
    assert!((pair.b.fraction - 0.5).abs() < EPSILON);
}

#[test]
fn test_closest_approach_clamps_to_ends() {
    let a = seg3([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let b = seg3([3.0, 1.0, 0.0], [3.0, 2.0, 0.0]);

    let pair = closest_approach_xyz(&a, &b).unwrap();
    assert!((pair.a.fraction - 1.0).abs() < EPSILON);
    assert!(pair.b.fraction.abs() < EPSILON);
    assert!(pair.a.point.approx_eq(&Point3::new(1.0, 0.0, 0.0)));
    assert!(pair.b.point.approx_eq(&Point3::new(3.0, 1.0, 0.0)));
}

#[test]
fn test_closest_approach_linestring() {
    let a = seg3([0.0, 0.0, 2.0], [4.0, 0.0, 2.0]);
    let ls: CurvePrimitive = LineString::new(vec![
        Point3::new(0.0, 5.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(4.0, 5.0, 0.0),
    ])
    .into();

    let pair = closest_approach_xyz(&a, &ls).unwrap();
    // The polyline's interior vertex is the nearest spot.
    assert!(pair.b.point.approx_eq(&Point3::new(2.0, 0.0, 0.0)));
    assert!(pair.a.point.approx_eq(&Point3::new(2.0, 0.0, 2.0)));
    assert!((pair.b.fraction - 0.5).abs() < EPSILON);
}

#[test]
fn test_closest_approach_unsupported_types() {
    let a = seg3([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let arc: CurvePrimitive = Arc::full_circle(Point3::origin(), 1.0).into();
    assert!(closest_approach_xyz(&a, &arc).is_none());
}
