use crate::geometry::{Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::visitor::CurveVisitor;
use super::{CurveError, CurveResult};

/// A bounded straight line between two points.
///
/// The parameter space is the fraction along `start -> end`; fractions
/// outside [0,1] evaluate on the carrier line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    pub fn point_at(&self, fraction: f64) -> Point3 {
        self.start + self.direction() * fraction
    }
}

/// An open polyline. The global fraction spreads uniformly across edges:
/// fraction f maps to edge `floor(f * edge_count)` at the local remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    pub points: Vec<Point3>,
}

impl LineString {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn edge(&self, index: usize) -> Option<Segment> {
        if index + 1 < self.points.len() {
            Some(Segment::new(self.points[index], self.points[index + 1]))
        } else {
            None
        }
    }

    /// Map an edge-local parameter to the polyline's global fraction.
    pub fn global_fraction(&self, edge: usize, local: f64) -> f64 {
        let n = self.edge_count();
        if n == 0 {
            return 0.0;
        }
        (edge as f64 + local) / n as f64
    }

    /// Split a global fraction into (edge index, edge-local parameter).
    /// Out-of-domain fractions land on the first or last edge.
    pub fn edge_fraction(&self, fraction: f64) -> (usize, f64) {
        let n = self.edge_count();
        if n == 0 {
            return (0, 0.0);
        }
        let scaled = fraction * n as f64;
        if fraction <= 0.0 {
            (0, scaled)
        } else if fraction >= 1.0 {
            (n - 1, scaled - (n - 1) as f64)
        } else {
            let edge = (scaled.floor() as usize).min(n - 1);
            (edge, scaled - edge as f64)
        }
    }

    pub fn point_at(&self, fraction: f64) -> Point3 {
        if self.points.len() < 2 {
            return self.points.first().copied().unwrap_or_else(Point3::origin);
        }
        let (edge, local) = self.edge_fraction(fraction);
        self.edge(edge).map(|e| e.point_at(local)).unwrap_or_else(Point3::origin)
    }
}

/// A circular or elliptical arc in any plane.
///
/// Points are `center + cos(theta)*vector0 + sin(theta)*vector90` with theta
/// sweeping from `start_angle` over the signed `sweep`. A full circle has
/// `|sweep| == 2*pi`; the angular domain is periodic, so sweeps crossing the
/// zero seam need no special casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub vector0: Vector3,
    pub vector90: Vector3,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    pub fn new(center: Point3, vector0: Vector3, vector90: Vector3, start_angle: f64, sweep: f64) -> Self {
        Self { center, vector0, vector90, start_angle, sweep }
    }

    /// Circular arc in the XY plane from `start_angle` to `end_angle`,
    /// traversed counter-clockwise (a non-positive raw sweep wraps forward).
    pub fn circular(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let mut sweep = end_angle - start_angle;
        if sweep <= 0.0 {
            sweep += TAU;
        }
        Self::new(
            center,
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, radius, 0.0),
            start_angle,
            sweep,
        )
    }

    pub fn full_circle(center: Point3, radius: f64) -> Self {
        Self::new(
            center,
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, radius, 0.0),
            0.0,
            TAU,
        )
    }

    /// Elliptical arc in the XY plane: semi-axes `semi_major`/`semi_minor`
    /// with the major axis rotated by `rotation` radians.
    pub fn elliptical(
        center: Point3,
        semi_major: f64,
        semi_minor: f64,
        rotation: f64,
        start_angle: f64,
        sweep: f64,
    ) -> Self {
        let (s, c) = rotation.sin_cos();
        Self::new(
            center,
            Vector3::new(semi_major * c, semi_major * s, 0.0),
            Vector3::new(-semi_minor * s, semi_minor * c, 0.0),
            start_angle,
            sweep,
        )
    }

    pub fn angle_at_fraction(&self, fraction: f64) -> f64 {
        self.start_angle + fraction * self.sweep
    }

    pub fn point_at_angle(&self, theta: f64) -> Point3 {
        self.center + self.vector0 * theta.cos() + self.vector90 * theta.sin()
    }

    pub fn point_at(&self, fraction: f64) -> Point3 {
        self.point_at_angle(self.angle_at_fraction(fraction))
    }

    /// Derivative with respect to the fraction parameter.
    pub fn tangent_at(&self, fraction: f64) -> Vector3 {
        let theta = self.angle_at_fraction(fraction);
        (self.vector90 * theta.cos() - self.vector0 * theta.sin()) * self.sweep
    }

    /// Unit plane normal, or `None` for collapsed frames.
    pub fn normal(&self) -> Option<Vector3> {
        let n = self.vector0.cross(&self.vector90);
        let len = n.norm();
        if len < EPSILON {
            None
        } else {
            Some(n / len)
        }
    }

    pub fn is_circular(&self) -> bool {
        let l0 = self.vector0.norm();
        let l90 = self.vector90.norm();
        (l0 - l90).abs() < EPSILON * (1.0 + l0)
            && self.vector0.dot(&self.vector90).abs() < EPSILON * (1.0 + l0 * l90)
    }

    pub fn is_degenerate(&self) -> bool {
        self.vector0.norm() < EPSILON
            || self.vector90.norm() < EPSILON
            || self.sweep.abs() < EPSILON
            || self.normal().is_none()
    }

    /// Coordinates of a point in the arc frame: `(u, v, off)` such that the
    /// in-plane part of `p - center` equals `u*vector0 + v*vector90` and
    /// `off` is the out-of-plane distance. Points on the conic satisfy
    /// `u^2 + v^2 == 1` with `off == 0`.
    pub fn frame_coords(&self, p: &Point3) -> Option<(f64, f64, f64)> {
        let n = self.normal()?;
        let d = p - self.center;
        let g11 = self.vector0.dot(&self.vector0);
        let g12 = self.vector0.dot(&self.vector90);
        let g22 = self.vector90.dot(&self.vector90);
        let det = g11 * g22 - g12 * g12;
        if det.abs() < EPSILON * EPSILON {
            return None;
        }
        let b1 = d.dot(&self.vector0);
        let b2 = d.dot(&self.vector90);
        Some((
            (b1 * g22 - b2 * g12) / det,
            (b2 * g11 - b1 * g12) / det,
            d.dot(&n),
        ))
    }
}

/// A B-spline curve, rational when `weights` is present (the homogeneous
/// case). Fractions map linearly onto the knot domain
/// `[knots[degree], knots[control_count]]`; out-of-domain fractions evaluate
/// on the end-tangent rays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BsplineCurve {
    degree: usize,
    control_points: Vec<Point3>,
    weights: Option<Vec<f64>>,
    knots: Vec<f64>,
}

impl BsplineCurve {
    pub fn new(
        degree: usize,
        control_points: Vec<Point3>,
        weights: Option<Vec<f64>>,
        knots: Vec<f64>,
    ) -> CurveResult<Self> {
        if degree < 1 {
            return Err(CurveError::InvalidGeometry("B-spline degree must be >= 1".into()));
        }
        let n = control_points.len();
        if n <= degree {
            return Err(CurveError::InvalidGeometry(format!(
                "B-spline of degree {} needs more than {} control points",
                degree, degree
            )));
        }
        if knots.len() != n + degree + 1 {
            return Err(CurveError::InvalidGeometry(format!(
                "knot vector length {} does not match {} control points of degree {}",
                knots.len(),
                n,
                degree
            )));
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(CurveError::InvalidGeometry("knot vector must be non-decreasing".into()));
        }
        if knots[degree] >= knots[n] {
            return Err(CurveError::InvalidGeometry("empty knot domain".into()));
        }
        if let Some(ws) = &weights {
            if ws.len() != n {
                return Err(CurveError::InvalidGeometry("weight count must match control points".into()));
            }
            if ws.iter().any(|w| *w <= 0.0) {
                return Err(CurveError::InvalidGeometry("weights must be positive".into()));
            }
        }
        Ok(Self { degree, control_points, weights, knots })
    }

    /// Clamped curve over a uniform knot vector on [0, 1].
    pub fn open_uniform(degree: usize, control_points: Vec<Point3>) -> CurveResult<Self> {
        let n = control_points.len();
        if n <= degree {
            return Err(CurveError::InvalidGeometry(format!(
                "B-spline of degree {} needs more than {} control points",
                degree, degree
            )));
        }
        let interior = n - degree - 1;
        let mut knots = vec![0.0; degree + 1];
        for i in 1..=interior {
            knots.push(i as f64 / (interior + 1) as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(degree + 1));
        Self::new(degree, control_points, None, knots)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn is_rational(&self) -> bool {
        self.weights.is_some()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.control_points.len()])
    }

    /// Number of non-empty knot spans; drives solver sampling density.
    pub fn span_count(&self) -> usize {
        let n = self.control_points.len();
        self.knots[self.degree..=n]
            .windows(2)
            .filter(|w| w[1] - w[0] > EPSILON)
            .count()
            .max(1)
    }

    /// Rebuild with transformed control data, keeping degree and knots.
    pub(crate) fn with_control_data(&self, control_points: Vec<Point3>, weights: Option<Vec<f64>>) -> Self {
        Self {
            degree: self.degree,
            control_points,
            weights,
            knots: self.knots.clone(),
        }
    }

    fn find_span(&self, u: f64) -> usize {
        let n = self.control_points.len();
        if u >= self.knots[n] {
            return n - 1;
        }
        if u <= self.knots[self.degree] {
            return self.degree;
        }
        let mut lo = self.degree;
        let mut hi = n;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.knots[mid] <= u {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// De Boor evaluation in homogeneous space at a knot-domain parameter.
    fn de_boor(&self, u: f64) -> Point3 {
        let p = self.degree;
        let s = self.find_span(u);
        let mut d: Vec<(Vector3, f64)> = (0..=p)
            .map(|j| {
                let i = s - p + j;
                let w = self.weights.as_ref().map_or(1.0, |ws| ws[i]);
                (self.control_points[i].coords * w, w)
            })
            .collect();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = s - p + j;
                let den = self.knots[i + p + 1 - r] - self.knots[i];
                let alpha = if den.abs() < 1e-12 { 0.0 } else { (u - self.knots[i]) / den };
                d[j] = (
                    d[j - 1].0 * (1.0 - alpha) + d[j].0 * alpha,
                    d[j - 1].1 * (1.0 - alpha) + d[j].1 * alpha,
                );
            }
        }
        let (hp, w) = d[p];
        Point3::from(hp / w)
    }

    fn eval_fraction(&self, fraction: f64) -> Point3 {
        let (d0, d1) = self.domain();
        self.de_boor(d0 + fraction * (d1 - d0))
    }

    /// End point and fraction-space tangent at end 0 or 1, by a one-sided
    /// second-order difference.
    fn end_tangent(&self, end: usize) -> (Point3, Vector3) {
        let h = 1e-6;
        if end == 0 {
            let p0 = self.eval_fraction(0.0);
            let p1 = self.eval_fraction(h);
            let p2 = self.eval_fraction(2.0 * h);
            let t = (-(p2.coords) + p1.coords * 4.0 - p0.coords * 3.0) / (2.0 * h);
            (p0, t)
        } else {
            let p0 = self.eval_fraction(1.0);
            let p1 = self.eval_fraction(1.0 - h);
            let p2 = self.eval_fraction(1.0 - 2.0 * h);
            let t = (p2.coords - p1.coords * 4.0 + p0.coords * 3.0) / (2.0 * h);
            (p0, t)
        }
    }

    pub fn point_at(&self, fraction: f64) -> Point3 {
        if fraction < 0.0 {
            let (p, t) = self.end_tangent(0);
            return p + t * fraction;
        }
        if fraction > 1.0 {
            let (p, t) = self.end_tangent(1);
            return p + t * (fraction - 1.0);
        }
        self.eval_fraction(fraction)
    }

    pub fn point_and_tangent_at(&self, fraction: f64) -> (Point3, Vector3) {
        if fraction < 0.0 {
            let (p, t) = self.end_tangent(0);
            return (p + t * fraction, t);
        }
        if fraction > 1.0 {
            let (p, t) = self.end_tangent(1);
            return (p + t * (fraction - 1.0), t);
        }
        let h = 1e-7;
        let lo = (fraction - h).max(0.0);
        let hi = (fraction + h).min(1.0);
        let tangent = (self.eval_fraction(hi) - self.eval_fraction(lo)) / (hi - lo);
        (self.eval_fraction(fraction), tangent)
    }
}

/// Sum type over the concrete curve primitives the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurvePrimitive {
    Segment(Segment),
    LineString(LineString),
    Arc(Arc),
    Bspline(BsplineCurve),
}

impl CurvePrimitive {
    pub fn point_at(&self, fraction: f64) -> Point3 {
        match self {
            CurvePrimitive::Segment(s) => s.point_at(fraction),
            CurvePrimitive::LineString(ls) => ls.point_at(fraction),
            CurvePrimitive::Arc(a) => a.point_at(fraction),
            CurvePrimitive::Bspline(b) => b.point_at(fraction),
        }
    }

    pub fn point_and_tangent_at(&self, fraction: f64) -> (Point3, Vector3) {
        match self {
            CurvePrimitive::Segment(s) => (s.point_at(fraction), s.direction()),
            CurvePrimitive::LineString(ls) => {
                let (edge, local) = ls.edge_fraction(fraction);
                match ls.edge(edge) {
                    Some(e) => (e.point_at(local), e.direction() * ls.edge_count() as f64),
                    None => (ls.point_at(fraction), Vector3::zeros()),
                }
            }
            CurvePrimitive::Arc(a) => (a.point_at(fraction), a.tangent_at(fraction)),
            CurvePrimitive::Bspline(b) => b.point_and_tangent_at(fraction),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CurvePrimitive::Segment(_) => "segment",
            CurvePrimitive::LineString(_) => "line_string",
            CurvePrimitive::Arc(_) => "arc",
            CurvePrimitive::Bspline(_) => "bspline",
        }
    }

    /// Route to the visitor method matching this primitive's concrete type.
    pub fn accept<'a, V: CurveVisitor<'a>>(&'a self, visitor: &mut V) {
        match self {
            CurvePrimitive::Segment(s) => visitor.visit_segment(s),
            CurvePrimitive::LineString(ls) => visitor.visit_line_string(ls),
            CurvePrimitive::Arc(a) => visitor.visit_arc(a),
            CurvePrimitive::Bspline(b) => visitor.visit_bspline(b),
        }
    }
}

impl From<Segment> for CurvePrimitive {
    fn from(s: Segment) -> Self {
        CurvePrimitive::Segment(s)
    }
}

impl From<LineString> for CurvePrimitive {
    fn from(ls: LineString) -> Self {
        CurvePrimitive::LineString(ls)
    }
}

impl From<Arc> for CurvePrimitive {
    fn from(a: Arc) -> Self {
        CurvePrimitive::Arc(a)
    }
}

impl From<BsplineCurve> for CurvePrimitive {
    fn from(b: BsplineCurve) -> Self {
        CurvePrimitive::Bspline(b)
    }
}

/// An intersection operand: a single primitive or a flat group of leaves.
/// Groups enumerate leaves in insertion order, which fixes result order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveGeometry {
    Single(CurvePrimitive),
    Group(Vec<CurvePrimitive>),
}

impl CurveGeometry {
    pub fn leaves(&self) -> std::slice::Iter<'_, CurvePrimitive> {
        match self {
            CurveGeometry::Single(c) => std::slice::from_ref(c).iter(),
            CurveGeometry::Group(v) => v.iter(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            CurveGeometry::Single(_) => 1,
            CurveGeometry::Group(v) => v.len(),
        }
    }
}

impl From<CurvePrimitive> for CurveGeometry {
    fn from(c: CurvePrimitive) -> Self {
        CurveGeometry::Single(c)
    }
}

impl From<Vec<CurvePrimitive>> for CurveGeometry {
    fn from(v: Vec<CurvePrimitive>) -> Self {
        CurveGeometry::Group(v)
    }
}
