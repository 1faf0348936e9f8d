//! Per-invocation engine state: the fixed B operand, extension flags, the
//! accumulating result set, and the optional pre-transform. One context is
//! owned by each top-level call and reset in place across a collection
//! fan-out instead of reallocating.

use std::borrow::Cow;

use tracing::trace;

use crate::curve::{
    Arc, BsplineCurve, CurvePrimitive, CurveVisitor, LineString, Segment,
};
use crate::geometry::{transform_point, transform_vector, Matrix4, EPSILON};

use super::extend::CurveExtension;
use super::location::{CurveLocation, IntersectionSet, LocationPair};
use super::solvers::{self, Candidate, QueryMode};

/// A curve prepared for solving: either borrowed as-is, or a projected copy
/// with enough bookkeeping to map work-space fractions back to the source
/// curve's parameter space.
pub(crate) struct WorkCurve<'a> {
    source: &'a CurvePrimitive,
    geom: Cow<'a, CurvePrimitive>,
    /// Homogeneous weights picked up by segment/line-string vertices under a
    /// perspective transform; empty when the mapping is affine.
    persp_w: Vec<f64>,
}

impl<'a> WorkCurve<'a> {
    fn new(source: &'a CurvePrimitive, transform: Option<&Matrix4>) -> Self {
        match transform {
            None => Self { source, geom: Cow::Borrowed(source), persp_w: Vec::new() },
            Some(m) => Self::projected(source, m),
        }
    }

    fn projected(source: &'a CurvePrimitive, m: &Matrix4) -> Self {
        match source {
            CurvePrimitive::Segment(s) => {
                let (p0, w0) = transform_point(m, &s.start);
                let (p1, w1) = transform_point(m, &s.end);
                let persp_w = if (w0 - 1.0).abs() > EPSILON || (w1 - 1.0).abs() > EPSILON {
                    vec![w0, w1]
                } else {
                    vec![]
                };
                Self { source, geom: Cow::Owned(Segment::new(p0, p1).into()), persp_w }
            }
            CurvePrimitive::LineString(ls) => {
                let mut pts = Vec::with_capacity(ls.points.len());
                let mut ws = Vec::with_capacity(ls.points.len());
                for p in &ls.points {
                    let (q, w) = transform_point(m, p);
                    pts.push(q);
                    ws.push(w);
                }
                let persp_w = if ws.iter().any(|w| (w - 1.0).abs() > EPSILON) {
                    ws
                } else {
                    vec![]
                };
                Self { source, geom: Cow::Owned(LineString::new(pts).into()), persp_w }
            }
            CurvePrimitive::Arc(a) => {
                let (center, _) = transform_point(m, &a.center);
                let arc = Arc::new(
                    center,
                    transform_vector(m, &a.vector0),
                    transform_vector(m, &a.vector90),
                    a.start_angle,
                    a.sweep,
                );
                Self { source, geom: Cow::Owned(arc.into()), persp_w: vec![] }
            }
            CurvePrimitive::Bspline(b) => {
                // A projective image of a B-spline is the rational curve whose
                // weights absorb the homogeneous components.
                let mut pts = Vec::with_capacity(b.control_points().len());
                let mut pw = Vec::with_capacity(b.control_points().len());
                for p in b.control_points() {
                    let (q, w) = transform_point(m, p);
                    pts.push(q);
                    pw.push(w);
                }
                let any_persp = pw.iter().any(|w| (w - 1.0).abs() > EPSILON);
                let weights = match (b.weights(), any_persp) {
                    (None, false) => None,
                    (None, true) => Some(pw),
                    (Some(old), _) => Some(old.iter().zip(&pw).map(|(a, b)| a * b).collect()),
                };
                Self {
                    source,
                    geom: Cow::Owned(b.with_control_data(pts, weights).into()),
                    persp_w: vec![],
                }
            }
        }
    }

    pub fn geom(&self) -> &CurvePrimitive {
        self.geom.as_ref()
    }

    /// Map a work-space fraction back to the source curve's parameter space.
    /// Identity except for segments/line-strings seen through a perspective
    /// transform, where the projected parameter is not the world fraction.
    pub fn source_fraction(&self, f: f64) -> f64 {
        if self.persp_w.is_empty() {
            return f;
        }
        match self.geom.as_ref() {
            CurvePrimitive::Segment(_) => persp_correct(f, self.persp_w[0], self.persp_w[1]),
            CurvePrimitive::LineString(ls) => {
                let (edge, local) = ls.edge_fraction(f);
                let corrected = persp_correct(local, self.persp_w[edge], self.persp_w[edge + 1]);
                ls.global_fraction(edge, corrected)
            }
            _ => f,
        }
    }
}

fn persp_correct(t: f64, w0: f64, w1: f64) -> f64 {
    let den = w1 + t * (w0 - w1);
    if den.abs() < EPSILON {
        t
    } else {
        t * w0 / den
    }
}

pub(crate) struct IntersectContext<'a> {
    mode: QueryMode,
    transform: Option<Matrix4>,
    a: WorkCurve<'a>,
    extend_a: CurveExtension,
    b: WorkCurve<'a>,
    extend_b: CurveExtension,
    results: IntersectionSet<'a>,
}

impl<'a> IntersectContext<'a> {
    pub fn new(
        mode: QueryMode,
        transform: Option<Matrix4>,
        curve_a: &'a CurvePrimitive,
        extend_a: CurveExtension,
        curve_b: &'a CurvePrimitive,
        extend_b: CurveExtension,
    ) -> Self {
        Self {
            mode,
            a: WorkCurve::new(curve_a, transform.as_ref()),
            extend_a,
            b: WorkCurve::new(curve_b, transform.as_ref()),
            extend_b,
            transform,
            results: IntersectionSet::new(),
        }
    }

    /// Swap in the next B leaf during a fan-out, keeping everything else.
    pub fn reset_b(&mut self, curve_b: &'a CurvePrimitive) {
        self.b = WorkCurve::new(curve_b, self.transform.as_ref());
    }

    /// Dispatch A through the visitor protocol against the stored B.
    pub fn run(&mut self) {
        trace!(
            a = self.a.source.type_name(),
            b = self.b.source.type_name(),
            "dispatching curve pair"
        );
        let curve_a = self.a.source;
        curve_a.accept(self);
    }

    pub fn into_results(self) -> IntersectionSet<'a> {
        self.results
    }

    fn emit_all(&mut self, candidates: Vec<Candidate>) {
        for c in candidates {
            let fa = self.a.source_fraction(c.fa);
            let fb = self.b.source_fraction(c.fb);
            self.results.push(LocationPair::new(
                CurveLocation::evaluate(self.a.source, fa, c.fa_ext),
                CurveLocation::evaluate(self.b.source, fb, c.fb_ext),
            ));
        }
    }
}

// The second dispatch level: each handler inspects the stored B's concrete
// type and selects the matching pairwise solver. Unsupported combinations
// contribute nothing.
impl<'a> CurveVisitor<'a> for IntersectContext<'a> {
    fn visit_segment(&mut self, _: &'a Segment) {
        let cands = {
            let CurvePrimitive::Segment(a) = self.a.geom() else { return };
            match self.b.geom() {
                CurvePrimitive::Segment(b) => {
                    solvers::segment_segment(self.mode, a, self.extend_a, b, self.extend_b)
                }
                CurvePrimitive::LineString(b) => {
                    solvers::segment_linestring(self.mode, a, self.extend_a, b, self.extend_b)
                }
                CurvePrimitive::Arc(b) => {
                    solvers::segment_arc(self.mode, a, self.extend_a, b, self.extend_b)
                }
                CurvePrimitive::Bspline(b) => match self.mode {
                    QueryMode::Xy => solvers::segment_bspline(a, self.extend_a, b, self.extend_b),
                    // B-splines are not supported in the spatial variant.
                    QueryMode::Xyz => vec![],
                },
            }
        };
        self.emit_all(cands);
    }

    fn visit_line_string(&mut self, _: &'a LineString) {
        let cands = {
            let CurvePrimitive::LineString(a) = self.a.geom() else { return };
            match self.b.geom() {
                CurvePrimitive::Segment(b) => solvers::swap_candidates(
                    solvers::segment_linestring(self.mode, b, self.extend_b, a, self.extend_a),
                ),
                CurvePrimitive::LineString(b) => {
                    solvers::linestring_linestring(self.mode, a, self.extend_a, b, self.extend_b)
                }
                CurvePrimitive::Arc(b) => {
                    solvers::linestring_arc(self.mode, a, self.extend_a, b, self.extend_b)
                }
                // Known gap: line-string x B-spline has no solver.
                CurvePrimitive::Bspline(_) => vec![],
            }
        };
        self.emit_all(cands);
    }

    fn visit_arc(&mut self, _: &'a Arc) {
        let cands = {
            let CurvePrimitive::Arc(a) = self.a.geom() else { return };
            match self.b.geom() {
                CurvePrimitive::Segment(b) => solvers::swap_candidates(solvers::segment_arc(
                    self.mode,
                    b,
                    self.extend_b,
                    a,
                    self.extend_a,
                )),
                CurvePrimitive::LineString(b) => solvers::swap_candidates(
                    solvers::linestring_arc(self.mode, b, self.extend_b, a, self.extend_a),
                ),
                CurvePrimitive::Arc(b) => {
                    solvers::arc_arc(self.mode, a, self.extend_a, b, self.extend_b)
                }
                CurvePrimitive::Bspline(b) => match self.mode {
                    QueryMode::Xy => solvers::arc_bspline(a, self.extend_a, b, self.extend_b),
                    QueryMode::Xyz => vec![],
                },
            }
        };
        self.emit_all(cands);
    }

    fn visit_bspline(&mut self, _: &'a BsplineCurve) {
        let cands = {
            let CurvePrimitive::Bspline(a) = self.a.geom() else { return };
            match (self.b.geom(), self.mode) {
                (CurvePrimitive::Segment(b), QueryMode::Xy) => solvers::swap_candidates(
                    solvers::segment_bspline(b, self.extend_b, a, self.extend_a),
                ),
                (CurvePrimitive::Arc(b), QueryMode::Xy) => solvers::swap_candidates(
                    solvers::arc_bspline(b, self.extend_b, a, self.extend_a),
                ),
                // Stub: B-spline x B-spline produces no intersections.
                // Known gaps: line-string partners and every spatial pairing.
                _ => vec![],
            }
        };
        self.emit_all(cands);
    }
}
