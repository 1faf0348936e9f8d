//! Pairwise curve-curve solvers.
//!
//! Every solver is a pure function over work-space geometry: it takes two
//! curve fragments plus their extension specifications and returns raw
//! parameter-space candidates. Extension semantics live entirely in
//! `CurveExtension`; degenerate inputs are detected up front and yield no
//! candidates; numerically inconsistent solutions are discarded rather than
//! surfaced as errors.

use crate::curve::{Arc, BsplineCurve, LineString, Segment};
use crate::geometry::utils_2d::{
    cross_2d, distance, dot_2d, lerp, line_line_params, solve_trig, well_conditioned_normal,
};
use crate::geometry::{utils_2d, Point3, Vector3, EPSILON};

use super::extend::{CurveExtension, ExtendMode};

/// Which coordinates participate in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryMode {
    /// Compare XY projections; Z is ignored.
    Xy,
    /// Full 3D comparison.
    Xyz,
}

/// One geometric event in work-space parameters, before mapping back to the
/// source curves.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub fa: f64,
    pub fa_ext: bool,
    pub fb: f64,
    pub fb_ext: bool,
}

impl Candidate {
    fn new(fa: f64, fa_ext: bool, fb: f64, fb_ext: bool) -> Self {
        Self { fa, fa_ext, fb, fb_ext }
    }
}

/// Exchange the A and B sides of every candidate.
pub(crate) fn swap_candidates(mut cands: Vec<Candidate>) -> Vec<Candidate> {
    for c in &mut cands {
        std::mem::swap(&mut c.fa, &mut c.fb);
        std::mem::swap(&mut c.fa_ext, &mut c.fb_ext);
    }
    cands
}

#[inline]
fn xy(p: &Point3) -> [f64; 2] {
    [p.x, p.y]
}

#[inline]
fn xy_v(v: &Vector3) -> [f64; 2] {
    [v.x, v.y]
}

// ---------------------------------------------------------------------------
// Segment x Segment
// ---------------------------------------------------------------------------

pub(crate) fn segment_segment(
    mode: QueryMode,
    a: &Segment,
    ea: CurveExtension,
    b: &Segment,
    eb: CurveExtension,
) -> Vec<Candidate> {
    if a.is_degenerate() || b.is_degenerate() {
        return vec![];
    }
    match mode {
        QueryMode::Xy => segment_segment_xy(a, ea, b, eb),
        QueryMode::Xyz => segment_segment_xyz(a, ea, b, eb),
    }
}

fn segment_segment_xy(a: &Segment, ea: CurveExtension, b: &Segment, eb: CurveExtension) -> Vec<Candidate> {
    let Some((_, t, u)) = line_line_params(xy(&a.start), xy(&a.end), xy(&b.start), xy(&b.end))
    else {
        return vec![];
    };

    let Some((fa, fa_ext)) = ea.resolve_fraction(t) else { return vec![] };
    let Some((fb, fb_ext)) = eb.resolve_fraction(u) else { return vec![] };

    // Reconstruct from both sides; a near-parallel solve that drifted apart
    // is not an intersection.
    let pa = lerp(xy(&a.start), xy(&a.end), fa);
    let pb = lerp(xy(&b.start), xy(&b.end), fb);
    if distance(pa, pb) > consistency_tol(t, u) {
        return vec![];
    }

    vec![Candidate::new(fa, fa_ext, fb, fb_ext)]
}

fn segment_segment_xyz(a: &Segment, ea: CurveExtension, b: &Segment, eb: CurveExtension) -> Vec<Candidate> {
    let d1 = a.direction();
    let d2 = b.direction();
    let r = b.start - a.start;
    let a11 = d1.norm_squared();
    let a22 = d2.norm_squared();
    let a12 = d1.dot(&d2);
    let den = a11 * a22 - a12 * a12;
    if den < 1e-12 * a11 * a22 {
        return vec![];
    }
    let e1 = d1.dot(&r);
    let e2 = d2.dot(&r);
    let t = (a22 * e1 - a12 * e2) / den;
    let u = (a12 * e1 - a11 * e2) / den;

    let pa = a.point_at(t);
    let pb = b.point_at(u);
    if (pa - pb).norm() > consistency_tol(t, u) {
        return vec![];
    }

    let Some((fa, fa_ext)) = ea.resolve_fraction(t) else { return vec![] };
    let Some((fb, fb_ext)) = eb.resolve_fraction(u) else { return vec![] };
    vec![Candidate::new(fa, fa_ext, fb, fb_ext)]
}

fn consistency_tol(t: f64, u: f64) -> f64 {
    EPSILON * (1.0 + t.abs() + u.abs())
}

// ---------------------------------------------------------------------------
// Line strings: per-edge fans
// ---------------------------------------------------------------------------

/// Extension specification for one edge of a polyline: only the outermost
/// ends inherit the line string's extension.
fn edge_extension(els: CurveExtension, edge: usize, last: usize) -> CurveExtension {
    CurveExtension::PerEnd(
        if edge == 0 { els.mode_at(0) } else { ExtendMode::None },
        if edge == last { els.mode_at(1) } else { ExtendMode::None },
    )
}

pub(crate) fn segment_linestring(
    mode: QueryMode,
    seg: &Segment,
    es: CurveExtension,
    ls: &LineString,
    els: CurveExtension,
) -> Vec<Candidate> {
    let n = ls.edge_count();
    if n == 0 {
        return vec![];
    }
    let mut out = Vec::new();
    for i in 0..n {
        let Some(edge) = ls.edge(i) else { continue };
        for c in segment_segment(mode, seg, es, &edge, edge_extension(els, i, n - 1)) {
            // An exact vertex hit is reported by the preceding edge already.
            if i > 0 && c.fb < EPSILON {
                continue;
            }
            out.push(Candidate::new(c.fa, c.fa_ext, ls.global_fraction(i, c.fb), c.fb_ext));
        }
    }
    out
}

pub(crate) fn linestring_linestring(
    mode: QueryMode,
    a: &LineString,
    ea: CurveExtension,
    b: &LineString,
    eb: CurveExtension,
) -> Vec<Candidate> {
    let n = a.edge_count();
    if n == 0 {
        return vec![];
    }
    let mut out = Vec::new();
    for i in 0..n {
        let Some(edge) = a.edge(i) else { continue };
        for c in segment_linestring(mode, &edge, edge_extension(ea, i, n - 1), b, eb) {
            if i > 0 && c.fa < EPSILON {
                continue;
            }
            out.push(Candidate::new(a.global_fraction(i, c.fa), c.fa_ext, c.fb, c.fb_ext));
        }
    }
    out
}

pub(crate) fn linestring_arc(
    mode: QueryMode,
    ls: &LineString,
    els: CurveExtension,
    arc: &Arc,
    ea: CurveExtension,
) -> Vec<Candidate> {
    let n = ls.edge_count();
    if n == 0 {
        return vec![];
    }
    let mut out = Vec::new();
    for i in 0..n {
        let Some(edge) = ls.edge(i) else { continue };
        for c in segment_arc(mode, &edge, edge_extension(els, i, n - 1), arc, ea) {
            if i > 0 && c.fa < EPSILON {
                continue;
            }
            out.push(Candidate::new(ls.global_fraction(i, c.fa), c.fa_ext, c.fb, c.fb_ext));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Segment x Arc
// ---------------------------------------------------------------------------

pub(crate) fn segment_arc(
    mode: QueryMode,
    seg: &Segment,
    es: CurveExtension,
    arc: &Arc,
    ea: CurveExtension,
) -> Vec<Candidate> {
    if seg.is_degenerate() || arc.is_degenerate() {
        return vec![];
    }
    match mode {
        QueryMode::Xy => segment_arc_xy(seg, es, arc, ea),
        QueryMode::Xyz => segment_arc_xyz(seg, es, arc, ea),
    }
}

/// Planar case: substituting the arc's angular form into the line equation
/// gives `alpha*cos + beta*sin + gamma = 0` in the arc's angular parameter.
fn segment_arc_xy(seg: &Segment, es: CurveExtension, arc: &Arc, ea: CurveExtension) -> Vec<Candidate> {
    let p0 = xy(&seg.start);
    let d = xy_v(&seg.direction());
    let dd = dot_2d(d, d);
    if dd < EPSILON * EPSILON {
        return vec![];
    }

    let c = xy(&arc.center);
    let u = xy_v(&arc.vector0);
    let v = xy_v(&arc.vector90);

    let alpha = cross_2d(u, d);
    let beta = cross_2d(v, d);
    let gamma = cross_2d([c[0] - p0[0], c[1] - p0[1]], d);

    let mut out = Vec::new();
    for theta in solve_trig(alpha, beta, gamma) {
        let q = [
            c[0] + theta.cos() * u[0] + theta.sin() * v[0],
            c[1] + theta.cos() * u[1] + theta.sin() * v[1],
        ];
        let t = dot_2d([q[0] - p0[0], q[1] - p0[1]], d) / dd;
        let Some((fa, fa_ext)) = es.resolve_fraction(t) else { continue };
        let Some((fb, fb_ext)) = ea.resolve_angle(theta, arc.start_angle, arc.sweep) else {
            continue;
        };
        out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
    }
    out
}

/// Spatial case: pierce the arc's plane, or fall into the plane and reduce
/// to a unit-circle quadratic in the arc frame.
fn segment_arc_xyz(seg: &Segment, es: CurveExtension, arc: &Arc, ea: CurveExtension) -> Vec<Candidate> {
    let Some(n) = arc.normal() else { return vec![] };
    let dir = seg.direction();
    let denom = dir.dot(&n);

    if denom.abs() > EPSILON * dir.norm() {
        // Transverse: a single pierce point, kept only if it lands on the conic.
        let t = (arc.center - seg.start).dot(&n) / denom;
        let p = seg.point_at(t);
        let Some((u, v, _)) = arc.frame_coords(&p) else { return vec![] };
        let radial = (u * u + v * v).sqrt();
        let scale = arc.vector0.norm().min(arc.vector90.norm());
        if (radial - 1.0).abs() * scale > EPSILON {
            return vec![];
        }
        let theta = v.atan2(u);
        let Some((fa, fa_ext)) = es.resolve_fraction(t) else { return vec![] };
        let Some((fb, fb_ext)) = ea.resolve_angle(theta, arc.start_angle, arc.sweep) else {
            return vec![];
        };
        return vec![Candidate::new(fa, fa_ext, fb, fb_ext)];
    }

    // Parallel to the plane: either disjoint or an in-plane problem.
    if (seg.start - arc.center).dot(&n).abs() > EPSILON {
        return vec![];
    }
    let Some((l0u, l0v, _)) = arc.frame_coords(&seg.start) else { return vec![] };
    let Some((l1u, l1v, _)) = arc.frame_coords(&seg.end) else { return vec![] };
    let l0 = [l0u, l0v];
    let ld = [l1u - l0u, l1v - l0v];
    let qa = dot_2d(ld, ld);
    if qa < 1e-24 {
        return vec![];
    }
    // In frame coordinates the conic is the unit circle.
    let qb = 2.0 * dot_2d(l0, ld);
    let qc = dot_2d(l0, l0) - 1.0;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < -EPSILON {
        return vec![];
    }
    let sqrt_disc = disc.max(0.0).sqrt();
    let mut roots = vec![(-qb - sqrt_disc) / (2.0 * qa)];
    let t2 = (-qb + sqrt_disc) / (2.0 * qa);
    if (t2 - roots[0]).abs() > EPSILON {
        roots.push(t2);
    }

    let mut out = Vec::new();
    for t in roots {
        let pu = l0[0] + t * ld[0];
        let pv = l0[1] + t * ld[1];
        let theta = pv.atan2(pu);
        let Some((fa, fa_ext)) = es.resolve_fraction(t) else { continue };
        let Some((fb, fb_ext)) = ea.resolve_angle(theta, arc.start_angle, arc.sweep) else {
            continue;
        };
        out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
    }
    out
}

// ---------------------------------------------------------------------------
// Arc x Arc
// ---------------------------------------------------------------------------

/// A conic reduced to 2D working coordinates.
struct PlanarConic {
    c: [f64; 2],
    u: [f64; 2],
    v: [f64; 2],
    start: f64,
    sweep: f64,
}

impl PlanarConic {
    fn from_xy(arc: &Arc) -> Option<Self> {
        let u = xy_v(&arc.vector0);
        let v = xy_v(&arc.vector90);
        // An edge-on projection collapses the frame; treat as degenerate.
        if cross_2d(u, v).abs() < EPSILON * EPSILON {
            return None;
        }
        Some(Self { c: xy(&arc.center), u, v, start: arc.start_angle, sweep: arc.sweep })
    }

    fn in_frame(arc: &Arc, origin: &Point3, e1: &Vector3, e2: &Vector3) -> Self {
        let d = arc.center - origin;
        Self {
            c: [d.dot(e1), d.dot(e2)],
            u: [arc.vector0.dot(e1), arc.vector0.dot(e2)],
            v: [arc.vector90.dot(e1), arc.vector90.dot(e2)],
            start: arc.start_angle,
            sweep: arc.sweep,
        }
    }

    fn point_at_angle(&self, theta: f64) -> [f64; 2] {
        [
            self.c[0] + theta.cos() * self.u[0] + theta.sin() * self.v[0],
            self.c[1] + theta.cos() * self.u[1] + theta.sin() * self.v[1],
        ]
    }

    /// Frame coordinates of a 2D point; `(x, y)` with the conic at x^2+y^2=1.
    fn local_coords(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let det = cross_2d(self.u, self.v);
        if det.abs() < EPSILON * EPSILON {
            return None;
        }
        let d = [p[0] - self.c[0], p[1] - self.c[1]];
        Some([cross_2d(d, self.v) / det, cross_2d(self.u, d) / det])
    }

    fn angle_of(&self, p: [f64; 2]) -> Option<f64> {
        let l = self.local_coords(p)?;
        Some(l[1].atan2(l[0]))
    }

    fn is_circular(&self) -> bool {
        let lu = dot_2d(self.u, self.u).sqrt();
        let lv = dot_2d(self.v, self.v).sqrt();
        (lu - lv).abs() < EPSILON * (1.0 + lu) && dot_2d(self.u, self.v).abs() < EPSILON * (1.0 + lu * lv)
    }

    fn radius(&self) -> f64 {
        dot_2d(self.u, self.u).sqrt()
    }
}

pub(crate) fn arc_arc(
    mode: QueryMode,
    a: &Arc,
    ea: CurveExtension,
    b: &Arc,
    eb: CurveExtension,
) -> Vec<Candidate> {
    if a.is_degenerate() || b.is_degenerate() {
        return vec![];
    }
    match mode {
        QueryMode::Xy => {
            let (Some(ca), Some(cb)) = (PlanarConic::from_xy(a), PlanarConic::from_xy(b)) else {
                return vec![];
            };
            conic_conic(&ca, ea, &cb, eb)
        }
        QueryMode::Xyz => arc_arc_xyz(a, ea, b, eb),
    }
}

fn arc_arc_xyz(a: &Arc, ea: CurveExtension, b: &Arc, eb: CurveExtension) -> Vec<Candidate> {
    let (Some(n1), Some(n2)) = (a.normal(), b.normal()) else { return vec![] };
    let cr = n1.cross(&n2);

    if cr.norm() < EPSILON {
        // Parallel planes: coplanar reduces to the planar machinery.
        if (b.center - a.center).dot(&n1).abs() > EPSILON {
            return vec![];
        }
        let e1 = a.vector0 / a.vector0.norm();
        let e2 = n1.cross(&e1);
        let ca = PlanarConic::in_frame(a, &a.center, &e1, &e2);
        let cb = PlanarConic::in_frame(b, &a.center, &e1, &e2);
        return conic_conic(&ca, ea, &cb, eb);
    }

    // Skew planes: intersect both arcs against the planes' common line and
    // pair up the hits that coincide along it.
    let d1 = n1.dot(&a.center.coords);
    let d2 = n2.dot(&b.center.coords);
    let p0 = Point3::from((n2.cross(&cr) * d1 + cr.cross(&n1) * d2) / cr.norm_squared());
    let helper = Segment::new(p0, p0 + cr / cr.norm());

    let hits_a = segment_arc(QueryMode::Xyz, &helper, CurveExtension::Both(ExtendMode::OnCurve), a, ea);
    let hits_b = segment_arc(QueryMode::Xyz, &helper, CurveExtension::Both(ExtendMode::OnCurve), b, eb);

    let mut out = Vec::new();
    for ha in &hits_a {
        for hb in &hits_b {
            if (ha.fa - hb.fa).abs() < 4.0 * EPSILON {
                out.push(Candidate::new(ha.fb, ha.fb_ext, hb.fb, hb.fb_ext));
            }
        }
    }
    out
}

fn conic_conic(a: &PlanarConic, ea: CurveExtension, b: &PlanarConic, eb: CurveExtension) -> Vec<Candidate> {
    if a.is_circular() && b.is_circular() {
        let mut out = Vec::new();
        for p in utils_2d::circle_circle_points(a.c, a.radius(), b.c, b.radius()) {
            let (Some(ta), Some(tb)) = (a.angle_of(p), b.angle_of(p)) else { continue };
            let Some((fa, fa_ext)) = ea.resolve_angle(ta, a.start, a.sweep) else { continue };
            let Some((fb, fb_ext)) = eb.resolve_angle(tb, b.start, b.sweep) else { continue };
            out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
        }
        return out;
    }

    // General conic pair: scan A's full period against B's implicit form and
    // refine sign changes. Tangential grazes without a sign change are not
    // recovered.
    let g = |theta: f64| -> Option<f64> {
        let l = b.local_coords(a.point_at_angle(theta))?;
        Some(dot_2d(l, l) - 1.0)
    };

    const SAMPLES: usize = 96;
    let step = std::f64::consts::TAU / SAMPLES as f64;
    let mut roots: Vec<f64> = Vec::new();
    let mut prev = match g(a.start) {
        Some(v) => v,
        None => return vec![],
    };
    for i in 1..=SAMPLES {
        let theta = a.start + i as f64 * step;
        let Some(cur) = g(theta) else { return vec![] };
        if (prev == 0.0 && cur != 0.0) || prev * cur < 0.0 {
            let mut lo = a.start + (i - 1) as f64 * step;
            let mut hi = theta;
            let mut glo = prev;
            for _ in 0..80 {
                let mid = 0.5 * (lo + hi);
                let gm = g(mid).unwrap_or(0.0);
                if glo * gm <= 0.0 {
                    hi = mid;
                } else {
                    lo = mid;
                    glo = gm;
                }
            }
            let root = 0.5 * (lo + hi);
            if roots.iter().all(|r| (r - root).abs() > 1e-7) {
                roots.push(root);
            }
        }
        prev = cur;
    }

    let mut out = Vec::new();
    for ta in roots {
        let p = a.point_at_angle(ta);
        let Some(tb) = b.angle_of(p) else { continue };
        if distance(p, b.point_at_angle(tb)) > 1e-4 {
            continue;
        }
        let Some((fa, fa_ext)) = ea.resolve_angle(ta, a.start, a.sweep) else { continue };
        let Some((fb, fb_ext)) = eb.resolve_angle(tb, b.start, b.sweep) else { continue };
        out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
    }
    out
}

// ---------------------------------------------------------------------------
// B-spline solvers (planar only)
// ---------------------------------------------------------------------------

fn spline_sample_count(bs: &BsplineCurve) -> usize {
    (bs.span_count() * bs.degree() * 8 + 1).max(33)
}

/// Scan a scalar function of the spline fraction for sign changes and refine
/// each bracket by bisection. Bounded work: fixed sample grid, fixed
/// iteration count.
fn scan_roots(f: impl Fn(f64) -> f64, samples: usize) -> Vec<f64> {
    let mut roots = Vec::new();
    let step = 1.0 / (samples - 1) as f64;
    let mut prev = f(0.0);
    for i in 1..samples {
        let x = i as f64 * step;
        let cur = f(x);
        if (prev == 0.0 && cur != 0.0) || prev * cur < 0.0 {
            let mut lo = (i - 1) as f64 * step;
            let mut hi = x;
            let mut flo = prev;
            for _ in 0..60 {
                let mid = 0.5 * (lo + hi);
                let fm = f(mid);
                if flo * fm <= 0.0 {
                    hi = mid;
                } else {
                    lo = mid;
                    flo = fm;
                }
            }
            let root = 0.5 * (lo + hi);
            if roots.iter().all(|r: &f64| (r - root).abs() > 1e-9) {
                roots.push(root);
            }
        }
        prev = cur;
    }
    // A root exactly at the last sample never brackets.
    if prev.abs() < 1e-12 && roots.iter().all(|r| (r - 1.0).abs() > 1e-9) {
        roots.push(1.0);
    }
    roots
}

/// Planar segment x B-spline: roots of the spline against the plane that
/// contains the segment's carrier line and the view direction.
pub(crate) fn segment_bspline(
    seg: &Segment,
    es: CurveExtension,
    bs: &BsplineCurve,
    ebs: CurveExtension,
) -> Vec<Candidate> {
    if seg.is_degenerate() {
        return vec![];
    }
    let dir = seg.direction();
    // View-plane normal; a segment parallel to the view direction projects
    // to a point and has no planar solution.
    let Some(n) = well_conditioned_normal(&dir, &[Vector3::z()]) else {
        return vec![];
    };

    let p0 = seg.start;
    let d2 = xy_v(&dir);
    let dd = dot_2d(d2, d2);
    if dd < EPSILON * EPSILON {
        return vec![];
    }

    let mut out = Vec::new();
    for f in scan_roots(|f| (bs.point_at(f) - p0).dot(&n), spline_sample_count(bs)) {
        let p = bs.point_at(f);
        let t = dot_2d([p.x - p0.x, p.y - p0.y], d2) / dd;
        let Some((fa, fa_ext)) = es.resolve_fraction(t) else { continue };
        let Some((fb, fb_ext)) = ebs.resolve_fraction(f) else { continue };
        out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
    }

    // End-tangent rays carry the spline's extension.
    for end in 0..2usize {
        if !ebs.allows(end) {
            continue;
        }
        let (pe, tan) = bs.point_and_tangent_at(end as f64);
        let te = xy_v(&tan);
        if dot_2d(te, te) < EPSILON * EPSILON {
            continue;
        }
        let ray_end = pe + tan;
        let Some((_, s, t)) = line_line_params(xy(&pe), xy(&ray_end), xy(&seg.start), xy(&seg.end))
        else {
            continue;
        };
        let on_ray = if end == 0 { s < -EPSILON } else { s > EPSILON };
        if !on_ray {
            continue;
        }
        let fb = if end == 0 { s } else { 1.0 + s };
        let Some((fa, fa_ext)) = es.resolve_fraction(t) else { continue };
        out.push(Candidate::new(fa, fa_ext, fb, true));
    }
    out
}

/// Planar arc x B-spline: roots of the spline against the arc's implicit
/// form in the projected frame.
pub(crate) fn arc_bspline(
    arc: &Arc,
    ea: CurveExtension,
    bs: &BsplineCurve,
    ebs: CurveExtension,
) -> Vec<Candidate> {
    if arc.is_degenerate() {
        return vec![];
    }
    let Some(conic) = PlanarConic::from_xy(arc) else { return vec![] };

    let g = |f: f64| -> f64 {
        let p = bs.point_at(f);
        match conic.local_coords([p.x, p.y]) {
            Some(l) => dot_2d(l, l) - 1.0,
            None => 0.0,
        }
    };

    let mut out = Vec::new();
    for f in scan_roots(g, spline_sample_count(bs)) {
        let p = bs.point_at(f);
        let Some(theta) = conic.angle_of([p.x, p.y]) else { continue };
        let Some((fa, fa_ext)) = ea.resolve_angle(theta, arc.start_angle, arc.sweep) else {
            continue;
        };
        let Some((fb, fb_ext)) = ebs.resolve_fraction(f) else { continue };
        out.push(Candidate::new(fa, fa_ext, fb, fb_ext));
    }

    // End-tangent rays for the spline's extension, against the arc.
    for end in 0..2usize {
        if !ebs.allows(end) {
            continue;
        }
        let (pe, tan) = bs.point_and_tangent_at(end as f64);
        let td = xy_v(&tan);
        let tdd = dot_2d(td, td);
        if tdd < EPSILON * EPSILON {
            continue;
        }
        let alpha = cross_2d(conic.u, td);
        let beta = cross_2d(conic.v, td);
        let gamma = cross_2d([conic.c[0] - pe.x, conic.c[1] - pe.y], td);
        for theta in solve_trig(alpha, beta, gamma) {
            let q = conic.point_at_angle(theta);
            let s = dot_2d([q[0] - pe.x, q[1] - pe.y], td) / tdd;
            let on_ray = if end == 0 { s < -EPSILON } else { s > EPSILON };
            if !on_ray {
                continue;
            }
            let fb = if end == 0 { s } else { 1.0 + s };
            let Some((fa, fa_ext)) = ea.resolve_angle(theta, arc.start_angle, arc.sweep) else {
                continue;
            };
            out.push(Candidate::new(fa, fa_ext, fb, true));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Closest approach (segments and line strings)
// ---------------------------------------------------------------------------

/// Closest-approach parameters between two bounded segments, clamped to
/// their domains.
pub(crate) fn closest_segment_segment(a: &Segment, b: &Segment) -> (f64, f64) {
    let d1 = a.direction();
    let d2 = b.direction();
    let r = a.start - b.start;
    let a11 = d1.norm_squared();
    let a22 = d2.norm_squared();
    let f = d2.dot(&r);

    if a11 < EPSILON * EPSILON && a22 < EPSILON * EPSILON {
        return (0.0, 0.0);
    }
    if a11 < EPSILON * EPSILON {
        return (0.0, (f / a22).clamp(0.0, 1.0));
    }
    let c = d1.dot(&r);
    if a22 < EPSILON * EPSILON {
        return ((-c / a11).clamp(0.0, 1.0), 0.0);
    }

    let a12 = d1.dot(&d2);
    let den = a11 * a22 - a12 * a12;
    let mut s = if den > 1e-12 * a11 * a22 {
        ((a12 * f - c * a22) / den).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (a12 * s + f) / a22;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a11).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((a12 - c) / a11).clamp(0.0, 1.0);
    }
    (s, t)
}
