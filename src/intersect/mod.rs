//! Curve-curve intersection engine.
//!
//! Entry points take two geometry operands (curve A is a single primitive;
//! geometry B may be a flat collection, fanned out leaf by leaf) plus an
//! extension specification per operand, and return an ordered set of paired
//! locations. Misses, unsupported type combinations, and degenerate inputs
//! all produce empty contributions, never errors.

pub mod extend;
pub mod location;

mod context;
mod solvers;

#[cfg(test)]
mod tests_projected;
#[cfg(test)]
mod tests_spline;
#[cfg(test)]
mod tests_xyz;

pub use extend::{CurveExtension, ExtendMode};
pub use location::{CurveLocation, IntersectionSet, LocationPair};

use tracing::debug;

use crate::curve::{CurveGeometry, CurvePrimitive, LineString, Segment};
use crate::geometry::{dist_sq, Matrix4};

use context::IntersectContext;
use solvers::QueryMode;

/// Planar intersection: compare the XY projections of both curves.
pub fn intersect_xy<'a>(
    curve_a: &'a CurvePrimitive,
    extend_a: CurveExtension,
    geometry_b: &'a CurveGeometry,
    extend_b: CurveExtension,
) -> IntersectionSet<'a> {
    run(QueryMode::Xy, None, curve_a, extend_a, geometry_b, extend_b)
}

/// Full 3D intersection. Supported for segment, line-string, and arc
/// combinations; B-spline operands yield empty results in this variant.
pub fn intersect_xyz<'a>(
    curve_a: &'a CurvePrimitive,
    extend_a: CurveExtension,
    geometry_b: &'a CurveGeometry,
    extend_b: CurveExtension,
) -> IntersectionSet<'a> {
    run(QueryMode::Xyz, None, curve_a, extend_a, geometry_b, extend_b)
}

/// Planar intersection with both curves conceptually transformed first.
/// Supports perspective transforms; the returned locations still reference
/// the original curves, with fractions in their own parameter spaces.
pub fn intersect_projected_xy<'a>(
    transform: &Matrix4,
    curve_a: &'a CurvePrimitive,
    extend_a: CurveExtension,
    geometry_b: &'a CurveGeometry,
    extend_b: CurveExtension,
) -> IntersectionSet<'a> {
    run(QueryMode::Xy, Some(*transform), curve_a, extend_a, geometry_b, extend_b)
}

fn run<'a>(
    mode: QueryMode,
    transform: Option<Matrix4>,
    curve_a: &'a CurvePrimitive,
    extend_a: CurveExtension,
    geometry_b: &'a CurveGeometry,
    extend_b: CurveExtension,
) -> IntersectionSet<'a> {
    let mut leaves = geometry_b.leaves();
    let Some(first) = leaves.next() else {
        return IntersectionSet::new();
    };
    debug!(
        a = curve_a.type_name(),
        leaves = geometry_b.leaf_count(),
        "curve intersection query"
    );

    let mut ctx = IntersectContext::new(mode, transform, curve_a, extend_a, first, extend_b);
    ctx.run();
    for leaf in leaves {
        ctx.reset_b(leaf);
        ctx.run();
    }
    ctx.into_results()
}

/// Closest approach between two curves in 3D: the minimal-distance pair of
/// locations, fractions clamped into each curve's domain. Supported for
/// segment and line-string operands; other types return `None` (a documented
/// gap, not an error).
pub fn closest_approach_xyz<'a>(
    curve_a: &'a CurvePrimitive,
    curve_b: &'a CurvePrimitive,
) -> Option<LocationPair<'a>> {
    let (fa, fb) = match (curve_a, curve_b) {
        (CurvePrimitive::Segment(a), CurvePrimitive::Segment(b)) => {
            solvers::closest_segment_segment(a, b)
        }
        (CurvePrimitive::Segment(a), CurvePrimitive::LineString(b)) => {
            let (fs, fl) = closest_segment_linestring(a, b)?;
            (fs, fl)
        }
        (CurvePrimitive::LineString(a), CurvePrimitive::Segment(b)) => {
            let (fs, fl) = closest_segment_linestring(b, a)?;
            (fl, fs)
        }
        (CurvePrimitive::LineString(a), CurvePrimitive::LineString(b)) => {
            closest_linestring_linestring(a, b)?
        }
        _ => return None,
    };
    Some(LocationPair::new(
        CurveLocation::evaluate(curve_a, fa, false),
        CurveLocation::evaluate(curve_b, fb, false),
    ))
}

fn closest_segment_linestring(seg: &Segment, ls: &LineString) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for i in 0..ls.edge_count() {
        let edge = ls.edge(i)?;
        let (s, t) = solvers::closest_segment_segment(seg, &edge);
        let d = dist_sq(&seg.point_at(s), &edge.point_at(t));
        if best.map_or(true, |(_, _, bd)| d < bd) {
            best = Some((s, ls.global_fraction(i, t), d));
        }
    }
    best.map(|(s, t, _)| (s, t))
}

fn closest_linestring_linestring(a: &LineString, b: &LineString) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for i in 0..a.edge_count() {
        let edge = a.edge(i)?;
        if let Some((s, t)) = closest_segment_linestring(&edge, b) {
            let d = dist_sq(&edge.point_at(s), &b.point_at(t));
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((a.global_fraction(i, s), t, d));
            }
        }
    }
    best.map(|(s, t, _)| (s, t))
}
