//! Located points on curves and the paired result set.

use crate::curve::CurvePrimitive;
use crate::geometry::Point3;

/// A single located point on one curve.
///
/// Borrows the primitive it locates, so a location cannot outlive the
/// caller's geometry. The stored coordinates always agree with re-evaluating
/// the curve at the stored fraction (out-of-domain fractions evaluate on the
/// curve's extension).
#[derive(Debug, Clone, Copy)]
pub struct CurveLocation<'a> {
    pub curve: &'a CurvePrimitive,
    pub fraction: f64,
    pub point: Point3,
    /// True when the fraction lies on an extension past the nominal domain.
    pub extrapolated: bool,
}

impl<'a> CurveLocation<'a> {
    /// Build a location by evaluating the curve at the fraction.
    pub fn evaluate(curve: &'a CurvePrimitive, fraction: f64, extrapolated: bool) -> Self {
        Self {
            curve,
            fraction,
            point: curve.point_at(fraction),
            extrapolated,
        }
    }
}

/// Two locations produced by one geometric event, one per input curve.
#[derive(Debug, Clone, Copy)]
pub struct LocationPair<'a> {
    pub a: CurveLocation<'a>,
    pub b: CurveLocation<'a>,
}

impl<'a> LocationPair<'a> {
    pub fn new(a: CurveLocation<'a>, b: CurveLocation<'a>) -> Self {
        Self { a, b }
    }

    /// The same event with the operand sides exchanged.
    pub fn swapped(self) -> Self {
        Self { a: self.b, b: self.a }
    }
}

/// Ordered sequence of location pairs in discovery order. The engine never
/// deduplicates or sorts; callers post-process if they need either.
#[derive(Debug, Clone, Default)]
pub struct IntersectionSet<'a> {
    pairs: Vec<LocationPair<'a>>,
}

impl<'a> IntersectionSet<'a> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn push(&mut self, pair: LocationPair<'a>) {
        self.pairs.push(pair);
    }

    pub fn pairs(&self) -> &[LocationPair<'a>] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationPair<'a>> {
        self.pairs.iter()
    }

    /// Legacy view: all A-side locations, parallel to `locations_b`.
    pub fn locations_a(&self) -> Vec<CurveLocation<'a>> {
        self.pairs.iter().map(|p| p.a).collect()
    }

    /// Legacy view: all B-side locations, parallel to `locations_a`.
    pub fn locations_b(&self) -> Vec<CurveLocation<'a>> {
        self.pairs.iter().map(|p| p.b).collect()
    }
}

impl<'a> IntoIterator for IntersectionSet<'a> {
    type Item = LocationPair<'a>;
    type IntoIter = std::vec::IntoIter<LocationPair<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b IntersectionSet<'a> {
    type Item = &'b LocationPair<'a>;
    type IntoIter = std::slice::Iter<'b, LocationPair<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
