use super::types::{Arc, BsplineCurve, LineString, Segment};

/// Type-directed dispatch over concrete curve primitives.
///
/// Implementors get one callback per concrete variant; the primitive's
/// `accept` routes to the matching method. The borrow lifetime ties visitor
/// output to the visited curve, so results may hold references into it.
pub trait CurveVisitor<'a> {
    fn visit_segment(&mut self, segment: &'a Segment);
    fn visit_line_string(&mut self, line_string: &'a LineString);
    fn visit_arc(&mut self, arc: &'a Arc);
    fn visit_bspline(&mut self, curve: &'a BsplineCurve);
}
