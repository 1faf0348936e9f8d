//! Extension policy: the single place where out-of-domain solver candidates
//! are accepted, shifted, or rejected. Solvers never special-case extension
//! themselves.

use crate::geometry::EPSILON;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Per-end extension behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendMode {
    /// Out-of-domain candidates on this end are rejected.
    None,
    /// Extend along the end tangent line.
    OnTangent,
    /// Continue the curve itself past the end (angular continuation for
    /// arcs; tangent continuation where the curve has no natural extension).
    OnCurve,
}

/// Caller-facing extension specification for one curve operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CurveExtension {
    /// No extension on either end.
    #[default]
    None,
    /// One mode applied to both ends.
    Both(ExtendMode),
    /// Distinct modes for end 0 (start) and end 1 (end).
    PerEnd(ExtendMode, ExtendMode),
}

impl CurveExtension {
    /// Resolve to the mode governing one end (0 = start, 1 = end).
    pub fn mode_at(&self, end: usize) -> ExtendMode {
        match self {
            CurveExtension::None => ExtendMode::None,
            CurveExtension::Both(m) => *m,
            CurveExtension::PerEnd(m0, m1) => {
                if end == 0 {
                    *m0
                } else {
                    *m1
                }
            }
        }
    }

    pub fn allows(&self, end: usize) -> bool {
        self.mode_at(end) != ExtendMode::None
    }

    pub fn allows_any(&self) -> bool {
        self.allows(0) || self.allows(1)
    }

    /// Resolve a raw linear fraction against this specification.
    ///
    /// In-domain fractions (within parameter tolerance) clamp into [0,1] and
    /// are not extension hits. Out-of-domain fractions survive unchanged when
    /// the adjacent end extends; otherwise the candidate is rejected.
    /// Returns `(fraction, on_extension)`.
    pub fn resolve_fraction(&self, fraction: f64) -> Option<(f64, bool)> {
        if fraction < -EPSILON {
            if self.allows(0) {
                Some((fraction, true))
            } else {
                None
            }
        } else if fraction > 1.0 + EPSILON {
            if self.allows(1) {
                Some((fraction, true))
            } else {
                None
            }
        } else {
            Some((fraction.clamp(0.0, 1.0), false))
        }
    }

    /// Resolve a raw angle against an arc's periodic sweep.
    ///
    /// Angles inside the sweep (periodicity accounted) map into [0,1].
    /// Outside, a single extending end pulls the fraction one period toward
    /// that side; with both ends extending the numerically closer branch
    /// wins; with neither the candidate is rejected.
    pub fn resolve_angle(&self, theta: f64, start_angle: f64, sweep: f64) -> Option<(f64, bool)> {
        let s = sweep.abs();
        if s < EPSILON {
            return None;
        }
        let delta = if sweep >= 0.0 {
            (theta - start_angle).rem_euclid(TAU)
        } else {
            (start_angle - theta).rem_euclid(TAU)
        };
        let fraction = delta / s;
        let period = TAU / s;

        if fraction <= 1.0 + EPSILON {
            return Some((fraction.clamp(0.0, 1.0), false));
        }

        let forward = fraction; // > 1, on the end-1 extension
        let backward = fraction - period; // < 0, on the end-0 extension
        match (self.allows(0), self.allows(1)) {
            (true, false) => Some((backward, true)),
            (false, true) => Some((forward, true)),
            (true, true) => {
                if forward - 1.0 <= -backward {
                    Some((forward, true))
                } else {
                    Some((backward, true))
                }
            }
            (false, false) => None,
        }
    }
}
