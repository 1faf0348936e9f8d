//! Pure 2D scalar helpers shared by the planar intersection solvers.
//!
//! Everything here works on plain `[f64; 2]` values so the solvers can run
//! the same code on world XY coordinates and on projected view coordinates.

use super::{Vector3, EPSILON};

/// 2D cross product (z-component of the 3D cross product).
#[inline]
pub fn cross_2d(v1: [f64; 2], v2: [f64; 2]) -> f64 {
    v1[0] * v2[1] - v1[1] * v2[0]
}

/// 2D dot product.
#[inline]
pub fn dot_2d(v1: [f64; 2], v2: [f64; 2]) -> f64 {
    v1[0] * v2[0] + v1[1] * v2[1]
}

/// Squared distance between two 2D points.
#[inline]
pub fn distance_squared(p1: [f64; 2], p2: [f64; 2]) -> f64 {
    let dx = p2[0] - p1[0];
    let dy = p2[1] - p1[1];
    dx * dx + dy * dy
}

/// Distance between two 2D points.
#[inline]
pub fn distance(p1: [f64; 2], p2: [f64; 2]) -> f64 {
    distance_squared(p1, p2).sqrt()
}

/// Linear interpolation between two 2D points. `t` may lie outside [0,1].
#[inline]
pub fn lerp(p1: [f64; 2], p2: [f64; 2], t: f64) -> [f64; 2] {
    [p1[0] + t * (p2[0] - p1[0]), p1[1] + t * (p2[1] - p1[1])]
}

/// Intersect two unbounded 2D lines given by point pairs.
/// Returns `Some((point, t, u))` with the parameters on each carrier line,
/// or `None` when the lines are parallel or either is degenerate.
pub fn line_line_params(
    s1: [f64; 2],
    e1: [f64; 2],
    s2: [f64; 2],
    e2: [f64; 2],
) -> Option<([f64; 2], f64, f64)> {
    let d1 = [e1[0] - s1[0], e1[1] - s1[1]];
    let d2 = [e2[0] - s2[0], e2[1] - s2[1]];

    if dot_2d(d1, d1) < EPSILON * EPSILON || dot_2d(d2, d2) < EPSILON * EPSILON {
        return None;
    }

    let denom = cross_2d(d1, d2);
    if denom.abs() < EPSILON {
        return None;
    }

    let dx = s2[0] - s1[0];
    let dy = s2[1] - s1[1];

    let t = (dx * d2[1] - dy * d2[0]) / denom;
    let u = (dx * d1[1] - dy * d1[0]) / denom;

    Some((lerp(s1, e1, t), t, u))
}

/// Intersection points of two full circles.
/// Returns 0, 1 (tangent), or 2 points. Concentric circles yield none.
pub fn circle_circle_points(c1: [f64; 2], r1: f64, c2: [f64; 2], r2: f64) -> Vec<[f64; 2]> {
    let dx = c2[0] - c1[0];
    let dy = c2[1] - c1[1];
    let d = (dx * dx + dy * dy).sqrt();

    if d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON || d < EPSILON {
        return vec![];
    }

    // Foot of the radical axis along the center line.
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = r1 * r1 - a * a;
    if h_sq < -EPSILON {
        return vec![];
    }

    let px = c1[0] + a * dx / d;
    let py = c1[1] + a * dy / d;

    if h_sq < EPSILON * EPSILON {
        return vec![[px, py]];
    }

    let h = h_sq.sqrt();
    let ox = h * dy / d;
    let oy = h * dx / d;

    vec![[px + ox, py - oy], [px - ox, py + oy]]
}

/// Solve `alpha*cos(theta) + beta*sin(theta) + gamma = 0` for theta.
/// Returns up to two roots in (-pi, pi]. Degenerate coefficient sets
/// (alpha = beta = 0) return no roots.
pub fn solve_trig(alpha: f64, beta: f64, gamma: f64) -> Vec<f64> {
    let r = alpha.hypot(beta);
    if r < EPSILON {
        return vec![];
    }
    let c = -gamma / r;
    if c.abs() > 1.0 + EPSILON {
        return vec![];
    }
    let phi = beta.atan2(alpha);
    let d = c.clamp(-1.0, 1.0).acos();
    let wrap = |a: f64| {
        let mut a = a;
        while a > std::f64::consts::PI {
            a -= std::f64::consts::TAU;
        }
        while a <= -std::f64::consts::PI {
            a += std::f64::consts::TAU;
        }
        a
    };
    if d < EPSILON {
        vec![wrap(phi)]
    } else {
        vec![wrap(phi + d), wrap(phi - d)]
    }
}

/// Cosine threshold beyond which two directions count as parallel for the
/// purpose of spanning a plane.
pub const COS_NEAR_PARALLEL: f64 = 0.9999;

/// Pick a plane normal containing `primary` by crossing it with the first
/// candidate direction that is not close to parallel. Candidates are tried
/// in order of preference; returns `None` when every candidate fails the
/// cosine threshold test.
pub fn well_conditioned_normal(primary: &Vector3, candidates: &[Vector3]) -> Option<Vector3> {
    let p_len = primary.norm();
    if p_len < EPSILON {
        return None;
    }
    for cand in candidates {
        let c_len = cand.norm();
        if c_len < EPSILON {
            continue;
        }
        let cos = (primary.dot(cand) / (p_len * c_len)).abs();
        if cos < COS_NEAR_PARALLEL {
            let n = primary.cross(cand);
            let n_len = n.norm();
            if n_len > EPSILON {
                return Some(n / n_len);
            }
        }
    }
    None
}
