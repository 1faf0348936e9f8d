//! Curve primitives consumed by the intersection engine.

use thiserror::Error;

/// Errors raised when constructing curve primitives from invalid data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type CurveResult<T> = Result<T, CurveError>;

pub mod types;
pub mod visitor;

pub use types::{Arc, BsplineCurve, CurveGeometry, CurvePrimitive, LineString, Segment};
pub use visitor::CurveVisitor;
