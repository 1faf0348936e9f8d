pub mod curve;
pub mod geometry;
pub mod intersect;

pub fn version() -> &'static str {
    "0.1.0"
}
