//! Vertex and matrix primitives

mod bounds;
mod matrix;
mod vertex;

use std::cmp::Ordering;

use crate::constants::VERTEX_EPSILON;

pub use bounds::BoundingBox;
pub use matrix::Matrix;
pub use vertex::Vertex;

/// Tolerant float equality shared by every geometric comparison
pub(crate) fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < VERTEX_EPSILON
}

pub(crate) fn fuzzy_cmp(a: f64, b: f64) -> Ordering {
    if fuzzy_eq(a, b) {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}
