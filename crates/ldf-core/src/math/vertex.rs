//! 3D points with tolerant comparison

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{Matrix, fuzzy_cmp, fuzzy_eq};
use crate::object::format_number;

/// A point (or translation) in LDraw units.
///
/// Equality and ordering are tolerant: two vertices closer than
/// [`VERTEX_EPSILON`](crate::constants::VERTEX_EPSILON) on every axis compare
/// equal, and ordering is lexicographic over x, y, z. This makes
/// `BTreeSet<Vertex>` usable as a "points already placed" set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    /// The origin (0, 0, 0)
    pub const ORIGIN: Vertex = Vertex::new(0.0, 0.0, 0.0);

    /// Create a vertex from its coordinates
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as an array
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Convert to a glam vector
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Apply `matrix` (rotation/scale), then translate by `position`
    pub fn transformed(&self, matrix: &Matrix, position: &Vertex) -> Vertex {
        Vertex::from(matrix.to_dmat3() * self.to_dvec3()) + *position
    }

    /// Euclidean distance to another vertex
    pub fn distance(&self, other: &Vertex) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Point halfway between two vertices
    pub fn midpoint(&self, other: &Vertex) -> Vertex {
        (*self + *other) * 0.5
    }

    /// Vector length, treating the vertex as a direction
    pub fn length(&self) -> f64 {
        self.to_dvec3().length()
    }
}

impl From<DVec3> for Vertex {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vertex> for DVec3 {
    fn from(v: Vertex) -> Self {
        v.to_dvec3()
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        fuzzy_eq(self.x, other.x) && fuzzy_eq(self.y, other.y) && fuzzy_eq(self.z, other.z)
    }
}

impl Eq for Vertex {}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        fuzzy_cmp(self.x, other.x)
            .then_with(|| fuzzy_cmp(self.y, other.y))
            .then_with(|| fuzzy_cmp(self.z, other.z))
    }
}

impl Add for Vertex {
    type Output = Vertex;

    fn add(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vertex {
    fn add_assign(&mut self, rhs: Vertex) {
        *self = *self + rhs;
    }
}

impl Sub for Vertex {
    type Output = Vertex;

    fn sub(self, rhs: Vertex) -> Vertex {
        Vertex::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vertex {
    fn sub_assign(&mut self, rhs: Vertex) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vertex {
    type Output = Vertex;

    fn mul(self, scalar: f64) -> Vertex {
        Vertex::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vertex {
    type Output = Vertex;

    fn neg(self) -> Vertex {
        Vertex::new(-self.x, -self.y, -self.z)
    }
}

/// LDraw form: `x y z`
impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            format_number(self.x),
            format_number(self.y),
            format_number(self.z)
        )
    }
}
