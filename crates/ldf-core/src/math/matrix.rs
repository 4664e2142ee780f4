//! 3x3 transformation matrices

use std::fmt;
use std::ops::Mul;

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use super::{Vertex, fuzzy_eq};
use crate::object::format_number;

/// A 3x3 matrix stored row-major, in the order LDraw writes it (`a b c d e f g h i`).
///
/// Combined with a translation [`Vertex`] it forms the pose of a subfile reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Matrix {
    values: [f64; 9],
}

impl Matrix {
    /// The identity matrix
    pub const IDENTITY: Matrix = Matrix::new([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Create a matrix from nine row-major values
    pub const fn new(values: [f64; 9]) -> Self {
        Self { values }
    }

    /// Row-major values
    pub fn values(&self) -> &[f64; 9] {
        &self.values
    }

    /// Value at `row`, `column`
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * 3 + column]
    }

    /// Set the value at `row`, `column`
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        self.values[row * 3 + column] = value;
    }

    /// Convert to a glam matrix (glam is column-major)
    pub fn to_dmat3(&self) -> DMat3 {
        DMat3::from_cols_array(&self.values).transpose()
    }

    /// Convert from a glam matrix
    pub fn from_dmat3(matrix: DMat3) -> Self {
        Self::new(matrix.transpose().to_cols_array())
    }

    /// Rotation of `angle` radians around `axis` (right-hand rule).
    ///
    /// A zero-length axis yields the identity.
    pub fn rotation(axis: Vertex, angle: f64) -> Self {
        let axis = axis.to_dvec3();
        if axis.length_squared() == 0.0 {
            return Self::IDENTITY;
        }
        Self::from_dmat3(DMat3::from_axis_angle(axis.normalize(), angle))
    }

    /// Uniform or per-axis scale
    pub fn scale(factors: Vertex) -> Self {
        Self::from_dmat3(DMat3::from_diagonal(DVec3::from(factors)))
    }

    /// `self * other`. Not commutative.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Self::from_dmat3(self.to_dmat3() * other.to_dmat3())
    }

    /// Determinant. Never fails, near-singular matrices just give values near zero.
    pub fn determinant(&self) -> f64 {
        self.to_dmat3().determinant()
    }

    /// Apply the matrix to a vertex (no translation)
    pub fn transform_vertex(&self, vertex: &Vertex) -> Vertex {
        Vertex::from(self.to_dmat3() * vertex.to_dvec3())
    }

    /// Whether this is (within tolerance) the identity
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| fuzzy_eq(*a, *b))
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl Mul<Vertex> for Matrix {
    type Output = Vertex;

    fn mul(self, rhs: Vertex) -> Vertex {
        self.transform_vertex(&rhs)
    }
}

/// LDraw form: nine space-separated values
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.values.iter().map(|v| format_number(*v)).collect();
        f.write_str(&text.join(" "))
    }
}
