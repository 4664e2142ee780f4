//! Axis-aligned bounding boxes

use super::Vertex;

/// Axis-aligned bounding box accumulated from vertices
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    bounds: Option<(Vertex, Vertex)>,
}

impl BoundingBox {
    /// Create an empty bounding box
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to contain `vertex`
    pub fn add(&mut self, vertex: Vertex) {
        self.bounds = Some(match self.bounds {
            None => (vertex, vertex),
            Some((min, max)) => (
                Vertex::new(min.x.min(vertex.x), min.y.min(vertex.y), min.z.min(vertex.z)),
                Vertex::new(max.x.max(vertex.x), max.y.max(vertex.y), max.z.max(vertex.z)),
            ),
        });
    }

    /// Check if no vertex has been added
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Minimum corner
    pub fn min(&self) -> Option<Vertex> {
        self.bounds.map(|(min, _)| min)
    }

    /// Maximum corner
    pub fn max(&self) -> Option<Vertex> {
        self.bounds.map(|(_, max)| max)
    }

    /// Center of the box, or the origin when empty
    pub fn center(&self) -> Vertex {
        match self.bounds {
            Some((min, max)) => min.midpoint(&max),
            None => Vertex::ORIGIN,
        }
    }

    /// Size along each axis
    pub fn size(&self) -> Vertex {
        match self.bounds {
            Some((min, max)) => max - min,
            None => Vertex::ORIGIN,
        }
    }
}

impl Extend<Vertex> for BoundingBox {
    fn extend<T: IntoIterator<Item = Vertex>>(&mut self, iter: T) {
        for vertex in iter {
            self.add(vertex);
        }
    }
}

impl FromIterator<Vertex> for BoundingBox {
    fn from_iter<T: IntoIterator<Item = Vertex>>(iter: T) -> Self {
        let mut bbox = Self::new();
        bbox.extend(iter);
        bbox
    }
}
