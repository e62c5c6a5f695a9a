//! Overlap region between two bounding boxes

use smallvec::SmallVec;

use crate::math::{GEOMETRY_EPSILON, Vector2D, approx_eq};

/// Vertices of the convex region shared by two bounding boxes.
///
/// The overlap of two rectangles has at most eight vertices, so the points
/// live inline. Points are ordered along the polygon boundary. An empty set
/// means the boxes do not touch; one point is a touching corner and two points
/// a touching edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionArea {
    points: SmallVec<[Vector2D; 8]>,
}

impl CollisionArea {
    /// An area with no points
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an area from boundary-ordered points, merging near-duplicates
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vector2D>) -> Self {
        let mut merged: SmallVec<[Vector2D; 8]> = SmallVec::new();
        for point in points {
            if merged.last().is_some_and(|&last| approx_eq(last, point)) {
                continue;
            }
            merged.push(point);
        }
        while merged.len() > 1 && approx_eq(merged[0], merged[merged.len() - 1]) {
            merged.pop();
        }
        Self { points: merged }
    }

    /// Polygon vertices
    #[must_use]
    pub fn points(&self) -> &[Vector2D] {
        &self.points
    }

    /// True when the boxes do not touch
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Enclosed surface (zero for points and segments)
    #[must_use]
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let twice: f32 = self
            .edges()
            .map(|(from, to)| from.perp_dot(to))
            .sum();
        (twice * 0.5).abs()
    }

    /// Mean of the vertices, `None` when empty
    #[must_use]
    pub fn centroid(&self) -> Option<Vector2D> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector2D = self.points.iter().copied().sum();
        Some(sum / self.points.len() as f32)
    }

    /// Closed boundary edges, last vertex joined back to the first
    pub fn edges(&self) -> impl Iterator<Item = (Vector2D, Vector2D)> + '_ {
        let count = self.points.len();
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % count]))
    }

    /// True when `point` coincides with a vertex
    #[must_use]
    pub fn has_vertex(&self, point: Vector2D) -> bool {
        self.points.iter().any(|&p| approx_eq(p, point))
    }

    /// Whether the overlap is wider than a touching contact
    #[must_use]
    pub fn is_overlapping(&self) -> bool {
        self.area() > GEOMETRY_EPSILON
    }
}
