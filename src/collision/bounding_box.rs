//! Rotated rectangle used for collision and pointer hit tests

use serde::{Deserialize, Serialize};

use super::area::CollisionArea;
use crate::math::{GEOMETRY_EPSILON, Vector2D, rotate_about};

/// A rectangle rotated about its own center.
///
/// `location` is the top-left corner of the rectangle before rotation and
/// `rotation` is in degrees, clockwise-positive on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    location: Vector2D,
    width: f32,
    height: f32,
    rotation: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(location: Vector2D, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            location,
            width,
            height,
            rotation,
        }
    }

    /// Create an unrotated bounding box
    #[must_use]
    pub const fn axis_aligned(location: Vector2D, width: f32, height: f32) -> Self {
        Self::new(location, width, height, 0.0)
    }

    /// Top-left corner before rotation
    #[must_use]
    #[inline]
    pub fn location(&self) -> Vector2D {
        self.location
    }

    /// Width before rotation
    #[must_use]
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height before rotation
    #[must_use]
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Rotation in degrees
    #[must_use]
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Width and height as a vector
    #[must_use]
    #[inline]
    pub fn size(&self) -> Vector2D {
        Vector2D::new(self.width, self.height)
    }

    /// Rotation pivot and geometric center
    #[must_use]
    #[inline]
    pub fn center(&self) -> Vector2D {
        self.location + self.size() * 0.5
    }

    /// True when the box has no area and can never contain or touch anything
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.location.is_finite()
            || !self.rotation.is_finite()
    }

    /// World-space corners in order top-left, top-right, bottom-right, bottom-left
    #[must_use]
    pub fn corners(&self) -> [Vector2D; 4] {
        let center = self.center();
        [
            self.location,
            self.location + Vector2D::new(self.width, 0.0),
            self.location + self.size(),
            self.location + Vector2D::new(0.0, self.height),
        ]
        .map(|corner| rotate_about(corner, center, self.rotation))
    }

    /// Smallest axis-aligned `(min, max)` enclosing the rotated box
    #[must_use]
    pub fn axis_aligned_bounds(&self) -> (Vector2D, Vector2D) {
        let corners = self.corners();
        let min = corners.iter().copied().fold(corners[0], Vector2D::min);
        let max = corners.iter().copied().fold(corners[0], Vector2D::max);
        (min, max)
    }

    /// Whether `point` lies within the box, boundary included.
    ///
    /// The point is un-rotated about the box center before the axis-aligned
    /// comparison.
    #[must_use]
    pub fn is_inside(&self, point: Vector2D) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let local = rotate_about(point, self.center(), -self.rotation);
        let min = self.location - Vector2D::splat(GEOMETRY_EPSILON);
        let max = self.location + self.size() + Vector2D::splat(GEOMETRY_EPSILON);
        local.x >= min.x && local.x <= max.x && local.y >= min.y && local.y <= max.y
    }

    /// Overlap region with another box.
    ///
    /// Clips this box's outline against each edge of `other`, which yields the
    /// edge crossings plus the corners of either box that lie inside the other.
    /// Returns an empty area when the boxes are apart or either is degenerate.
    #[must_use]
    pub fn intersect(&self, other: &BoundingBox) -> CollisionArea {
        if self.is_degenerate() || other.is_degenerate() {
            return CollisionArea::empty();
        }

        // Cheap rejection before clipping
        let (a_min, a_max) = self.axis_aligned_bounds();
        let (b_min, b_max) = other.axis_aligned_bounds();
        if a_max.x + GEOMETRY_EPSILON < b_min.x
            || b_max.x + GEOMETRY_EPSILON < a_min.x
            || a_max.y + GEOMETRY_EPSILON < b_min.y
            || b_max.y + GEOMETRY_EPSILON < a_min.y
        {
            return CollisionArea::empty();
        }

        let clip = other.corners();
        let mut polygon: Vec<Vector2D> = self.corners().to_vec();
        for i in 0..clip.len() {
            if polygon.is_empty() {
                break;
            }
            polygon = clip_against_edge(&polygon, clip[i], clip[(i + 1) % clip.len()]);
        }
        CollisionArea::from_points(polygon)
    }

    /// Whether the two boxes touch or overlap
    #[must_use]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.intersect(other).is_empty()
    }
}

/// One Sutherland-Hodgman pass: keep the part of `polygon` on the inner side
/// of the directed edge `a -> b`. Corners wind so the inside is on the left
/// of each edge in `perp_dot` terms.
fn clip_against_edge(polygon: &[Vector2D], a: Vector2D, b: Vector2D) -> Vec<Vector2D> {
    let edge = b - a;
    let side = |p: Vector2D| edge.perp_dot(p - a);
    let tolerance = GEOMETRY_EPSILON * edge.length().max(1.0);

    let mut output = Vec::with_capacity(polygon.len() + 2);
    for i in 0..polygon.len() {
        let current = polygon[i];
        let previous = polygon[(i + polygon.len() - 1) % polygon.len()];
        let current_in = side(current) >= -tolerance;
        let previous_in = side(previous) >= -tolerance;

        if current_in {
            if !previous_in {
                output.push(crossing(previous, current, a, edge));
            }
            output.push(current);
        } else if previous_in {
            output.push(crossing(previous, current, a, edge));
        }
    }
    output
}

/// Point where segment `from -> to` crosses the line through `a` along `edge`
fn crossing(from: Vector2D, to: Vector2D, a: Vector2D, edge: Vector2D) -> Vector2D {
    let direction = to - from;
    let denominator = edge.perp_dot(direction);
    if denominator.abs() <= f32::EPSILON {
        return to;
    }
    let t = (edge.perp_dot(a - from) / denominator).clamp(0.0, 1.0);
    from + direction * t
}
