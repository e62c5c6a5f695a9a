//! 2D vector math
//!
//! Screen space is y-down, so a positive rotation turns clockwise on screen.

/// Immutable 2D value type used for every position, offset and scale factor.
///
/// Arithmetic is component-wise (`+`, `-`, `*`, `/`) and scalar (`* f32`).
/// Division by a zero component and `normalize` of a zero vector produce
/// non-finite components; use [`glam::Vec2::normalize_or_zero`] where a safe
/// result is wanted.
pub type Vector2D = glam::Vec2;

/// Tolerance used for geometric comparisons (pixels)
pub const GEOMETRY_EPSILON: f32 = 1e-3;

/// Rotate `point` about `pivot` by `degrees`, clockwise-positive on screen.
#[must_use]
pub fn rotate_about(point: Vector2D, pivot: Vector2D, degrees: f32) -> Vector2D {
    if degrees == 0.0 {
        return point;
    }
    let rotation = Vector2D::from_angle(degrees.to_radians());
    pivot + rotation.rotate(point - pivot)
}

/// Component-wise comparison within [`GEOMETRY_EPSILON`]
#[must_use]
#[inline]
pub fn approx_eq(a: Vector2D, b: Vector2D) -> bool {
    (a.x - b.x).abs() <= GEOMETRY_EPSILON && (a.y - b.y).abs() <= GEOMETRY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_subtract_is_identity() {
        let v = Vector2D::new(3.5, -7.25);
        let w = Vector2D::new(-120.0, 0.125);
        assert!(approx_eq((v + w) - w, v));
    }

    #[test]
    fn test_component_wise_ops() {
        let a = Vector2D::new(2.0, 3.0);
        let b = Vector2D::new(4.0, 5.0);
        assert_eq!(a * b, Vector2D::new(8.0, 15.0));
        assert_eq!(a * 2.0, Vector2D::new(4.0, 6.0));
        assert_eq!(b / a, Vector2D::new(2.0, 5.0 / 3.0));
    }

    #[test]
    fn test_divide_by_zero_is_not_finite() {
        let v = Vector2D::new(1.0, 1.0) / Vector2D::new(0.0, 1.0);
        assert!(!v.is_finite());
    }

    #[test]
    fn test_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-6);
        assert!((v.normalize().length() - 1.0).abs() < 1e-6);

        assert!(!Vector2D::ZERO.normalize().is_finite());
        assert_eq!(Vector2D::ZERO.normalize_or_zero(), Vector2D::ZERO);
    }

    #[test]
    fn test_rotate_about_is_clockwise_on_screen() {
        // +x rotated 90 degrees clockwise in y-down space points down (+y)
        let rotated = rotate_about(Vector2D::new(10.0, 0.0), Vector2D::ZERO, 90.0);
        assert!(approx_eq(rotated, Vector2D::new(0.0, 10.0)));

        let pivot = Vector2D::new(5.0, 5.0);
        let rotated = rotate_about(Vector2D::new(10.0, 5.0), pivot, 180.0);
        assert!(approx_eq(rotated, Vector2D::new(0.0, 5.0)));
    }
}
