/// Guarded 2D vector helpers.
///
/// Every normalization in the crate goes through [`normalize`], which
/// returns `None` instead of producing NaN for near-zero input.
use super::{Vector2, TOLERANCE};

/// Returns the unit vector of `v`, or `None` if `|v| < TOLERANCE`.
#[must_use]
pub fn normalize(v: Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len < TOLERANCE || !len.is_finite() {
        return None;
    }
    Some(v / len)
}

/// Rotates `v` by +90°: `(-v.y, v.x)`.
///
/// For a unit tangent this is the left-hand unit normal.
#[must_use]
pub fn left_normal(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D cross product `a.x * b.y - a.y * b.x`.
///
/// Equals the projection of `b` onto the left normal of `a`.
#[must_use]
pub fn perp_dot(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn normalize_3_4() {
        let n = normalize(Vector2::new(3.0, 4.0)).unwrap();
        assert!((n.x - 0.6).abs() < TOL);
        assert!((n.y - 0.8).abs() < TOL);
    }

    #[test]
    fn normalize_zero_is_none() {
        assert!(normalize(Vector2::zeros()).is_none());
        assert!(normalize(Vector2::new(1e-14, -1e-14)).is_none());
    }

    #[test]
    fn normalize_nan_is_none() {
        assert!(normalize(Vector2::new(f64::NAN, 1.0)).is_none());
    }

    #[test]
    fn left_normal_of_x_axis_is_y_axis() {
        let n = left_normal(Vector2::new(1.0, 0.0));
        assert!((n.x).abs() < TOL);
        assert!((n.y - 1.0).abs() < TOL);
    }

    #[test]
    fn perp_dot_matches_left_normal_projection() {
        let a = Vector2::new(0.6, 0.8);
        let b = Vector2::new(-2.0, 5.0);
        assert!((perp_dot(a, b) - left_normal(a).dot(&b)).abs() < TOL);
    }
}
