use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::geometry::curve::{Curve, SplineCurve};
use crate::math::vector_2d::left_normal;
use crate::math::{Point2, Vector2};

/// Left and right track edges derived from a reference path.
#[derive(Debug, Clone)]
pub struct TrackBoundaries {
    /// Edge on the left-normal side of the reference path.
    pub left: SplineCurve,
    /// Edge on the opposite side.
    pub right: SplineCurve,
}

/// Offsets every control point of a reference spline along its local
/// left normal to build the two track boundary splines.
///
/// For node `i` with unit tangent `t` and left normal `n = (-t.y, t.x)`:
///
/// - `left[i]  = p[i] + half_width * n`
/// - `right[i] = p[i] - half_width * n`
///
/// Nodes whose tangent vanishes (coincident neighbors) keep the reference
/// position on both sides. The returned curves have their lengths
/// recomputed.
#[derive(Debug)]
pub struct BoundaryOffset2D {
    half_width: f64,
}

impl BoundaryOffset2D {
    /// Creates a new boundary offset operation.
    #[must_use]
    pub fn new(half_width: f64) -> Self {
        Self { half_width }
    }

    /// Executes the offset against `reference`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `half_width` is negative or
    /// not finite.
    pub fn execute(&self, reference: &SplineCurve) -> Result<TrackBoundaries> {
        if !self.half_width.is_finite() || self.half_width < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "track half-width must be a non-negative number, got {}",
                self.half_width
            ))
            .into());
        }

        let n = reference.len();
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);

        for (i, cp) in reference.points().iter().enumerate() {
            let normal = match reference.node_tangent(i) {
                Ok(tangent) => left_normal(tangent),
                Err(err) => {
                    warn!(node = i, %err, "degenerate tangent, boundary collapses onto path");
                    Vector2::zeros()
                }
            };
            let p = cp.position();
            let offset = normal * self.half_width;
            left.push(p + offset);
            right.push(p - offset);
        }

        let left = build_edge(&left, reference)?;
        let right = build_edge(&right, reference)?;
        debug!(
            nodes = n,
            half_width = self.half_width,
            left_length = left.total_length(),
            right_length = right.total_length(),
            "track boundaries rebuilt"
        );

        Ok(TrackBoundaries { left, right })
    }
}

fn build_edge(points: &[Point2], reference: &SplineCurve) -> Result<SplineCurve> {
    let mut edge =
        SplineCurve::new(points, reference.is_closed())?.with_length_step(reference.length_step())?;
    edge.recompute();
    Ok(edge)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_path() -> SplineCurve {
        let mut path = SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        )
        .unwrap();
        path.recompute();
        path
    }

    #[test]
    fn zero_width_boundaries_coincide_with_path() {
        let path = square_path();
        let b = BoundaryOffset2D::new(0.0).execute(&path).unwrap();
        for k in 0..400 {
            let t = f64::from(k) * 0.01;
            let p = path.point_at(t).unwrap();
            assert_eq!(b.left.point_at(t).unwrap(), p);
            assert_eq!(b.right.point_at(t).unwrap(), p);
        }
    }

    #[test]
    fn square_left_edge_is_inside_right_edge_outside() {
        let path = square_path();
        let b = BoundaryOffset2D::new(2.0).execute(&path).unwrap();
        let center = Point2::new(5.0, 5.0);
        for i in 0..4 {
            let p = path.position(i).unwrap();
            let l = b.left.position(i).unwrap();
            let r = b.right.position(i).unwrap();
            assert!((l - center).norm() < (p - center).norm());
            assert!((r - center).norm() > (p - center).norm());
            assert_relative_eq!((l - r).norm(), 4.0, epsilon = 1e-12);
            assert_relative_eq!((l - p).norm(), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn boundaries_have_current_lengths() {
        let path = square_path();
        let b = BoundaryOffset2D::new(1.0).execute(&path).unwrap();
        assert!(b.left.lengths_valid());
        assert!(b.right.lengths_valid());
        assert!(b.left.total_length() < path.total_length());
        assert!(b.right.total_length() > path.total_length());
    }

    #[test]
    fn negative_width_fails() {
        let path = square_path();
        assert!(BoundaryOffset2D::new(-1.0).execute(&path).is_err());
        assert!(BoundaryOffset2D::new(f64::NAN).execute(&path).is_err());
    }

    #[test]
    fn degenerate_tangent_keeps_reference_position() {
        // Node 1 has both neighbors at the origin, so its tangent vanishes.
        let path = SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 5.0),
            ],
            true,
        )
        .unwrap();
        let b = BoundaryOffset2D::new(3.0).execute(&path).unwrap();
        assert_eq!(b.left.position(1).unwrap(), Point2::new(5.0, 0.0));
        assert_eq!(b.right.position(1).unwrap(), Point2::new(5.0, 0.0));
        assert!(b.left.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn open_path_offsets_every_node() {
        let path = SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(3.0, 0.0),
                Point2::new(4.0, 0.0),
            ],
            false,
        )
        .unwrap();
        let b = BoundaryOffset2D::new(1.0).execute(&path).unwrap();
        assert!(!b.left.is_closed());
        for p in b.left.positions() {
            assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        }
        for p in b.right.positions() {
            assert_relative_eq!(p.y, -1.0, epsilon = 1e-12);
        }
    }
}
