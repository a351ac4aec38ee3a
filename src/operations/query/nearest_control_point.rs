use crate::geometry::curve::SplineCurve;
use crate::math::Point2;

/// Finds the control point closest to a position, within a pick radius.
pub struct NearestControlPoint {
    position: Point2,
    radius: f64,
}

impl NearestControlPoint {
    /// Creates a new `NearestControlPoint` query.
    #[must_use]
    pub fn new(position: Point2, radius: f64) -> Self {
        Self { position, radius }
    }

    /// Returns the index of the nearest control point strictly closer than
    /// the radius, or `None`.
    #[must_use]
    pub fn execute(&self, curve: &SplineCurve) -> Option<usize> {
        curve
            .points()
            .iter()
            .enumerate()
            .map(|(i, cp)| (i, (cp.position() - self.position).norm()))
            .filter(|(_, d)| *d < self.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn curve() -> SplineCurve {
        SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            true,
        )
        .unwrap()
    }

    #[test]
    fn picks_nearest_within_radius() {
        let found = NearestControlPoint::new(Point2::new(3.0, 1.0), 5.0).execute(&curve());
        assert_eq!(found, Some(1));
    }

    #[test]
    fn nothing_within_radius() {
        let found = NearestControlPoint::new(Point2::new(20.0, 20.0), 5.0).execute(&curve());
        assert_eq!(found, None);
    }

    #[test]
    fn radius_is_exclusive() {
        let found = NearestControlPoint::new(Point2::new(-5.0, 0.0), 5.0).execute(&curve());
        assert_eq!(found, None);
    }
}
