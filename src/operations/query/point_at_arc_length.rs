use crate::error::{GeometryError, Result};
use crate::geometry::curve::{Curve, SplineCurve};
use crate::math::{Point2, Vector2};

/// Position and unnormalized tangent of a curve at an arc-length distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengthSample {
    /// Parameter the distance resolved to.
    pub t: f64,
    pub point: Point2,
    pub tangent: Vector2,
}

impl ArcLengthSample {
    /// Heading of the tangent in radians, measured from the +X axis.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.tangent.y.atan2(self.tangent.x)
    }
}

/// Locates the point a given distance along a spline, for placing a marker
/// that moves at constant speed.
///
/// On closed curves the distance wraps around the total length, so any
/// finite distance is accepted.
pub struct PointAtArcLength {
    distance: f64,
}

impl PointAtArcLength {
    /// Creates a new `PointAtArcLength` query.
    #[must_use]
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }

    /// Executes the query against `curve`.
    ///
    /// # Errors
    ///
    /// - `GeometryError::StaleLengths` if the curve lengths are out of date
    /// - `GeometryError::Degenerate` if a closed curve has zero total length
    /// - `GeometryError::ParameterOutOfRange` if the distance is not finite,
    ///   or outside `[0, total_length]` on an open curve
    pub fn execute(&self, curve: &SplineCurve) -> Result<ArcLengthSample> {
        if !curve.lengths_valid() {
            return Err(GeometryError::StaleLengths.into());
        }
        let total = curve.total_length();
        let distance = if curve.is_closed() && self.distance.is_finite() {
            if total <= 0.0 {
                return Err(GeometryError::Degenerate("curve has zero length".to_owned()).into());
            }
            self.distance.rem_euclid(total)
        } else {
            self.distance
        };

        let t = curve.normalized_offset(distance)?;
        Ok(ArcLengthSample {
            t,
            point: curve.point_at(t)?,
            tangent: curve.gradient_at(t)?,
        })
    }
}
