use crate::error::{GeometryError, OperationError, Result};
use crate::math::vector_2d::{left_normal, normalize};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// Minimum number of control points for a Catmull-Rom spline.
pub const MIN_CONTROL_POINTS: usize = 4;

/// Default parameter step used when integrating segment arc length.
pub const DEFAULT_LENGTH_STEP: f64 = 0.1;

/// A spline control point with its cached segment length.
///
/// `length` is the arc length of the segment starting at this point. It is
/// only meaningful after [`SplineCurve::recompute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub length: f64,
}

impl ControlPoint {
    /// Creates a control point with no cached length.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, length: 0.0 }
    }

    /// Returns the position of this control point.
    #[must_use]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// A Catmull-Rom spline through an ordered sequence of 2D control points.
///
/// The curve passes through every control point: `point_at(i)` equals
/// control point `i` for integer `i`. Each segment `[i, i+1)` is a cubic
/// Hermite patch shaped by the four points `p(i-1)..=p(i+2)`.
///
/// # Parameterization
///
/// - **Closed**: domain `[0, n)`. Any finite `t` is accepted and wrapped.
/// - **Open**: domain `[0, n-3]`. Parameter `s` runs from point `s+1` to
///   point `s+2`, so the first and last point only shape the end tangents.
///
/// # Lengths
///
/// Segment and total lengths are cached and must be refreshed with
/// [`recompute`](Self::recompute) after editing points. Arc-length queries
/// reject stale caches with [`GeometryError::StaleLengths`].
#[derive(Debug, Clone)]
pub struct SplineCurve {
    points: Vec<ControlPoint>,
    closed: bool,
    total_length: f64,
    length_step: f64,
    lengths_valid: bool,
}

impl SplineCurve {
    /// Creates a spline from control point positions.
    ///
    /// Lengths start out stale; call [`recompute`](Self::recompute) before
    /// any arc-length query.
    ///
    /// # Errors
    ///
    /// - `GeometryError::TooFewPoints` if fewer than 4 points are given
    /// - `OperationError::InvalidInput` if any coordinate is not finite
    pub fn new(points: &[Point2], closed: bool) -> Result<Self> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(GeometryError::TooFewPoints {
                required: MIN_CONTROL_POINTS,
                actual: points.len(),
            }
            .into());
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(OperationError::InvalidInput(
                "control point coordinates must be finite".to_owned(),
            )
            .into());
        }
        Ok(Self {
            points: points.iter().map(|p| ControlPoint::new(p.x, p.y)).collect(),
            closed,
            total_length: 0.0,
            length_step: DEFAULT_LENGTH_STEP,
            lengths_valid: false,
        })
    }

    /// Replaces the parameter step used by [`segment_length`](Self::segment_length).
    ///
    /// Invalidates cached lengths.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` unless `0 < step <= 1`.
    pub fn with_length_step(mut self, step: f64) -> Result<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(OperationError::InvalidInput(format!(
                "length step must be in (0, 1], got {step}"
            ))
            .into());
        }
        self.length_step = step;
        self.lengths_valid = false;
        Ok(self)
    }

    /// Returns the control points, including their cached lengths.
    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Returns the control point positions.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.points.iter().map(ControlPoint::position).collect()
    }

    /// Returns the position of control point `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::IndexOutOfRange` if `index >= len()`.
    pub fn position(&self, index: usize) -> Result<Point2> {
        self.points
            .get(index)
            .map(ControlPoint::position)
            .ok_or_else(|| {
                GeometryError::IndexOutOfRange {
                    index,
                    len: self.points.len(),
                }
                .into()
            })
    }

    /// Returns the number of control points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a spline holds at least [`MIN_CONTROL_POINTS`] points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the sum of all valid segment lengths as of the last recompute.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Returns `false` if points changed since the last recompute.
    #[must_use]
    pub fn lengths_valid(&self) -> bool {
        self.lengths_valid
    }

    /// Returns the number of parameter segments (`n` closed, `n - 3` open).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 3
        }
    }

    /// Moves control point `index` to `position`.
    ///
    /// Cached lengths become stale until the next [`recompute`](Self::recompute).
    ///
    /// # Errors
    ///
    /// - `GeometryError::IndexOutOfRange` if `index >= len()`
    /// - `OperationError::InvalidInput` if `position` is not finite
    pub fn set_point(&mut self, index: usize, position: Point2) -> Result<()> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(OperationError::InvalidInput(
                "control point coordinates must be finite".to_owned(),
            )
            .into());
        }
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(GeometryError::IndexOutOfRange { index, len })?;
        point.x = position.x;
        point.y = position.y;
        self.lengths_valid = false;
        Ok(())
    }

    /// Evaluates the curve position at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if `t` is not finite, or
    /// lies outside `[0, n-3]` on an open curve.
    pub fn point_at(&self, t: f64) -> Result<Point2> {
        let (segment, f) = self.locate(t)?;
        Ok(self.eval_point(segment, f))
    }

    /// Evaluates the first derivative of the curve at parameter `t`.
    ///
    /// The result is not normalized and is zero for coincident points.
    ///
    /// # Errors
    ///
    /// Same as [`point_at`](Self::point_at).
    pub fn gradient_at(&self, t: f64) -> Result<Vector2> {
        let (segment, f) = self.locate(t)?;
        Ok(self.eval_gradient(segment, f))
    }

    /// Returns the unit tangent at parameter `t`.
    ///
    /// # Errors
    ///
    /// - Same as [`point_at`](Self::point_at)
    /// - `GeometryError::ZeroVector` if the gradient vanishes
    pub fn unit_tangent_at(&self, t: f64) -> Result<Vector2> {
        normalize(self.gradient_at(t)?).ok_or_else(|| GeometryError::ZeroVector.into())
    }

    /// Returns the unit left-hand normal `(-tangent.y, tangent.x)` at `t`.
    ///
    /// # Errors
    ///
    /// Same as [`unit_tangent_at`](Self::unit_tangent_at).
    pub fn left_normal_at(&self, t: f64) -> Result<Vector2> {
        self.unit_tangent_at(t).map(left_normal)
    }

    /// Returns the parameter at which the curve passes through control
    /// point `index`.
    ///
    /// On open curves the first and last point are not interpolated; they
    /// map to the nearest end of the domain.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::IndexOutOfRange` if `index >= len()`.
    pub fn node_parameter(&self, index: usize) -> Result<f64> {
        let len = self.points.len();
        if index >= len {
            return Err(GeometryError::IndexOutOfRange { index, len }.into());
        }
        let segment = if self.closed {
            index
        } else {
            index.saturating_sub(1).min(self.segment_count())
        };
        #[allow(clippy::cast_precision_loss)]
        let t = segment as f64;
        Ok(t)
    }

    /// Returns the unit tangent of the curve at control point `index`.
    ///
    /// # Errors
    ///
    /// - `GeometryError::IndexOutOfRange` if `index >= len()`
    /// - `GeometryError::ZeroVector` if the neighbors of the node coincide
    pub fn node_tangent(&self, index: usize) -> Result<Vector2> {
        self.unit_tangent_at(self.node_parameter(index)?)
    }

    /// Returns the parameter-space step used for arc-length integration.
    #[must_use]
    pub fn length_step(&self) -> f64 {
        self.length_step
    }

    /// Measures the arc length of parameter segment `segment` by summing
    /// chord lengths between samples taken every `length_step`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::IndexOutOfRange` if `segment >= segment_count()`.
    pub fn segment_length(&self, segment: usize) -> Result<f64> {
        let count = self.segment_count();
        if segment >= count {
            return Err(GeometryError::IndexOutOfRange {
                index: segment,
                len: count,
            }
            .into());
        }
        Ok(self.measure_segment(segment))
    }

    /// Recalculates every segment length and the total length.
    ///
    /// On open curves the first and last two points own no interior
    /// segment; their cached length is set to zero.
    pub fn recompute(&mut self) {
        let lengths: Vec<f64> = (0..self.segment_count())
            .map(|s| self.measure_segment(s))
            .collect();

        for point in &mut self.points {
            point.length = 0.0;
        }
        let offset = usize::from(!self.closed);
        for (s, len) in lengths.iter().enumerate() {
            self.points[s + offset].length = *len;
        }

        self.total_length = lengths.iter().sum();
        self.lengths_valid = true;
    }

    /// Converts an arc-length distance from the curve start into a
    /// parameter value.
    ///
    /// Walks the segments, subtracting each cached length until the
    /// remainder fits, then returns `segment + remainder / length`.
    ///
    /// # Errors
    ///
    /// - `GeometryError::StaleLengths` if points changed since the last recompute
    /// - `GeometryError::ParameterOutOfRange` if `distance` is outside `[0, total_length]`
    pub fn normalized_offset(&self, distance: f64) -> Result<f64> {
        if !self.lengths_valid {
            return Err(GeometryError::StaleLengths.into());
        }
        if !distance.is_finite() || distance < 0.0 || distance > self.total_length {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "distance",
                value: distance,
                min: 0.0,
                max: self.total_length,
            }
            .into());
        }

        let count = self.segment_count();
        let mut remaining = distance;
        let mut segment = 0;
        while segment + 1 < count && remaining > self.cached_segment_length(segment) {
            remaining -= self.cached_segment_length(segment);
            segment += 1;
        }

        let len = self.cached_segment_length(segment);
        let fraction = if len < TOLERANCE {
            0.0
        } else {
            (remaining / len).clamp(0.0, 1.0)
        };
        #[allow(clippy::cast_precision_loss)]
        let base = segment as f64;
        Ok(base + fraction)
    }

    /// Cached length of parameter segment `segment`.
    fn cached_segment_length(&self, segment: usize) -> f64 {
        let offset = usize::from(!self.closed);
        self.points[segment + offset].length
    }

    /// Splits `t` into a parameter segment index and local fraction.
    ///
    /// Shared by position and gradient evaluation so both see the same
    /// segment for the same `t`.
    fn locate(&self, t: f64) -> Result<(usize, f64)> {
        let domain = self.domain();
        if !t.is_finite() || (!self.closed && !domain.contains(t)) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: domain.t_min,
                max: domain.t_max,
            }
            .into());
        }

        let count = self.segment_count();
        let wrapped = if self.closed {
            t.rem_euclid(domain.t_max)
        } else {
            t
        };
        let base = wrapped.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment = base as usize;

        if segment >= count {
            // Closed: rem_euclid rounded up to n. Open: t == n-3 exactly.
            return Ok(if self.closed {
                (0, 0.0)
            } else {
                (count - 1, 1.0)
            });
        }
        Ok((segment, wrapped - base))
    }

    /// Indices of the four control points shaping parameter segment `segment`.
    fn control_indices(&self, segment: usize) -> [usize; 4] {
        let n = self.points.len();
        if self.closed {
            [(segment + n - 1) % n, segment, (segment + 1) % n, (segment + 2) % n]
        } else {
            [segment, segment + 1, segment + 2, segment + 3]
        }
    }

    fn blend(&self, segment: usize, weights: [f64; 4]) -> (f64, f64) {
        let idx = self.control_indices(segment);
        let mut x = 0.0;
        let mut y = 0.0;
        for (i, w) in idx.iter().zip(weights) {
            x += self.points[*i].x * w;
            y += self.points[*i].y * w;
        }
        (0.5 * x, 0.5 * y)
    }

    fn eval_point(&self, segment: usize, f: f64) -> Point2 {
        let ff = f * f;
        let fff = ff * f;
        let q1 = -fff + 2.0 * ff - f;
        let q2 = 3.0 * fff - 5.0 * ff + 2.0;
        let q3 = -3.0 * fff + 4.0 * ff + f;
        let q4 = fff - ff;
        let (x, y) = self.blend(segment, [q1, q2, q3, q4]);
        Point2::new(x, y)
    }

    fn eval_gradient(&self, segment: usize, f: f64) -> Vector2 {
        let ff = f * f;
        let q1 = -3.0 * ff + 4.0 * f - 1.0;
        let q2 = 9.0 * ff - 10.0 * f;
        let q3 = -9.0 * ff + 8.0 * f + 1.0;
        let q4 = 3.0 * ff - 2.0 * f;
        let (x, y) = self.blend(segment, [q1, q2, q3, q4]);
        Vector2::new(x, y)
    }

    /// Piecewise-linear arc length of one segment, sampled in local
    /// coordinates over the closed interval `[0, 1]`.
    fn measure_segment(&self, segment: usize) -> f64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ((1.0 / self.length_step).round() as usize).max(1);
        let mut prev = self.eval_point(segment, 0.0);
        let mut length = 0.0;
        for j in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let f = j as f64 / steps as f64;
            let next = self.eval_point(segment, f);
            length += (next - prev).norm();
            prev = next;
        }
        length
    }
}

impl Curve for SplineCurve {
    fn evaluate(&self, t: f64) -> Result<Point2> {
        self.point_at(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        self.gradient_at(t)
    }

    fn domain(&self) -> CurveDomain {
        #[allow(clippy::cast_precision_loss)]
        let t_max = self.segment_count() as f64;
        CurveDomain::new(0.0, t_max)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
