use crate::error::{Result, TessellationError};
use crate::geometry::curve::Curve;
use crate::math::Point2;

/// Lazy, restartable sequence of points sampled along a curve.
///
/// Yields `curve.evaluate(start + k * step)` for every `k` with
/// `start + k * step < end`. A clone resumes from the same position, so
/// clone before iterating (or call [`sample`] again) to replay it.
#[derive(Debug)]
pub struct CurveSamples<'a, C: Curve> {
    curve: &'a C,
    start: f64,
    step: f64,
    index: usize,
    count: usize,
}

impl<C: Curve> Clone for CurveSamples<'_, C> {
    fn clone(&self) -> Self {
        Self {
            curve: self.curve,
            start: self.start,
            step: self.step,
            index: self.index,
            count: self.count,
        }
    }
}

impl<C: Curve> Iterator for CurveSamples<'_, C> {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        if self.index >= self.count {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let t = self.start + self.index as f64 * self.step;
        self.index += 1;
        // The range was validated against the domain up front.
        self.curve.evaluate(t).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl<C: Curve> ExactSizeIterator for CurveSamples<'_, C> {}

/// Samples `curve` over `[start, end)` every `step` parameter units.
///
/// An empty range (`end <= start`) yields no points.
///
/// # Errors
///
/// - `TessellationError::InvalidParameters` if `step` is not positive and
///   finite, or a bound is not finite
/// - `TessellationError::InvalidParameters` if an open curve's domain does
///   not contain the range
#[allow(clippy::cast_precision_loss)]
pub fn sample<C: Curve>(curve: &C, start: f64, end: f64, step: f64) -> Result<CurveSamples<'_, C>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(TessellationError::InvalidParameters(format!(
            "sample step must be positive, got {step}"
        ))
        .into());
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(TessellationError::InvalidParameters(
            "sample range must be finite".to_owned(),
        )
        .into());
    }

    let mut count = 0;
    if end > start {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let estimate = ((end - start) / step).ceil() as usize;
        count = estimate;
        // Rounding in the division can admit one sample at or past `end`.
        while count > 0 && start + (count - 1) as f64 * step >= end {
            count -= 1;
        }
    }

    if count > 0 && !curve.is_closed() {
        let domain = curve.domain();
        if !domain.contains(start) || !domain.contains(end) {
            return Err(TessellationError::InvalidParameters(format!(
                "sample range [{start}, {end}) leaves curve domain [{}, {}]",
                domain.t_min, domain.t_max
            ))
            .into());
        }
    }

    Ok(CurveSamples {
        curve,
        start,
        step,
        index: 0,
        count,
    })
}
