use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::geometry::curve::{Curve, SplineCurve};
use crate::math::vector_2d::{left_normal, normalize, perp_dot};
use crate::math::{Point2, Vector2};

/// Default fraction of the projected correction applied per pass.
pub const DEFAULT_CORRECTION_GAIN: f64 = 0.3;

/// A relaxed racing line and the lateral displacement that produced it.
#[derive(Debug, Clone)]
pub struct RacingLine {
    /// The racing line spline, lengths recomputed.
    pub curve: SplineCurve,
    /// Signed offset of each node along the reference left normal.
    pub displacement: Vec<f64>,
}

/// Relaxes a racing line inside the corridor around a closed reference path.
///
/// Every node of the racing line lives on the normal line of the matching
/// reference node, at a signed `displacement` along the reference left
/// normal.
///
/// # Algorithm
///
/// Each pass visits every node `i` of the current line:
///
/// 1. Normalize the vectors to the cyclic neighbors `i-1` and `i+1`.
/// 2. Their normalized sum is the bisector, pointing toward the side that
///    straightens the line locally.
/// 3. Project the bisector onto the reference left normal at `i`
///    (`dp = tangent × bisector`) and add `dp * gain` to `displacement[i]`.
///
/// After the sweep every displacement is clamped to `[-half_width,
/// half_width]` and the line nodes are rebuilt from the reference. Nodes
/// with coincident neighbors, a straight bisector, or a vanishing
/// reference tangent are skipped for that pass.
#[derive(Debug)]
pub struct RelaxRacingLine {
    half_width: f64,
    iterations: usize,
    gain: f64,
    initial: Option<Vec<f64>>,
}

impl RelaxRacingLine {
    /// Creates a relaxation running `iterations` passes from zero
    /// displacement.
    #[must_use]
    pub fn new(half_width: f64, iterations: usize) -> Self {
        Self {
            half_width,
            iterations,
            gain: DEFAULT_CORRECTION_GAIN,
            initial: None,
        }
    }

    /// Sets the correction gain.
    #[must_use]
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Starts from a previous displacement instead of zero.
    #[must_use]
    pub fn with_initial_displacement(mut self, displacement: Vec<f64>) -> Self {
        self.initial = Some(displacement);
        self
    }

    /// Executes the relaxation against `reference`.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if `reference` is open, `half_width`
    ///   is negative or not finite, `gain` is not finite, or the initial
    ///   displacement does not match the node count
    pub fn execute(&self, reference: &SplineCurve) -> Result<RacingLine> {
        self.validate(reference)?;

        let n = reference.len();
        let base = reference.positions();
        let normals: Vec<Option<Vector2>> = (0..n)
            .map(|i| reference.node_tangent(i).ok().map(left_normal))
            .collect();

        let mut displacement = match &self.initial {
            Some(initial) => initial
                .iter()
                .map(|d| d.clamp(-self.half_width, self.half_width))
                .collect(),
            None => vec![0.0; n],
        };
        let mut line = displace(&base, &normals, &displacement);

        for pass in 0..self.iterations {
            let mut skipped = 0usize;
            for (i, normal) in normals.iter().enumerate() {
                let Some(normal) = normal else {
                    skipped += 1;
                    continue;
                };
                let Some(bisector) = bisector(&line, i) else {
                    skipped += 1;
                    continue;
                };
                // normal · bisector == tangent × bisector
                let dp = normal.dot(&bisector);
                displacement[i] += dp * self.gain;
            }

            for d in &mut displacement {
                *d = d.clamp(-self.half_width, self.half_width);
            }
            line = displace(&base, &normals, &displacement);
            trace!(pass, skipped, "relaxation pass");
        }

        let mut curve = SplineCurve::new(&line, true)?.with_length_step(reference.length_step())?;
        curve.recompute();

        debug!(
            nodes = n,
            iterations = self.iterations,
            max_displacement = displacement.iter().fold(0.0_f64, |m, d| m.max(d.abs())),
            length = curve.total_length(),
            "racing line relaxed"
        );

        Ok(RacingLine {
            curve,
            displacement,
        })
    }

    fn validate(&self, reference: &SplineCurve) -> Result<()> {
        if !reference.is_closed() {
            return Err(OperationError::InvalidInput(
                "racing line relaxation needs a closed reference path".to_owned(),
            )
            .into());
        }
        if !self.half_width.is_finite() || self.half_width < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "track half-width must be a non-negative number, got {}",
                self.half_width
            ))
            .into());
        }
        if !self.gain.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "correction gain must be finite, got {}",
                self.gain
            ))
            .into());
        }
        if let Some(initial) = &self.initial {
            if initial.len() != reference.len() {
                return Err(OperationError::InvalidInput(format!(
                    "initial displacement has {} entries for {} nodes",
                    initial.len(),
                    reference.len()
                ))
                .into());
            }
            if initial.iter().any(|d| !d.is_finite()) {
                return Err(OperationError::InvalidInput(
                    "initial displacement must be finite".to_owned(),
                )
                .into());
            }
        }
        Ok(())
    }
}

/// Unit bisector of the directions from node `i` to its cyclic neighbors.
///
/// `None` when a neighbor coincides with the node or the neighbors are
/// exactly opposite (the line is already straight there).
fn bisector(line: &[Point2], i: usize) -> Option<Vector2> {
    let n = line.len();
    let mid = line[i];
    let to_prev = normalize(line[(i + n - 1) % n] - mid)?;
    let to_next = normalize(line[(i + 1) % n] - mid)?;
    normalize(to_prev + to_next)
}

/// Rebuilds line nodes as `base[i] + displacement[i] * normal[i]`.
fn displace(base: &[Point2], normals: &[Option<Vector2>], displacement: &[f64]) -> Vec<Point2> {
    base.iter()
        .zip(normals)
        .zip(displacement)
        .map(|((p, normal), d)| match normal {
            Some(normal) => *p + *normal * *d,
            None => *p,
        })
        .collect()
}

/// Signed lateral offset of `point` from the reference node `index`,
/// measured along its left normal.
///
/// # Errors
///
/// Returns an error if `index` is out of range or the node tangent vanishes.
pub fn lateral_offset(reference: &SplineCurve, index: usize, point: Point2) -> Result<f64> {
    let tangent = reference.node_tangent(index)?;
    Ok(perp_dot(tangent, point - reference.position(index)?))
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

    fn circuit() -> SplineCurve {
        let mut path = crate::track::default_circuit().unwrap();
        path.recompute();
        path
    }

    /// Largest `|p[k+1] - 2 p[k] + p[k-1]|` over samples taken every 0.1.
    fn max_second_difference(curve: &SplineCurve) -> f64 {
        let samples: Vec<Point2> = crate::tessellation::sample(curve, 0.0, curve.domain().t_max, 0.1)
            .unwrap()
            .collect();
        let n = samples.len();
        (0..n)
            .map(|k| {
                let prev = samples[(k + n - 1) % n];
                let next = samples[(k + 1) % n];
                (next.coords - 2.0 * samples[k].coords + prev.coords).norm()
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn zero_iterations_returns_reference_nodes() {
        let path = circuit();
        let line = RelaxRacingLine::new(10.0, 0).execute(&path).unwrap();
        assert_eq!(line.curve.positions(), path.positions());
        assert!(line.displacement.iter().all(|d| *d == 0.0));
    }

    #[test]
    fn square_converges_to_smaller_curvature() {
        let path = square_path();
        let before = RelaxRacingLine::new(2.0, 0).execute(&path).unwrap();
        let after = RelaxRacingLine::new(2.0, 5).execute(&path).unwrap();

        assert!(max_second_difference(&after.curve) < max_second_difference(&before.curve));
        for d in &after.displacement {
            assert!(d.abs() <= 2.0);
            // Each pass moves every corner inward by exactly the gain.
            assert_relative_eq!(*d, 1.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn displacement_saturates_at_half_width() {
        let path = square_path();
        let line = RelaxRacingLine::new(2.0, 100).execute(&path).unwrap();
        for d in &line.displacement {
            assert_relative_eq!(*d, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn racing_line_stays_in_corridor() {
        let path = circuit();
        let half_width = 10.0;
        for iterations in [1, 5, 50, 400] {
            let line = RelaxRacingLine::new(half_width, iterations)
                .execute(&path)
                .unwrap();
            for (i, p) in line.curve.positions().iter().enumerate() {
                let reference = path.position(i).unwrap();
                assert!((*p - reference).norm() <= half_width + 1e-9);
                let lateral = lateral_offset(&path, i, *p).unwrap();
                assert_relative_eq!(lateral, line.displacement[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn relaxed_circuit_is_shorter() {
        let path = circuit();
        let line = RelaxRacingLine::new(10.0, 50).execute(&path).unwrap();
        assert!(line.curve.lengths_valid());
        assert!(line.curve.total_length() < path.total_length());
    }

    #[test]
    fn zero_gain_leaves_line_on_reference() {
        let path = circuit();
        let line = RelaxRacingLine::new(10.0, 20)
            .with_gain(0.0)
            .execute(&path)
            .unwrap();
        assert_eq!(line.curve.positions(), path.positions());
    }

    #[test]
    fn warm_start_continues_from_initial_displacement() {
        let path = square_path();
        let line = RelaxRacingLine::new(2.0, 2)
            .with_initial_displacement(vec![1.5; 4])
            .execute(&path)
            .unwrap();
        for d in &line.displacement {
            assert_relative_eq!(*d, 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn initial_displacement_is_clamped() {
        let path = square_path();
        let line = RelaxRacingLine::new(2.0, 0)
            .with_initial_displacement(vec![5.0, -5.0, 0.5, 0.0])
            .execute(&path)
            .unwrap();
        assert_eq!(line.displacement, vec![2.0, -2.0, 0.5, 0.0]);
    }

    #[test]
    fn invalid_inputs_fail() {
        let path = square_path();
        assert!(RelaxRacingLine::new(-1.0, 1).execute(&path).is_err());
        assert!(RelaxRacingLine::new(1.0, 1)
            .with_gain(f64::NAN)
            .execute(&path)
            .is_err());
        assert!(RelaxRacingLine::new(1.0, 1)
            .with_initial_displacement(vec![0.0; 3])
            .execute(&path)
            .is_err());

        let open = SplineCurve::new(&path.positions(), false).unwrap();
        assert!(RelaxRacingLine::new(1.0, 1).execute(&open).is_err());
    }

    #[test]
    fn coincident_nodes_do_not_produce_nan() {
        let mut path = SplineCurve::new(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        )
        .unwrap();
        path.recompute();
        let line = RelaxRacingLine::new(2.0, 10).execute(&path).unwrap();
        assert!(line.displacement.iter().all(|d| d.is_finite()));
        assert!(line
            .curve
            .positions()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
