use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::curve::{Curve, SplineCurve};
use crate::math::Point2;
use crate::operations::offset::{BoundaryOffset2D, TrackBoundaries};
use crate::operations::query::{ArcLengthSample, PointAtArcLength};
use crate::operations::relax::{RelaxRacingLine, DEFAULT_CORRECTION_GAIN};

/// Default distance from the reference path to either track edge.
pub const DEFAULT_HALF_WIDTH: f64 = 10.0;

/// Tuning for [`RacingLineSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    half_width: f64,
    correction_gain: f64,
    iterations: usize,
    warm_start: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            half_width: DEFAULT_HALF_WIDTH,
            correction_gain: DEFAULT_CORRECTION_GAIN,
            iterations: 1,
            warm_start: false,
        }
    }
}

impl SolverParams {
    /// Creates solver parameters.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `half_width` is negative or
    /// not finite, or `correction_gain` is not finite.
    pub fn new(half_width: f64, correction_gain: f64, iterations: usize) -> Result<Self> {
        if !half_width.is_finite() || half_width < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "track half-width must be a non-negative number, got {half_width}"
            ))
            .into());
        }
        if !correction_gain.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "correction gain must be finite, got {correction_gain}"
            ))
            .into());
        }
        Ok(Self {
            half_width,
            correction_gain,
            iterations,
            warm_start: false,
        })
    }

    /// Keeps the displacement between cycles instead of resetting it.
    #[must_use]
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    /// Returns the track half-width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Returns the correction gain.
    #[must_use]
    pub fn correction_gain(&self) -> f64 {
        self.correction_gain
    }

    /// Returns the relaxation passes per cycle.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns whether displacement carries over between cycles.
    #[must_use]
    pub fn warm_start(&self) -> bool {
        self.warm_start
    }
}

/// An edit to the reference path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditCommand {
    /// Moves control point `index` to `(x, y)`.
    SetPointPosition { index: usize, x: f64, y: f64 },
}

/// The curves produced by one evaluation cycle.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub left_boundary: SplineCurve,
    pub right_boundary: SplineCurve,
    pub racing_line: SplineCurve,
}

/// Owns a closed reference path and derives the track boundaries and the
/// racing line from it once per cycle.
///
/// Edits go through [`set_control_point`](Self::set_control_point) and must
/// be followed by [`recompute_reference`](Self::recompute_reference) before
/// the next cycle; [`apply`](Self::apply) does both.
#[derive(Debug)]
pub struct RacingLineSolver {
    reference: SplineCurve,
    displacement: Vec<f64>,
    params: SolverParams,
}

impl RacingLineSolver {
    /// Creates a solver for `reference` and recomputes its lengths.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `reference` is open.
    pub fn new(mut reference: SplineCurve, params: SolverParams) -> Result<Self> {
        if !reference.is_closed() {
            return Err(OperationError::InvalidInput(
                "racing line solver needs a closed reference path".to_owned(),
            )
            .into());
        }
        reference.recompute();
        let displacement = vec![0.0; reference.len()];
        Ok(Self {
            reference,
            displacement,
            params,
        })
    }

    /// Returns the reference path.
    #[must_use]
    pub fn reference(&self) -> &SplineCurve {
        &self.reference
    }

    /// Returns the displacement left by the last cycle.
    #[must_use]
    pub fn displacement(&self) -> &[f64] {
        &self.displacement
    }

    /// Returns the solver parameters.
    #[must_use]
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Sets the relaxation passes used by [`evaluate`](Self::evaluate).
    pub fn set_iterations(&mut self, iterations: usize) {
        self.params.iterations = iterations;
    }

    /// Moves a reference control point. Lengths are stale until
    /// [`recompute_reference`](Self::recompute_reference).
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the position is not
    /// finite.
    pub fn set_control_point(&mut self, index: usize, x: f64, y: f64) -> Result<()> {
        self.reference.set_point(index, Point2::new(x, y))
    }

    /// Recalculates reference segment and total lengths.
    pub fn recompute_reference(&mut self) {
        self.reference.recompute();
    }

    /// Applies an edit and recomputes the reference lengths.
    ///
    /// # Errors
    ///
    /// Same as [`set_control_point`](Self::set_control_point).
    pub fn apply(&mut self, command: EditCommand) -> Result<()> {
        match command {
            EditCommand::SetPointPosition { index, x, y } => {
                self.set_control_point(index, x, y)?;
            }
        }
        self.recompute_reference();
        Ok(())
    }

    /// Runs a cycle with the configured iterations and half-width.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate_cycle`](Self::evaluate_cycle).
    pub fn evaluate(&mut self) -> Result<CycleOutput> {
        self.evaluate_cycle(self.params.iterations, self.params.half_width)
    }

    /// Rebuilds both boundaries and relaxes the racing line with
    /// `iterations` passes.
    ///
    /// Unless warm start is enabled the displacement restarts from zero, so
    /// `iterations` counts passes per cycle, not passes in total.
    ///
    /// # Errors
    ///
    /// - `GeometryError::StaleLengths` if the reference was edited without
    ///   a recompute
    /// - `OperationError::InvalidInput` if `half_width` is negative or not
    ///   finite
    pub fn evaluate_cycle(&mut self, iterations: usize, half_width: f64) -> Result<CycleOutput> {
        if !self.reference.lengths_valid() {
            return Err(GeometryError::StaleLengths.into());
        }

        let TrackBoundaries { left, right } =
            BoundaryOffset2D::new(half_width).execute(&self.reference)?;

        let mut relax =
            RelaxRacingLine::new(half_width, iterations).with_gain(self.params.correction_gain);
        if self.params.warm_start && self.displacement.len() == self.reference.len() {
            relax = relax.with_initial_displacement(self.displacement.clone());
        }
        let line = relax.execute(&self.reference)?;
        self.displacement = line.displacement;

        debug!(
            iterations,
            half_width,
            racing_length = line.curve.total_length(),
            "cycle evaluated"
        );

        Ok(CycleOutput {
            left_boundary: left,
            right_boundary: right,
            racing_line: line.curve,
        })
    }
}

/// Point and unnormalized tangent `distance` along `racing_line`.
///
/// # Errors
///
/// See [`PointAtArcLength::execute`].
pub fn point_and_tangent_at_arc_length(
    racing_line: &SplineCurve,
    distance: f64,
) -> Result<ArcLengthSample> {
    PointAtArcLength::new(distance).execute(racing_line)
}
