use thiserror::Error;

/// Top-level error type for the racing line crate.
#[derive(Debug, Error)]
pub enum RacingLineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to curve evaluation and measurement.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("spline needs at least {required} control points, got {actual}")]
    TooFewPoints { required: usize, actual: usize },

    #[error("control point index {index} is out of bounds for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("segment lengths are stale; call recompute() after editing points")]
    StaleLengths,
}

/// Errors related to solver and offset operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to sampling and meshing.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`RacingLineError`].
pub type Result<T> = std::result::Result<T, RacingLineError>;
