pub mod error;
pub mod geometry;
pub mod interaction;
pub mod math;
pub mod operations;
pub mod render;
pub mod solver;
pub mod tessellation;
pub mod track;

pub use error::{RacingLineError, Result};
pub use geometry::curve::{ControlPoint, Curve, SplineCurve};
pub use solver::{
    point_and_tangent_at_arc_length, CycleOutput, EditCommand, RacingLineSolver, SolverParams,
};
