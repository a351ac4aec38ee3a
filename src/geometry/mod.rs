pub mod curve;

pub use curve::{ControlPoint, Curve, CurveDomain, SplineCurve};
