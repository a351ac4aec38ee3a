mod nearest_control_point;
mod point_at_arc_length;

pub use nearest_control_point::NearestControlPoint;
pub use point_at_arc_length::{ArcLengthSample, PointAtArcLength};
