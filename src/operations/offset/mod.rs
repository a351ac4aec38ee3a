mod boundary_offset;

pub use boundary_offset::{BoundaryOffset2D, TrackBoundaries};
