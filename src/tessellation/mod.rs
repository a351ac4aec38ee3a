mod sample_curve;
mod tessellate_corridor;

pub use sample_curve::{sample, CurveSamples};
pub use tessellate_corridor::TessellateCorridor;

use crate::math::Point2;

/// Parameters controlling tessellation density.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Parameter step between consecutive stations.
    pub step: f64,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self { step: 0.2 }
    }
}

/// A triangle mesh in the plane.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Iterates the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point2; 3]> + '_ {
        self.indices.iter().map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Sum of the unsigned triangle areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| 0.5 * (b - a).perp(&(c - a)).abs())
            .sum()
    }
}
