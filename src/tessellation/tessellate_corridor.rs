use crate::error::{Result, TessellationError};
use crate::geometry::curve::{Curve, SplineCurve};

use super::{TessellationParams, TriangleMesh};

/// Fills the corridor between two boundary splines with a triangle strip.
///
/// Both boundaries are sampled at the same parameters `t_k = k * step`
/// (the last station is clamped to the domain end). Station `k`
/// contributes vertices `2k` (left) and `2k + 1` (right); each gap between
/// stations becomes the triangles `(l_k, r_k, r_k+1)` and
/// `(l_k, l_k+1, r_k+1)`.
#[derive(Debug)]
pub struct TessellateCorridor<'a> {
    left: &'a SplineCurve,
    right: &'a SplineCurve,
    params: TessellationParams,
}

impl<'a> TessellateCorridor<'a> {
    /// Creates a new corridor tessellation.
    #[must_use]
    pub fn new(left: &'a SplineCurve, right: &'a SplineCurve, params: TessellationParams) -> Self {
        Self {
            left,
            right,
            params,
        }
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// - `TessellationError::InvalidParameters` if `step` is not positive
    /// - `TessellationError::InvalidParameters` if the boundaries have
    ///   different domains or closedness
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let step = self.params.step;
        if !(step.is_finite() && step > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "corridor step must be positive, got {step}"
            ))
            .into());
        }
        let domain = self.left.domain();
        if domain != self.right.domain() || self.left.is_closed() != self.right.is_closed() {
            return Err(TessellationError::InvalidParameters(
                "corridor boundaries must share one parameter domain".to_owned(),
            )
            .into());
        }

        let gaps = ((domain.t_max - domain.t_min) / step).ceil().max(1.0) as usize;
        let mut mesh = TriangleMesh {
            vertices: Vec::with_capacity(2 * (gaps + 1)),
            indices: Vec::with_capacity(2 * gaps),
        };

        for k in 0..=gaps {
            let t = (domain.t_min + k as f64 * step).min(domain.t_max);
            mesh.vertices.push(self.left.point_at(t)?);
            mesh.vertices.push(self.right.point_at(t)?);
        }

        for k in 0..gaps as u32 {
            let (l0, r0, l1, r1) = (2 * k, 2 * k + 1, 2 * k + 2, 2 * k + 3);
            mesh.indices.push([l0, r0, r1]);
            mesh.indices.push([l0, l1, r1]);
        }

        Ok(mesh)
    }
}
