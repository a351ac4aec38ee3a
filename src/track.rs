use crate::error::Result;
use crate::geometry::curve::SplineCurve;
use crate::math::Point2;

/// Control points of the built-in 20-node circuit.
pub const DEFAULT_CIRCUIT: [(f64, f64); 20] = [
    (81.8, 195.0),
    (108.0, 210.0),
    (152.0, 216.0),
    (182.0, 185.6),
    (190.0, 159.0),
    (198.0, 122.0),
    (226.0, 93.0),
    (224.0, 41.0),
    (204.0, 15.0),
    (158.0, 24.0),
    (146.0, 52.0),
    (157.0, 93.0),
    (124.0, 129.0),
    (83.0, 104.0),
    (77.0, 62.0),
    (40.0, 57.0),
    (21.0, 83.0),
    (33.0, 145.0),
    (30.0, 198.0),
    (48.0, 210.0),
];

/// Builds the built-in circuit as a closed spline. Lengths are stale.
///
/// # Errors
///
/// Does not fail for the built-in data; the `Result` comes from
/// [`SplineCurve::new`].
pub fn default_circuit() -> Result<SplineCurve> {
    let points: Vec<Point2> = DEFAULT_CIRCUIT
        .iter()
        .map(|&(x, y)| Point2::new(x, y))
        .collect();
    SplineCurve::new(&points, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_circuit_is_closed_with_twenty_nodes() {
        let mut track = default_circuit().unwrap();
        assert_eq!(track.len(), 20);
        assert!(!track.lengths_valid());
        track.recompute();
        assert!(track.total_length() > 0.0);
        for i in 0..track.len() {
            assert!(track.node_tangent(i).is_ok());
        }
    }
}
