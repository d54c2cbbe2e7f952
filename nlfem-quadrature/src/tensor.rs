//! Rules for the segment, quadrilateral and hexahedron formed as tensor products of Gauss rules.

use crate::univariate::gauss;
use crate::{Point, Rule};

/// Tensor product of the `n`-point Gauss rule with itself `D` times.
///
/// The last coordinate varies fastest.
pub fn tensor_gauss<const D: usize>(num_points_per_dim: usize) -> Rule<D> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let n = weights1d.len();
    let total = n.pow(D as u32);

    let mut weights = Vec::with_capacity(total);
    let mut points = Vec::with_capacity(total);
    let mut multi_index = [0usize; D];
    for _ in 0..total {
        let mut point: Point<D> = [0.0; D];
        let mut weight = 1.0;
        for (coord, &k) in point.iter_mut().zip(&multi_index) {
            *coord = points1d[k][0];
            weight *= weights1d[k];
        }
        weights.push(weight);
        points.push(point);

        for k in multi_index.iter_mut().rev() {
            *k += 1;
            if *k < n {
                break;
            }
            *k = 0;
        }
    }

    (weights, points)
}

/// Gauss rule for the reference segment `[-1, 1]`.
pub fn segment_gauss(num_points: usize) -> Rule<1> {
    tensor_gauss(num_points)
}

/// Gauss rule for the reference quadrilateral.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    tensor_gauss(num_points_per_dim)
}

/// Gauss rule for the reference hexahedron.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Rule<3> {
    tensor_gauss(num_points_per_dim)
}
