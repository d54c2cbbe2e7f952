//! Collapsed Gauss rules for the reference triangle.
//!
//! The square `[-1, 1]^2` is collapsed onto the triangle by the Duffy map
//! `(u, v) -> ((1 + u)(1 - v) / 2 - 1, v)` whose Jacobian determinant is `(1 - v) / 2`.
//! With `n` points per direction the rule integrates polynomials of total degree `2 n - 2`
//! exactly.

use crate::univariate::gauss;
use crate::Rule;

/// Collapsed Gauss rule with `num_points_per_dim^2` points.
pub fn triangle_collapsed_gauss(num_points_per_dim: usize) -> Rule<2> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let mut weights = Vec::with_capacity(weights1d.len() * weights1d.len());
    let mut points = Vec::with_capacity(weights1d.len() * weights1d.len());

    for (&wv, &[v]) in weights1d.iter().zip(&points1d) {
        for (&wu, &[u]) in weights1d.iter().zip(&points1d) {
            let x = 0.5 * (1.0 + u) * (1.0 - v) - 1.0;
            weights.push(wu * wv * 0.5 * (1.0 - v));
            points.push([x, v]);
        }
    }

    (weights, points)
}
