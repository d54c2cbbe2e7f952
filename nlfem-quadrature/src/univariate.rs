//! Gauss-Legendre rules on `[-1, 1]`.

use crate::{Error, Rule};
use std::f64::consts::PI;

const MAX_NEWTON_ITERATIONS: usize = 100;

/// Evaluates `P_n(x)` and its derivative with the three-term recurrence.
///
/// The derivative identity divides by `x^2 - 1`, so `x` must lie in the open interval.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let (mut current, mut previous) = (1.0, 0.0);
    for m in 1..=n {
        let m = m as f64;
        let next = ((2.0 * m - 1.0) * x * current - (m - 1.0) * previous) / m;
        previous = current;
        current = next;
    }
    let derivative = n as f64 * (x * current - previous) / (x * x - 1.0);
    (current, derivative)
}

/// Gauss rule with `num_points` points, exact for polynomials of degree `2 n - 1`.
///
/// Points are returned in ascending order.
pub fn try_gauss(num_points: usize) -> Result<Rule<1>, Error> {
    let n = num_points;
    if n == 0 {
        return Err(Error::ZeroPoints);
    }

    let mut points = vec![[0.0]; n];
    let mut weights = vec![0.0; n];

    // Roots are symmetric about the origin, so only the non-negative half is computed
    for i in 0..(n + 1) / 2 {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut converged = false;
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let (p, dp) = legendre_with_derivative(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() <= 1e-14 {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(Error::NotConverged { num_points: n });
        }

        let (_, dp) = legendre_with_derivative(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points[i] = [-x];
        weights[i] = w;
        points[n - 1 - i] = [x];
        weights[n - 1 - i] = w;
    }

    if n % 2 == 1 {
        points[n / 2] = [0.0];
    }

    Ok((weights, points))
}

/// Gauss rule with `num_points` points.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    try_gauss(num_points).unwrap_or_else(|err| panic!("cannot construct Gauss rule: {err}"))
}
