//! Quadrature rules for finite element reference domains.
//!
//! Reference domains follow the conventions of the `nlfem` elements:
//!
//! - the segment `[-1, 1]`,
//! - the quadrilateral `[-1, 1]^2` and the hexahedron `[-1, 1]^3`,
//! - the triangle with vertices `(-1, -1)`, `(1, -1)` and `(-1, 1)`.
//!
//! Rules are stored as `(weights, points)` pairs over `f64`.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A rule with zero points was requested.
    ZeroPoints,
    /// Newton iteration for the Gauss abscissae did not converge.
    NotConverged { num_points: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPoints => write!(f, "a quadrature rule needs at least one point"),
            Self::NotConverged { num_points } => {
                write!(f, "Gauss abscissae for {num_points} points did not converge")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// Number of Gauss points per dimension needed to integrate polynomials of the given degree.
pub fn gauss_points_for_strength(strength: usize) -> usize {
    strength / 2 + 1
}

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .map(|(w, x)| w * f(x))
        .sum()
}
