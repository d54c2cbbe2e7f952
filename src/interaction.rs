//! Interaction kernels: neighborhood shape, normalization and the mollified truncation.
//!
//! A kernel couples a source point `x` to every target point `y` for which the interface
//! distance `d(x, y)` of the neighborhood centered at `x` is positive. The truncation is
//! smoothed over the band `|d| < eps` by [`smooth_step`], and the normalization constants below
//! account for the smoothing exactly: in two dimensions the second moment
//! `K * int U(d) * gamma(|y - x|) * |y - x|^2 dy` equals `2 kappa` for the ball kernels.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint};
use nlfem_geometry::{Hyperball, Hypercube, InterfaceDistance};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

use crate::Real;

/// The closed set of supported kernels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKernel {
    /// Euclidean ball of radius `delta`, constant radial weight.
    Ball,
    /// Axis-aligned cube of half-width `delta`, constant radial weight.
    Box,
    /// Euclidean ball of radius `delta` with radial weight `1 / r`.
    BallOrderTwo,
}

impl Default for InteractionKernel {
    fn default() -> Self {
        Self::Ball
    }
}

impl InteractionKernel {
    /// Signed distance from `point` to the boundary of the neighborhood of size `size` centered
    /// at `center`, positive inside.
    pub fn interface_distance<T, D>(&self, center: &OPoint<T, D>, point: &OPoint<T, D>, size: T) -> T
    where
        T: Real,
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
    {
        match self {
            Self::Ball | Self::BallOrderTwo => {
                Hyperball::from_center_and_radius(center.clone(), size).interface_distance(point)
            }
            Self::Box => Hypercube::from_center_and_half_width(center.clone(), size).interface_distance(point),
        }
    }

    /// Normalizing constant for intensity `kappa`, range `delta` and smoothing width `eps`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn kernel<T: Real>(&self, kappa: T, delta: T, eps: T) -> T {
        let ratio = eps / delta;
        let ratio2 = ratio * ratio;
        match self {
            Self::Ball => {
                4.0 * kappa / (T::pi() * delta.powi(4)) / (1.0 + 6.0 / 11.0 * ratio2 + 3.0 / 143.0 * ratio2 * ratio2)
            }
            Self::BallOrderTwo => 3.0 * kappa / (T::pi() * delta.powi(3)) / (1.0 + 3.0 / 11.0 * ratio2),
            Self::Box => 0.75 * kappa / delta.powi(4),
        }
    }

    /// Measure associated with the smoothed neighborhood.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn area<T: Real>(&self, delta: T, eps: T) -> T {
        match self {
            Self::Ball => T::pi() * (delta * delta + eps * eps / 11.0),
            Self::BallOrderTwo => 2.0 * T::pi() * delta,
            Self::Box => delta * delta,
        }
    }

    /// Radial weight at separation `r`, or `None` where it is singular.
    pub fn singular_weight<T: Real>(&self, r: T) -> Option<T> {
        match self {
            Self::Ball | Self::Box => Some(T::one()),
            Self::BallOrderTwo if r > T::zero() => Some(T::one() / r),
            Self::BallOrderTwo => None,
        }
    }
}

/// Mollified Heaviside of the signed distance `d` over the band `[-eps, eps]`.
///
/// This is the degree-9 polynomial with four vanishing derivatives at both ends of the band,
/// so the integrand stays `C^4` across the neighborhood boundary. It is `0` for `d <= -eps`,
/// `1` for `d >= eps` and `1/2` at `d = 0`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn smooth_step<T: Real>(d: T, eps: T) -> T {
    if d <= -eps {
        0.0
    } else if d >= eps {
        1.0
    } else {
        // s in (0, 1); evaluate on the lower half and reflect for accuracy near both ends
        let s = 0.5 * (d / eps + 1.0);
        let lower = |s: T| {
            let s2 = s * s;
            s2 * s2 * s * (126.0 + s * (-420.0 + s * (540.0 + s * (-315.0 + s * 70.0))))
        };
        if s <= 0.5 {
            lower(s)
        } else {
            1.0 - lower(1.0 - s)
        }
    }
}
