use crate::InterfaceDistance;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, Scalar};
use nlfem_traits::Real;
use serde::{Deserialize, Serialize};

/// An axis-aligned cube given by its center and half-width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize, OPoint<T, D>: Serialize",
    deserialize = "T: Deserialize<'de>, OPoint<T, D>: Deserialize<'de>"
))]
pub struct Hypercube<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    center: OPoint<T, D>,
    half_width: T,
}

impl<T, D> Hypercube<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    pub fn from_center_and_half_width(center: OPoint<T, D>, half_width: T) -> Self {
        Self { center, half_width }
    }

    pub fn center(&self) -> &OPoint<T, D> {
        &self.center
    }

    pub fn half_width(&self) -> T {
        self.half_width.clone()
    }
}

impl<T, D> InterfaceDistance<T, D> for Hypercube<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// Inside the cube this is the smallest clearance to any of the `2 D` faces. Outside it is
    /// minus the Euclidean norm of the per-axis violations.
    fn interface_distance(&self, point: &OPoint<T, D>) -> T {
        let h = self.half_width;
        let mut clearance = h;
        let mut violation_squared = T::zero();
        let mut outside = false;

        for i in 0..D::dim() {
            let below = point[i] - (self.center[i] - h);
            let above = (self.center[i] + h) - point[i];
            if below < T::zero() {
                violation_squared += below * below;
                outside = true;
            } else if above < T::zero() {
                violation_squared += above * above;
                outside = true;
            }
            clearance = clearance.min(below).min(above);
        }

        if outside {
            -violation_squared.sqrt()
        } else {
            clearance
        }
    }
}
