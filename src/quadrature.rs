//! Quadrature rules expressed in the scalar and point types used by the elements.
use nalgebra::allocator::Allocator;
use nalgebra::{convert, Const, DefaultAllocator, DimName, OPoint, Scalar, U1, U2, U3};
use std::ops::{AddAssign, Mul};

use crate::allocators::DimAllocator;
use crate::element::{Hex8Element, Quad4d2Element, ReferenceFiniteElement, Segment2d1Element, Tri3d2Element};
use crate::{Real, SmallDim};

pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);
pub type QuadraturePair1d<T> = QuadraturePair<T, U1>;
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;
pub type QuadraturePair3d<T> = QuadraturePair<T, U3>;

/// A quadrature rule consisting of weights and points.
pub trait Quadrature<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T];
    fn points(&self) -> &[OPoint<T, D>];

    fn num_points(&self) -> usize {
        self.weights().len()
    }

    /// Approximates the integral of the given function using this quadrature rule.
    fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&OPoint<T, D>) -> U,
        U: Default + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::default();
        for (w, p) in self.weights().iter().zip(self.points()) {
            integral += f(p) * w.clone();
        }
        integral
    }
}

impl<T, D> Quadrature<T, D> for QuadraturePair<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        &self.0
    }

    fn points(&self) -> &[OPoint<T, D>] {
        &self.1
    }
}

/// Converts a rule over `f64` into the scalar type `T`.
pub fn convert_rule<T: Real, const D: usize>(rule: nlfem_quadrature::Rule<D>) -> QuadraturePair<T, Const<D>> {
    let (weights, points) = rule;
    let weights = weights.into_iter().map(convert).collect();
    let points = points
        .into_iter()
        .map(|p| OPoint::from(p.map(convert::<f64, T>)))
        .collect();
    (weights, points)
}

/// Gauss-type rules on the reference domain of an element.
pub trait CanonicalQuadrature<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// A rule using `points_per_dim` Gauss points along each reference direction.
    fn gauss_quadrature(points_per_dim: usize) -> QuadraturePair<T, D>;

    /// A rule that integrates products of two basis functions exactly.
    fn canonical_quadrature() -> QuadraturePair<T, D> {
        Self::gauss_quadrature(2)
    }
}

impl<T: Real> CanonicalQuadrature<T, U1> for Segment2d1Element<T> {
    fn gauss_quadrature(points_per_dim: usize) -> QuadraturePair1d<T> {
        convert_rule(nlfem_quadrature::tensor::segment_gauss(points_per_dim))
    }
}

impl<T: Real> CanonicalQuadrature<T, U2> for Tri3d2Element<T> {
    fn gauss_quadrature(points_per_dim: usize) -> QuadraturePair2d<T> {
        convert_rule(nlfem_quadrature::simplex::triangle_collapsed_gauss(points_per_dim))
    }
}

impl<T: Real> CanonicalQuadrature<T, U2> for Quad4d2Element<T> {
    fn gauss_quadrature(points_per_dim: usize) -> QuadraturePair2d<T> {
        convert_rule(nlfem_quadrature::tensor::quadrilateral_gauss(points_per_dim))
    }
}

impl<T: Real> CanonicalQuadrature<T, U3> for Hex8Element<T> {
    fn gauss_quadrature(points_per_dim: usize) -> QuadraturePair3d<T> {
        convert_rule(nlfem_quadrature::tensor::hexahedron_gauss(points_per_dim))
    }
}

/// Values of every basis function of an element at every point of a quadrature rule.
///
/// Stored point-major, so the values at a single point form a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisTable<T> {
    num_nodes: usize,
    values: Vec<T>,
}

impl<T: Real> BasisTable<T> {
    /// Fills the table by calling `populate(values, point)` for every point.
    pub fn from_fn<D, F>(num_nodes: usize, points: &[OPoint<T, D>], mut populate: F) -> Self
    where
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
        F: FnMut(&mut [T], &OPoint<T, D>),
    {
        let mut values = vec![T::zero(); num_nodes * points.len()];
        if num_nodes > 0 {
            for (row, point) in values.chunks_exact_mut(num_nodes).zip(points) {
                populate(row, point);
            }
        }
        Self { num_nodes, values }
    }

    /// Tabulates the basis of `element` at the given reference points.
    pub fn for_element<E, D>(element: &E, points: &[OPoint<T, D>]) -> Self
    where
        E: ReferenceFiniteElement<T, ReferenceDim = D>,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        Self::from_fn(element.num_nodes(), points, |values, xi| element.populate_basis(values, xi))
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_points(&self) -> usize {
        self.values.len().checked_div(self.num_nodes).unwrap_or(0)
    }

    /// Basis values at quadrature point `index`.
    pub fn at(&self, index: usize) -> &[T] {
        &self.values[index * self.num_nodes..(index + 1) * self.num_nodes]
    }
}
