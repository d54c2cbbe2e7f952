//! Lagrange elements with the subdivision data needed by adaptive nonlocal quadrature.
use itertools::Itertools;
use nalgebra::{DefaultAllocator, OMatrix, OPoint, Scalar};
use numeric_literals::replace_float_literals;

use crate::allocators::{BiDimAllocator, DimAllocator};
use crate::{Real, SmallDim};

mod hexahedron;
mod quadrilateral;
mod segment;
mod triangle;

pub use hexahedron::*;
pub use quadrilateral::*;
pub use segment::*;
pub use triangle::*;

pub trait ReferenceFiniteElement<T>
where
    T: Scalar,
    DefaultAllocator: DimAllocator<T, Self::ReferenceDim>,
{
    type ReferenceDim: SmallDim;

    /// Returns the number of nodes in the element.
    fn num_nodes(&self) -> usize;

    /// Evaluates each basis function at the given reference coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `basis_values` does not have exactly one entry per node.
    fn populate_basis(&self, basis_values: &mut [T], reference_coords: &OPoint<T, Self::ReferenceDim>);
}

pub trait FiniteElement<T>: ReferenceFiniteElement<T>
where
    T: Scalar,
    DefaultAllocator: BiDimAllocator<T, Self::GeometryDim, Self::ReferenceDim>,
{
    type GeometryDim: SmallDim;

    /// Compute the Jacobian of the transformation from the reference element to the given
    /// element at the given reference coordinates.
    fn reference_jacobian(
        &self,
        reference_coords: &OPoint<T, Self::ReferenceDim>,
    ) -> OMatrix<T, Self::GeometryDim, Self::ReferenceDim>;

    /// Maps reference coordinates to physical coordinates in the element.
    fn map_reference_coords(&self, reference_coords: &OPoint<T, Self::ReferenceDim>) -> OPoint<T, Self::GeometryDim>;

    /// The diameter of the finite element, i.e. the largest distance between two of its points.
    fn diameter(&self) -> T;
}

/// An element that can be subdivided into geometrically similar children.
///
/// Children are described by their vertices in the reference coordinates of the parent, so
/// that a whole refinement tree can be expressed in the reference domain and mapped to any
/// physical element afterwards.
pub trait RefinableElement<T, D>: FiniteElement<T, GeometryDim = D, ReferenceDim = D> + Clone
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn vertices(&self) -> &[OPoint<T, D>];

    /// Constructs an element from its vertices, given in the element's node order.
    ///
    /// # Panics
    ///
    /// Panics if the number of vertices does not match the number of nodes.
    fn from_vertex_slice(vertices: &[OPoint<T, D>]) -> Self;

    /// Vertices of the reference element.
    fn reference_vertices() -> Vec<OPoint<T, D>>;

    /// Number of children produced by a single subdivision.
    fn num_children() -> usize;

    /// Vertices of child `child_index` in the reference coordinates of its parent.
    fn child_reference_vertices(child_index: usize) -> Vec<OPoint<T, D>>;

    /// The reference element itself.
    fn reference() -> Self {
        Self::from_vertex_slice(&Self::reference_vertices())
    }

    fn centroid(&self) -> OPoint<T, D> {
        let vertices = self.vertices();
        let sum = vertices
            .iter()
            .fold(OPoint::<T, D>::origin().coords, |acc, v| acc + &v.coords);
        let n = T::from_usize(vertices.len()).expect("Vertex count must fit in T");
        OPoint::from(sum / n)
    }
}

/// Computes `|det J|`, the factor relating reference and physical volume elements.
pub fn volume_form<T, D>(jacobian: &OMatrix<T, D, D>) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    jacobian.determinant().abs()
}

pub(crate) fn max_vertex_distance<T, D>(vertices: &[OPoint<T, D>]) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    vertices
        .iter()
        .tuple_combinations()
        .map(|(x, y)| (x - y).norm())
        .fold(T::zero(), |a, b| a.max(b))
}

/// The image of the reference vertices under the homothety with ratio 1/2 centered at
/// reference vertex `child_index`.
///
/// For segments, quadrilaterals and hexahedra this yields every child of a uniform bisection,
/// and for triangles it yields the three corner children of a regular refinement. The child
/// keeps the orientation and node order of its parent.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn corner_child_vertices<T, D>(reference_vertices: &[OPoint<T, D>], child_index: usize) -> Vec<OPoint<T, D>>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let corner = &reference_vertices[child_index];
    reference_vertices
        .iter()
        .map(|v| OPoint::from((&corner.coords + &v.coords) * 0.5))
        .collect()
}
