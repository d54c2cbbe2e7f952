//! Minimal mesh storage: vertices plus per-element vertex indices.
use nalgebra::{DefaultAllocator, OPoint, U1, U2, U3};
use std::marker::PhantomData;

use crate::allocators::DimAllocator;
use crate::element::{Hex8Element, Quad4d2Element, RefinableElement, Segment2d1Element, Tri3d2Element};
use crate::{Real, SmallDim};

pub mod procedural;

/// A mesh of elements of type `E`. The node numbering doubles as the global dof numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    vertices: Vec<OPoint<T, D>>,
    connectivity: Vec<Vec<usize>>,
    marker: PhantomData<E>,
}

pub type SegmentMesh1d<T> = Mesh<T, U1, Segment2d1Element<T>>;
pub type TriangleMesh2d<T> = Mesh<T, U2, Tri3d2Element<T>>;
pub type QuadMesh2d<T> = Mesh<T, U2, Quad4d2Element<T>>;
pub type HexMesh<T> = Mesh<T, U3, Hex8Element<T>>;

impl<T, D, E> Mesh<T, D, E>
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn from_vertices_and_connectivity(vertices: Vec<OPoint<T, D>>, connectivity: Vec<Vec<usize>>) -> Self {
        Self {
            vertices,
            connectivity,
            marker: PhantomData,
        }
    }

    pub fn vertices(&self) -> &[OPoint<T, D>] {
        &self.vertices
    }

    pub fn connectivity(&self) -> &[Vec<usize>] {
        &self.connectivity
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len()
    }

    /// Element `index`, or `None` if the index or any of its vertex indices is out of bounds.
    pub fn element(&self, index: usize) -> Option<E> {
        let vertices = self
            .connectivity
            .get(index)?
            .iter()
            .map(|&v| self.vertices.get(v).cloned())
            .collect::<Option<Vec<_>>>()?;
        Some(E::from_vertex_slice(&vertices))
    }
}
