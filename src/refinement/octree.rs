use nalgebra::{DefaultAllocator, OPoint};

use crate::allocators::DimAllocator;
use crate::element::{FiniteElement, RefinableElement};
use crate::quadrature::{BasisTable, QuadraturePair};
use crate::refinement::Prolongation;
use crate::{Real, SmallDim};

#[derive(Debug, Clone)]
struct OctreeNode<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    reference_vertices: Vec<OPoint<T, D>>,
    coarse_basis: BasisTable<T>,
    first_child: Option<usize>,
}

/// Tables belonging to one node of the reference octree.
#[derive(Debug, Clone, Copy)]
pub struct OctreeTables<'a, T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub reference_vertices: &'a [OPoint<T, D>],
    pub quadrature: &'a QuadraturePair<T, D>,
    pub coarse_basis: &'a BasisTable<T>,
    pub fine_basis: &'a BasisTable<T>,
}

/// Refinement tree of the reference element, built lazily as nodes are visited.
///
/// Every node stores the values of the root basis at its quadrature points. Because the tree
/// lives entirely in the reference domain it is shared by all source elements of the same type.
#[derive(Debug, Clone)]
pub struct OctreeElement<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    prolongation: Prolongation<T>,
    quadrature: QuadraturePair<T, D>,
    reference: E,
    fine_basis: BasisTable<T>,
    nodes: Vec<OctreeNode<T, D>>,
}

impl<T, D, E> OctreeElement<T, D, E>
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(prolongation: Prolongation<T>, quadrature: QuadraturePair<T, D>) -> Self {
        let reference = E::reference();
        let fine_basis = BasisTable::for_element(&reference, &quadrature.1);
        let mut octree = Self {
            prolongation,
            quadrature,
            reference,
            fine_basis,
            nodes: Vec::new(),
        };
        let root = octree.make_node(E::reference_vertices());
        octree.nodes.push(root);
        octree
    }

    fn make_node(&self, reference_vertices: Vec<OPoint<T, D>>) -> OctreeNode<T, D> {
        let node_element = E::from_vertex_slice(&reference_vertices);
        let root_points: Vec<_> = self
            .quadrature
            .1
            .iter()
            .map(|xi| node_element.map_reference_coords(xi))
            .collect();
        OctreeNode {
            coarse_basis: BasisTable::for_element(&self.reference, &root_points),
            reference_vertices,
            first_child: None,
        }
    }

    fn ensure_children(&mut self, node_index: usize) -> usize {
        if let Some(first_child) = self.nodes[node_index].first_child {
            return first_child;
        }
        let first_child = self.nodes.len();
        for child_index in 0..self.prolongation.num_children() {
            let vertices = self
                .prolongation
                .apply(child_index, &self.nodes[node_index].reference_vertices);
            let child = self.make_node(vertices);
            self.nodes.push(child);
        }
        self.nodes[node_index].first_child = Some(first_child);
        first_child
    }

    /// Tables of the node at `level` with flat path index `path`, building it if needed.
    ///
    /// # Panics
    ///
    /// Panics if `path >= num_children^level`.
    pub fn node_tables(&mut self, level: usize, path: usize) -> OctreeTables<'_, T, D> {
        let n = self.prolongation.num_children();
        let mut divisor = 1usize;
        for _ in 1..level {
            divisor *= n;
        }
        let on_level = if level == 0 { path == 0 } else { path < divisor * n };
        assert!(on_level, "path {path} is not on level {level}");

        let mut node_index = 0;
        let mut remainder = path;
        for _ in 0..level {
            let digit = remainder / divisor;
            remainder %= divisor;
            divisor = (divisor / n).max(1);
            node_index = self.ensure_children(node_index) + digit;
        }

        let node = &self.nodes[node_index];
        OctreeTables {
            reference_vertices: &node.reference_vertices,
            quadrature: &self.quadrature,
            coarse_basis: &node.coarse_basis,
            fine_basis: &self.fine_basis,
        }
    }

    /// Number of nodes built so far.
    pub fn num_built_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn quadrature(&self) -> &QuadraturePair<T, D> {
        &self.quadrature
    }

    /// Basis of any sub-element at its own quadrature points.
    pub fn fine_basis(&self) -> &BasisTable<T> {
        &self.fine_basis
    }
}
