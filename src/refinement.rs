//! Recursive subdivision of a source element.
//!
//! [`RefineElement`] keeps, for every level of the refinement tree, the children of the node
//! most recently expanded on the level above. A depth-first traversal that visits the children
//! of a node consecutively therefore always finds its current node in the cache, and the cache
//! never holds more than `num_children` elements per level.
use nalgebra::{DMatrix, DefaultAllocator, OPoint};
use std::marker::PhantomData;

use crate::allocators::DimAllocator;
use crate::element::RefinableElement;
use crate::quadrature::{BasisTable, QuadraturePair};
use crate::{Real, SmallDim};

mod octree;

pub use octree::*;

/// Per-child prolongation operators of an element type.
///
/// For child `c`, `P_c[(a, b)]` is the value of parent basis function `b` at the reference
/// position of child vertex `a`, so the child coordinates are `X_c = P_c X`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prolongation<T: Real> {
    matrices: Vec<DMatrix<T>>,
}

impl<T: Real> Prolongation<T> {
    pub fn for_element<E, D>() -> Self
    where
        E: RefinableElement<T, D>,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let reference = E::reference();
        let matrices = (0..E::num_children())
            .map(|child_index| {
                let child_vertices = E::child_reference_vertices(child_index);
                let table = BasisTable::for_element(&reference, &child_vertices);
                DMatrix::from_fn(table.num_points(), table.num_nodes(), |a, b| table.at(a)[b])
            })
            .collect();
        Self { matrices }
    }

    pub fn num_children(&self) -> usize {
        self.matrices.len()
    }

    pub fn matrix(&self, child_index: usize) -> &DMatrix<T> {
        &self.matrices[child_index]
    }

    /// Writes the vertices of child `child_index` of the element with the given vertices.
    pub fn apply_into<D>(&self, child_index: usize, parent_vertices: &[OPoint<T, D>], child_vertices: &mut Vec<OPoint<T, D>>)
    where
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let p = &self.matrices[child_index];
        assert_eq!(p.ncols(), parent_vertices.len(), "Parent vertex count must match prolongation");
        child_vertices.clear();
        child_vertices.extend((0..p.nrows()).map(|a| {
            let x = parent_vertices
                .iter()
                .enumerate()
                .fold(OPoint::<T, D>::origin().coords, |x, (b, v)| x + &v.coords * p[(a, b)]);
            OPoint::from(x)
        }));
    }

    pub fn apply<D>(&self, child_index: usize, parent_vertices: &[OPoint<T, D>]) -> Vec<OPoint<T, D>>
    where
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let mut child_vertices = Vec::new();
        self.apply_into(child_index, parent_vertices, &mut child_vertices);
        child_vertices
    }
}

/// Flat index of child `child_index` of the node with flat index `path`.
///
/// Paths encode the sequence of child indices from the root in base `num_children`, most
/// significant digit first.
pub fn child_path(path: usize, num_children: usize, child_index: usize) -> usize {
    path * num_children + child_index
}

/// A node of the refinement tree with the tables needed to integrate over it.
#[derive(Debug)]
pub struct RefinementNode<'a, T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// The physical sub-element.
    pub element: &'a E,
    /// Quadrature rule on the reference domain of the sub-element.
    pub quadrature: &'a QuadraturePair<T, D>,
    /// Root element basis at the sub-element's quadrature points.
    pub coarse_basis: &'a BasisTable<T>,
    /// Sub-element basis at its own quadrature points.
    pub fine_basis: &'a BasisTable<T>,
}

/// Refinement state of one source element.
#[derive(Debug, Clone)]
pub struct RefineElement<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    level_max: usize,
    eps0: T,
    prolongation: Prolongation<T>,
    octree: OctreeElement<T, D, E>,
    // levels[l] holds the children of the node expanded at level l - 1
    levels: Vec<Vec<E>>,
    // expanded[l] is the sibling at level l whose children are in levels[l + 1]
    expanded: Vec<Option<usize>>,
    vertex_buffer: Vec<OPoint<T, D>>,
    marker: PhantomData<D>,
}

impl<T, D, E> RefineElement<T, D, E>
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Creates an empty refinement state. Call [`reset`](Self::reset) before use.
    ///
    /// # Panics
    ///
    /// Panics if `level_max` is zero.
    pub fn new(level_max: usize, eps0: T, quadrature: QuadraturePair<T, D>) -> Self {
        assert!(level_max > 0, "level_max must be positive");
        let prolongation = Prolongation::for_element::<E, D>();
        Self {
            level_max,
            eps0,
            octree: OctreeElement::new(prolongation.clone(), quadrature),
            prolongation,
            levels: vec![Vec::new(); level_max],
            expanded: vec![None; level_max],
            vertex_buffer: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Starts the refinement of a new source element, discarding all cached coordinates.
    ///
    /// The reference-domain octree is independent of the element and is kept.
    pub fn reset(&mut self, root: E) {
        for level in &mut self.levels {
            level.clear();
        }
        self.levels[0].push(root);
        self.expanded.iter_mut().for_each(|e| *e = None);
    }

    pub fn level_max(&self) -> usize {
        self.level_max
    }

    pub fn num_children(&self) -> usize {
        self.prolongation.num_children()
    }

    pub fn prolongation(&self) -> &Prolongation<T> {
        &self.prolongation
    }

    pub fn octree(&self) -> &OctreeElement<T, D, E> {
        &self.octree
    }

    pub fn root(&self) -> &E {
        self.element(0, 0)
    }

    /// The cached sub-element at `level` with index `sibling` among its siblings.
    ///
    /// # Panics
    ///
    /// Panics if the node is not in the cache.
    pub fn element(&self, level: usize, sibling: usize) -> &E {
        &self.levels[level][sibling]
    }

    /// The sibling index on `level` whose children are currently cached on `level + 1`.
    pub fn expanded_sibling(&self, level: usize) -> Option<usize> {
        self.expanded[level]
    }

    /// Computes and caches the children of node `(level, sibling)` on `level + 1`.
    ///
    /// Repeated calls for the node that is already expanded leave the cache untouched.
    /// Expanding a different node invalidates all deeper levels.
    ///
    /// # Panics
    ///
    /// Panics if `level + 1 >= level_max` or if the node is not cached.
    pub fn build_prolongation(&mut self, level: usize, sibling: usize) {
        assert!(
            level + 1 < self.level_max,
            "cannot refine level {level} with level_max = {}",
            self.level_max
        );
        if self.expanded[level] == Some(sibling) {
            return;
        }

        let mut children = std::mem::take(&mut self.levels[level + 1]);
        children.clear();
        let parent = &self.levels[level][sibling];
        for child_index in 0..self.prolongation.num_children() {
            self.prolongation
                .apply_into(child_index, parent.vertices(), &mut self.vertex_buffer);
            children.push(E::from_vertex_slice(&self.vertex_buffer));
        }
        self.levels[level + 1] = children;

        self.expanded[level] = Some(sibling);
        for expanded in &mut self.expanded[level + 1..] {
            *expanded = None;
        }
    }

    /// Sub-element `(level, sibling)` with the octree tables of the reference node `path`.
    pub fn node(&mut self, level: usize, sibling: usize, path: usize) -> RefinementNode<'_, T, D, E> {
        let tables = self.octree.node_tables(level, path);
        RefinementNode {
            element: &self.levels[level][sibling],
            quadrature: tables.quadrature,
            coarse_basis: tables.coarse_basis,
            fine_basis: tables.fine_basis,
        }
    }

    /// Smoothing width at the root level.
    pub fn eps0(&self) -> T {
        self.eps0
    }

    /// Smoothing width at the given level, `eps0 / 2^level`.
    pub fn eps_at(&self, level: usize) -> T {
        let two = T::one() + T::one();
        (0..level).fold(self.eps0, |eps, _| eps / two)
    }

    /// Smoothing width of the leaf level, used for the mollified truncation.
    pub fn eps(&self) -> T {
        self.eps_at(self.level_max - 1)
    }

    /// Mollified Heaviside of the signed distance `d` at the leaf smoothing width.
    pub fn smooth_step(&self, d: T) -> T {
        crate::interaction::smooth_step(d, self.eps())
    }
}
