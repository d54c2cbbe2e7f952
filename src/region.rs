//! Target elements with the data needed by the inner loop of nonlocal assembly.
use nalgebra::{DVector, DefaultAllocator, OPoint};
use nlfem_geometry::AxisAlignedBoundingBox;

use crate::allocators::DimAllocator;
use crate::element::{volume_form, FiniteElement, RefinableElement, ReferenceFiniteElement};
use crate::error::RegionError;
use crate::mesh::Mesh;
use crate::quadrature::{BasisTable, QuadraturePair};
use crate::{Real, SmallDim};

mod spatial_index;

use spatial_index::TargetIndex;

#[derive(Debug, Clone)]
struct TargetElement<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    element: E,
    global_dofs: Vec<usize>,
    solution: DVector<T>,
    bounding_box: AxisAlignedBoundingBox<T, D>,
    quadrature_points: Vec<OPoint<T, D>>,
    quadrature_weights: Vec<T>,
}

/// A flat collection of target elements.
///
/// Everything the inner assembly loop touches is extracted once on insertion: physical
/// quadrature points, weights multiplied by `|det J|` and the bounding box. Bounding boxes are
/// kept in an R-tree for candidate queries. All elements share one reference quadrature rule,
/// so a single basis table serves every element.
#[derive(Debug, Clone)]
pub struct Region<T, D, E>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    quadrature: QuadraturePair<T, D>,
    basis: Option<BasisTable<T>>,
    targets: Vec<TargetElement<T, D, E>>,
    index: TargetIndex,
}

impl<T, D, E> Region<T, D, E>
where
    T: Real,
    D: SmallDim,
    E: RefinableElement<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn new(quadrature: QuadraturePair<T, D>) -> Self {
        Self {
            quadrature,
            basis: None,
            targets: Vec::new(),
            index: TargetIndex::default(),
        }
    }

    /// Region holding every element of `mesh`, with one scalar dof per mesh vertex.
    pub fn from_mesh(mesh: &Mesh<T, D, E>, u: &DVector<T>, quadrature: QuadraturePair<T, D>) -> Result<Self, RegionError> {
        if u.len() < mesh.num_vertices() {
            return Err(RegionError::SolutionTooShort {
                expected: mesh.num_vertices(),
                actual: u.len(),
            });
        }

        let mut region = Self::new(quadrature);
        for (element_index, connectivity) in mesh.connectivity().iter().enumerate() {
            if let Some(&vertex_index) = connectivity.iter().find(|&&v| v >= mesh.num_vertices()) {
                return Err(RegionError::VertexOutOfBounds {
                    element_index,
                    vertex_index,
                });
            }
            let vertices: Vec<_> = connectivity
                .iter()
                .map(|&v| mesh.vertices()[v].clone())
                .collect();
            let solution: Vec<_> = connectivity.iter().map(|&v| u[v]).collect();
            region.push_unindexed(E::from_vertex_slice(&vertices), connectivity.clone(), &solution)?;
        }
        region.index = TargetIndex::bulk_load(region.targets.iter().map(|target| &target.bounding_box));
        Ok(region)
    }

    /// Adds a target element and returns its index.
    pub fn push(&mut self, element: E, global_dofs: Vec<usize>, solution: &[T]) -> Result<usize, RegionError> {
        let index = self.push_unindexed(element, global_dofs, solution)?;
        self.index.insert(&self.targets[index].bounding_box, index);
        Ok(index)
    }

    fn push_unindexed(&mut self, element: E, global_dofs: Vec<usize>, solution: &[T]) -> Result<usize, RegionError> {
        let num_nodes = element.num_nodes();
        let index = self.targets.len();
        if global_dofs.len() != num_nodes {
            return Err(RegionError::NodeCountMismatch {
                what: "global dofs",
                expected: num_nodes,
                actual: global_dofs.len(),
            });
        }
        if solution.len() != num_nodes {
            return Err(RegionError::NodeCountMismatch {
                what: "solution values",
                expected: num_nodes,
                actual: solution.len(),
            });
        }
        if !(element.diameter() > T::zero()) {
            return Err(RegionError::DegenerateElement { element_index: index });
        }

        let (weights, points) = &self.quadrature;
        if self.basis.is_none() {
            self.basis = Some(BasisTable::for_element(&element, points));
        }

        let mut quadrature_points = Vec::with_capacity(points.len());
        let mut quadrature_weights = Vec::with_capacity(points.len());
        for (w, xi) in weights.iter().zip(points) {
            quadrature_points.push(element.map_reference_coords(xi));
            quadrature_weights.push(*w * volume_form(&element.reference_jacobian(xi)));
        }

        let bounding_box = AxisAlignedBoundingBox::from_points(element.vertices())
            .ok_or(RegionError::DegenerateElement { element_index: index })?;

        self.targets.push(TargetElement {
            element,
            global_dofs,
            solution: DVector::from_column_slice(solution),
            bounding_box,
            quadrature_points,
            quadrature_weights,
        });
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of degrees of freedom of target `j`.
    pub fn dof_count(&self, j: usize) -> usize {
        self.targets[j].global_dofs.len()
    }

    pub fn global_dofs(&self, j: usize) -> &[usize] {
        &self.targets[j].global_dofs
    }

    /// Node coordinates of target `j`.
    pub fn coordinates(&self, j: usize) -> &[OPoint<T, D>] {
        self.targets[j].element.vertices()
    }

    /// Solution coefficients of target `j`.
    pub fn solution(&self, j: usize) -> &DVector<T> {
        &self.targets[j].solution
    }

    pub fn element(&self, j: usize) -> &E {
        &self.targets[j].element
    }

    pub fn bounding_box(&self, j: usize) -> &AxisAlignedBoundingBox<T, D> {
        &self.targets[j].bounding_box
    }

    /// Spatial dimension of target `j`.
    pub fn dimension(&self, _j: usize) -> usize {
        D::dim()
    }

    /// Physical quadrature points of target `j`.
    pub fn quadrature_points(&self, j: usize) -> &[OPoint<T, D>] {
        &self.targets[j].quadrature_points
    }

    /// Quadrature weights of target `j`, scaled by the volume form.
    pub fn quadrature_weights(&self, j: usize) -> &[T] {
        &self.targets[j].quadrature_weights
    }

    /// Basis values at the reference quadrature points, shared by all targets.
    pub fn basis(&self) -> Option<&BasisTable<T>> {
        self.basis.as_ref()
    }

    pub fn quadrature(&self) -> &QuadraturePair<T, D> {
        &self.quadrature
    }

    /// Whether a source point at `point` may interact with target `j`.
    ///
    /// The test compares against the bounding box of `j` grown by `delta + eps`, which contains
    /// every point within the smoothed neighborhood of any point of the element, both for the
    /// ball (Euclidean) and the box (Chebyshev) neighborhoods. It never rejects an
    /// interacting pair.
    pub fn coarse_intersection_test(&self, j: usize, point: &OPoint<T, D>, delta: T, eps: T) -> bool {
        self.targets[j]
            .bounding_box
            .grow_uniformly(delta + eps)
            .closed_contains_point(point)
    }

    /// Targets whose bounding boxes come within `reach` of `bounding_box`, in ascending order.
    pub fn candidates(&self, bounding_box: &AxisAlignedBoundingBox<T, D>, reach: T) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_candidates(bounding_box, reach, &mut out);
        out
    }

    /// Same as [`candidates`](Self::candidates), but reuses the storage of `out`.
    pub fn collect_candidates(&self, bounding_box: &AxisAlignedBoundingBox<T, D>, reach: T, out: &mut Vec<usize>) {
        out.clear();
        let grown = bounding_box.grow_uniformly(reach);
        self.index.query(&grown, out);
        out.retain(|&j| grown.intersects(&self.targets[j].bounding_box));
        out.sort_unstable();
    }
}
