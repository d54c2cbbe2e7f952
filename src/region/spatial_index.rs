use std::fmt;

use nalgebra::DefaultAllocator;
use nlfem_geometry::AxisAlignedBoundingBox;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::allocators::DimAllocator;
use crate::{Real, SmallDim};

// Boxes are stored in three dimensions regardless of D. Unused axes are zero.
type IndexedBox = GeomWithData<Rectangle<[f64; 3]>, usize>;

/// R-tree over target bounding boxes.
#[derive(Clone)]
pub(crate) struct TargetIndex {
    tree: RTree<IndexedBox>,
}

impl fmt::Debug for TargetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetIndex").field("size", &self.tree.size()).finish()
    }
}

impl Default for TargetIndex {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl TargetIndex {
    pub fn bulk_load<'a, T, D>(boxes: impl IntoIterator<Item = &'a AxisAlignedBoundingBox<T, D>>) -> Self
    where
        T: Real,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let geometries = boxes
            .into_iter()
            .enumerate()
            .map(|(i, bounding_box)| GeomWithData::new(rectangle(bounding_box), i))
            .collect();
        Self {
            tree: RTree::bulk_load(geometries),
        }
    }

    pub fn insert<T, D>(&mut self, bounding_box: &AxisAlignedBoundingBox<T, D>, index: usize)
    where
        T: Real,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        self.tree.insert(GeomWithData::new(rectangle(bounding_box), index));
    }

    /// Pushes the indices of all stored boxes that may intersect `bounding_box`.
    ///
    /// Stored and queried boxes are padded outward, so the result is a superset of the exact
    /// intersections. The order is unspecified.
    pub fn query<T, D>(&self, bounding_box: &AxisAlignedBoundingBox<T, D>, out: &mut Vec<usize>)
    where
        T: Real,
        D: SmallDim,
        DefaultAllocator: DimAllocator<T, D>,
    {
        let (min, max) = corners(bounding_box);
        let envelope = AABB::from_corners(min, max);
        out.extend(
            self.tree
                .locate_in_envelope_intersecting(&envelope)
                .map(|geom| geom.data),
        );
    }
}

fn rectangle<T, D>(bounding_box: &AxisAlignedBoundingBox<T, D>) -> Rectangle<[f64; 3]>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let (min, max) = corners(bounding_box);
    Rectangle::from_corners(min, max)
}

fn corners<T, D>(bounding_box: &AxisAlignedBoundingBox<T, D>) -> ([f64; 3], [f64; 3])
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let mut min = [0.0; 3];
    let mut max = [0.0; 3];
    for i in 0..D::dim() {
        let lo: f64 = bounding_box.min()[i].to_subset().unwrap_or(f64::MIN);
        let hi: f64 = bounding_box.max()[i].to_subset().unwrap_or(f64::MAX);
        // Absorbs rounding when T is converted to f64
        let pad = 1e-12 * (1.0 + lo.abs().max(hi.abs()));
        min[i] = lo - pad;
        max[i] = hi + pad;
    }
    (min, max)
}
