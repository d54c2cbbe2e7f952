use matrixcompare::assert_matrix_eq;
use nalgebra::{point, vector, U2};
use nlfem_geometry::proptest::{aabb2, point2};
use nlfem_geometry::AxisAlignedBoundingBox;
use proptest::prelude::*;
use util::assert_panics;

type Aabb = AxisAlignedBoundingBox<f64, U2>;

#[test]
fn aabb_intersects_2d() {
    let aabb1 = Aabb::new(vector![1.0, 1.0], vector![4.0, 3.0]);

    macro_rules! assert_no_intersection {
        ($aabb2:expr) => {
            assert!(!aabb1.intersects(&$aabb2));
            assert!(!$aabb2.intersects(&aabb1));
        };
    }

    macro_rules! assert_intersection {
        ($aabb2:expr) => {
            assert!(aabb1.intersects(&$aabb2));
            assert!($aabb2.intersects(&aabb1));
        };
    }

    assert_no_intersection!(Aabb::new(vector![6.0, 4.0], vector![9.0, 6.0]));
    assert_no_intersection!(Aabb::new(vector![5.0, 1.5], vector![8.0, 2.5]));
    assert_no_intersection!(Aabb::new(vector![1.5, -1.0], vector![3.5, 0.5]));
    assert_no_intersection!(Aabb::new(vector![-3.0, 3.5], vector![0.0, 4.5]));

    assert_intersection!(Aabb::new(vector![1.5, 1.5], vector![3.5, 2.5]));
    assert_intersection!(Aabb::new(vector![0.0, 0.0], vector![5.0, 4.0]));
    // Touching boxes share their boundary
    assert_intersection!(Aabb::new(vector![4.0, 3.0], vector![5.0, 4.0]));
}

#[test]
fn aabb_from_points_encloses_all_points() {
    let points = [point![1.0, -2.0], point![-3.0, 0.5], point![0.0, 4.0]];
    let aabb = Aabb::from_points(&points).unwrap();
    assert_eq!(aabb.min(), &vector![-3.0, -2.0]);
    assert_eq!(aabb.max(), &vector![1.0, 4.0]);
    assert_matrix_eq!(aabb.extents(), vector![4.0, 6.0]);
    assert_eq!(aabb.center(), point![-1.0, 1.0]);

    assert!(Aabb::from_points(&[]).is_none());
}

#[test]
fn closed_containment_includes_boundary() {
    let aabb = Aabb::new(vector![0.0, 0.0], vector![1.0, 2.0]);
    assert!(aabb.closed_contains_point(&point![0.0, 0.0]));
    assert!(aabb.closed_contains_point(&point![1.0, 2.0]));
    assert!(aabb.closed_contains_point(&point![0.5, 1.0]));
    assert!(!aabb.closed_contains_point(&point![1.0 + 1e-12, 1.0]));
    assert!(!aabb.closed_contains_point(&point![0.5, -1e-12]));
}

#[test]
fn inverted_bounds_are_rejected() {
    assert_panics!(Aabb::new(vector![1.0, 0.0], vector![0.0, 1.0]));
}

proptest! {
    #[test]
    fn grown_box_contains_every_point_within_chebyshev_distance(
        aabb in aabb2(),
        point in point2(),
        distance in 0.0..10.0f64
    ) {
        let clamped = point.coords.zip_zip_map(aabb.min(), aabb.max(), |p, lo, hi| p.max(lo).min(hi));
        let chebyshev = (point.coords - clamped).amax();
        let grown = aabb.grow_uniformly(distance);
        prop_assert_eq!(grown.closed_contains_point(&point), chebyshev <= distance);
    }

    #[test]
    fn intersection_is_symmetric(a in aabb2(), b in aabb2()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }
}
