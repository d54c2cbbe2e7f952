use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, Point2, U2};
use nlfem::element::{Quad4d2Element, RefinableElement, Tri3d2Element};
use nlfem::quadrature::{CanonicalQuadrature, QuadraturePair2d};
use nlfem::refinement::{child_path, OctreeElement, Prolongation, RefineElement};
use util::assert_panics;

fn quad_quadrature() -> QuadraturePair2d<f64> {
    Quad4d2Element::gauss_quadrature(2)
}

fn physical_point(basis: &[f64], vertices: &[Point2<f64>]) -> Point2<f64> {
    let coords = basis
        .iter()
        .zip(vertices)
        .fold(nalgebra::Vector2::zeros(), |x, (phi, v)| x + v.coords * *phi);
    Point2::from(coords)
}

#[test]
fn child_path_appends_digit() {
    assert_eq!(child_path(0, 4, 3), 3);
    assert_eq!(child_path(3, 4, 2), 14);
    assert_eq!(child_path(child_path(1, 2, 1), 2, 0), 6);
}

#[test]
fn quad_prolongation_of_first_child() {
    let prolongation = Prolongation::for_element::<Quad4d2Element<f64>, U2>();
    assert_eq!(prolongation.num_children(), 4);

    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(4, 4, &[
        1.0,  0.0,  0.0,  0.0,
        0.5,  0.5,  0.0,  0.0,
        0.25, 0.25, 0.25, 0.25,
        0.5,  0.0,  0.0,  0.5,
    ]);
    assert_matrix_eq!(prolongation.matrix(0), expected, comp = abs, tol = 1e-15);
}

#[test]
fn prolongation_rows_are_partitions_of_unity() {
    let prolongation = Prolongation::for_element::<Tri3d2Element<f64>, U2>();
    for c in 0..prolongation.num_children() {
        for row in prolongation.matrix(c).row_iter() {
            assert_scalar_eq!(row.sum(), 1.0, comp = abs, tol = 1e-15);
        }
    }
}

#[test]
fn prolongation_maps_physical_vertices() {
    let prolongation = Prolongation::for_element::<Quad4d2Element<f64>, U2>();
    let parent = Quad4d2Element::from_corners(Point2::new(0.0, 0.0), Point2::new(2.0, 4.0));
    let child = prolongation.apply(2, parent.vertices());
    assert_eq!(
        child,
        vec![
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(1.0, 4.0)
        ]
    );
}

#[test]
fn build_prolongation_caches_children() {
    let mut refine = RefineElement::<f64, U2, Quad4d2Element<f64>>::new(3, 1.0, quad_quadrature());
    refine.reset(Quad4d2Element::from_corners(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0)));
    assert_eq!(refine.root().vertices()[2], Point2::new(2.0, 2.0));
    assert_eq!(refine.expanded_sibling(0), None);

    refine.build_prolongation(0, 0);
    let first = refine.element(1, 2).clone();
    assert_eq!(
        first.vertices(),
        &[
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0)
        ]
    );

    // Repeated calls for the same node are no-ops
    refine.build_prolongation(0, 0);
    assert_eq!(refine.element(1, 2), &first);
    assert_eq!(refine.expanded_sibling(0), Some(0));

    refine.build_prolongation(1, 2);
    assert_eq!(refine.expanded_sibling(1), Some(2));
    assert_eq!(refine.element(2, 0).vertices()[0], Point2::new(1.0, 1.0));
    assert_eq!(refine.element(2, 0).vertices()[2], Point2::new(1.5, 1.5));

    // Expanding a sibling replaces the deeper level
    refine.build_prolongation(1, 0);
    assert_eq!(refine.expanded_sibling(1), Some(0));
    assert_eq!(refine.element(2, 0).vertices()[0], Point2::new(0.0, 0.0));

    // Resetting forgets everything but the new root
    refine.reset(Quad4d2Element::from_corners(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0)));
    assert_eq!(refine.expanded_sibling(0), None);
    assert_eq!(refine.root().vertices()[0], Point2::new(5.0, 5.0));
}

#[test]
fn build_prolongation_at_leaf_level_panics() {
    assert_panics!({
        let mut refine = RefineElement::<f64, U2, Quad4d2Element<f64>>::new(2, 1.0, quad_quadrature());
        refine.reset(Quad4d2Element::from_corners(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)));
        refine.build_prolongation(0, 0);
        refine.build_prolongation(1, 0);
    });
}

#[test]
fn smoothing_width_halves_per_level() {
    let refine = RefineElement::<f64, U2, Quad4d2Element<f64>>::new(4, 1.0, quad_quadrature());
    assert_eq!(refine.eps0(), 1.0);
    assert_eq!(refine.eps_at(1), 0.5);
    assert_eq!(refine.eps_at(2), 0.25);
    assert_eq!(refine.eps(), 0.125);
    assert_eq!(refine.smooth_step(0.125), 1.0);
    assert_eq!(refine.smooth_step(-0.125), 0.0);
    assert_eq!(refine.smooth_step(0.0), 0.5);
}

#[test]
fn coarse_and_fine_basis_describe_the_same_points() {
    let mut refine = RefineElement::<f64, U2, Quad4d2Element<f64>>::new(3, 1.0, quad_quadrature());
    let root = Quad4d2Element::from_vertices([
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.5),
        Point2::new(2.5, 2.0),
        Point2::new(0.5, 1.5),
    ]);
    refine.reset(root);
    refine.build_prolongation(0, 1);
    refine.build_prolongation(1, 3);

    let root_vertices = root.vertices().to_vec();
    let path = child_path(child_path(0, 4, 1), 4, 3);
    let node = refine.node(2, 3, path);
    let num_points = node.quadrature.0.len();
    assert_eq!(node.coarse_basis.num_points(), num_points);
    for q in 0..num_points {
        let from_fine = physical_point(node.fine_basis.at(q), node.element.vertices());
        let from_coarse = physical_point(node.coarse_basis.at(q), &root_vertices);
        assert!((from_fine - from_coarse).norm() <= 1e-13);
    }
}

#[test]
fn triangle_coarse_basis_matches_interior_child() {
    let mut refine = RefineElement::<f64, U2, Tri3d2Element<f64>>::new(2, 1.0, Tri3d2Element::gauss_quadrature(2));
    let root = Tri3d2Element::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]);
    refine.reset(root);
    refine.build_prolongation(0, 0);
    let node = refine.node(1, 3, 3);
    for q in 0..node.quadrature.0.len() {
        let from_fine = physical_point(node.fine_basis.at(q), node.element.vertices());
        let from_coarse = physical_point(node.coarse_basis.at(q), root.vertices());
        assert!((from_fine - from_coarse).norm() <= 1e-14);
    }
}

#[test]
fn octree_is_built_lazily() {
    let prolongation = Prolongation::for_element::<Quad4d2Element<f64>, U2>();
    let mut octree = OctreeElement::<f64, U2, Quad4d2Element<f64>>::new(prolongation, quad_quadrature());
    assert_eq!(octree.num_built_nodes(), 1);

    let tables = octree.node_tables(2, 5);
    assert_eq!(tables.reference_vertices[0], Point2::new(0.5, -1.0));
    assert_eq!(tables.reference_vertices[2], Point2::new(1.0, -0.5));
    assert_eq!(octree.num_built_nodes(), 9);

    // Revisiting does not build anything new
    octree.node_tables(2, 4);
    octree.node_tables(1, 1);
    assert_eq!(octree.num_built_nodes(), 9);
    octree.node_tables(1, 0);
    assert_eq!(octree.num_built_nodes(), 9);
    octree.node_tables(2, 0);
    assert_eq!(octree.num_built_nodes(), 13);
}

#[test]
fn octree_root_tables_are_reference_basis() {
    let prolongation = Prolongation::for_element::<Quad4d2Element<f64>, U2>();
    let mut octree = OctreeElement::<f64, U2, Quad4d2Element<f64>>::new(prolongation, quad_quadrature());
    let tables = octree.node_tables(0, 0);
    assert_eq!(tables.reference_vertices, Quad4d2Element::<f64>::reference_vertices().as_slice());
    assert_eq!(tables.coarse_basis.num_points(), tables.fine_basis.num_points());
    for q in 0..tables.fine_basis.num_points() {
        for (coarse, fine) in tables.coarse_basis.at(q).iter().zip(tables.fine_basis.at(q)) {
            assert_scalar_eq!(*coarse, *fine, comp = abs, tol = 1e-15);
        }
    }
}

#[test]
fn octree_rejects_path_beyond_level() {
    assert_panics!({
        let prolongation = Prolongation::for_element::<Quad4d2Element<f64>, U2>();
        let mut octree = OctreeElement::<f64, U2, Quad4d2Element<f64>>::new(prolongation, quad_quadrature());
        octree.node_tables(1, 4);
    });
}
