use matrixcompare::assert_scalar_eq;
use nalgebra::{DefaultAllocator, Point1, Point2, Point3};
use nlfem::allocators::DimAllocator;
use nlfem::element::{volume_form, FiniteElement, RefinableElement};
use nlfem::mesh::procedural::{
    create_rectangular_uniform_hex_mesh, create_rectangular_uniform_quad_mesh_2d, create_unit_interval_uniform_mesh_1d,
    create_unit_square_uniform_quad_mesh_2d, create_unit_square_uniform_tri_mesh_2d,
};
use nlfem::mesh::{Mesh, QuadMesh2d};
use nlfem::quadrature::{CanonicalQuadrature, Quadrature};
use nlfem::SmallDim;

fn mesh_volume<D, E>(mesh: &Mesh<f64, D, E>) -> f64
where
    D: SmallDim,
    E: RefinableElement<f64, D> + CanonicalQuadrature<f64, D>,
    DefaultAllocator: DimAllocator<f64, D>,
{
    let quadrature = E::canonical_quadrature();
    (0..mesh.num_elements())
        .map(|i| {
            let element = mesh.element(i).unwrap();
            quadrature.integrate(|xi| volume_form(&element.reference_jacobian(xi)))
        })
        .sum()
}

#[test]
fn unit_interval_mesh() {
    let mesh = create_unit_interval_uniform_mesh_1d::<f64>(4);
    assert_eq!(mesh.num_vertices(), 5);
    assert_eq!(mesh.num_elements(), 4);
    assert_eq!(mesh.vertices()[2], Point1::new(0.5));
    assert_scalar_eq!(mesh_volume(&mesh), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn unit_square_quad_mesh() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(3);
    assert_eq!(mesh.num_vertices(), 16);
    assert_eq!(mesh.num_elements(), 9);
    assert_eq!(mesh.connectivity()[0], vec![0, 1, 5, 4]);
    assert_scalar_eq!(mesh_volume(&mesh), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn quad_mesh_is_counter_clockwise() {
    let mesh = create_rectangular_uniform_quad_mesh_2d::<f64>(&Point2::new(-1.0, 2.0), [2, 1], 0.5);
    for i in 0..mesh.num_elements() {
        let element = mesh.element(i).unwrap();
        let jacobian = element.reference_jacobian(&Point2::origin());
        assert!(jacobian.determinant() > 0.0);
    }
    assert_eq!(mesh.vertices()[0], Point2::new(-1.0, 2.0));
    assert_eq!(mesh.vertices()[5], Point2::new(0.0, 2.5));
}

#[test]
fn unit_square_tri_mesh() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(2);
    assert_eq!(mesh.num_vertices(), 9);
    assert_eq!(mesh.num_elements(), 8);
    assert_scalar_eq!(mesh_volume(&mesh), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn hex_mesh() {
    let mesh = create_rectangular_uniform_hex_mesh::<f64>(&Point3::new(0.0, 0.0, 1.0), [2, 1, 1], 0.5);
    assert_eq!(mesh.num_vertices(), 12);
    assert_eq!(mesh.num_elements(), 2);
    assert_scalar_eq!(mesh_volume(&mesh), 0.25, comp = abs, tol = 1e-14);
    let element = mesh.element(1).unwrap();
    assert_eq!(element.vertices()[0], Point3::new(0.5, 0.0, 1.0));
    assert_eq!(element.vertices()[6], Point3::new(1.0, 0.5, 1.5));
}

#[test]
fn element_out_of_bounds() {
    let mesh = QuadMesh2d::from_vertices_and_connectivity(
        vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)],
        vec![vec![0, 1, 2, 3]],
    );
    assert!(mesh.element(0).is_none());
    assert!(mesh.element(1).is_none());
}
