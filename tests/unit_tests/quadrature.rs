use matrixcompare::assert_scalar_eq;
use nalgebra::Point2;
use nlfem::element::{Hex8Element, Quad4d2Element, RefinableElement, ReferenceFiniteElement, Segment2d1Element, Tri3d2Element};
use nlfem::quadrature::{BasisTable, CanonicalQuadrature, Quadrature, QuadraturePair2d};

#[test]
fn canonical_weights_sum_to_reference_volume() {
    assert_scalar_eq!(Segment2d1Element::<f64>::canonical_quadrature().weights().iter().sum::<f64>(), 2.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(Tri3d2Element::<f64>::canonical_quadrature().weights().iter().sum::<f64>(), 2.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(Quad4d2Element::<f64>::canonical_quadrature().weights().iter().sum::<f64>(), 4.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(Hex8Element::<f64>::canonical_quadrature().weights().iter().sum::<f64>(), 8.0, comp = abs, tol = 1e-13);
}

#[test]
fn quad_gauss_integrates_tensor_monomials_exactly() {
    let quadrature: QuadraturePair2d<f64> = Quad4d2Element::gauss_quadrature(3);
    assert_eq!(quadrature.num_points(), 9);
    let integral: f64 = quadrature.integrate(|x| x.x.powi(4) * x.y.powi(2));
    assert_scalar_eq!(integral, 4.0 / 15.0, comp = abs, tol = 1e-14);
}

#[test]
fn triangle_gauss_integrates_linear_function() {
    // The centroid of the reference triangle is (-1/3, -1/3)
    let quadrature = Tri3d2Element::<f64>::gauss_quadrature(2);
    let integral: f64 = quadrature.integrate(|x| x.x);
    assert_scalar_eq!(integral, -2.0 / 3.0, comp = abs, tol = 1e-14);
}

#[test]
fn basis_table_is_point_major() {
    let quad = Quad4d2Element::<f64>::reference();
    let points = vec![Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0), Point2::new(0.0, 0.0)];
    let table = BasisTable::for_element(&quad, &points);
    assert_eq!(table.num_nodes(), 4);
    assert_eq!(table.num_points(), 3);
    assert_eq!(table.at(0), &[1.0, 0.0, 0.0, 0.0]);
    assert_eq!(table.at(1), &[0.0, 0.0, 1.0, 0.0]);
    assert_eq!(table.at(2), &[0.25, 0.25, 0.25, 0.25]);

    for (q, point) in points.iter().enumerate() {
        let mut phi = [0.0; 4];
        quad.populate_basis(&mut phi, point);
        assert_eq!(table.at(q), &phi);
    }
}

#[test]
fn empty_basis_table() {
    let table = BasisTable::<f64>::from_fn(0, [Point2::new(0.0, 0.0)].as_slice(), |_, _| {});
    assert_eq!(table.num_nodes(), 0);
    assert_eq!(table.num_points(), 0);
}
