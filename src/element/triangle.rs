use crate::element::{
    corner_child_vertices, max_vertex_distance, FiniteElement, RefinableElement, ReferenceFiniteElement,
};
use crate::nalgebra::{Matrix2, OPoint, Point2, Scalar, U2};
use crate::Real;
use numeric_literals::replace_float_literals;

/// A linear triangle on the reference triangle with vertices `(-1, -1)`, `(1, -1)`, `(-1, 1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tri3d2Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 3],
}

impl<T: Scalar> Tri3d2Element<T> {
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self { vertices }
    }
}

impl<T> ReferenceFiniteElement<T> for Tri3d2Element<T>
where
    T: Real,
{
    type ReferenceDim = U2;

    fn num_nodes(&self) -> usize {
        3
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, basis_values: &mut [T], xi: &Point2<T>) {
        assert_eq!(basis_values.len(), 3);
        basis_values[0] = -0.5 * (xi[0] + xi[1]);
        basis_values[1] = 0.5 * (1.0 + xi[0]);
        basis_values[2] = 0.5 * (1.0 + xi[1]);
    }
}

impl<T> FiniteElement<T> for Tri3d2Element<T>
where
    T: Real,
{
    type GeometryDim = U2;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, _xi: &Point2<T>) -> Matrix2<T> {
        let [a, b, c] = &self.vertices;
        let mut jacobian = Matrix2::zeros();
        jacobian.set_column(0, &((b - a) * 0.5));
        jacobian.set_column(1, &((c - a) * 0.5));
        jacobian
    }

    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let mut phi = [T::zero(); 3];
        self.populate_basis(&mut phi, xi);
        let [a, b, c] = &self.vertices;
        OPoint::from(a.coords * phi[0] + b.coords * phi[1] + c.coords * phi[2])
    }

    fn diameter(&self) -> T {
        max_vertex_distance(&self.vertices)
    }
}

impl<T> RefinableElement<T, U2> for Tri3d2Element<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    fn from_vertex_slice(vertices: &[OPoint<T, U2>]) -> Self {
        assert_eq!(vertices.len(), 3, "Tri3d2Element requires exactly 3 vertices");
        Self::from_vertices([vertices[0], vertices[1], vertices[2]])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_vertices() -> Vec<Point2<T>> {
        vec![Point2::new(-1.0, -1.0), Point2::new(1.0, -1.0), Point2::new(-1.0, 1.0)]
    }

    fn num_children() -> usize {
        4
    }

    /// Regular refinement: three corner children and one inverted center child whose vertex `a`
    /// is the midpoint of the edge opposite to parent vertex `a`.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn child_reference_vertices(child_index: usize) -> Vec<Point2<T>> {
        let reference = Self::reference_vertices();
        match child_index {
            0..=2 => corner_child_vertices(&reference, child_index),
            3 => (0..3)
                .map(|a| {
                    let (b, c) = (&reference[(a + 1) % 3], &reference[(a + 2) % 3]);
                    OPoint::from((b.coords + c.coords) * 0.5)
                })
                .collect(),
            _ => panic!("Tri3d2Element has four children"),
        }
    }
}
