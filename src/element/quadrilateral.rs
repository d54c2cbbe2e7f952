use crate::element::{
    corner_child_vertices, max_vertex_distance, FiniteElement, RefinableElement, ReferenceFiniteElement,
};
use crate::nalgebra::{Matrix2, Matrix2x4, OPoint, Point2, Scalar, Vector2, U2};
use crate::Real;
use numeric_literals::replace_float_literals;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quad4d2Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 4],
}

impl<T> Quad4d2Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 4]) -> Self {
        Self { vertices }
    }
}

impl<T> Quad4d2Element<T>
where
    T: Real,
{
    /// Axis-aligned rectangle spanned by its lower-left and upper-right corners.
    pub fn from_corners(min: Point2<T>, max: Point2<T>) -> Self {
        Self::from_vertices([min, Point2::new(max.x, min.y), max, Point2::new(min.x, max.y)])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients(xi: &Point2<T>) -> Matrix2x4<T> {
        let phi_grad = |alpha, beta, xi: &Point2<T>|
            Vector2::new(
                alpha * (1.0 + beta * xi[1]) / 4.0,
                beta * (1.0 + alpha * xi[0]) / 4.0,
            );

        Matrix2x4::from_columns(&[
            phi_grad(-1.0, -1.0, xi),
            phi_grad( 1.0, -1.0, xi),
            phi_grad( 1.0,  1.0, xi),
            phi_grad(-1.0,  1.0, xi),
        ])
    }
}

impl<T> ReferenceFiniteElement<T> for Quad4d2Element<T>
where
    T: Real,
{
    type ReferenceDim = U2;

    fn num_nodes(&self) -> usize {
        4
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, basis_values: &mut [T], xi: &Point2<T>) {
        // N_{alpha, beta}([alpha, beta]) = 1 with alpha, beta = 1 or -1
        let phi = |alpha, beta, xi: &Point2<T>| (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) / 4.0;
        basis_values.copy_from_slice(&[
            phi(-1.0, -1.0, xi),
            phi( 1.0, -1.0, xi),
            phi( 1.0,  1.0, xi),
            phi(-1.0,  1.0, xi),
        ]);
    }
}

impl<T> FiniteElement<T> for Quad4d2Element<T>
where
    T: Real,
{
    type GeometryDim = U2;

    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let mut phi = [T::zero(); 4];
        self.populate_basis(&mut phi, xi);
        let x = self
            .vertices
            .iter()
            .zip(phi)
            .fold(Vector2::zeros(), |x, (v, phi_a)| x + v.coords * phi_a);
        OPoint::from(x)
    }

    #[allow(non_snake_case)]
    fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T> {
        let X: Matrix2x4<T> = Matrix2x4::from_fn(|i, j| self.vertices[j][i]);
        let G = Self::gradients(xi);
        X * G.transpose()
    }

    fn diameter(&self) -> T {
        max_vertex_distance(&self.vertices)
    }
}

impl<T> RefinableElement<T, U2> for Quad4d2Element<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point2<T>] {
        &self.vertices
    }

    fn from_vertex_slice(vertices: &[OPoint<T, U2>]) -> Self {
        assert_eq!(vertices.len(), 4, "Quad4d2Element requires exactly 4 vertices");
        Self::from_vertices([vertices[0], vertices[1], vertices[2], vertices[3]])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_vertices() -> Vec<Point2<T>> {
        vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ]
    }

    fn num_children() -> usize {
        4
    }

    /// Child `c` is the quadrant containing parent vertex `c`.
    fn child_reference_vertices(child_index: usize) -> Vec<Point2<T>> {
        assert!(child_index < 4, "Quad4d2Element has four children");
        corner_child_vertices(&Self::reference_vertices(), child_index)
    }
}
