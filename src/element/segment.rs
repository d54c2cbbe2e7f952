use crate::element::{corner_child_vertices, FiniteElement, RefinableElement, ReferenceFiniteElement};
use crate::nalgebra::{Matrix1, OPoint, Point1, Scalar, U1};
use crate::Real;
use nalgebra::point;
use numeric_literals::replace_float_literals;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// A linear segment in one dimension.
pub struct Segment2d1Element<T>
where
    T: Scalar,
{
    vertices: [Point1<T>; 2],
}

impl<T: Scalar> Segment2d1Element<T> {
    pub fn from_vertices(vertices: [Point1<T>; 2]) -> Self {
        Self { vertices }
    }

    pub fn from_interval(interval: [T; 2]) -> Self {
        let [a, b] = interval;
        Self::from_vertices([point![a], point![b]])
    }
}

impl<T> ReferenceFiniteElement<T> for Segment2d1Element<T>
where
    T: Real,
{
    type ReferenceDim = U1;

    fn num_nodes(&self) -> usize {
        2
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, basis_values: &mut [T], xi: &Point1<T>) {
        assert_eq!(basis_values.len(), 2);
        basis_values[0] = (1.0 - xi[0]) / 2.0;
        basis_values[1] = (1.0 + xi[0]) / 2.0;
    }
}

impl<T> FiniteElement<T> for Segment2d1Element<T>
where
    T: Real,
{
    type GeometryDim = U1;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, _xi: &Point1<T>) -> Matrix1<T> {
        let [a, b] = &self.vertices;
        Matrix1::new((b[0] - a[0]) / 2.0)
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn map_reference_coords(&self, xi: &Point1<T>) -> Point1<T> {
        let [a, b] = &self.vertices;
        point![a[0] * (1.0 - xi[0]) / 2.0 + b[0] * (1.0 + xi[0]) / 2.0]
    }

    fn diameter(&self) -> T {
        let [a, b] = &self.vertices;
        (b[0] - a[0]).abs()
    }
}

impl<T> RefinableElement<T, U1> for Segment2d1Element<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point1<T>] {
        &self.vertices
    }

    fn from_vertex_slice(vertices: &[OPoint<T, U1>]) -> Self {
        assert_eq!(vertices.len(), 2, "Segment2d1Element requires exactly 2 vertices");
        Self::from_vertices([vertices[0], vertices[1]])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_vertices() -> Vec<Point1<T>> {
        vec![point![-1.0], point![1.0]]
    }

    fn num_children() -> usize {
        2
    }

    fn child_reference_vertices(child_index: usize) -> Vec<Point1<T>> {
        assert!(child_index < 2, "Segment2d1Element has two children");
        corner_child_vertices(&Self::reference_vertices(), child_index)
    }
}
