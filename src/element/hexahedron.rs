use crate::element::{
    corner_child_vertices, max_vertex_distance, FiniteElement, RefinableElement, ReferenceFiniteElement,
};
use crate::nalgebra::{Matrix3, OMatrix, OPoint, Point3, Scalar, Vector3, U3, U8};
use crate::Real;
use numeric_literals::replace_float_literals;

/// Signs of the reference vertices, in node order.
#[rustfmt::skip]
const VERTEX_SIGNS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
];

/// Trilinear hexahedron on `[-1, 1]^3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Hex8Element<T: Scalar> {
    vertices: [Point3<T>; 8],
}

impl<T: Scalar> Hex8Element<T> {
    pub fn from_vertices(vertices: [Point3<T>; 8]) -> Self {
        Self { vertices }
    }
}

impl<T: Real> Hex8Element<T> {
    /// Axis-aligned box spanned by its minimum and maximum corners.
    pub fn from_corners(min: Point3<T>, max: Point3<T>) -> Self {
        let vertices = VERTEX_SIGNS.map(|signs| {
            let coord = |i: usize| if signs[i] < 0.0 { min[i] } else { max[i] };
            Point3::new(coord(0), coord(1), coord(2))
        });
        Self::from_vertices(vertices)
    }

    fn gradients(xi: &Point3<T>) -> OMatrix<T, U3, U8> {
        let mut gradients = OMatrix::<T, U3, U8>::zeros();
        let eighth = T::from_f64(0.125).expect("Literal must fit in T");
        for (a, signs) in VERTEX_SIGNS.iter().enumerate() {
            let s = signs.map(|s| T::from_f64(s).expect("Literal must fit in T"));
            let factor = |i: usize| T::one() + s[i] * xi[i];
            let gradient = Vector3::new(
                s[0] * factor(1) * factor(2),
                factor(0) * s[1] * factor(2),
                factor(0) * factor(1) * s[2],
            ) * eighth;
            gradients.set_column(a, &gradient);
        }
        gradients
    }
}

impl<T> ReferenceFiniteElement<T> for Hex8Element<T>
where
    T: Real,
{
    type ReferenceDim = U3;

    fn num_nodes(&self) -> usize {
        8
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn populate_basis(&self, basis_values: &mut [T], xi: &Point3<T>) {
        assert_eq!(basis_values.len(), 8);
        for (phi, signs) in basis_values.iter_mut().zip(&VERTEX_SIGNS) {
            let s = signs.map(|s| T::from_f64(s).expect("Literal must fit in T"));
            *phi = (1.0 + s[0] * xi[0]) * (1.0 + s[1] * xi[1]) * (1.0 + s[2] * xi[2]) / 8.0;
        }
    }
}

impl<T> FiniteElement<T> for Hex8Element<T>
where
    T: Real,
{
    type GeometryDim = U3;

    #[allow(non_snake_case)]
    fn reference_jacobian(&self, xi: &Point3<T>) -> Matrix3<T> {
        let X = OMatrix::<T, U3, U8>::from_fn(|i, j| self.vertices[j][i]);
        let G = Self::gradients(xi);
        X * G.transpose()
    }

    fn map_reference_coords(&self, xi: &Point3<T>) -> Point3<T> {
        let mut phi = [T::zero(); 8];
        self.populate_basis(&mut phi, xi);
        let x = self
            .vertices
            .iter()
            .zip(phi)
            .fold(Vector3::zeros(), |x, (v, phi_a)| x + v.coords * phi_a);
        OPoint::from(x)
    }

    fn diameter(&self) -> T {
        max_vertex_distance(&self.vertices)
    }
}

impl<T> RefinableElement<T, U3> for Hex8Element<T>
where
    T: Real,
{
    fn vertices(&self) -> &[Point3<T>] {
        &self.vertices
    }

    fn from_vertex_slice(vertices: &[OPoint<T, U3>]) -> Self {
        assert_eq!(vertices.len(), 8, "Hex8Element requires exactly 8 vertices");
        let mut array = [Point3::origin(); 8];
        array.copy_from_slice(vertices);
        Self::from_vertices(array)
    }

    fn reference_vertices() -> Vec<Point3<T>> {
        VERTEX_SIGNS
            .iter()
            .map(|s| Point3::from(s.map(|s| T::from_f64(s).expect("Literal must fit in T"))))
            .collect()
    }

    fn num_children() -> usize {
        8
    }

    /// Child `c` is the octant containing parent vertex `c`.
    fn child_reference_vertices(child_index: usize) -> Vec<Point3<T>> {
        assert!(child_index < 8, "Hex8Element has eight children");
        corner_child_vertices(&Self::reference_vertices(), child_index)
    }
}
