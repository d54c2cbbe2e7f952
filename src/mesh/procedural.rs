//! Structured meshes of boxes.
use crate::mesh::{HexMesh, QuadMesh2d, SegmentMesh1d, TriangleMesh2d};
use crate::nalgebra::{Point1, Point2, Point3, Vector1, Vector2, Vector3};
use crate::Real;

fn index_as_t<T: Real>(i: usize) -> T {
    T::from_usize(i).expect("Must be able to fit usize in T")
}

/// Uniform segments of length `cell_size` starting at `origin`.
pub fn create_uniform_interval_mesh_1d<T: Real>(origin: T, cells: usize, cell_size: T) -> SegmentMesh1d<T> {
    let vertices = (0..=cells)
        .map(|i| Point1::from(Vector1::new(origin + index_as_t::<T>(i) * cell_size)))
        .collect();
    let connectivity = (0..cells).map(|i| vec![i, i + 1]).collect();
    SegmentMesh1d::from_vertices_and_connectivity(vertices, connectivity)
}

pub fn create_unit_interval_uniform_mesh_1d<T: Real>(cells: usize) -> SegmentMesh1d<T> {
    create_uniform_interval_mesh_1d(T::zero(), cells, T::one() / index_as_t(cells.max(1)))
}

fn grid_vertices_2d<T: Real>(origin: &Point2<T>, cells: [usize; 2], cell_size: T) -> Vec<Point2<T>> {
    let mut vertices = Vec::with_capacity((cells[0] + 1) * (cells[1] + 1));
    for j in 0..=cells[1] {
        for i in 0..=cells[0] {
            vertices.push(origin + Vector2::new(index_as_t::<T>(i), index_as_t(j)) * cell_size);
        }
    }
    vertices
}

/// Quadrilaterals on the `cells[0] x cells[1]` grid whose lower-left corner is `origin`.
///
/// Vertices are numbered row by row from the bottom, and every quadrilateral is
/// counter-clockwise.
pub fn create_rectangular_uniform_quad_mesh_2d<T: Real>(
    origin: &Point2<T>,
    cells: [usize; 2],
    cell_size: T,
) -> QuadMesh2d<T> {
    let vertex_index = |i: usize, j: usize| (cells[0] + 1) * j + i;
    let mut connectivity = Vec::with_capacity(cells[0] * cells[1]);
    for j in 0..cells[1] {
        for i in 0..cells[0] {
            connectivity.push(vec![
                vertex_index(i, j),
                vertex_index(i + 1, j),
                vertex_index(i + 1, j + 1),
                vertex_index(i, j + 1),
            ]);
        }
    }
    QuadMesh2d::from_vertices_and_connectivity(grid_vertices_2d(origin, cells, cell_size), connectivity)
}

pub fn create_unit_square_uniform_quad_mesh_2d<T: Real>(cells_per_dim: usize) -> QuadMesh2d<T> {
    let cell_size = T::one() / index_as_t(cells_per_dim.max(1));
    create_rectangular_uniform_quad_mesh_2d(&Point2::origin(), [cells_per_dim; 2], cell_size)
}

/// Each grid cell is split along its diagonal from the lower-left corner into two
/// counter-clockwise triangles.
pub fn create_rectangular_uniform_tri_mesh_2d<T: Real>(
    origin: &Point2<T>,
    cells: [usize; 2],
    cell_size: T,
) -> TriangleMesh2d<T> {
    let vertex_index = |i: usize, j: usize| (cells[0] + 1) * j + i;
    let mut connectivity = Vec::with_capacity(2 * cells[0] * cells[1]);
    for j in 0..cells[1] {
        for i in 0..cells[0] {
            let (v00, v10, v11, v01) = (
                vertex_index(i, j),
                vertex_index(i + 1, j),
                vertex_index(i + 1, j + 1),
                vertex_index(i, j + 1),
            );
            connectivity.push(vec![v00, v10, v11]);
            connectivity.push(vec![v00, v11, v01]);
        }
    }
    TriangleMesh2d::from_vertices_and_connectivity(grid_vertices_2d(origin, cells, cell_size), connectivity)
}

pub fn create_unit_square_uniform_tri_mesh_2d<T: Real>(cells_per_dim: usize) -> TriangleMesh2d<T> {
    let cell_size = T::one() / index_as_t(cells_per_dim.max(1));
    create_rectangular_uniform_tri_mesh_2d(&Point2::origin(), [cells_per_dim; 2], cell_size)
}

/// Hexahedra on a structured grid, with the node order of [`Hex8Element`](crate::element::Hex8Element).
pub fn create_rectangular_uniform_hex_mesh<T: Real>(origin: &Point3<T>, cells: [usize; 3], cell_size: T) -> HexMesh<T> {
    let [nx, ny, nz] = cells;
    let vertex_index = |i: usize, j: usize, k: usize| (nx + 1) * (ny + 1) * k + (nx + 1) * j + i;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                let offset = Vector3::new(index_as_t::<T>(i), index_as_t(j), index_as_t(k)) * cell_size;
                vertices.push(origin + offset);
            }
        }
    }

    let mut connectivity = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                connectivity.push(vec![
                    vertex_index(i, j, k),
                    vertex_index(i + 1, j, k),
                    vertex_index(i + 1, j + 1, k),
                    vertex_index(i, j + 1, k),
                    vertex_index(i, j, k + 1),
                    vertex_index(i + 1, j, k + 1),
                    vertex_index(i + 1, j + 1, k + 1),
                    vertex_index(i, j + 1, k + 1),
                ]);
            }
        }
    }
    HexMesh::from_vertices_and_connectivity(vertices, connectivity)
}

pub fn create_unit_box_uniform_hex_mesh_3d<T: Real>(cells_per_dim: usize) -> HexMesh<T> {
    let cell_size = T::one() / index_as_t(cells_per_dim.max(1));
    create_rectangular_uniform_hex_mesh(&Point3::origin(), [cells_per_dim; 3], cell_size)
}
