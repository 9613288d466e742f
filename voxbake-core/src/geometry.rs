//! Geometry primitives for voxelization
use nalgebra::{Point3, Vector3};

use crate::error::{Result, VoxelError};

/// A mesh vertex in mesh-local space
pub type Vertex = Point3<f64>;

/// A polygon face as 0-based vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// The leading triangle `(v0, v1, v2)` of the face.
    ///
    /// Faces with more than three indices are not fanned out; only their
    /// first triangle is returned. Faces with fewer than three give `None`.
    pub fn leading_triangle(&self) -> Option<[usize; 3]> {
        match self.indices.as_slice() {
            [a, b, c, ..] => Some([*a, *b, *c]),
            _ => None,
        }
    }
}

/// A polygon mesh as an indexed vertex list
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.vertices.push(Point3::new(x, y, z));
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, indices: Vec<usize>) {
        self.faces.push(Face::new(indices));
    }

    /// Resolve the leading triangle of face `face` to vertex positions.
    pub fn triangle(&self, face: usize) -> Result<Option<[Vertex; 3]>> {
        let Some(indices) = self.faces[face].leading_triangle() else {
            return Ok(None);
        };

        let mut corners = [Point3::origin(); 3];
        for (corner, &index) in corners.iter_mut().zip(indices.iter()) {
            *corner = *self
                .vertices
                .get(index)
                .ok_or(VoxelError::VertexIndex {
                    face,
                    index,
                    vertex_count: self.vertices.len(),
                })?;
        }
        Ok(Some(corners))
    }

    /// Axis-aligned cube of edge `size` centered on the origin,
    /// 8 shared vertices and 12 triangles.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 12);

        for &(x, y, z) in &[
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
        ] {
            mesh.add_vertex(x, y, z);
        }

        // Back / front
        mesh.add_face(vec![0, 1, 2]);
        mesh.add_face(vec![0, 2, 3]);
        mesh.add_face(vec![4, 5, 6]);
        mesh.add_face(vec![4, 6, 7]);
        // Bottom / top
        mesh.add_face(vec![0, 1, 5]);
        mesh.add_face(vec![0, 5, 4]);
        mesh.add_face(vec![3, 2, 6]);
        mesh.add_face(vec![3, 6, 7]);
        // Left / right
        mesh.add_face(vec![0, 3, 7]);
        mesh.add_face(vec![0, 7, 4]);
        mesh.add_face(vec![1, 2, 6]);
        mesh.add_face(vec![1, 6, 5]);

        mesh
    }
}

/// Closed axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub mins: Point3<f64>,
    pub maxs: Point3<f64>,
}

impl Aabb {
    pub fn new(mins: Point3<f64>, maxs: Point3<f64>) -> Self {
        Self { mins, maxs }
    }

    /// Bounding box of a point set, by a single running min/max scan.
    pub fn from_points(points: &[Vertex]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or(VoxelError::EmptyMesh)?;
        let mut aabb = Self::new(*first, *first);
        for p in rest {
            aabb.mins = aabb.mins.inf(p);
            aabb.maxs = aabb.maxs.sup(p);
        }
        Ok(aabb)
    }

    /// Cube with corner `mins` and edge length `size`.
    pub fn cube(mins: Point3<f64>, size: f64) -> Self {
        Self::new(mins, mins + Vector3::repeat(size))
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.maxs - self.mins
    }

    /// Uniform voxel edge length when this box is split into `resolution`
    /// cells along its longest axis.
    ///
    /// An axis with zero extent contributes `1.0` instead of dividing by
    /// zero, and that value takes part in the maximum like any other axis.
    pub fn voxel_size(&self, resolution: usize) -> f64 {
        let n = resolution as f64;
        let extents = self.extents();
        extents
            .iter()
            .map(|&extent| if extent > 0.0 { extent / n } else { 1.0 })
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
