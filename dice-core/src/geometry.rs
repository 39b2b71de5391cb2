/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3, Vector4};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    /// Position as a homogeneous point (w = 1)
    pub fn homogeneous(&self) -> Vector4<f32> {
        self.position.to_homogeneous()
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// An indexed triangle mesh, the shape of a GPU vertex/index buffer pair
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quad as two triangles; corners are in counter-clockwise order
    fn add_quad(&mut self, corners: [Vertex; 4]) {
        let start = self.vertices.len() as u16;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |face| {
            Triangle::new(
                self.vertices[face[0] as usize],
                self.vertices[face[1] as usize],
                self.vertices[face[2] as usize],
            )
        })
    }

    /// Flat `xyz` positions for a vertex buffer
    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flat `xyz` normals for a vertex buffer
    pub fn normals(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x, v.normal.y, v.normal.z])
            .collect()
    }

    /// Axis-aligned cube centered on the origin spanning `±half_extent`,
    /// with four vertices per face so each face keeps its own normal
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let mut mesh = Self::new();

        // Front face
        mesh.add_quad([
            Vertex::new(-h, -h, h, 0.0, 0.0, 1.0),
            Vertex::new(h, -h, h, 0.0, 0.0, 1.0),
            Vertex::new(h, h, h, 0.0, 0.0, 1.0),
            Vertex::new(-h, h, h, 0.0, 0.0, 1.0),
        ]);

        // Back face
        mesh.add_quad([
            Vertex::new(-h, -h, -h, 0.0, 0.0, -1.0),
            Vertex::new(-h, h, -h, 0.0, 0.0, -1.0),
            Vertex::new(h, h, -h, 0.0, 0.0, -1.0),
            Vertex::new(h, -h, -h, 0.0, 0.0, -1.0),
        ]);

        // Top face
        mesh.add_quad([
            Vertex::new(-h, h, -h, 0.0, 1.0, 0.0),
            Vertex::new(-h, h, h, 0.0, 1.0, 0.0),
            Vertex::new(h, h, h, 0.0, 1.0, 0.0),
            Vertex::new(h, h, -h, 0.0, 1.0, 0.0),
        ]);

        // Bottom face
        mesh.add_quad([
            Vertex::new(-h, -h, -h, 0.0, -1.0, 0.0),
            Vertex::new(h, -h, -h, 0.0, -1.0, 0.0),
            Vertex::new(h, -h, h, 0.0, -1.0, 0.0),
            Vertex::new(-h, -h, h, 0.0, -1.0, 0.0),
        ]);

        // Right face
        mesh.add_quad([
            Vertex::new(h, -h, -h, 1.0, 0.0, 0.0),
            Vertex::new(h, h, -h, 1.0, 0.0, 0.0),
            Vertex::new(h, h, h, 1.0, 0.0, 0.0),
            Vertex::new(h, -h, h, 1.0, 0.0, 0.0),
        ]);

        // Left face
        mesh.add_quad([
            Vertex::new(-h, -h, -h, -1.0, 0.0, 0.0),
            Vertex::new(-h, -h, h, -1.0, 0.0, 0.0),
            Vertex::new(-h, h, h, -1.0, 0.0, 0.0),
            Vertex::new(-h, h, -h, -1.0, 0.0, 0.0),
        ]);

        mesh
    }
}
