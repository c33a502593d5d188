/// Geometry primitives for the software rasterizer
use nalgebra::{Vector2, Vector3, Vector4};

/// Per-vertex data carried by a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttributes {
    /// Homogeneous position, w = 1
    pub position: Vector4<f32>,
    /// Homogeneous normal, w = 0
    pub normal: Vector4<f32>,
    /// Surface coordinate in [0, 1]², filled in by the surface generator
    pub uv: Vector2<f32>,
}

impl VertexAttributes {
    /// Build a vertex from a position and a normal; the normal is stored unit length.
    pub fn new(position: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position: position.push(1.0),
            normal: normal.normalize().push(0.0),
            uv: Vector2::zeros(),
        }
    }
}

/// A vertex after projection: pixel position plus depth information.
///
/// `inv_depth` holds `1 / view_depth` so attributes can be interpolated
/// perspective-correctly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f32,
    pub y: f32,
    pub inv_depth: f32,
}

impl DevicePoint {
    pub fn new(x: f32, y: f32, inv_depth: f32) -> Self {
        Self { x, y, inv_depth }
    }

    /// Distance along the viewing axis
    pub fn view_depth(&self) -> f32 {
        1.0 / self.inv_depth
    }
}

impl Default for DevicePoint {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// A triangle face defined by three vertices in source winding order
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [VertexAttributes; 3],
    /// Scratch space written by the projector every frame
    pub device: [DevicePoint; 3],
}

impl Triangle {
    pub fn new(v0: VertexAttributes, v1: VertexAttributes, v2: VertexAttributes) -> Self {
        Self {
            vertices: [v0, v1, v2],
            device: [DevicePoint::default(); 3],
        }
    }

    pub fn positions(&self) -> [Vector4<f32>; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }
}

/// A 3D mesh composed of triangles, in rendering order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over every vertex of every triangle
    pub fn vertices(&self) -> impl Iterator<Item = &VertexAttributes> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut VertexAttributes> {
        self.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut())
    }

    /// Simple cube with per-face normals, useful when no mesh file is given
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners in counter-clockwise order seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-half, -half, half], [half, -half, half], [half, half, half], [-half, half, half]]),
            ([0.0, 0.0, -1.0], [[half, -half, -half], [-half, -half, -half], [-half, half, -half], [half, half, -half]]),
            ([0.0, 1.0, 0.0], [[-half, half, half], [half, half, half], [half, half, -half], [-half, half, -half]]),
            ([0.0, -1.0, 0.0], [[-half, -half, -half], [half, -half, -half], [half, -half, half], [-half, -half, half]]),
            ([1.0, 0.0, 0.0], [[half, -half, half], [half, -half, -half], [half, half, -half], [half, half, half]]),
            ([-1.0, 0.0, 0.0], [[-half, -half, -half], [-half, -half, half], [-half, half, half], [-half, half, -half]]),
        ];

        for (normal, corners) in faces.iter() {
            let n = Vector3::from(*normal);
            let v = |i: usize| VertexAttributes::new(Vector3::from(corners[i]), n);
            mesh.add_triangle(Triangle::new(v(0), v(1), v(2)));
            mesh.add_triangle(Triangle::new(v(0), v(2), v(3)));
        }

        mesh
    }
}
