/// Model transforms and the per-frame transform stage
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Mesh;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f32> {
        Matrix4::identity()
    }

    /// Rotation step about the X axis.
    ///
    /// Positive angles turn +Y towards −Z.
    pub fn rotation_x_degrees(degrees: f32) -> Matrix4<f32> {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = s;
        m[(2, 1)] = -s;
        m[(2, 2)] = c;
        m
    }

    /// Rotation step about the Y axis.
    ///
    /// Positive angles turn +Z towards +X.
    pub fn rotation_y_degrees(degrees: f32) -> Matrix4<f32> {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        m
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }
}

/// Multiply every position and normal of the mesh by `transform`, in place.
///
/// Normals go through the same matrix, which is only valid for rotations and
/// uniform scale. They are re-normalized at interpolation time.
pub fn transform_mesh(mesh: &mut Mesh, transform: &Matrix4<f32>) {
    if *transform == Matrix4::identity() {
        return;
    }
    for vertex in mesh.vertices_mut() {
        vertex.position = transform * vertex.position;
        vertex.normal = transform * vertex.normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_identity_leaves_mesh_untouched() {
        let mut mesh = Mesh::cube(2.0);
        let before = mesh.clone();
        transform_mesh(&mut mesh, &Transform::identity());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_rotation_x_step() {
        let m = Transform::rotation_x_degrees(90.0);
        let p = m * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert_relative_eq!(p, Vector4::new(0.0, 0.0, -1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_y_step() {
        let m = Transform::rotation_y_degrees(90.0);
        let p = m * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(p, Vector4::new(1.0, 0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_opposite_steps_cancel() {
        let m = Transform::rotation_y_degrees(10.0) * Transform::rotation_y_degrees(-10.0);
        assert_relative_eq!(m, Matrix4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_transform_mesh_rotates_normals() {
        let mut mesh = Mesh::cube(2.0);
        transform_mesh(&mut mesh, &Transform::rotation_y_degrees(90.0));

        // the +Z face now faces +X
        let front = &mesh.triangles[0].vertices[0];
        assert_relative_eq!(front.normal, Vector4::new(1.0, 0.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(front.position.w, 1.0);
        for v in mesh.vertices() {
            assert_relative_eq!(v.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_translation_matrix() {
        let m = Transform::translation_matrix(1.0, 2.0, 3.0);
        let p = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p, Vector4::new(1.0, 2.0, 3.0, 1.0));
        let n = m * Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(n, Vector4::new(0.0, 0.0, 1.0, 0.0));
    }
}
