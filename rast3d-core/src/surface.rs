/// Procedural surface coordinates via spherical projection around the mesh centroid
use nalgebra::{Vector2, Vector4};
use std::f32::consts::PI;

use crate::geometry::Mesh;

/// Mean of every vertex position, one sample per triangle corner.
///
/// Shared vertices are counted once per occurrence. Returns `None` for an empty mesh.
pub fn centroid(mesh: &Mesh) -> Option<Vector4<f32>> {
    if mesh.is_empty() {
        return None;
    }
    let sum = mesh
        .vertices()
        .fold(Vector4::zeros(), |acc, v| acc + v.position);
    Some(sum / (mesh.len() * 3) as f32)
}

/// Map a unit direction to [0, 1]² with y as the polar axis
pub fn spherical_uv(dx: f32, dy: f32, dz: f32) -> Vector2<f32> {
    Vector2::new(
        0.5 + dz.atan2(dx) / (2.0 * PI),
        0.5 - dy.clamp(-1.0, 1.0).asin() / PI,
    )
}

/// Fill in the surface coordinate of every vertex of the mesh.
pub fn generate_surface_coords(mesh: &mut Mesh) {
    let Some(center) = centroid(mesh) else {
        return;
    };

    let mut degenerate = 0usize;
    for vertex in mesh.vertices_mut() {
        let to_center = (center - vertex.position).xyz();
        let length = to_center.norm();
        if length <= f32::EPSILON {
            degenerate += 1;
            vertex.uv = Vector2::new(0.5, 0.5);
            continue;
        }
        let dir = to_center / length;
        vertex.uv = spherical_uv(dir.x, dir.y, dir.z);
    }

    if degenerate > 0 {
        log::warn!(
            "{} vertices coincide with the mesh centroid; assigned the center coordinate",
            degenerate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Triangle, VertexAttributes};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_centroid_counts_every_corner() {
        let n = Vector3::z();
        let v = |x: f32| VertexAttributes::new(Vector3::new(x, 0.0, 0.0), n);
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(v(0.0), v(0.0), v(3.0)));
        mesh.add_triangle(Triangle::new(v(0.0), v(3.0), v(6.0)));

        let c = centroid(&mesh).unwrap();
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.w, 1.0);
    }

    #[test]
    fn test_empty_mesh_has_no_centroid() {
        assert!(centroid(&Mesh::new()).is_none());
        let mut mesh = Mesh::new();
        generate_surface_coords(&mut mesh);
    }

    #[test]
    fn test_spherical_axes() {
        let up = spherical_uv(0.0, 1.0, 0.0);
        assert_relative_eq!(up.y, 0.0);
        let down = spherical_uv(0.0, -1.0, 0.0);
        assert_relative_eq!(down.y, 1.0);
        let x = spherical_uv(1.0, 0.0, 0.0);
        assert_relative_eq!(x, Vector2::new(0.5, 0.5));
    }

    #[test]
    fn test_surface_coords_in_unit_square() {
        let mut mesh = Mesh::cube(3.0);
        generate_surface_coords(&mut mesh);
        for v in mesh.vertices() {
            assert!((0.0..=1.0).contains(&v.uv.x), "u out of range: {}", v.uv.x);
            assert!((0.0..=1.0).contains(&v.uv.y), "v out of range: {}", v.uv.y);
        }
    }
}
