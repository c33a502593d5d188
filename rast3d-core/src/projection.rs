/// Camera and projection utilities
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::geometry::DevicePoint;

/// World-to-camera transform.
///
/// Holds the inverse of the camera's placement in the world; the camera looks
/// down its own −Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    view: Matrix4<f32>,
}

impl Camera {
    pub fn new(view: Matrix4<f32>) -> Self {
        Self { view }
    }

    /// Camera at `(0, 0, distance)` looking towards −Z, i.e. a view matrix
    /// translating the world by `-distance` along Z.
    pub fn at_distance(distance: f32) -> Self {
        Self::new(Matrix4::new_translation(&Vector3::new(0.0, 0.0, -distance)))
    }

    pub fn transform(&self) -> &Matrix4<f32> {
        &self.view
    }

    /// Move the camera through the world by the given offset
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.view[(0, 3)] -= dx;
        self.view[(1, 3)] -= dy;
        self.view[(2, 3)] -= dz;
    }

    /// Camera position in world space (valid while the view has no rotation)
    pub fn position(&self) -> Vector3<f32> {
        -Vector3::new(self.view[(0, 3)], self.view[(1, 3)], self.view[(2, 3)])
    }

    /// World point into camera space
    pub fn to_camera(&self, point: &Vector4<f32>) -> Vector4<f32> {
        self.view * point
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::at_distance(5.0)
    }
}

/// Maps camera-space points onto the raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub width: u32,
    pub height: u32,
    /// Distance to the projection plane
    pub near: f32,
    /// Plane-to-NDC scale factor
    pub ndc_scale: f32,
}

impl Projector {
    pub fn new(width: u32, height: u32, near: f32, ndc_scale: f32) -> Self {
        Self {
            width,
            height,
            near,
            ndc_scale,
        }
    }

    /// Project a camera-space point to `(px, py, view_depth)`.
    ///
    /// No clipping is done: points behind the camera produce a negative depth.
    pub fn camera_to_screen(&self, cam: &Vector4<f32>) -> (f32, f32, f32) {
        let depth = -cam.z;

        // Perspective divide onto the projection plane
        let plane_x = self.near * cam.x / depth;
        let plane_y = self.near * cam.y / depth;

        let ndc_x = self.ndc_scale * plane_x;
        let ndc_y = self.ndc_scale * plane_y;

        // Raster row 0 is the top of the image
        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        (screen_x, screen_y, depth)
    }

    /// Project a world-space point through the camera
    pub fn project_to_screen(&self, point: &Vector4<f32>, camera: &Camera) -> (f32, f32, f32) {
        self.camera_to_screen(&camera.to_camera(point))
    }

    /// Same as `project_to_screen`, storing the reciprocal depth for interpolation
    pub fn project_to_device(&self, point: &Vector4<f32>, camera: &Camera) -> DevicePoint {
        let (x, y, depth) = self.project_to_screen(point, camera);
        DevicePoint::new(x, y, 1.0 / depth)
    }
}
