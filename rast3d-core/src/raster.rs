/// Triangle rasterization with a depth buffer
///
/// Coverage uses edge functions evaluated at pixel centers; attributes are
/// interpolated perspective-correctly through the reciprocal view depth kept
/// in each `DevicePoint`.
use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

use crate::config::RenderConfig;
use crate::geometry::{DevicePoint, Mesh, Triangle};
use crate::projection::{Camera, Projector};
use crate::shading::{PhongShader, SurfacePattern};

/// Per-pixel nearest depth, reset to the far plane every frame
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    far: f32,
    data: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize, far: f32) -> Self {
        Self {
            width,
            height,
            far,
            data: vec![far; width * height],
        }
    }

    pub fn reset(&mut self) {
        self.data.fill(self.far);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Store `depth` if it is strictly nearer than what is there; returns whether it was.
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f32) -> bool {
        let idx = y * self.width + x;
        if depth < self.data[idx] {
            self.data[idx] = depth;
            true
        } else {
            false
        }
    }

    /// Number of pixels something was drawn to since the last reset
    pub fn covered(&self) -> usize {
        self.data.iter().filter(|&&d| d < self.far).count()
    }
}

/// Destination for shaded pixels. Colors may fall outside [0, 1].
pub trait PixelSink {
    fn put_pixel(&mut self, x: u32, y: u32, color: Vector3<f32>);
}

/// In-memory RGB raster, row-major, row 0 at the top
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Vector3<f32>>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vector3::zeros(); width * height],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Vector3::zeros());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Vector3<f32> {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Vector3<f32>] {
        &self.pixels
    }
}

impl PixelSink for FrameBuffer {
    fn put_pixel(&mut self, x: u32, y: u32, color: Vector3<f32>) {
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

/// Juan Pineda's edge function: which side of the directed edge `a → b` the
/// point `c` lies on. Summed over a triangle's edges it gives the signed area.
pub fn edge_function(a: &Vector2<f32>, b: &Vector2<f32>, c: &Vector2<f32>) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Inclusive pixel range a triangle may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Screen-space bounds of the points clipped to the raster, or `None` when
    /// the triangle lies entirely outside it.
    pub fn of(points: &[DevicePoint; 3], width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_x = points[0].x.min(points[1].x).min(points[2].x);
        let min_y = points[0].y.min(points[1].y).min(points[2].y);
        let max_x = points[0].x.max(points[1].x).max(points[2].x);
        let max_y = points[0].y.max(points[1].y).max(points[2].y);

        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }

        let last_x = (width - 1) as f32;
        let last_y = (height - 1) as f32;
        if min_x > last_x || min_y > last_y || max_x < 0.0 || max_y < 0.0 {
            return None;
        }

        Some(Self {
            min_x: min_x.floor().max(0.0) as u32,
            min_y: min_y.floor().max(0.0) as u32,
            max_x: max_x.floor().min(last_x) as u32,
            max_y: max_y.floor().min(last_y) as u32,
        })
    }
}

/// Barycentric weights of `p`, normalized by the signed area.
///
/// All three are non-negative exactly when `p` is covered, whatever the
/// triangle's winding.
pub fn barycentric(points: &[DevicePoint; 3], area: f32, p: &Vector2<f32>) -> [f32; 3] {
    let [v0, v1, v2] = points.map(|d| Vector2::new(d.x, d.y));
    [
        edge_function(&v1, &v2, p) / area,
        edge_function(&v2, &v0, p) / area,
        edge_function(&v0, &v1, p) / area,
    ]
}

/// Interpolated view depth from barycentric weights and reciprocal depths
pub fn interpolate_depth(weights: &[f32; 3], inv_depth: &[f32; 3]) -> f32 {
    1.0 / (weights[0] * inv_depth[0] + weights[1] * inv_depth[1] + weights[2] * inv_depth[2])
}

/// Perspective-correct interpolation: weight each value by `w_i / depth_i`,
/// sum, then scale by the interpolated depth `z`.
pub fn perspective_interpolate<T>(weights: &[f32; 3], inv_depth: &[f32; 3], z: f32, values: [T; 3]) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let [a, b, c] = values;
    (a * (weights[0] * inv_depth[0]) + b * (weights[1] * inv_depth[1]) + c * (weights[2] * inv_depth[2])) * z
}

/// What happened to one submitted triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    /// Rasterized; carries the number of pixels that passed the depth test
    Drawn(usize),
    /// Outside the raster or behind the camera
    Culled,
    /// Zero signed area on screen
    Degenerate,
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
    pub degenerate: usize,
    pub pixels_shaded: usize,
}

impl RenderStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        match outcome {
            TriangleOutcome::Drawn(pixels) => {
                self.drawn += 1;
                self.pixels_shaded += pixels;
            }
            TriangleOutcome::Culled => self.culled += 1,
            TriangleOutcome::Degenerate => self.degenerate += 1,
        }
    }
}

/// Everything a frame needs besides the scene: raster size, projection and
/// the persistent depth buffer.
#[derive(Debug, Clone)]
pub struct RenderContext {
    projector: Projector,
    depth: DepthBuffer,
}

impl RenderContext {
    pub fn new(width: u32, height: u32, near: f32, ndc_scale: f32, far: f32) -> Self {
        Self {
            projector: Projector::new(width, height, near, ndc_scale),
            depth: DepthBuffer::new(width as usize, height as usize, far),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.width, config.height, config.near, config.ndc_scale, config.far)
    }

    pub fn width(&self) -> u32 {
        self.projector.width
    }

    pub fn height(&self) -> u32 {
        self.projector.height
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Start a new frame: every pixel goes back to the far plane
    pub fn begin_frame(&mut self) {
        self.depth.reset();
    }

    /// Fill in the device-space points of a triangle
    pub fn project(&self, triangle: &mut Triangle, camera: &Camera) {
        for (device, vertex) in triangle.device.iter_mut().zip(triangle.vertices.iter()) {
            *device = self.projector.project_to_device(&vertex.position, camera);
        }
    }

    /// Render a whole mesh: reset depth, then project and rasterize every
    /// triangle in mesh order.
    pub fn render<P, S>(
        &mut self,
        mesh: &Mesh,
        camera: &Camera,
        shader: &PhongShader<P>,
        sink: &mut S,
    ) -> RenderStats
    where
        P: SurfacePattern,
        S: PixelSink + ?Sized,
    {
        self.begin_frame();

        let total = mesh.len();
        let mut stats = RenderStats::default();
        let mut next_report = 10;

        for (i, source) in mesh.triangles.iter().enumerate() {
            let mut triangle = source.clone();
            self.project(&mut triangle, camera);
            stats.record(self.draw_triangle(&triangle, camera, shader, sink));

            let percent = (i + 1) * 100 / total;
            if percent >= next_report {
                log::debug!("Rendering: {}% complete", percent);
                next_report = percent / 10 * 10 + 10;
            }
        }

        log::info!(
            "Rendered {} triangles ({} culled, {} degenerate), {} pixels shaded",
            stats.drawn,
            stats.culled,
            stats.degenerate,
            stats.pixels_shaded
        );
        stats
    }

    /// Rasterize one already-projected triangle against the depth buffer.
    pub fn draw_triangle<P, S>(
        &mut self,
        triangle: &Triangle,
        camera: &Camera,
        shader: &PhongShader<P>,
        sink: &mut S,
    ) -> TriangleOutcome
    where
        P: SurfacePattern,
        S: PixelSink + ?Sized,
    {
        let device = &triangle.device;

        // Points behind the camera project mirrored; no clipping is attempted.
        if device.iter().any(|d| !(d.inv_depth > 0.0)) {
            log::trace!("Culled triangle behind the camera");
            return TriangleOutcome::Culled;
        }

        let Some(bbox) = BoundingBox::of(device, self.width(), self.height()) else {
            return TriangleOutcome::Culled;
        };

        let [v0, v1, v2] = device.map(|d| Vector2::new(d.x, d.y));
        let area = edge_function(&v0, &v1, &v2);
        if area == 0.0 {
            log::trace!("Skipped degenerate triangle");
            return TriangleOutcome::Degenerate;
        }

        let inv_depth = device.map(|d| d.inv_depth);
        let cam_positions = triangle.vertices.map(|v| camera.to_camera(&v.position));
        let cam_normals = triangle.vertices.map(|v| camera.to_camera(&v.normal));
        let uvs = triangle.vertices.map(|v| v.uv);

        let mut shaded = 0;
        for y in bbox.min_y..=bbox.max_y {
            for x in bbox.min_x..=bbox.max_x {
                let center = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let weights = barycentric(device, area, &center);
                if weights.iter().any(|&w| w < 0.0) {
                    continue;
                }

                let z = interpolate_depth(&weights, &inv_depth);
                if !self.depth.test_and_set(x as usize, y as usize, z) {
                    continue;
                }

                let position = perspective_interpolate(&weights, &inv_depth, z, cam_positions);
                let normal = perspective_interpolate(&weights, &inv_depth, z, cam_normals);
                let normal: Vector4<f32> = normal.xyz().normalize().push(0.0);
                let uv = perspective_interpolate(&weights, &inv_depth, z, uvs);

                sink.put_pixel(x, y, shader.shade(&position, &normal, &uv));
                shaded += 1;
            }
        }

        TriangleOutcome::Drawn(shaded)
    }
}
