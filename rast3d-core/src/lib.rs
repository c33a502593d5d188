/// rast3d Core Library - software rasterization pipeline
///
/// Loads triangulated OBJ meshes, generates procedural surface coordinates,
/// projects and rasterizes triangles against a depth buffer, and shades each
/// pixel with Phong lighting and a checker pattern. Display and input are
/// left to the caller through the `PixelSink` trait.

pub mod config;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod projection;
pub mod raster;
pub mod shading;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use geometry::{DevicePoint, Mesh, Triangle, VertexAttributes};
pub use obj::MeshLoader;
pub use projection::{Camera, Projector};
pub use raster::{DepthBuffer, FrameBuffer, PixelSink, RenderContext, RenderStats, TriangleOutcome};
pub use shading::{Checker, Light, PhongShader, SurfacePattern};
pub use surface::generate_surface_coords;
pub use transform::{transform_mesh, Transform};
