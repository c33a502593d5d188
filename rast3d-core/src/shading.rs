/// Per-pixel shading
///
/// The rasterizer hands the shader an interpolated camera-space position,
/// a unit normal and a surface coordinate. Lighting is a sum of Phong terms
/// over every light; the result is modulated by a `SurfacePattern`.
use nalgebra::{Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point light with its own Phong coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Ambient coefficient
    pub ka: f32,
    /// Diffuse coefficient
    pub kd: f32,
    /// Specular coefficient
    pub ke: f32,
    pub shininess: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Position in camera space
    pub position: [f32; 3],
}

impl Light {
    pub fn position(&self) -> Vector4<f32> {
        Vector3::from(self.position).push(1.0)
    }

    /// Phong contribution of this light at `point` with unit `normal`
    pub fn contribution(&self, point: &Vector4<f32>, normal: &Vector4<f32>) -> Vector3<f32> {
        let light_dir = (self.position() - point).normalize();
        let lambertian = normal.dot(&light_dir).max(0.0);

        let mut specular = 0.0;
        if lambertian > 0.0 {
            let incident = -light_dir;
            let reflection = incident - normal * (2.0 * normal.dot(&incident));
            let view_dir = -point.xyz().normalize();
            let spec_angle = reflection.xyz().dot(&view_dir).max(0.0);
            specular = spec_angle.powf(self.shininess);
        }

        self.ka * Vector3::from(self.ambient)
            + self.kd * lambertian * Vector3::from(self.diffuse)
            + self.ke * specular * Vector3::from(self.specular)
    }

    /// The two lights the viewer starts with: red and blue diffuse, white highlights
    pub fn default_rig() -> Vec<Light> {
        let light = |diffuse: [f32; 3], x: f32| Light {
            ka: 1.0,
            kd: 1.0,
            ke: 1.0,
            shininess: 5.0,
            ambient: [0.0, 0.0, 0.0],
            diffuse,
            specular: [1.0, 1.0, 1.0],
            position: [x, 5.0, 0.0],
        };
        vec![light([1.0, 0.0, 0.0], -5.0), light([0.0, 0.0, 1.0], 5.0)]
    }
}

/// Texture strategy: maps a surface coordinate to an intensity multiplier
pub trait SurfacePattern {
    fn intensity(&self, uv: &Vector2<f32>) -> f32;
}

/// Two-tone checkerboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checker {
    pub tiles: u32,
    pub bright: f32,
    pub dark: f32,
}

impl Checker {
    pub fn new(tiles: u32) -> Self {
        Self {
            tiles,
            bright: 0.8,
            dark: 0.2,
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(10)
    }
}

impl SurfacePattern for Checker {
    fn intensity(&self, uv: &Vector2<f32>) -> f32 {
        let tiles = self.tiles as f32;
        let u = (uv.x * tiles).rem_euclid(1.0);
        let v = (uv.y * tiles).rem_euclid(1.0);
        if (u > 0.5) ^ (v < 0.5) {
            self.bright
        } else {
            self.dark
        }
    }
}

/// Constant intensity, i.e. no texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plain(pub f32);

impl SurfacePattern for Plain {
    fn intensity(&self, _uv: &Vector2<f32>) -> f32 {
        self.0
    }
}

/// Phong lighting modulated by a surface pattern
#[derive(Debug, Clone)]
pub struct PhongShader<P: SurfacePattern = Checker> {
    pub lights: Vec<Light>,
    pub pattern: P,
}

impl<P: SurfacePattern> PhongShader<P> {
    pub fn new(lights: Vec<Light>, pattern: P) -> Self {
        Self { lights, pattern }
    }

    /// Final color at a point; not clamped.
    pub fn shade(&self, point: &Vector4<f32>, normal: &Vector4<f32>, uv: &Vector2<f32>) -> Vector3<f32> {
        let lit = self
            .lights
            .iter()
            .fold(Vector3::zeros(), |acc, light| acc + light.contribution(point, normal));
        lit * self.pattern.intensity(uv)
    }
}
