/// Scene state driven by discrete commands, independent of any display
use nalgebra::Matrix4;
use rast3d_core::{
    transform_mesh, Camera, Checker, Mesh, PhongShader, PixelSink, RenderConfig, RenderContext,
    RenderStats, Transform,
};

/// A discrete user request between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CameraUp,
    CameraDown,
    CameraLeft,
    CameraRight,
    /// Move the camera away from the model (+Z)
    CameraAway,
    /// Move the camera towards the model (−Z)
    CameraCloser,
    RotateXPositive,
    RotateYPositive,
    RotateXNegative,
    RotateYNegative,
    Help,
    Quit,
}

impl Command {
    /// Key bindings: WASD/QE move the camera, IJKL rotate the model, Esc quits
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'w' => Command::CameraUp,
            's' => Command::CameraDown,
            'a' => Command::CameraLeft,
            'd' => Command::CameraRight,
            'q' => Command::CameraAway,
            'e' => Command::CameraCloser,
            'i' => Command::RotateXPositive,
            'j' => Command::RotateYPositive,
            'k' => Command::RotateXNegative,
            'l' => Command::RotateYNegative,
            _ => Command::Help,
        }
    }
}

pub const HELP: &str = "W/S/A/D=Move camera  Q/E=Away/Closer  I/J/K/L=Rotate X+/Y+/X-/Y-  Esc=Quit";

/// Mesh, camera and render context for one viewing session
pub struct Viewer {
    mesh: Mesh,
    camera: Camera,
    shader: PhongShader<Checker>,
    context: RenderContext,
    pending: Matrix4<f32>,
    camera_step: f32,
    rotation_step: f32,
    running: bool,
}

impl Viewer {
    /// The raster size comes from the caller so the terminal can override the configured one.
    pub fn new(mesh: Mesh, config: &RenderConfig, width: u32, height: u32) -> Self {
        Self {
            mesh,
            camera: Camera::at_distance(config.camera_distance),
            shader: PhongShader::new(config.lights.clone(), Checker::new(config.checker_tiles)),
            context: RenderContext::new(width, height, config.near, config.ndc_scale, config.far),
            pending: Transform::identity(),
            camera_step: config.camera_step,
            rotation_step: config.rotation_step_degrees,
            running: true,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the render context after the output surface changed size
    pub fn resize(&mut self, width: u32, height: u32) {
        let projector = *self.context.projector();
        let far = self.context.depth_buffer().far();
        self.context = RenderContext::new(width, height, projector.near, projector.ndc_scale, far);
    }

    /// Apply a command. Returns whether the scene needs to be drawn again.
    pub fn apply(&mut self, command: Command) -> bool {
        let step = self.camera_step;
        let rotation = self.rotation_step;
        match command {
            Command::CameraUp => self.camera.translate(0.0, step, 0.0),
            Command::CameraDown => self.camera.translate(0.0, -step, 0.0),
            Command::CameraLeft => self.camera.translate(-step, 0.0, 0.0),
            Command::CameraRight => self.camera.translate(step, 0.0, 0.0),
            Command::CameraAway => self.camera.translate(0.0, 0.0, step),
            Command::CameraCloser => self.camera.translate(0.0, 0.0, -step),
            Command::RotateXPositive => self.queue_rotation(Transform::rotation_x_degrees(rotation)),
            Command::RotateYPositive => self.queue_rotation(Transform::rotation_y_degrees(rotation)),
            Command::RotateXNegative => self.queue_rotation(Transform::rotation_x_degrees(-rotation)),
            Command::RotateYNegative => self.queue_rotation(Transform::rotation_y_degrees(-rotation)),
            Command::Help => return false,
            Command::Quit => {
                self.running = false;
                return false;
            }
        }
        log::debug!("Applied {:?}", command);
        true
    }

    fn queue_rotation(&mut self, rotation: Matrix4<f32>) {
        self.pending = rotation * self.pending;
    }

    /// Apply the queued model rotation once, then render the frame into `sink`.
    pub fn render_frame<S: PixelSink + ?Sized>(&mut self, sink: &mut S) -> RenderStats {
        transform_mesh(&mut self.mesh, &self.pending);
        self.pending = Transform::identity();

        let position = self.camera.position();
        log::info!(
            "Camera at ({:.2}, {:.2}, {:.2})",
            position.x,
            position.y,
            position.z
        );
        self.context.render(&self.mesh, &self.camera, &self.shader, sink)
    }
}
