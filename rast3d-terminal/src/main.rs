/// rast3d terminal viewer
///
/// Renders a triangulated OBJ mesh with the software rasterizer, either
/// interactively in the terminal or once to a PNG file.
/// Controls:
///   - W/S/A/D: Move the camera up/down/left/right
///   - Q/E: Move the camera away from/towards the model
///   - I/J/K/L: Rotate the model about X+/Y+/X-/Y-
///   - ESC: Quit
use clap::Parser;
use rast3d_core::{generate_surface_coords, FrameBuffer, Mesh, MeshLoader, RenderConfig};
use rast3d_terminal::{png, TerminalApp, Viewer};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "rast3d-terminal",
    about = "Software rasterizer for triangulated OBJ meshes",
    version
)]
struct Args {
    /// OBJ file with vertex normals; a cube is shown when omitted
    mesh: Option<PathBuf>,

    /// TOML render configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render one frame at the configured size to this PNG and exit
    #[arg(long)]
    png: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let mut mesh = match &args.mesh {
        Some(path) => MeshLoader::load(path)?,
        None => {
            log::info!("No mesh given, using the default cube");
            Mesh::cube(2.0)
        }
    };
    generate_surface_coords(&mut mesh);

    if let Some(output) = &args.png {
        let mut viewer = Viewer::new(mesh, &config, config.width, config.height);
        let mut frame = FrameBuffer::new(config.width as usize, config.height as usize);
        viewer.render_frame(&mut frame);
        png::save_png(&frame, output)?;
        return Ok(());
    }

    let mut app = TerminalApp::new(mesh, &config)?;
    app.run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("rast3d-terminal: {}", e);
            ExitCode::FAILURE
        }
    }
}
