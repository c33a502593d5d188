/// Terminal front end for the rast3d software rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rast3d_core::{Mesh, RenderConfig, RenderStats};
use std::io::{self, stdout, Write};
use std::time::Instant;

pub mod png;
pub mod renderer;
pub mod viewer;

pub use renderer::TerminalRenderer;
pub use viewer::{Command, Viewer};

/// Event-driven terminal application: a frame is drawn only after a key that changes the scene
pub struct TerminalApp {
    viewer: Viewer,
    renderer: TerminalRenderer,
    redraw: bool,
    show_help: bool,
    last_stats: RenderStats,
    last_frame_ms: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &RenderConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let size = TerminalRenderer::raster_size(columns, rows);

        Ok(Self {
            viewer: Viewer::new(mesh, config, size as u32, size as u32),
            renderer: TerminalRenderer::new(size, size),
            redraw: true,
            show_help: true,
            last_stats: RenderStats::default(),
            last_frame_ms: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.viewer.is_running() {
            if self.redraw {
                self.render()?;
                self.redraw = false;
            }
            self.handle_event(event::read()?)?;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                let command = match code {
                    KeyCode::Esc => Command::Quit,
                    KeyCode::Char(c) => Command::from_char(c),
                    _ => Command::Help,
                };
                self.redraw = self.viewer.apply(command);
                self.show_help = command == Command::Help;
                if command == Command::Help {
                    self.draw_status()?;
                }
            }
            Event::Resize(columns, rows) => {
                let size = TerminalRenderer::raster_size(columns, rows);
                self.viewer.resize(size as u32, size as u32);
                self.renderer = TerminalRenderer::new(size, size);
                execute!(stdout(), terminal::Clear(ClearType::All))?;
                self.redraw = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let start = Instant::now();
        self.renderer.clear();
        self.last_stats = self.viewer.render_frame(&mut self.renderer);
        self.last_frame_ms = start.elapsed().as_secs_f32() * 1000.0;

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, 1)?;
        self.draw_status()?;
        stdout.flush()
    }

    fn draw_status(&self) -> io::Result<()> {
        let mut stdout = stdout();
        let position = self.viewer.camera().position();
        let text = if self.show_help {
            viewer::HELP.to_string()
        } else {
            format!(
                "rast3d | camera ({:.1}, {:.1}, {:.1}) | {} drawn, {} culled | {:.0} ms | any other key: help",
                position.x,
                position.y,
                position.z,
                self.last_stats.drawn,
                self.last_stats.culled,
                self.last_frame_ms
            )
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(text),
            ResetColor
        )?;
        stdout.flush()
    }
}
