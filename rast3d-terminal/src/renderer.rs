/// Half-block color output for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use rast3d_core::{FrameBuffer, PixelSink};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Clamp a shaded color to [0, 1] and scale it to 8 bits per channel
pub fn to_rgb8(color: &Vector3<f32>) -> [u8; 3] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Pixel sink that presents a frame as terminal cells, two pixel rows per line
pub struct TerminalRenderer {
    frame: FrameBuffer,
}

impl TerminalRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
        }
    }

    /// Largest square raster that fits in a terminal of `columns` × `rows`,
    /// keeping one row free for the status line.
    pub fn raster_size(columns: u16, rows: u16) -> usize {
        let rows = rows.saturating_sub(1) as usize;
        (columns as usize).min(rows * 2).max(1)
    }

    pub fn clear(&mut self) {
        self.frame.clear();
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    fn rgb(&self, x: usize, y: usize) -> Color {
        if y >= self.frame.height() {
            return Color::Black;
        }
        let [r, g, b] = to_rgb8(&self.frame.get(x, y));
        Color::Rgb { r, g, b }
    }

    /// Queue the frame starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let lines = (self.frame.height() + 1) / 2;
        for line in 0..lines {
            writer.queue(cursor::MoveTo(0, top + line as u16))?;
            for x in 0..self.frame.width() {
                writer.queue(SetForegroundColor(self.rgb(x, line * 2)))?;
                writer.queue(SetBackgroundColor(self.rgb(x, line * 2 + 1)))?;
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl PixelSink for TerminalRenderer {
    fn put_pixel(&mut self, x: u32, y: u32, color: Vector3<f32>) {
        self.frame.put_pixel(x, y, color);
    }
}
