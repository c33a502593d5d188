/// Headless output: write a rendered frame to an image file
use image::{ImageResult, Rgb, RgbImage};
use rast3d_core::FrameBuffer;
use std::path::Path;

use crate::renderer::to_rgb8;

pub fn frame_to_image(frame: &FrameBuffer) -> RgbImage {
    RgbImage::from_fn(frame.width() as u32, frame.height() as u32, |x, y| {
        Rgb(to_rgb8(&frame.get(x as usize, y as usize)))
    })
}

pub fn save_png(frame: &FrameBuffer, path: impl AsRef<Path>) -> ImageResult<()> {
    frame_to_image(frame).save(path.as_ref())?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}
