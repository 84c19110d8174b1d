// Headless rendering: run the starfield against an in-memory frame buffer and
// write the final frame as a PNG. No window or display needed.

use crate::error::Error;
use crate::starfield::Starfield;
use crate::types::FrameBuffer;
use image::{ImageBuffer, Rgb, RgbImage};
use rand::Rng;
use std::path::Path;
use tracing::info;

/// What to render. Frames are spaced 1/60 s apart starting at `start_ms`.
#[derive(Debug, Clone)]
pub struct SnapshotPlan {
    pub width: usize,
    pub height: usize,
    pub frames: u32,
    pub pointer: Option<(f32, f32)>,
    pub start_ms: f64,
}

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Render the plan and return the last frame.
pub fn render<R: Rng>(plan: &SnapshotPlan, rng: R) -> FrameBuffer {
    let mut field = Starfield::new(rng);
    field.resize(plan.width, plan.height);
    if let Some((x, y)) = plan.pointer {
        field.set_pointer(x, y);
    }

    let mut screen = FrameBuffer::new(plan.width, plan.height);
    for i in 0..plan.frames.max(1) {
        field.frame(&mut screen, plan.start_ms + i as f64 * FRAME_MS);
    }
    screen
}

/// Unpack 0x00RRGGBB pixels into an RGB image.
pub fn to_image(frame: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(frame.width as u32, frame.height as u32, |x, y| {
        let px = frame.pixels[y as usize * frame.width + x as usize];
        Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
    })
}

pub fn write_png(frame: &FrameBuffer, out: &Path) -> Result<(), Error> {
    to_image(frame)
        .save(out)
        .map_err(|e| Error::Snapshot(format!("{}: {e}", out.display())))?;
    info!(path = %out.display(), "snapshot written");
    Ok(())
}
