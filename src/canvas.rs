// Persistent paint layer composited over the live feed.
// Black (0) pixels contribute nothing when blended, so erasing is painting black.
// Visual: strokes float over the video at half strength and stay put while the
// camera image underneath keeps moving.

use std::path::Path;

use image::RgbImage;

use crate::draw::{draw_thick_line, fill_circle};
use crate::error::Error;
use crate::types::{FrameBuffer, pack_rgb, unpack_rgb};

pub struct Canvas {
    layer: FrameBuffer,
}

impl Canvas {
    /// Empty canvas the size of the video frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self { layer: FrameBuffer::new(width, height) }
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &FrameBuffer {
        &self.layer
    }

    /// Straight segment in `color`, `thickness` pixels wide.
    pub fn stroke(&mut self, from: (i32, i32), to: (i32, i32), color: u32, thickness: u32) {
        draw_thick_line(&mut self.layer, from, to, thickness, color);
    }

    /// Opaque black disc centred on `center`.
    /// Visual: paint under the two raised fingers disappears.
    pub fn erase(&mut self, center: (i32, i32), radius: i32) {
        fill_circle(&mut self.layer, center.0, center.1, radius, 0);
    }

    pub fn clear(&mut self) {
        self.layer.pixels.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.layer.pixels.iter().all(|&p| p == 0)
    }

    /// `frame = saturate(frame * 1.0 + canvas * weight)` per channel.
    pub fn composite_onto(&self, frame: &mut FrameBuffer, weight: f32) -> Result<(), Error> {
        if frame.width != self.layer.width || frame.height != self.layer.height {
            return Err(Error::Composite(format!(
                "Canvas is {}x{} but frame is {}x{}",
                self.layer.width, self.layer.height, frame.width, frame.height
            )));
        }
        for (dst, &src) in frame.pixels.iter_mut().zip(&self.layer.pixels) {
            if src == 0 {
                continue;
            }
            let (fr, fg, fb) = unpack_rgb(*dst);
            let (cr, cg, cb) = unpack_rgb(src);
            let mix = |f: u8, c: u8| (f as f32 + c as f32 * weight).round().clamp(0.0, 255.0) as u8;
            *dst = pack_rgb(mix(fr, cr), mix(fg, cg), mix(fb, cb));
        }
        Ok(())
    }

    /// Write the canvas as an image file (format from the extension), replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let img = RgbImage::from_fn(self.layer.width as u32, self.layer.height as u32, |x, y| {
            let px = self.layer.pixels[y as usize * self.layer.width + x as usize];
            let (r, g, b) = unpack_rgb(px);
            image::Rgb([r, g, b])
        });
        img.save(path)
            .map_err(|e| Error::Save(format!("{}: {e}", path.display())))
    }
}
