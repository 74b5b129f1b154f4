//! CPU raster surface backed by an `image` canvas

use anyhow::{Context, Result};
use bubble_particles::DrawSurface;
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::rc::Rc;

/// Paints bubbles into an RGBA canvas with nearest-neighbour scaling
pub struct ImageSurface {
    canvas: RgbaImage,
    background: Rgba<u8>,
    dirty: bool,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, background),
            background,
            dirty: false,
        }
    }

    /// Reset to the background colour
    pub fn clear(&mut self) {
        for px in self.canvas.pixels_mut() {
            *px = self.background;
        }
    }

    /// Whether a redraw was requested since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.canvas
            .save(path)
            .with_context(|| format!("Failed to write frame '{}'", path.display()))
    }
}

impl DrawSurface for ImageSurface {
    type Image = Rc<RgbaImage>;

    fn draw(&mut self, image: &Rc<RgbaImage>, x: i32, y: i32, width: i32, height: i32, alpha: u8) {
        if width <= 0 || height <= 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let (cw, ch) = (self.canvas.width() as i32, self.canvas.height() as i32);

        for dy in 0..height {
            let py = y + dy;
            if py < 0 || py >= ch {
                continue;
            }
            let sy = (dy as u32 * image.height()) / height as u32;
            for dx in 0..width {
                let px = x + dx;
                if px < 0 || px >= cw {
                    continue;
                }
                let sx = (dx as u32 * image.width()) / width as u32;
                let src = image.get_pixel(sx, sy);
                let dst = self.canvas.get_pixel_mut(px as u32, py as u32);
                blend(dst, src, alpha);
            }
        }
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }
}

/// Source-over blend with an extra global opacity
fn blend(dst: &mut Rgba<u8>, src: &Rgba<u8>, alpha: u8) {
    let a = (src[3] as u32 * alpha as u32) / 255;
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = ((src[c] as u32 * a + dst[c] as u32 * inv) / 255) as u8;
    }
    dst[3] = (a + (dst[3] as u32 * inv) / 255).min(255) as u8;
}

/// A soft pink disc with a highlight, used when no sprite is supplied
pub fn generated_sprite(size: u32) -> RgbaImage {
    let r = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let fx = x as f32 + 0.5 - r;
        let fy = y as f32 + 0.5 - r;
        let d = (fx * fx + fy * fy).sqrt() / r;
        if d > 1.0 {
            return Rgba([0, 0, 0, 0]);
        }
        // Highlight toward the upper left
        let hx = fx + r * 0.35;
        let hy = fy + r * 0.35;
        let h = ((hx * hx + hy * hy).sqrt() / r).min(1.0);
        let shine = ((1.0 - h) * 120.0) as u8;
        let edge = ((1.0 - d) * 4.0).min(1.0);
        Rgba([
            235u8.saturating_add(shine / 4),
            80u8.saturating_add(shine),
            120u8.saturating_add(shine),
            (edge * 255.0) as u8,
        ])
    })
}
