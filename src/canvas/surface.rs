use eframe::egui::{Color32, ColorImage};
use rayon::prelude::*;

use crate::utils::color::{Color, alpha_over, blend_erase};

/// A rectangle already clipped to surface bounds, in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// The logical pixel buffer being edited: straight-alpha RGBA, row-major.
///
/// Every drawing primitive mutates this buffer in place; resize and crop
/// reallocate it but copy the previous content across first.
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

impl Surface {
    pub fn new(width: usize, height: usize, fill: Color32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    /// Flat index for a coordinate, or `None` when it lies outside the buffer.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color32> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color32) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Composite one source sample onto the buffer, painting or erasing.
    pub fn composite_pixel(&mut self, x: i32, y: i32, src: Color, erase: bool) {
        if let Some(idx) = self.index(x, y) {
            let dst = Color::from_color32(self.pixels[idx]);
            let blended = if erase {
                blend_erase(src, dst)
            } else {
                alpha_over(src, dst)
            };
            self.pixels[idx] = blended.to_color32();
        }
    }

    pub fn fill(&mut self, color: Color32) {
        self.pixels.fill(color);
    }

    /// Clip an arbitrary signed rectangle to the buffer, dropping empty results.
    pub fn clip_rect(&self, x: i32, y: i32, width: i32, height: i32) -> Option<PixelRect> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.width as i32);
        let y1 = (y + height).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        })
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Color32) {
        for row in rect.y..rect.y + rect.height {
            let start = row * self.width + rect.x;
            self.pixels[start..start + rect.width].fill(color);
        }
    }

    /// Copy out the pixels of a clipped rectangle as a detached buffer.
    pub fn extract(&self, rect: PixelRect) -> Vec<Color32> {
        let mut out = Vec::with_capacity(rect.width * rect.height);
        for row in rect.y..rect.y + rect.height {
            let start = row * self.width + rect.x;
            out.extend_from_slice(&self.pixels[start..start + rect.width]);
        }
        out
    }

    /// Overwrite a region with raw source pixels, clipping to the buffer.
    pub fn blit_copy(&mut self, x: i32, y: i32, src_w: usize, src_h: usize, src: &[Color32]) {
        debug_assert_eq!(src.len(), src_w * src_h);
        let Some(rect) = self.clip_rect(x, y, src_w as i32, src_h as i32) else {
            return;
        };
        let src_x0 = (rect.x as i32 - x) as usize;
        let src_y0 = (rect.y as i32 - y) as usize;
        for row in 0..rect.height {
            let dst_start = (rect.y + row) * self.width + rect.x;
            let src_start = (src_y0 + row) * src_w + src_x0;
            self.pixels[dst_start..dst_start + rect.width]
                .copy_from_slice(&src[src_start..src_start + rect.width]);
        }
    }

    /// Alpha-composite a source buffer over a region, clipping to the buffer.
    pub fn blit_over(&mut self, x: i32, y: i32, src_w: usize, src_h: usize, src: &[Color32]) {
        debug_assert_eq!(src.len(), src_w * src_h);
        let Some(rect) = self.clip_rect(x, y, src_w as i32, src_h as i32) else {
            return;
        };
        let src_x0 = (rect.x as i32 - x) as usize;
        let src_y0 = (rect.y as i32 - y) as usize;
        for row in 0..rect.height {
            let dst_start = (rect.y + row) * self.width + rect.x;
            let src_start = (src_y0 + row) * src_w + src_x0;
            for col in 0..rect.width {
                let s = Color::from_color32(src[src_start + col]);
                if s.a <= 0.0 {
                    continue;
                }
                let d = Color::from_color32(self.pixels[dst_start + col]);
                self.pixels[dst_start + col] = alpha_over(s, d).to_color32();
            }
        }
    }

    /// Swap in a whole new buffer, e.g. from a history snapshot or crop.
    pub fn replace(&mut self, width: usize, height: usize, pixels: Vec<Color32>) {
        debug_assert_eq!(pixels.len(), width * height);
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixels = pixels;
    }

    /// Resize keeping content anchored at the top-left origin: old pixels are
    /// clipped or padded with the background, never rescaled.
    pub fn resize_keep(&mut self, new_w: usize, new_h: usize, background: Color32) {
        let new_w = new_w.max(1);
        let new_h = new_h.max(1);
        let old_w = self.width;
        let old_h = self.height;
        let old = std::mem::replace(&mut self.pixels, vec![background; new_w * new_h]);
        self.width = new_w;
        self.height = new_h;
        self.blit_copy(0, 0, old_w, old_h.min(new_h), &old[..old_w * old_h.min(new_h)]);
    }

    /// Resize stretching the old content over the new dimensions.
    pub fn resize_scaled(&mut self, new_w: usize, new_h: usize) {
        let new_w = new_w.max(1);
        let new_h = new_h.max(1);
        let old_w = self.width;
        let old_h = self.height;
        let old = std::mem::take(&mut self.pixels);

        let mut pixels = vec![Color32::TRANSPARENT; new_w * new_h];
        pixels
            .par_chunks_mut(new_w)
            .enumerate()
            .for_each(|(y, row)| {
                let sy = (((y as f32 + 0.5) * old_h as f32 / new_h as f32) as usize)
                    .min(old_h - 1);
                for (x, px) in row.iter_mut().enumerate() {
                    let sx = (((x as f32 + 0.5) * old_w as f32 / new_w as f32) as usize)
                        .min(old_w - 1);
                    *px = old[sy * old_w + sx];
                }
            });

        self.width = new_w;
        self.height = new_h;
        self.pixels = pixels;
    }

    /// Flatten into egui's texture upload format.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: [self.width, self.height],
            pixels: self.pixels.clone(),
        }
    }
}
