use std::io::Cursor;

use eframe::egui::Color32;
use image::{ImageFormat, RgbImage, RgbaImage, imageops};
use rayon::prelude::*;

use crate::canvas::surface::Surface;

/// Image containers the surface can be exported to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    PNG,
    JPEG,
    GIF,
    BMP,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::PNG,
            ExportFormat::JPEG,
            ExportFormat::GIF,
            ExportFormat::BMP,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "PNG",
            ExportFormat::JPEG => "JPEG",
            ExportFormat::GIF => "GIF",
            ExportFormat::BMP => "BMP",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::PNG => "png",
            ExportFormat::JPEG => "jpg",
            ExportFormat::GIF => "gif",
            ExportFormat::BMP => "bmp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::PNG => ImageFormat::Png,
            ExportFormat::JPEG => ImageFormat::Jpeg,
            ExportFormat::GIF => ImageFormat::Gif,
            ExportFormat::BMP => ImageFormat::Bmp,
        }
    }
}

/// Serialize the surface into encoded image bytes. JPEG carries no alpha
/// channel, so transparency is flattened onto a white background first.
pub fn encode_surface(surface: &Surface, format: ExportFormat) -> Result<Vec<u8>, String> {
    let width = surface.width();
    let height = surface.height();
    let mut out = Cursor::new(Vec::new());

    match format {
        ExportFormat::JPEG => {
            let mut bytes = vec![0u8; width * height * 3];
            bytes
                .par_chunks_mut(width * 3)
                .zip(surface.pixels().par_chunks(width))
                .for_each(|(row, src)| {
                    for (dst, px) in row.chunks_mut(3).zip(src) {
                        let [r, g, b, a] = px.to_srgba_unmultiplied();
                        let a = a as u32;
                        // White shows through wherever the surface is transparent.
                        dst[0] = ((r as u32 * a + 255 * (255 - a)) / 255) as u8;
                        dst[1] = ((g as u32 * a + 255 * (255 - a)) / 255) as u8;
                        dst[2] = ((b as u32 * a + 255 * (255 - a)) / 255) as u8;
                    }
                });
            let img = RgbImage::from_raw(width as u32, height as u32, bytes)
                .ok_or_else(|| "failed to build RGB image".to_string())?;
            img.write_to(&mut out, ImageFormat::Jpeg)
                .map_err(|e| e.to_string())?;
        }
        _ => {
            let mut bytes = vec![0u8; width * height * 4];
            bytes
                .par_chunks_mut(width * 4)
                .zip(surface.pixels().par_chunks(width))
                .for_each(|(row, src)| {
                    for (dst, px) in row.chunks_mut(4).zip(src) {
                        dst.copy_from_slice(&px.to_srgba_unmultiplied());
                    }
                });
            let img = RgbaImage::from_raw(width as u32, height as u32, bytes)
                .ok_or_else(|| "failed to build RGBA image".to_string())?;
            img.write_to(&mut out, format.image_format())
                .map_err(|e| e.to_string())?;
        }
    }

    Ok(out.into_inner())
}

/// Decode externally supplied image bytes into the surface's pixel format.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, String> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Resample a decoded image to the given dimensions and convert its pixels.
pub fn scaled_pixels(img: &RgbaImage, width: usize, height: usize) -> Vec<Color32> {
    let scaled = imageops::resize(
        img,
        width.max(1) as u32,
        height.max(1) as u32,
        imageops::FilterType::Triangle,
    );
    scaled
        .pixels()
        .map(|p| Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_through_decode() {
        let mut surface = Surface::new(10, 6, Color32::TRANSPARENT);
        surface.set_pixel(3, 2, Color32::from_rgba_unmultiplied(200, 10, 10, 255));
        let bytes = encode_surface(&surface, ExportFormat::PNG).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 6));
        assert_eq!(decoded.get_pixel(3, 2).0, [200, 10, 10, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn jpeg_flattens_transparency_onto_white() {
        let surface = Surface::new(8, 8, Color32::TRANSPARENT);
        let bytes = encode_surface(&surface, ExportFormat::JPEG).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        let px = decoded.get_pixel(4, 4).0;
        assert!(px[0] > 240 && px[1] > 240 && px[2] > 240);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn bmp_and_gif_encode_nonempty_output() {
        let surface = Surface::new(4, 4, Color32::WHITE);
        for format in [ExportFormat::BMP, ExportFormat::GIF] {
            let bytes = encode_surface(&surface, format).unwrap();
            assert!(!bytes.is_empty(), "{} produced no bytes", format.label());
        }
    }

    #[test]
    fn malformed_bytes_decode_to_an_error() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn scaled_pixels_match_requested_dimensions() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]));
        let pixels = scaled_pixels(&img, 5, 3);
        assert_eq!(pixels.len(), 15);
        assert!(pixels.iter().all(|p| p.a() == 255));
    }
}
