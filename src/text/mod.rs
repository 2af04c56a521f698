use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};

use crate::canvas::surface::Surface;
use crate::utils::color::Color;
use crate::utils::vector::Vec2;

/// Parameters for the text tool.
#[derive(Clone, Debug)]
pub struct TextSettings {
    pub size: f32,
    /// System font family; empty means the platform's default sans-serif.
    pub family: String,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            size: 24.0,
            family: String::new(),
            color: Color::black(),
            bold: false,
            italic: false,
        }
    }
}

/// Resolve the settings to a loaded system font. Weight and style are asked
/// of the font source; bold/italic additionally get a synthetic treatment at
/// stamp time so the flags take effect even without a matching variant.
pub fn load_font(settings: &TextSettings) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::{Properties, Style, Weight};
    use font_kit::source::SystemSource;

    let mut props = Properties::new();
    if settings.bold {
        props.weight = Weight::BOLD;
    }
    if settings.italic {
        props.style = Style::Italic;
    }

    let family = settings.family.trim();
    let families = if family.is_empty() {
        vec![FamilyName::SansSerif]
    } else {
        vec![FamilyName::Title(family.to_string()), FamilyName::SansSerif]
    };

    let handle = SystemSource::new()
        .select_best_match(&families, &props)
        .ok()?;
    let font = handle.load().ok()?;
    let data = font.copy_font_data()?;
    FontArc::try_from_vec((*data).clone()).ok()
}

/// Stamp text onto the surface. The anchor is the top of the glyph box, so
/// the first baseline sits one ascent below it. Supports multiple lines
/// separated by `\n`.
pub fn stamp_text(
    surface: &mut Surface,
    font: &FontArc,
    settings: &TextSettings,
    anchor: Vec2,
    text: &str,
) {
    let size = settings.size.max(1.0);
    let scaled = font.as_scaled(size);
    let ascent = scaled.ascent();
    let line_height = scaled.height();

    for (line_idx, line) in text.split('\n').enumerate() {
        let baseline = anchor.y + ascent + line_idx as f32 * line_height;
        let mut cursor = anchor.x;
        let mut last: Option<GlyphId> = None;

        for ch in line.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = last {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(size, point(cursor, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, cov| {
                    if cov <= 0.0 {
                        return;
                    }
                    let y = bounds.min.y + py as f32;
                    let mut x = bounds.min.x + px as f32;
                    if settings.italic {
                        x += (baseline - y) * 0.2;
                    }
                    let src = settings.color.with_alpha(settings.color.a * cov.min(1.0));
                    let (xi, yi) = (x.round() as i32, y.round() as i32);
                    surface.composite_pixel(xi, yi, src, false);
                    if settings.bold {
                        surface.composite_pixel(xi + 1, yi, src, false);
                    }
                });
            }
            cursor += scaled.h_advance(id);
            last = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Color32;

    // Font availability depends on the host; these tests bail out quietly
    // on systems without any resolvable font.

    #[test]
    fn stamps_coverage_below_the_anchor() {
        let settings = TextSettings::default();
        let Some(font) = load_font(&settings) else {
            return;
        };
        let mut surface = Surface::new(200, 100, Color32::WHITE);
        stamp_text(&mut surface, &font, &settings, Vec2::new(10.0, 20.0), "Hi");

        let painted: Vec<usize> = surface
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != Color32::WHITE)
            .map(|(i, _)| i / 200)
            .collect();
        assert!(!painted.is_empty());
        // Anchor is the top of the glyph box: nothing lands above it.
        assert!(painted.iter().all(|row| *row >= 19));
    }

    #[test]
    fn empty_text_is_a_noop() {
        let settings = TextSettings::default();
        let Some(font) = load_font(&settings) else {
            return;
        };
        let mut surface = Surface::new(50, 50, Color32::WHITE);
        stamp_text(&mut surface, &font, &settings, Vec2::new(10.0, 10.0), "");
        assert!(surface.pixels().iter().all(|p| *p == Color32::WHITE));
    }
}
