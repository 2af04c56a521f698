use crate::brush_engine::brush::{Brush, BrushStyle};
use crate::canvas::surface::Surface;
use crate::utils::color::Color;
use crate::utils::vector::Vec2;

/// Per-stroke state: the last logical point, the spacing accumulator, and
/// the arc length travelled so far (drives the textured dash phase).
pub struct StrokeState {
    last_pos: Option<Vec2>,
    dist_until_next_dab: f32,
    travel: f32,
    erase: bool,
}

impl StrokeState {
    pub fn new(erase: bool) -> Self {
        Self {
            last_pos: None,
            dist_until_next_dab: 0.0,
            travel: 0.0,
            erase,
        }
    }

    pub fn last_pos(&self) -> Option<Vec2> {
        self.last_pos
    }

    pub fn is_erase(&self) -> bool {
        self.erase
    }

    /// Feed the next pointer sample: the first sample stamps a single dab,
    /// later samples interpolate dabs along the connecting segment.
    pub fn add_point(&mut self, surface: &mut Surface, brush: &mut Brush, color: Color, pos: Vec2) {
        let spacing = brush.spacing();

        if let Some(prev) = self.last_pos {
            let delta = pos - prev;
            let mut dist_left = delta.length();
            if dist_left == 0.0 {
                return;
            }

            let unit_step = delta / dist_left;
            let mut cur_pos = prev;

            while dist_left >= self.dist_until_next_dab {
                cur_pos = cur_pos + unit_step * self.dist_until_next_dab;
                dist_left -= self.dist_until_next_dab;
                self.travel += self.dist_until_next_dab;

                if dash_on(brush, self.travel) {
                    brush.dab(surface, cur_pos, color, self.erase);
                }

                self.dist_until_next_dab = spacing;
            }

            // Partial step to land exactly on the sample.
            self.dist_until_next_dab -= dist_left;
            self.travel += dist_left;
        } else {
            if dash_on(brush, 0.0) {
                brush.dab(surface, pos, color, self.erase);
            }
            self.dist_until_next_dab = spacing;
        }

        self.last_pos = Some(pos);
    }

    /// Reset the stroke; the next sample starts a fresh segment chain.
    pub fn end(&mut self) {
        self.last_pos = None;
        self.dist_until_next_dab = 0.0;
        self.travel = 0.0;
    }
}

/// Whether a dab at the given arc length falls on a dash rather than a gap.
/// Non-textured styles always stamp.
pub fn dash_on(brush: &Brush, travel: f32) -> bool {
    if brush.style != BrushStyle::Textured {
        return true;
    }
    (travel / brush.dash_period()) as u32 % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Color32;

    fn opaque_count(surface: &Surface) -> usize {
        surface.pixels().iter().filter(|p| p.a() > 0).count()
    }

    #[test]
    fn segment_is_continuous_for_hard_style() {
        let mut surface = Surface::new(64, 16, Color32::TRANSPARENT);
        let mut brush = Brush::new(4.0, 1.0);
        brush.style = BrushStyle::Hard;
        let mut stroke = StrokeState::new(false);

        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(4.0, 8.0));
        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(60.0, 8.0));

        // Every column the stroke crossed has paint in it.
        for x in 4..=60 {
            let hit = (0..16).any(|y| surface.pixel(x, y).unwrap().a() > 0);
            assert!(hit, "gap at column {x}");
        }
    }

    #[test]
    fn textured_style_leaves_gaps() {
        let mut surface = Surface::new(128, 16, Color32::TRANSPARENT);
        let mut brush = Brush::new(4.0, 1.0);
        brush.style = BrushStyle::Textured;
        let mut stroke = StrokeState::new(false);

        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(4.0, 8.0));
        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(124.0, 8.0));

        let mut gap_cols = 0;
        for x in 4..=124 {
            let hit = (0..16).any(|y| surface.pixel(x, y).unwrap().a() > 0);
            if !hit {
                gap_cols += 1;
            }
        }
        assert!(gap_cols > 0, "textured stroke came out solid");
    }

    #[test]
    fn end_resets_the_chain() {
        let mut surface = Surface::new(64, 64, Color32::TRANSPARENT);
        let mut brush = Brush::new(4.0, 1.0);
        brush.style = BrushStyle::Hard;
        let mut stroke = StrokeState::new(false);

        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(8.0, 8.0));
        stroke.end();
        stroke.add_point(&mut surface, &mut brush, Color::black(), Vec2::new(56.0, 56.0));

        let painted = opaque_count(&surface);
        // Two isolated dabs, no connecting segment between them.
        let single_dab = {
            let mut s = Surface::new(64, 64, Color32::TRANSPARENT);
            brush.dab(&mut s, Vec2::new(8.0, 8.0), Color::black(), false);
            opaque_count(&s)
        };
        assert!(painted <= single_dab * 2);
        assert_eq!(surface.pixel(32, 32).unwrap().a(), 0);
    }
}
