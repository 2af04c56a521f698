use eframe::egui::{Color32, ColorImage};

use crate::canvas::surface::Surface;
use crate::utils::vector::Vec2;

/// A detached pixel buffer produced by copy or cut. Lives independently of
/// the surface it came from.
#[derive(Clone)]
pub struct ClipboardBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color32>,
}

/// A floating pasted buffer pending commit. Renders on top of the surface
/// and can be dragged around; its pixels reach the surface only on bake.
pub struct PastedOverlay {
    buffer: ClipboardBuffer,
    pos: Vec2,
    dragging: bool,
    last_drag_pos: Vec2,
}

impl PastedOverlay {
    pub fn new(buffer: ClipboardBuffer, pos: Vec2) -> Self {
        Self {
            buffer,
            pos,
            dragging: false,
            last_drag_pos: pos,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> (usize, usize) {
        (self.buffer.width, self.buffer.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.y >= self.pos.y
            && p.x < self.pos.x + self.buffer.width as f32
            && p.y < self.pos.y + self.buffer.height as f32
    }

    pub fn begin_drag(&mut self, p: Vec2) {
        self.dragging = true;
        self.last_drag_pos = p;
    }

    /// Translate by the pointer delta while a drag is active.
    pub fn drag_to(&mut self, p: Vec2) {
        if !self.dragging {
            return;
        }
        self.pos = self.pos + (p - self.last_drag_pos);
        self.last_drag_pos = p;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Composite the overlay pixels into the surface at the current position.
    pub fn bake(&self, surface: &mut Surface) {
        surface.blit_over(
            self.pos.x.round() as i32,
            self.pos.y.round() as i32,
            self.buffer.width,
            self.buffer.height,
            &self.buffer.pixels,
        );
    }

    /// Texture upload format for the shell's floating rendering.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: [self.buffer.width, self.buffer.height],
            pixels: self.buffer.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_2x2(color: Color32) -> ClipboardBuffer {
        ClipboardBuffer {
            width: 2,
            height: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn drag_translates_by_pointer_delta() {
        let mut overlay = PastedOverlay::new(buffer_2x2(Color32::RED), Vec2::new(10.0, 10.0));
        overlay.begin_drag(Vec2::new(11.0, 11.0));
        overlay.drag_to(Vec2::new(16.0, 8.0));
        assert_eq!(overlay.pos(), Vec2::new(15.0, 7.0));
        overlay.end_drag();
        overlay.drag_to(Vec2::new(100.0, 100.0));
        assert_eq!(overlay.pos(), Vec2::new(15.0, 7.0));
    }

    #[test]
    fn hit_test_uses_current_position() {
        let mut overlay = PastedOverlay::new(buffer_2x2(Color32::RED), Vec2::new(4.0, 4.0));
        assert!(overlay.contains(Vec2::new(5.0, 5.0)));
        assert!(!overlay.contains(Vec2::new(6.5, 5.0)));
        overlay.begin_drag(Vec2::new(5.0, 5.0));
        overlay.drag_to(Vec2::new(9.0, 5.0));
        assert!(overlay.contains(Vec2::new(9.0, 5.0)));
    }

    #[test]
    fn bake_composites_at_position() {
        let mut surface = Surface::new(8, 8, Color32::WHITE);
        let overlay = PastedOverlay::new(buffer_2x2(Color32::RED), Vec2::new(3.0, 3.0));
        overlay.bake(&mut surface);
        assert_eq!(surface.pixel(3, 3), Some(Color32::RED));
        assert_eq!(surface.pixel(4, 4), Some(Color32::RED));
        assert_eq!(surface.pixel(5, 5), Some(Color32::WHITE));
    }
}
