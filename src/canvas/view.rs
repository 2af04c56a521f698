use crate::utils::vector::Vec2;

/// Maps pointer positions from rendered/display space into logical surface
/// coordinates. Rebuilt whenever the displayed rectangle changes; the rest
/// of the engine only ever sees logical coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    origin: Vec2,
    display_size: Vec2,
    logical_size: Vec2,
}

impl ViewTransform {
    pub fn new(origin: Vec2, display_size: Vec2, logical_w: usize, logical_h: usize) -> Self {
        Self {
            origin,
            display_size: Vec2::new(display_size.x.max(1.0), display_size.y.max(1.0)),
            logical_size: Vec2::new(logical_w as f32, logical_h as f32),
        }
    }

    /// Display position -> logical surface position.
    pub fn to_logical(&self, display_pos: Vec2) -> Vec2 {
        let rel = display_pos - self.origin;
        Vec2::new(
            rel.x * self.logical_size.x / self.display_size.x,
            rel.y * self.logical_size.y / self.display_size.y,
        )
    }

    /// Logical surface position -> display position (for overlay rendering).
    pub fn to_display(&self, logical_pos: Vec2) -> Vec2 {
        Vec2::new(
            self.origin.x + logical_pos.x * self.display_size.x / self.logical_size.x,
            self.origin.y + logical_pos.y * self.display_size.y / self.logical_size.y,
        )
    }

    /// Whether a logical position falls inside the surface.
    pub fn in_bounds(&self, logical_pos: Vec2) -> bool {
        logical_pos.x >= 0.0
            && logical_pos.y >= 0.0
            && logical_pos.x < self.logical_size.x
            && logical_pos.y < self.logical_size.y
    }
}
