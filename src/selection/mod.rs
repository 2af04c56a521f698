pub mod clipboard;

use crate::canvas::surface::{PixelRect, Surface};
use crate::utils::vector::Vec2;

/// A marquee region: the anchor is fixed at pointer-down and the signed
/// width/height grow or shrink as the pointer moves. Only the rendered or
/// extracted bounding box is normalized, never the anchor itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRegion {
    pub anchor: Vec2,
    pub width: f32,
    pub height: f32,
}

impl SelectionRegion {
    fn at(anchor: Vec2) -> Self {
        Self {
            anchor,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Non-negative bounding box as `(x, y, width, height)` via min/max of
    /// the anchor and anchor+delta corners.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let x0 = self.anchor.x.min(self.anchor.x + self.width);
        let y0 = self.anchor.y.min(self.anchor.y + self.height);
        (x0, y0, self.width.abs(), self.height.abs())
    }

    /// Normalized box snapped to whole pixels and clipped to the surface.
    pub fn pixel_rect(&self, surface: &Surface) -> Option<PixelRect> {
        let (x, y, w, h) = self.normalized();
        surface.clip_rect(
            x.round() as i32,
            y.round() as i32,
            w.round() as i32,
            h.round() as i32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging,
    Selected,
}

/// Marquee drag state machine shared by the select and crop tools.
pub struct Marquee {
    region: Option<SelectionRegion>,
    phase: Phase,
}

impl Marquee {
    pub fn new() -> Self {
        Self {
            region: None,
            phase: Phase::Idle,
        }
    }

    /// Pointer-down: fix the anchor and start a zero-sized region.
    pub fn begin(&mut self, pos: Vec2) {
        self.region = Some(SelectionRegion::at(pos));
        self.phase = Phase::Dragging;
    }

    /// Pointer-move: update the signed extent relative to the fixed anchor.
    pub fn update(&mut self, pos: Vec2) {
        if self.phase != Phase::Dragging {
            return;
        }
        if let Some(region) = &mut self.region {
            region.width = pos.x - region.anchor.x;
            region.height = pos.y - region.anchor.y;
        }
    }

    /// Pointer-up: retain the region, no further growth.
    pub fn finish(&mut self) {
        if self.phase == Phase::Dragging {
            self.phase = Phase::Selected;
        }
    }

    pub fn clear(&mut self) {
        self.region = None;
        self.phase = Phase::Idle;
    }

    pub fn region(&self) -> Option<SelectionRegion> {
        self.region
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    /// A settled region that copy/cut/crop may act on.
    pub fn selected_region(&self) -> Option<SelectionRegion> {
        if self.phase == Phase::Selected {
            self.region
        } else {
            None
        }
    }
}
