pub mod tools;

use eframe::egui::Color32;
use image::RgbaImage;

use crate::brush_engine::brush::Brush;
use crate::brush_engine::stroke::StrokeState;
use crate::canvas::history::History;
use crate::canvas::surface::Surface;
use crate::selection::Marquee;
use crate::selection::SelectionRegion;
use crate::selection::clipboard::{ClipboardBuffer, PastedOverlay};
use crate::shapes;
use crate::text::{self, TextSettings};
use crate::utils::color::Color;
use crate::utils::exporter::{self, ExportFormat};
use crate::utils::vector::Vec2;
use tools::Tool;

/// The single owned editor aggregate: the surface, its history, the active
/// tool and settings, the selection/clipboard state, and the preview
/// overlay. UI layers dispatch pointer events (already mapped to logical
/// coordinates) and read state; all mutation happens in here.
///
/// Every pixel-mutating operation records a pre-mutation history snapshot
/// first, except undo/redo themselves.
pub struct EditorSession {
    surface: Surface,
    /// Separate preview surface for live shape feedback; never part of
    /// committed pixels or history snapshots.
    overlay: Surface,
    history: History,
    tool: Tool,
    brush: Brush,
    active_color: Color,
    preview_color: Option<Color>,
    text: TextSettings,
    background: Color32,
    marquee: Marquee,
    clipboard: Option<ClipboardBuffer>,
    pasted: Option<PastedOverlay>,
    stroke: Option<StrokeState>,
    shape_start: Option<Vec2>,
    pending_text: Option<Vec2>,
    revision: u64,
}

impl EditorSession {
    pub fn new(width: usize, height: usize) -> Self {
        let background = Color32::WHITE;
        Self {
            surface: Surface::new(width, height, background),
            overlay: Surface::new(width, height, Color32::TRANSPARENT),
            history: History::new(),
            tool: Tool::Brush,
            brush: Brush::new(16.0, 0.8),
            active_color: Color::black(),
            preview_color: None,
            text: TextSettings::default(),
            background,
            marquee: Marquee::new(),
            clipboard: None,
            pasted: None,
            stroke: None,
            shape_start: None,
            pending_text: None,
            revision: 0,
        }
    }

    // ---- state reads -----------------------------------------------------

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn overlay(&self) -> &Surface {
        &self.overlay
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn preview_color(&self) -> Option<Color> {
        self.preview_color
    }

    pub fn text_settings(&self) -> &TextSettings {
        &self.text
    }

    pub fn text_settings_mut(&mut self) -> &mut TextSettings {
        &mut self.text
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn selection_region(&self) -> Option<SelectionRegion> {
        self.marquee.region()
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    pub fn pasted(&self) -> Option<&PastedOverlay> {
        self.pasted.as_ref()
    }

    pub fn pending_text(&self) -> Option<Vec2> {
        self.pending_text
    }

    pub fn shape_in_progress(&self) -> bool {
        self.shape_start.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Bumped on every visible change; the shell re-uploads textures when
    /// it observes a new value.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ---- settings writes (clamped, never rejected) -----------------------

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = Color {
            r: color.r.clamp(0.0, 1.0),
            g: color.g.clamp(0.0, 1.0),
            b: color.b.clamp(0.0, 1.0),
            a: color.a.clamp(0.0, 1.0),
        };
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.size = size.max(1.0);
    }

    pub fn set_brush_opacity(&mut self, opacity: f32) {
        self.brush.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_brush_flow(&mut self, flow: f32) {
        self.brush.flow = flow.clamp(0.0, 1.0);
    }

    pub fn set_brush_hardness(&mut self, hardness: f32) {
        self.brush.hardness = hardness.clamp(0.0, 1.0);
    }

    /// Switching tools commits a pending pasted overlay (its content is
    /// preserved, not discarded) and aborts transient drawing state. The
    /// selection region is deliberately retained.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.commit_pasted();
        self.stroke = None;
        if self.shape_start.take().is_some() {
            self.overlay.fill(Color32::TRANSPARENT);
        }
        self.pending_text = None;
        self.preview_color = None;
        self.tool = tool;
        self.mark_dirty();
    }

    // ---- pointer event coordinator ---------------------------------------

    /// Pointer-down in logical coordinates. An existing pasted overlay under
    /// the pointer takes priority over any tool behavior; otherwise the
    /// event dispatches strictly by the active tool.
    pub fn pointer_down(&mut self, p: Vec2) {
        if let Some(overlay) = &mut self.pasted {
            if overlay.contains(p) {
                overlay.begin_drag(p);
                return;
            }
        }

        match self.tool {
            Tool::Eyedropper => {
                if let Some(color) = self.sample(p) {
                    self.active_color = color;
                    self.preview_color = None;
                    self.tool = Tool::Brush;
                }
            }
            Tool::Text => {
                self.pending_text = Some(p);
            }
            Tool::Select | Tool::Crop => {
                // A fresh marquee discards an unbaked overlay.
                if self.pasted.take().is_some() {
                    self.mark_dirty();
                }
                self.marquee.begin(p);
            }
            Tool::Brush | Tool::Eraser => {
                self.history.record(&self.surface);
                let mut stroke = StrokeState::new(self.tool == Tool::Eraser);
                stroke.add_point(&mut self.surface, &mut self.brush, self.active_color, p);
                self.stroke = Some(stroke);
                self.mark_dirty();
            }
            Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Polygon => {
                self.history.record(&self.surface);
                self.shape_start = Some(p);
            }
        }
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        if let Some(overlay) = &mut self.pasted {
            if overlay.is_dragging() {
                overlay.drag_to(p);
                self.mark_dirty();
                return;
            }
        }

        match self.tool {
            Tool::Eyedropper => {
                self.preview_color = self.sample(p);
            }
            Tool::Text => {}
            Tool::Select | Tool::Crop => {
                self.marquee.update(p);
            }
            Tool::Brush | Tool::Eraser => {
                if let Some(stroke) = &mut self.stroke {
                    stroke.add_point(&mut self.surface, &mut self.brush, self.active_color, p);
                    self.mark_dirty();
                }
            }
            Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Polygon => {
                if let (Some(start), Some(kind)) = (self.shape_start, self.tool.shape_kind()) {
                    shapes::preview(
                        &mut self.overlay,
                        kind,
                        start,
                        p,
                        self.brush.clamped_size(),
                        self.active_color,
                    );
                    self.mark_dirty();
                }
            }
        }
    }

    pub fn pointer_up(&mut self, p: Vec2) {
        if let Some(overlay) = &mut self.pasted {
            if overlay.is_dragging() {
                overlay.end_drag();
                return;
            }
        }

        match self.tool {
            Tool::Select => {
                self.marquee.finish();
            }
            Tool::Crop => {
                self.marquee.finish();
                self.crop();
            }
            Tool::Brush | Tool::Eraser => {
                if let Some(stroke) = &mut self.stroke {
                    stroke.end();
                }
                self.stroke = None;
            }
            Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Polygon => {
                if let (Some(start), Some(kind)) = (self.shape_start.take(), self.tool.shape_kind())
                {
                    shapes::commit(
                        &mut self.surface,
                        kind,
                        start,
                        p,
                        self.brush.clamped_size(),
                        self.active_color,
                    );
                    self.overlay.fill(Color32::TRANSPARENT);
                    self.mark_dirty();
                }
            }
            Tool::Eyedropper | Tool::Text => {}
        }
    }

    /// The universal non-destructive abort: stops strokes, clears the shape
    /// start and preview overlay, clears the eyedropper preview and ends any
    /// drags. Never commits partial work.
    pub fn pointer_leave(&mut self) {
        if let Some(stroke) = &mut self.stroke {
            stroke.end();
        }
        self.stroke = None;
        if self.shape_start.take().is_some() {
            self.overlay.fill(Color32::TRANSPARENT);
            self.mark_dirty();
        }
        self.preview_color = None;
        if let Some(overlay) = &mut self.pasted {
            overlay.end_drag();
        }
        self.marquee.finish();
    }

    // ---- history ---------------------------------------------------------

    pub fn undo(&mut self) {
        if self.history.undo(&mut self.surface) {
            log::debug!("undo ({} snapshots left)", self.history.undo_depth());
            self.sync_overlay_size();
            self.mark_dirty();
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.surface) {
            log::debug!("redo ({} snapshots left)", self.history.undo_depth());
            self.sync_overlay_size();
            self.mark_dirty();
        }
    }

    // ---- selection & clipboard -------------------------------------------

    /// Extract the normalized selection into the clipboard. No-op without a
    /// settled, positive-area region.
    pub fn copy(&mut self) {
        let Some(rect) = self.selected_pixel_rect() else {
            return;
        };
        self.clipboard = Some(ClipboardBuffer {
            width: rect.width,
            height: rect.height,
            pixels: self.surface.extract(rect),
        });
    }

    /// Copy, then clear the selected rectangle to the background color.
    pub fn cut(&mut self) {
        let Some(rect) = self.selected_pixel_rect() else {
            return;
        };
        let pixels = self.surface.extract(rect);
        self.history.record(&self.surface);
        self.surface.fill_rect(rect, self.background);
        self.clipboard = Some(ClipboardBuffer {
            width: rect.width,
            height: rect.height,
            pixels,
        });
        self.mark_dirty();
    }

    /// Create a floating overlay from the clipboard at the given logical
    /// point. No-op when the clipboard is empty.
    pub fn paste(&mut self, at: Vec2) {
        let Some(buffer) = self.clipboard.clone() else {
            return;
        };
        self.history.record(&self.surface);
        self.pasted = Some(PastedOverlay::new(buffer, at));
        self.mark_dirty();
    }

    /// Bake the floating overlay into the surface. The snapshot recorded at
    /// paste time covers this mutation, so nothing further is recorded.
    pub fn commit_pasted(&mut self) {
        if let Some(overlay) = self.pasted.take() {
            overlay.bake(&mut self.surface);
            self.mark_dirty();
        }
    }

    /// Shrink the surface to exactly the selected rectangle. The extracted
    /// pixels become the full content at the origin.
    pub fn crop(&mut self) {
        let Some(rect) = self.selected_pixel_rect() else {
            return;
        };
        self.history.record(&self.surface);
        let pixels = self.surface.extract(rect);
        self.surface.replace(rect.width, rect.height, pixels);
        self.marquee.clear();
        self.sync_overlay_size();
        log::info!("cropped surface to {}x{}", rect.width, rect.height);
        self.mark_dirty();
    }

    pub fn clear_selection(&mut self) {
        self.marquee.clear();
    }

    // ---- whole-surface operations ----------------------------------------

    /// Reset every pixel to the background color.
    pub fn clear(&mut self) {
        self.history.record(&self.surface);
        self.surface.fill(self.background);
        self.mark_dirty();
    }

    /// Change the logical canvas size. Content is kept anchored at the
    /// top-left (clipped or padded) unless `scale_content` stretches it.
    pub fn resize(&mut self, width: usize, height: usize, scale_content: bool) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.surface.width() && height == self.surface.height() {
            return;
        }
        self.history.record(&self.surface);
        if scale_content {
            self.surface.resize_scaled(width, height);
        } else {
            self.surface.resize_keep(width, height, self.background);
        }
        self.sync_overlay_size();
        log::info!(
            "resized surface to {}x{} (scale_content: {scale_content})",
            width,
            height
        );
        self.mark_dirty();
    }

    /// Draw an externally decoded image scaled to the current surface size.
    pub fn place_image(&mut self, image: &RgbaImage) {
        let width = self.surface.width();
        let height = self.surface.height();
        let pixels = exporter::scaled_pixels(image, width, height);
        self.history.record(&self.surface);
        self.surface.blit_over(0, 0, width, height, &pixels);
        self.mark_dirty();
    }

    /// Serialize the surface for download. A pending pasted overlay is part
    /// of what the user sees, so it is baked first.
    pub fn export(&mut self, format: ExportFormat) -> Result<Vec<u8>, String> {
        self.commit_pasted();
        exporter::encode_surface(&self.surface, format)
    }

    // ---- text ------------------------------------------------------------

    /// Stamp the entered text at the pending anchor. The font is resolved
    /// before anything is recorded so a missing font leaves surface and
    /// history untouched.
    pub fn commit_text(&mut self, content: &str) {
        let Some(anchor) = self.pending_text.take() else {
            return;
        };
        if content.is_empty() {
            return;
        }
        let Some(font) = text::load_font(&self.text) else {
            log::warn!("no system font resolves for '{}'", self.text.family);
            return;
        };
        self.history.record(&self.surface);
        text::stamp_text(&mut self.surface, &font, &self.text, anchor, content);
        self.mark_dirty();
    }

    pub fn cancel_text(&mut self) {
        self.pending_text = None;
    }

    // ---- internals -------------------------------------------------------

    fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    fn sample(&self, p: Vec2) -> Option<Color> {
        let px = self.surface.pixel(p.x.floor() as i32, p.y.floor() as i32)?;
        if px.a() == 0 {
            return None;
        }
        Some(Color::from_color32(px))
    }

    fn selected_pixel_rect(&self) -> Option<crate::canvas::surface::PixelRect> {
        self.marquee
            .selected_region()
            .and_then(|region| region.pixel_rect(&self.surface))
    }

    /// The preview overlay always mirrors the surface dimensions.
    fn sync_overlay_size(&mut self) {
        if self.overlay.width() != self.surface.width()
            || self.overlay.height() != self.surface.height()
        {
            self.overlay = Surface::new(
                self.surface.width(),
                self.surface.height(),
                Color32::TRANSPARENT,
            );
        }
    }
}
