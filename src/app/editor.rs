use eframe::egui::{self, Color32, TextureHandle, TextureOptions};

use crate::app::input_handler;
use crate::canvas::view::ViewTransform;
use crate::session::EditorSession;
use crate::ui;
use crate::utils::exporter::ExportFormat;
use crate::utils::vector::Vec2;

/// The egui application hosting one editor session. Owns only presentation
/// state (textures, entry buffers, notices); every edit goes through the
/// session's operations.
pub struct EditorApp {
    session: EditorSession,
    surface_tex: Option<TextureHandle>,
    overlay_tex: Option<TextureHandle>,
    pasted_tex: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
    hover_logical: Option<Vec2>,
    was_inside: bool,
    notice: Option<String>,
    text_entry: String,
    hex_entry: String,
    export_format: ExportFormat,
    resize_width: String,
    resize_height: String,
    scale_on_resize: bool,
}

impl EditorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let session = EditorSession::new(800, 600);
        let resize_width = session.surface().width().to_string();
        let resize_height = session.surface().height().to_string();
        let hex_entry = session.active_color().to_hex();
        Self {
            session,
            surface_tex: None,
            overlay_tex: None,
            pasted_tex: None,
            uploaded_revision: None,
            hover_logical: None,
            was_inside: false,
            notice: None,
            text_entry: String::new(),
            hex_entry,
            export_format: ExportFormat::PNG,
            resize_width,
            resize_height,
            scale_on_resize: false,
        }
    }

    /// Re-upload textures when the session's revision moved.
    fn refresh_textures(&mut self, ctx: &egui::Context) {
        let revision = self.session.revision();
        if self.uploaded_revision == Some(revision) {
            return;
        }

        let surface_img = self.session.surface().to_color_image();
        match &mut self.surface_tex {
            Some(tex) => tex.set(surface_img, TextureOptions::NEAREST),
            None => {
                self.surface_tex =
                    Some(ctx.load_texture("surface", surface_img, TextureOptions::NEAREST));
            }
        }

        let overlay_img = self.session.overlay().to_color_image();
        match &mut self.overlay_tex {
            Some(tex) => tex.set(overlay_img, TextureOptions::NEAREST),
            None => {
                self.overlay_tex =
                    Some(ctx.load_texture("preview_overlay", overlay_img, TextureOptions::NEAREST));
            }
        }

        match self.session.pasted() {
            Some(overlay) => {
                let img = overlay.to_color_image();
                match &mut self.pasted_tex {
                    Some(tex) => tex.set(img, TextureOptions::NEAREST),
                    None => {
                        self.pasted_tex =
                            Some(ctx.load_texture("pasted_overlay", img, TextureOptions::NEAREST));
                    }
                }
            }
            None => self.pasted_tex = None,
        }

        self.uploaded_revision = Some(revision);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.cancel_text();
            self.session.clear_selection();
            self.text_entry.clear();
        }

        let (ctrl, shift) = ctx.input(|i| (i.modifiers.ctrl, i.modifiers.shift));
        if !ctrl {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z)) {
            if shift {
                self.session.redo();
            } else {
                self.session.undo();
            }
        }
        if ctx.input(|i| i.key_pressed(egui::Key::C)) {
            self.session.copy();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::X)) {
            self.session.cut();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::V)) {
            let at = self.hover_logical.unwrap_or(Vec2::new(
                self.session.surface().width() as f32 / 2.0,
                self.session.surface().height() as f32 / 2.0,
            ));
            self.session.paste(at);
        }
    }

    fn text_entry_window(&mut self, ctx: &egui::Context, view: &ViewTransform) {
        let Some(anchor) = self.session.pending_text() else {
            return;
        };
        let screen = view.to_display(anchor);
        egui::Window::new("Text")
            .collapsible(false)
            .resizable(false)
            .default_pos(egui::pos2(screen.x, screen.y))
            .show(ctx, |ui| {
                ui.text_edit_multiline(&mut self.text_entry);
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        self.session.commit_text(&self.text_entry.clone());
                        self.text_entry.clear();
                    }
                    if ui.button("Cancel").clicked() {
                        self.session.cancel_text();
                        self.text_entry.clear();
                    }
                });
            });
    }

    /// Dashed marquee rectangle in display space.
    fn paint_marquee(&self, painter: &egui::Painter, view: &ViewTransform) {
        let Some(region) = self.session.selection_region() else {
            return;
        };
        let (x, y, w, h) = region.normalized();
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let min = view.to_display(Vec2::new(x, y));
        let max = view.to_display(Vec2::new(x + w, y + h));
        let corners = [
            egui::pos2(min.x, min.y),
            egui::pos2(max.x, min.y),
            egui::pos2(max.x, max.y),
            egui::pos2(min.x, max.y),
        ];
        let stroke = egui::Stroke::new(1.0, Color32::from_gray(40));
        for i in 0..4 {
            let seg = [corners[i], corners[(i + 1) % 4]];
            painter.extend(egui::Shape::dashed_line(&seg, stroke, 4.0, 4.0));
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        ui::top_bar::top_bar(
            ctx,
            &mut self.session,
            &mut self.export_format,
            &mut self.notice,
        );
        ui::tool_settings::settings_panel(
            ctx,
            &mut self.session,
            &mut self.hex_entry,
            &mut self.resize_width,
            &mut self.resize_height,
            &mut self.scale_on_resize,
        );

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_at_least(ui.available_size(), egui::Sense::click_and_drag());

            // Fit the surface into the panel, preserving aspect ratio. The
            // view transform is rebuilt every frame so display resizes never
            // skew the logical mapping.
            let logical_w = self.session.surface().width();
            let logical_h = self.session.surface().height();
            let scale = (rect.width() / logical_w as f32)
                .min(rect.height() / logical_h as f32)
                .max(f32::EPSILON);
            let display = egui::vec2(logical_w as f32 * scale, logical_h as f32 * scale);
            let origin = rect.min;
            let view = ViewTransform::new(
                Vec2::new(origin.x, origin.y),
                Vec2::new(display.x, display.y),
                logical_w,
                logical_h,
            );

            input_handler::handle_canvas_input(
                &mut self.session,
                ctx,
                &response,
                &view,
                &mut self.hover_logical,
                &mut self.was_inside,
            );

            self.refresh_textures(ctx);

            let canvas_rect = egui::Rect::from_min_size(origin, display);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            let painter = ui.painter();
            if let Some(tex) = &self.surface_tex {
                painter.image(tex.id(), canvas_rect, uv, Color32::WHITE);
            }
            if self.session.shape_in_progress() {
                if let Some(tex) = &self.overlay_tex {
                    painter.image(tex.id(), canvas_rect, uv, Color32::WHITE);
                }
            }
            if let (Some(overlay), Some(tex)) = (self.session.pasted(), &self.pasted_tex) {
                let min = view.to_display(overlay.pos());
                let (w, h) = overlay.size();
                let size = egui::vec2(w as f32 * scale, h as f32 * scale);
                let overlay_rect =
                    egui::Rect::from_min_size(egui::pos2(min.x, min.y), size);
                painter.image(tex.id(), overlay_rect, uv, Color32::WHITE);
            }
            self.paint_marquee(painter, &view);

            self.text_entry_window(ctx, &view);

            if response.dragged() || self.session.shape_in_progress() {
                ctx.request_repaint();
            }
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{}x{}",
                    self.session.surface().width(),
                    self.session.surface().height()
                ));
                if let Some(notice) = &self.notice {
                    ui.separator();
                    ui.label(notice);
                }
            });
        });
    }
}
