use eframe::egui;

use crate::brush_engine::brush::BrushStyle;
use crate::session::EditorSession;
use crate::session::tools::Tool;
use crate::utils::color::Color;
use crate::utils::vector::Vec2;

/// Side panel with the active tool's settings, color controls, clipboard
/// actions and the canvas size controls.
pub fn settings_panel(
    ctx: &egui::Context,
    session: &mut EditorSession,
    hex_entry: &mut String,
    resize_width: &mut String,
    resize_height: &mut String,
    scale_on_resize: &mut bool,
) {
    egui::SidePanel::left("tool_settings")
        .default_width(220.0)
        .show(ctx, |ui| {
            brush_section(ui, session);
            ui.separator();
            color_section(ui, session, hex_entry);
            if session.tool() == Tool::Text {
                ui.separator();
                text_section(ui, session);
            }
            ui.separator();
            clipboard_section(ui, session);
            ui.separator();
            canvas_section(ui, session, resize_width, resize_height, scale_on_resize);
        });
}

fn brush_section(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Brush");

    ui.label("Size:");
    ui.add(egui::Slider::new(&mut session.brush_mut().size, 1.0..=300.0).logarithmic(true));

    ui.label("Opacity:");
    ui.add(egui::Slider::new(&mut session.brush_mut().opacity, 0.0..=1.0));

    ui.label("Flow:");
    ui.add(egui::Slider::new(&mut session.brush_mut().flow, 0.0..=1.0));

    ui.horizontal(|ui| {
        ui.label("Style:");
        let style = &mut session.brush_mut().style;
        ui.selectable_value(style, BrushStyle::Soft, "Soft");
        ui.selectable_value(style, BrushStyle::Hard, "Hard");
        ui.selectable_value(style, BrushStyle::Textured, "Textured");
    });

    if session.brush().style == BrushStyle::Soft {
        ui.label("Hardness:");
        ui.add(egui::Slider::new(&mut session.brush_mut().hardness, 0.0..=1.0));
    }
}

fn color_section(ui: &mut egui::Ui, session: &mut EditorSession, hex_entry: &mut String) {
    ui.heading("Color");

    let mut c32 = session.active_color().to_color32();
    if ui.color_edit_button_srgba(&mut c32).changed() {
        session.set_active_color(Color::from_color32(c32));
    }

    let response = ui.text_edit_singleline(hex_entry);
    if response.changed() {
        // Invalid input keeps the last valid color.
        if let Some(parsed) = Color::from_hex(hex_entry) {
            let alpha = session.active_color().a;
            session.set_active_color(parsed.with_alpha(alpha));
        }
    }
    if !response.has_focus() {
        *hex_entry = session.active_color().to_hex();
    }

    if let Some(preview) = session.preview_color() {
        ui.horizontal(|ui| {
            ui.label("Sampling:");
            let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, 2.0, preview.to_color32());
            ui.monospace(preview.to_hex());
        });
    }
}

fn text_section(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Text");

    ui.label("Size:");
    ui.add(egui::Slider::new(&mut session.text_settings_mut().size, 6.0..=128.0));

    ui.label("Font family:");
    ui.text_edit_singleline(&mut session.text_settings_mut().family);

    ui.horizontal(|ui| {
        ui.checkbox(&mut session.text_settings_mut().bold, "Bold");
        ui.checkbox(&mut session.text_settings_mut().italic, "Italic");
    });

    let mut c32 = session.text_settings().color.to_color32();
    if ui.color_edit_button_srgba(&mut c32).changed() {
        session.text_settings_mut().color = Color::from_color32(c32);
    }
}

fn clipboard_section(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.heading("Selection");

    let has_region = session
        .selection_region()
        .map(|r| {
            let (_, _, w, h) = r.normalized();
            w > 0.0 && h > 0.0
        })
        .unwrap_or(false);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(has_region, egui::Button::new("Copy"))
            .clicked()
        {
            session.copy();
        }
        if ui
            .add_enabled(has_region, egui::Button::new("Cut"))
            .clicked()
        {
            session.cut();
        }
        if ui
            .add_enabled(session.has_clipboard(), egui::Button::new("Paste"))
            .clicked()
        {
            let center = Vec2::new(
                session.surface().width() as f32 / 2.0,
                session.surface().height() as f32 / 2.0,
            );
            session.paste(center);
        }
    });
    if ui
        .add_enabled(has_region, egui::Button::new("Crop to selection"))
        .clicked()
    {
        session.crop();
    }
}

fn canvas_section(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    resize_width: &mut String,
    resize_height: &mut String,
    scale_on_resize: &mut bool,
) {
    ui.heading("Canvas");

    ui.horizontal(|ui| {
        ui.label("W:");
        ui.add(egui::TextEdit::singleline(resize_width).desired_width(48.0));
        ui.label("H:");
        ui.add(egui::TextEdit::singleline(resize_height).desired_width(48.0));
    });
    ui.checkbox(scale_on_resize, "Scale content");

    if ui.button("Resize").clicked() {
        // Non-numeric input falls back to the current dimensions.
        let width = resize_width
            .trim()
            .parse::<usize>()
            .unwrap_or(session.surface().width())
            .max(1);
        let height = resize_height
            .trim()
            .parse::<usize>()
            .unwrap_or(session.surface().height())
            .max(1);
        session.resize(width, height, *scale_on_resize);
        *resize_width = session.surface().width().to_string();
        *resize_height = session.surface().height().to_string();
    }
}
