use eframe::egui;
use std::path::PathBuf;

use crate::session::EditorSession;
use crate::session::tools::Tool;
use crate::utils::exporter::{self, ExportFormat};

/// Toolbar: tool selection, history, clear, image open and export.
pub fn top_bar(
    ctx: &egui::Context,
    session: &mut EditorSession,
    export_format: &mut ExportFormat,
    notice: &mut Option<String>,
) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            for tool in Tool::all() {
                let selected = session.tool() == *tool;
                if ui.selectable_label(selected, tool.label()).clicked() {
                    session.set_tool(*tool);
                }
            }

            ui.separator();

            if ui
                .add_enabled(session.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                session.undo();
            }
            if ui
                .add_enabled(session.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                session.redo();
            }
            if ui.button("Clear").clicked() {
                session.clear();
            }

            ui.separator();

            if ui.button("Open image...").clicked() {
                open_image(session, notice);
            }

            egui::ComboBox::from_id_salt("export_format")
                .selected_text(export_format.label())
                .show_ui(ui, |ui| {
                    for format in ExportFormat::all() {
                        ui.selectable_value(export_format, *format, format.label());
                    }
                });
            if ui.button("Export...").clicked() {
                export(session, *export_format, notice);
            }
        });
    });
}

/// Decode an external image file and draw it scaled onto the surface.
/// Malformed files surface a notice; the surface is left untouched.
fn open_image(session: &mut EditorSession, notice: &mut Option<String>) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
        .pick_file()
    else {
        return;
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            *notice = Some(format!("Could not read {}: {err}", path.display()));
            return;
        }
    };

    match exporter::decode_image(&bytes) {
        Ok(image) => {
            session.place_image(&image);
            *notice = Some(format!("Placed {}", path.display()));
        }
        Err(err) => {
            log::warn!("image decode failed for {}: {err}", path.display());
            *notice = Some(format!("Could not decode {}: {err}", path.display()));
        }
    }
}

fn export(session: &mut EditorSession, format: ExportFormat, notice: &mut Option<String>) {
    let bytes = match session.export(format) {
        Ok(bytes) => bytes,
        Err(err) => {
            *notice = Some(format!("Export failed: {err}"));
            return;
        }
    };

    let Some(path) = pick_save_file(format) else {
        return;
    };
    match std::fs::write(&path, bytes) {
        Ok(()) => *notice = Some(format!("Saved to {}", path.display())),
        Err(err) => *notice = Some(format!("Export failed: {err}")),
    }
}

fn pick_save_file(format: ExportFormat) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(format!("export.{}", format.extension()))
        .save_file()
        .map(|path| ensure_extension(path, format.extension()))
}

fn ensure_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(current) if current.eq_ignore_ascii_case(ext) => path,
        _ => {
            path.set_extension(ext);
            path
        }
    }
}
