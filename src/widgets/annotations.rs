//! Annotations panel: list, jump-to, delete, export.

use crate::core::events::{AppEvent, EventSender, ExportFormat};
use crate::entities::SessionData;
use crate::utils::{format_time, parse_hex_color};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

/// Render the annotations tab.
pub fn render_annotations(ui: &mut Ui, session: &SessionData, sender: &EventSender) {
    ui.horizontal(|ui| {
        if ui.button("➕ Add (M)").clicked() {
            sender.emit(AppEvent::OpenAnnotationDialog);
        }
        ui.separator();
        if ui.button("Save").clicked() {
            sender.emit(AppEvent::SaveAnnotations);
        }
        if session.annotations.is_dirty() {
            ui.label(RichText::new("●").color(Color32::from_rgb(234, 179, 8)))
                .on_hover_text("Unsaved changes");
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Export CSV").clicked() {
                sender.emit(AppEvent::ExportAnnotations(ExportFormat::Csv));
            }
            if ui.button("Export JSON").clicked() {
                sender.emit(AppEvent::ExportAnnotations(ExportFormat::Json));
            }
        });
    });
    ui.separator();

    if session.annotations.is_empty() {
        ui.weak("No annotations yet. Press M during playback to add one.");
        return;
    }

    let sorted = session.annotations.sorted_by_time();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(60.0))
        .column(Column::exact(80.0))
        .column(Column::remainder())
        .column(Column::exact(26.0))
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Time");
            });
            header.col(|ui| {
                ui.strong("Category");
            });
            header.col(|ui| {
                ui.strong("Label");
            });
            header.col(|_ui| {});
        })
        .body(|mut body| {
            for annotation in sorted {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        // Time doubles as the jump-to control
                        if ui
                            .link(RichText::new(format_time(annotation.time)).monospace())
                            .clicked()
                        {
                            sender.emit(AppEvent::Seek(annotation.time));
                        }
                    });
                    row.col(|ui| {
                        let color = parse_hex_color(&annotation.color)
                            .unwrap_or(Color32::from_rgb(248, 186, 51));
                        ui.colored_label(color, &annotation.category);
                    });
                    row.col(|ui| {
                        let response = ui.label(&annotation.label);
                        if !annotation.description.is_empty() {
                            response.on_hover_text(&annotation.description);
                        }
                    });
                    row.col(|ui| {
                        if ui.button("🗑").on_hover_text("Delete").clicked() {
                            sender.emit(AppEvent::DeleteAnnotation(annotation.id));
                        }
                    });
                });
            }
        });
}
