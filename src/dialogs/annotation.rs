//! Annotation dialog.
//!
//! Opened at the current playback time (the app pauses first; that
//! pause-on-annotate is deliberately a UI policy, not something the clock or
//! the seek operation does on its own).

use crate::core::events::{AppEvent, EventSender};
use crate::entities::Annotation;
use crate::utils::format_time;
use eframe::egui::{self, Color32, Context};

/// Category presets with their default colors.
const CATEGORIES: &[(&str, &str)] = &[
    ("observation", "#f8ba33"),
    ("error", "#ef4444"),
    ("good practice", "#22c55e"),
    ("question", "#60a5fa"),
];

/// Modal state for creating one annotation.
#[derive(Debug, Default)]
pub struct AnnotationDialog {
    open: bool,
    time: f64,
    label: String,
    description: String,
    category_idx: usize,
}

impl AnnotationDialog {
    /// Open the dialog anchored at `time`.
    pub fn open_at(&mut self, time: f64) {
        self.open = true;
        self.time = time;
        self.label.clear();
        self.description.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Render; emits `AddAnnotation` on save.
    pub fn render(&mut self, ctx: &Context, sender: &EventSender) {
        if !self.open {
            return;
        }
        let mut open = self.open;
        let mut saved = false;
        egui::Window::new(format!("Annotation at {}", format_time(self.time)))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("annotation_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Label");
                        ui.text_edit_singleline(&mut self.label);
                        ui.end_row();

                        ui.label("Category");
                        egui::ComboBox::from_id_salt("annotation_category")
                            .selected_text(CATEGORIES[self.category_idx].0)
                            .show_ui(ui, |ui| {
                                for (i, (name, color)) in CATEGORIES.iter().enumerate() {
                                    let swatch = crate::utils::parse_hex_color(color)
                                        .unwrap_or(Color32::GRAY);
                                    if ui
                                        .selectable_label(
                                            i == self.category_idx,
                                            egui::RichText::new(*name).color(swatch),
                                        )
                                        .clicked()
                                    {
                                        self.category_idx = i;
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Description");
                        ui.text_edit_multiline(&mut self.description);
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    let can_save = !self.label.trim().is_empty();
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save"))
                        .clicked()
                    {
                        let (category, color) = CATEGORIES[self.category_idx];
                        sender.emit(AppEvent::AddAnnotation(Annotation::new(
                            self.time,
                            self.label.trim(),
                            self.description.trim(),
                            color,
                            category,
                        )));
                        saved = true;
                    }
                    if ui.button("Cancel").clicked() {
                        saved = true; // close without emitting
                    }
                });
            });
        self.open = open && !saved;
    }
}
