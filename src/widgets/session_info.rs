//! Session info panel: metadata about the loaded capture.

use crate::entities::SessionData;
use crate::utils::{format_sample_rate, format_time};
use eframe::egui::{self, Ui};

pub fn render_session_info(ui: &mut Ui, session: &SessionData) {
    if !session.is_loaded() {
        ui.weak("No session loaded. Use File → Open Session, or File → Open Demo Session.");
        return;
    }

    egui::Grid::new("session_info_grid")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.strong("Session");
            ui.label(session.display_name());
            ui.end_row();

            ui.strong("Document");
            match &session.session_path {
                Some(path) => ui.monospace(path.display().to_string()),
                None => ui.weak("built-in demo"),
            };
            ui.end_row();

            ui.strong("Video");
            match &session.video_path {
                Some(path) => ui.monospace(path.display().to_string()),
                None => ui.weak("none"),
            };
            ui.end_row();

            ui.strong("Duration");
            ui.monospace(format_time(session.duration));
            ui.end_row();

            ui.strong("Signal tracks");
            ui.label(session.tracks.len().to_string());
            ui.end_row();

            ui.strong("Procedures");
            ui.label(session.procedures.len().to_string());
            ui.end_row();

            ui.strong("Markers");
            ui.label(session.marker_count().to_string());
            ui.end_row();

            ui.strong("Annotations");
            ui.label(session.annotations.len().to_string());
            ui.end_row();
        });

    ui.separator();
    ui.strong("Tracks");
    for track in &session.tracks {
        ui.horizontal(|ui| {
            ui.label(&track.name);
            ui.weak(format!(
                "{} · {} · {} samples",
                track.unit,
                format_sample_rate(track.sample_rate),
                track.data.len()
            ));
        });
    }
}
