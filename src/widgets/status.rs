//! Status bar at the bottom of the main window.

use crate::core::playback::PlaybackController;
use crate::entities::SessionData;
use crate::utils::format_time;
use crate::widgets::timeline::TimelineState;
use eframe::egui;
use std::time::Instant;

/// Render the bottom status strip: session, clock, speed, zoom, last drift.
pub fn render_status_bar(
    ctx: &egui::Context,
    session: &SessionData,
    playback: &PlaybackController,
    timeline: &TimelineState,
    error_msg: Option<&str>,
    now: Instant,
) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.monospace(session.display_name());
            ui.separator();
            ui.monospace(format!(
                "{} / {}",
                format_time(playback.current_time(now)),
                format_time(playback.duration())
            ));
            ui.separator();
            ui.monospace(if playback.is_playing() { "▶" } else { "⏸" });
            ui.monospace(format!("{:.2}×", playback.speed()));
            ui.separator();
            ui.monospace(format!("zoom {:.0}%", timeline.viewport.zoom_factor() * 100.0));

            if let Some(drift) = playback.last_drift() {
                ui.separator();
                ui.monospace(format!("drift {drift:+.2}s"))
                    .on_hover_text("Last media drift correction");
            }

            if let Some(msg) = error_msg {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(239, 68, 68), msg);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if session.annotations.is_dirty() {
                    ui.monospace("● unsaved").on_hover_text("Annotations not saved yet");
                }
            });
        });
    });
}
