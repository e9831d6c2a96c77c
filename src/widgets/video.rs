//! Video pane.
//!
//! The actual decoder is an external collaborator behind `MediaTransport`;
//! this pane shows the playback state on a letterboxed surface and offers
//! overlay transport controls. With the bundled simulated transport there is
//! no frame to show, so the surface displays the big time readout the way a
//! capture without video does.

use crate::core::events::{AppEvent, EventSender};
use crate::core::playback::PlaybackController;
use crate::core::transport::MediaTransport;
use crate::entities::SessionData;
use crate::utils::format_time;
use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, Vec2};
use std::time::Instant;

const SURFACE_BG: Color32 = Color32::from_rgb(9, 9, 11);
const TIME_TEXT: Color32 = Color32::from_rgb(228, 228, 231);
const SUB_TEXT: Color32 = Color32::from_rgb(113, 113, 122);

/// Render the video surface and its transport overlay.
pub fn render_video(
    ui: &mut Ui,
    session: &SessionData,
    playback: &PlaybackController,
    media: &dyn MediaTransport,
    now: Instant,
    sender: &EventSender,
) {
    let available = ui.available_size();
    let (rect, response) = ui.allocate_exact_size(available, Sense::click());
    if response.clicked() {
        sender.emit(AppEvent::TogglePlayPause);
    }

    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, SURFACE_BG);

    let current = playback.current_time(now);
    painter.text(
        rect.center() - Vec2::new(0.0, 14.0),
        Align2::CENTER_CENTER,
        format_time(current),
        FontId::monospace(42.0),
        TIME_TEXT,
    );

    let subtitle = match &session.video_path {
        Some(path) => format!(
            "{} / media at {}",
            path.display(),
            format_time(media.position())
        ),
        None => format!("no video stream / media at {}", format_time(media.position())),
    };
    painter.text(
        rect.center() + Vec2::new(0.0, 22.0),
        Align2::CENTER_CENTER,
        subtitle,
        FontId::monospace(11.0),
        SUB_TEXT,
    );

    // Overlay transport strip along the bottom edge
    let strip = egui::Rect::from_min_max(
        egui::pos2(rect.min.x + 8.0, rect.max.y - 36.0),
        egui::pos2(rect.max.x - 8.0, rect.max.y - 4.0),
    );
    let mut strip_ui = ui.new_child(egui::UiBuilder::new().max_rect(strip));
    strip_ui.horizontal(|ui| {
        let icon = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.button(icon).clicked() {
            sender.emit(AppEvent::TogglePlayPause);
        }
        if ui.button("«5s").clicked() {
            sender.emit(AppEvent::StepBy(-5.0));
        }
        if ui.button("5s»").clicked() {
            sender.emit(AppEvent::StepBy(5.0));
        }
        ui.monospace(format!(
            "{} / {}",
            format_time(current),
            format_time(playback.duration())
        ));
    });
}
