//! Timeline - UI composition.
//!
//! Three synchronized panes plus a transport toolbar:
//!
//! ```text
//! [ toolbar: transport | time | speed | zoom ]
//! [ corner ][ ruler        (scrolls x)      ]
//! [ labels ][ tracks       (scrolls x + y)  ]
//! ```
//!
//! The ruler and tracks panes share their horizontal offset, labels and
//! tracks share their vertical offset. Each frame is one synchronization
//! pass: every pane's offset from the previous frame is observed (first
//! deviating pane wins and becomes the origin), then every pane renders at
//! the shared offset. A pane is only forced when it actually deviates, so a
//! scrollbar drag in progress is never overridden. Propagation to the
//! partner pane happens within the same pass, or one frame later when the
//! partner rendered earlier in the pass than the origin.

use super::playhead::draw_playhead;
use super::ruler::draw_ruler;
use super::scroll_sync::Pane;
use super::timeline::{TimelineConfig, TimelineState};
use super::tracks_ui::{render_tracks, row_layout, row_name, signal_color, RowKind};
use crate::core::events::{AppEvent, EventSender};
use crate::core::playback::{PlaybackController, SPEED_PRESETS};
use crate::core::sample_index::nearest_value_at;
use crate::entities::SessionData;
use crate::utils::{format_sample_rate, format_time};
use eframe::egui::{
    self, Color32, Rect, ScrollArea, Ui, Vec2, scroll_area::ScrollBarVisibility,
};
use std::time::Instant;

/// Threshold for the live value readout: samples farther than this from the
/// playhead display as absent rather than stale.
const VALUE_THRESHOLD_S: f64 = 0.5;

const LABEL_TEXT: Color32 = Color32::from_rgb(212, 212, 216);
const LABEL_DIM: Color32 = Color32::from_rgb(113, 113, 122);

/// Render the whole timeline tab.
pub fn render_timeline(
    ui: &mut Ui,
    session: &SessionData,
    state: &mut TimelineState,
    config: &TimelineConfig,
    playback: &PlaybackController,
    now: Instant,
    sender: &EventSender,
) {
    render_toolbar(ui, state, playback, now, sender);
    ui.separator();

    let current_time = playback.current_time(now);
    let duration = playback.duration();

    // One synchronization pass per frame, fed by last frame's offsets.
    // Tracks is observed first so the main interactive pane wins ties.
    let offsets = state.pane_offsets;
    state.scroll.begin_pass();
    state.scroll.observe_x(Pane::Tracks, offsets.tracks_x, now);
    state.scroll.observe_y(Pane::Tracks, offsets.tracks_y, now);
    state.scroll.observe_x(Pane::Ruler, offsets.ruler_x, now);
    state.scroll.observe_y(Pane::Labels, offsets.labels_y, now);

    let viewport_width =
        (ui.available_width() - config.label_column_width - 8.0).max(0.0);
    let content_width = state.viewport.content_width(duration, viewport_width);
    state.last_viewport_width = viewport_width;

    // Auto-follow: recentre on the playhead while playing, unless the user
    // is scrubbing or just scrolled
    if playback.is_playing() && state.follow_playhead && !state.scrubbing {
        let playhead_px = state.viewport.time_to_pixel(current_time);
        state
            .scroll
            .follow(playhead_px, viewport_width, content_width, now);
    }

    let shared_x = state.scroll.scroll_x;
    let shared_y = state.scroll.scroll_y;

    let mut ruler_rect = Rect::NOTHING;
    let mut tracks_rect = Rect::NOTHING;

    ui.horizontal_top(|ui| {
        // === Label column ===
        ui.vertical(|ui| {
            ui.set_width(config.label_column_width);
            ui.add_space(config.ruler_height + 4.0);

            let mut labels = ScrollArea::vertical()
                .id_salt("timeline_labels")
                .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
                .auto_shrink([false, false]);
            if (shared_y - offsets.labels_y).abs() > 0.5 {
                labels = labels.scroll_offset(Vec2::new(0.0, shared_y));
            }
            let out = labels.show(ui, |ui| {
                render_label_column(ui, session, config, current_time);
            });
            state.pane_offsets.labels_y = out.state.offset.y;
        });

        ui.separator();

        // === Ruler + tracks ===
        ui.vertical(|ui| {
            ui.set_width(ui.available_width());

            let mut ruler_sa = ScrollArea::horizontal()
                .id_salt("timeline_ruler")
                .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
                .auto_shrink([false, false])
                .max_height(config.ruler_height);
            if (shared_x - offsets.ruler_x).abs() > 0.5 {
                ruler_sa = ruler_sa.scroll_offset(Vec2::new(shared_x, 0.0));
            }
            let ruler_out = ruler_sa.show(ui, |ui| {
                draw_ruler(ui, content_width, config.ruler_height, &state.viewport, duration)
            });
            state.pane_offsets.ruler_x = ruler_out.state.offset.x;
            ruler_rect = ruler_out.inner_rect;

            let ruler = ruler_out.inner;
            state.scrubbing = ruler.scrubbing;
            if let Some(time) = ruler.seek_to {
                sender.emit(AppEvent::Seek(time));
                state.scroll.suppress_follow(now);
            }

            let mut tracks_sa = ScrollArea::both()
                .id_salt("timeline_tracks")
                .auto_shrink([false, false]);
            if (shared_x - offsets.tracks_x).abs() > 0.5
                || (shared_y - offsets.tracks_y).abs() > 0.5
            {
                tracks_sa = tracks_sa.scroll_offset(Vec2::new(shared_x, shared_y));
            }
            let tracks_out = tracks_sa.show(ui, |ui| {
                render_tracks(
                    ui,
                    session,
                    config,
                    &state.viewport,
                    &mut state.waveforms,
                    content_width,
                    sender,
                );
            });
            state.pane_offsets.tracks_x = tracks_out.state.offset.x;
            state.pane_offsets.tracks_y = tracks_out.state.offset.y;
            tracks_rect = tracks_out.inner_rect;
        });
    });

    // === Playhead overlay ===
    // Cheap foreground layer, repainted every frame; the panes above only
    // rebuild their content on data/viewport changes.
    if ruler_rect.is_positive() {
        let overlay_rect = Rect::from_min_max(
            ruler_rect.min,
            egui::pos2(
                ruler_rect.max.x,
                tracks_rect.max.y.max(ruler_rect.max.y),
            ),
        );
        let content_x = state.viewport.time_to_pixel(current_time);
        draw_playhead(
            ui,
            overlay_rect,
            ruler_rect.max.y,
            content_x,
            state.scroll.scroll_x,
        );
    }
}

/// Transport + zoom toolbar above the panes.
fn render_toolbar(
    ui: &mut Ui,
    state: &mut TimelineState,
    playback: &PlaybackController,
    now: Instant,
    sender: &EventSender,
) {
    ui.horizontal(|ui| {
        if ui.button("⏮").on_hover_text("To Start (Home)").clicked() {
            sender.emit(AppEvent::JumpToStart);
        }
        if ui.button("«5s").on_hover_text("Back 5s (←)").clicked() {
            sender.emit(AppEvent::StepBy(-5.0));
        }
        let play_icon = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.button(play_icon).on_hover_text("Play/Pause (Space)").clicked() {
            sender.emit(AppEvent::TogglePlayPause);
        }
        if ui.button("5s»").on_hover_text("Forward 5s (→)").clicked() {
            sender.emit(AppEvent::StepBy(5.0));
        }
        if ui.button("⏭").on_hover_text("To End (End)").clicked() {
            sender.emit(AppEvent::JumpToEnd);
        }

        ui.separator();
        ui.monospace(format!(
            "{} / {}",
            format_time(playback.current_time(now)),
            format_time(playback.duration())
        ));

        ui.separator();
        egui::ComboBox::from_id_salt("playback_speed")
            .width(70.0)
            .selected_text(format!("{:.2}×", playback.speed()))
            .show_ui(ui, |ui| {
                for &preset in SPEED_PRESETS {
                    let selected = (playback.speed() - preset).abs() < 1e-9;
                    if ui
                        .selectable_label(selected, format!("{preset:.2}×"))
                        .clicked()
                    {
                        sender.emit(AppEvent::SetSpeed(preset));
                    }
                }
            });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("+").on_hover_text("Zoom In").clicked() {
                sender.emit(AppEvent::ZoomIn);
            }
            ui.monospace(format!("{:>4.0}%", state.viewport.zoom_factor() * 100.0));
            if ui.button("−").on_hover_text("Zoom Out").clicked() {
                sender.emit(AppEvent::ZoomOut);
            }
            if ui.button("Reset").on_hover_text("Zoom 100%").clicked() {
                sender.emit(AppEvent::ZoomReset);
            }
            ui.separator();
            ui.checkbox(&mut state.follow_playhead, "Follow");
        });
    });
}

/// Left column: one label per timeline row, with a live value readout for
/// signal tracks (nearest sample within 0.5 s, "N/A" otherwise).
fn render_label_column(
    ui: &mut Ui,
    session: &SessionData,
    config: &TimelineConfig,
    current_time: f64,
) {
    for (kind, height) in row_layout(session, config) {
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), height),
            egui::Sense::hover(),
        );
        if !ui.is_rect_visible(rect) {
            continue;
        }
        let painter = ui.painter();
        painter.line_segment(
            [rect.left_bottom(), rect.right_bottom()],
            egui::Stroke::new(1.0, super::tracks_ui::ROW_SEPARATOR),
        );

        match kind {
            RowKind::Signal(i) => {
                let track = &session.tracks[i];
                let value = nearest_value_at(&track.data, current_time, VALUE_THRESHOLD_S);
                let value_text = match value {
                    Some(v) => format!("{:.2} {}", v, track.unit),
                    None => "N/A".to_string(),
                };
                painter.text(
                    rect.left_top() + Vec2::new(8.0, 10.0),
                    egui::Align2::LEFT_TOP,
                    &track.name,
                    egui::FontId::proportional(12.0),
                    signal_color(i),
                );
                painter.text(
                    rect.left_top() + Vec2::new(8.0, 28.0),
                    egui::Align2::LEFT_TOP,
                    format!("{} | {}", format_sample_rate(track.sample_rate), value_text),
                    egui::FontId::monospace(10.0),
                    LABEL_DIM,
                );
            }
            _ => {
                painter.text(
                    rect.left_center() + Vec2::new(8.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    row_name(kind, session),
                    egui::FontId::proportional(12.0),
                    LABEL_TEXT,
                );
            }
        }
    }
}
