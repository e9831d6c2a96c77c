//! Time ruler: tick marks, labels, and click/drag seeking.

use super::viewport::ViewportState;
use crate::utils::format_time;
use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, Ui, Vec2};

const RULER_BG: Color32 = Color32::from_rgb(24, 24, 27);
const PADDING_BG: Color32 = Color32::from_rgb(18, 18, 21);
const TICK_MAJOR: Color32 = Color32::from_rgb(113, 113, 122);
const TICK_MINOR: Color32 = Color32::from_rgb(63, 63, 70);
/// Ticks past the session end stay visible but muted, so the padding region
/// reads as "past the end of the recording" instead of missing data.
const TICK_MUTED: Color32 = Color32::from_rgb(38, 38, 43);
const LABEL: Color32 = Color32::from_rgb(161, 161, 170);
const LABEL_MUTED: Color32 = Color32::from_rgb(70, 70, 80);

/// Outcome of a ruler pass: the time the user scrubbed to, if any.
pub struct RulerResponse {
    pub seek_to: Option<f64>,
    pub scrubbing: bool,
}

/// Draw the ruler at full content width and handle seek interactions.
pub fn draw_ruler(
    ui: &mut Ui,
    content_width: f32,
    height: f32,
    viewport: &ViewportState,
    duration: f64,
) -> RulerResponse {
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(content_width, height), Sense::click_and_drag());

    let mut seek_to = None;
    if response.clicked() || response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let time = viewport.pixel_to_time(pos.x - rect.min.x);
            seek_to = Some(time.clamp(0.0, duration));
        }
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        // Padding region first, recorded region on top
        painter.rect_filled(rect, 0.0, PADDING_BG);
        let recorded_width = viewport.time_to_pixel(duration);
        painter.rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(recorded_width, height)),
            0.0,
            RULER_BG,
        );

        let ticks = viewport.tick_intervals();
        let clip = ui.clip_rect();
        let first_visible = viewport.pixel_to_time((clip.min.x - rect.min.x).max(0.0));
        let last_visible = viewport.pixel_to_time(clip.max.x - rect.min.x);

        let mut k = (first_visible / ticks.minor).floor().max(0.0) as u64;
        loop {
            let time = k as f64 * ticks.minor;
            if time > last_visible {
                break;
            }
            let x = rect.min.x + viewport.time_to_pixel(time);
            // Snap major detection to the tick grid, not float modulo
            let is_major = (time / ticks.major - (time / ticks.major).round()).abs() < 1e-6;
            let past_end = time > duration;

            let color = if past_end {
                TICK_MUTED
            } else if is_major {
                TICK_MAJOR
            } else {
                TICK_MINOR
            };
            let len = if is_major { 12.0 } else { 6.0 };
            painter.line_segment(
                [Pos2::new(x, rect.max.y - len), Pos2::new(x, rect.max.y)],
                Stroke::new(1.0, color),
            );

            if is_major {
                painter.text(
                    Pos2::new(x + 3.0, rect.min.y + 2.0),
                    egui::Align2::LEFT_TOP,
                    format_time(time),
                    egui::FontId::monospace(9.0),
                    if past_end { LABEL_MUTED } else { LABEL },
                );
            }
            k += 1;
        }
    }

    RulerResponse {
        seek_to,
        scrubbing: response.dragged() || response.is_pointer_button_down_on(),
    }
}
