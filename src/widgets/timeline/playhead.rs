//! Playhead overlay: the current-time indicator.
//!
//! Painted on the foreground layer over the visible ruler + tracks region,
//! every frame while playing and once on seek/pause. Deliberately split from
//! the track rendering: this is the only per-tick drawing, so frame cost
//! stays O(1) in the number and size of tracks.

use eframe::egui::{self, Color32, LayerId, Order, Pos2, Rect, Stroke, Ui};

const PLAYHEAD: Color32 = Color32::from_rgb(239, 68, 68);

/// Draw the playhead line and its ruler handle.
///
/// `visible_rect` is the on-screen region spanning ruler + tracks;
/// `content_x` is the playhead position in content space and `scroll_x` the
/// shared horizontal offset. This is the one place that maps content to
/// screen coordinates manually, because the overlay deliberately lives
/// outside the scroll containers.
pub fn draw_playhead(ui: &Ui, visible_rect: Rect, ruler_bottom: f32, content_x: f32, scroll_x: f32) {
    let x = visible_rect.min.x + (content_x - scroll_x);
    if x < visible_rect.min.x || x > visible_rect.max.x {
        return;
    }

    let painter = ui
        .ctx()
        .layer_painter(LayerId::new(Order::Foreground, egui::Id::new("playhead_overlay")))
        .with_clip_rect(visible_rect);

    painter.line_segment(
        [
            Pos2::new(x, visible_rect.min.y),
            Pos2::new(x, visible_rect.max.y),
        ],
        Stroke::new(2.0, PLAYHEAD),
    );

    // Triangle handle in the ruler band
    let tip = Pos2::new(x, ruler_bottom);
    painter.add(egui::Shape::convex_polygon(
        vec![
            tip,
            Pos2::new(x - 5.0, ruler_bottom - 8.0),
            Pos2::new(x + 5.0, ruler_bottom - 8.0),
        ],
        PLAYHEAD,
        Stroke::NONE,
    ));
}
