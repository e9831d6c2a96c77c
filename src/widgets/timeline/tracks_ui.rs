//! Track rendering: waveforms, marker rows, procedure bars.
//!
//! Every row is drawn at full content width inside the tracks scroll pane;
//! the scroll container does the windowing, so none of the drawing code
//! subtracts a scroll offset. Waveform polylines are the expensive part and
//! are cached per track, keyed by (pixels-per-second, row height, data
//! length): a cache entry is rebuilt on zoom/resize/data change and never on
//! a clock tick, which keeps per-frame playback cost independent of track
//! count. The playhead overlay is the only thing repainting at frame rate.

use super::timeline::TimelineConfig;
use super::viewport::ViewportState;
use crate::core::events::{AppEvent, EventSender};
use crate::entities::{
    ActionCategory, IncidentSeverity, MarkerCategory, SessionData, SignalTrack,
};
use eframe::egui::{Color32, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2};
use std::collections::HashMap;

pub(super) const TRACK_BG: Color32 = Color32::from_rgb(24, 24, 27);
pub(super) const ROW_SEPARATOR: Color32 = Color32::from_rgb(39, 39, 42);

/// Palette cycled across signal tracks.
pub(super) const SIGNAL_COLORS: &[Color32] = &[
    Color32::from_rgb(239, 68, 68),
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(34, 197, 94),
    Color32::from_rgb(234, 179, 8),
    Color32::from_rgb(168, 85, 247),
];

const MARKER_AUTOMATIC: Color32 = Color32::from_rgb(248, 186, 51);
const MARKER_MANUAL: Color32 = Color32::from_rgb(96, 165, 250);
const INCIDENT_CRITICAL: Color32 = Color32::from_rgb(239, 68, 68);
const INCIDENT_MODERATE: Color32 = Color32::from_rgb(249, 115, 22);
const ACTION_CORRECT: Color32 = Color32::from_rgb(34, 197, 94);
const ACTION_INCORRECT: Color32 = Color32::from_rgb(239, 68, 68);
const ACTION_TIMEOUT: Color32 = Color32::from_rgb(249, 115, 22);
const PROCEDURE_BAR: Color32 = Color32::from_rgb(81, 109, 177);

pub(super) fn signal_color(index: usize) -> Color32 {
    SIGNAL_COLORS[index % SIGNAL_COLORS.len()]
}

pub(super) fn action_color(category: ActionCategory) -> Color32 {
    match category {
        ActionCategory::CorrectAction => ACTION_CORRECT,
        ActionCategory::IncorrectAction => ACTION_INCORRECT,
        ActionCategory::TimeoutExceeded => ACTION_TIMEOUT,
    }
}

/// One timeline row. The label column and the track canvas iterate the same
/// layout so their heights always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// Index into `session.tracks`
    Signal(usize),
    Procedures,
    Incidents,
    Events,
    Annotations,
}

/// Row layout for a session: kind plus row height.
pub fn row_layout(session: &SessionData, config: &TimelineConfig) -> Vec<(RowKind, f32)> {
    let mut rows: Vec<(RowKind, f32)> = session
        .tracks
        .iter()
        .enumerate()
        .map(|(i, _)| (RowKind::Signal(i), config.track_height))
        .collect();
    if !session.procedures.is_empty() {
        let height = config.procedure_row_height * session.procedures.len() as f32 + 8.0;
        rows.push((RowKind::Procedures, height.max(config.marker_track_height)));
    }
    if !session.incident_markers.is_empty() {
        rows.push((RowKind::Incidents, config.marker_track_height));
    }
    if !session.system_markers.is_empty() {
        rows.push((RowKind::Events, config.marker_track_height));
    }
    rows.push((RowKind::Annotations, config.marker_track_height));
    rows
}

/// Display name for a row in the label column.
pub fn row_name(kind: RowKind, session: &SessionData) -> &str {
    match kind {
        RowKind::Signal(i) => session
            .tracks
            .get(i)
            .map(|t| t.name.as_str())
            .unwrap_or(""),
        RowKind::Procedures => "Procedures",
        RowKind::Incidents => "Incidents",
        RowKind::Events => "Events",
        RowKind::Annotations => "Annotations",
    }
}

/// Cache key for one track's tessellated waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WaveformKey {
    /// `pixels_per_second.to_bits()`, exact match, no epsilon games
    pps_bits: u32,
    height_bits: u32,
    samples: usize,
}

struct CachedWaveform {
    key: WaveformKey,
    /// Content-space points: x from content left edge, y from row top
    points: Vec<Pos2>,
}

/// Per-track polyline cache. Rebuilt only when the key stops matching;
/// the rebuild counter exists for tests and debug logging.
#[derive(Default)]
pub struct WaveformCache {
    entries: HashMap<String, CachedWaveform>,
    rebuilds: usize,
}

impl std::fmt::Debug for WaveformCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformCache")
            .field("tracks", &self.entries.len())
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

impl WaveformCache {
    /// Drop all entries (session change).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Cached polyline for a track at the given zoom and row height.
    pub fn polyline(&mut self, track: &SignalTrack, pps: f32, height: f32) -> &[Pos2] {
        let key = WaveformKey {
            pps_bits: pps.to_bits(),
            height_bits: height.to_bits(),
            samples: track.data.len(),
        };
        let stale = self
            .entries
            .get(&track.id)
            .is_none_or(|cached| cached.key != key);
        if stale {
            self.rebuilds += 1;
            log::debug!(
                "Rebuilding waveform for '{}' at {:.1} px/s ({} samples)",
                track.id,
                pps,
                track.data.len()
            );
            let points = build_polyline(track, pps, height);
            self.entries
                .insert(track.id.clone(), CachedWaveform { key, points });
        }
        &self.entries[&track.id].points
    }
}

/// Map samples to content-space points, normalized into the row height
/// (inverted: larger values toward the top). Dense series collapse to a
/// per-pixel min/max envelope so the point count is bounded by content
/// width, not sample count.
fn build_polyline(track: &SignalTrack, pps: f32, height: f32) -> Vec<Pos2> {
    if track.data.is_empty() {
        return Vec::new();
    }
    let range = track.value_range();
    let y_of = |value: f64| -> f32 { height - (range.normalize(value) as f32) * height };

    let span_px = ((track.data.last().unwrap().time - track.data[0].time) * pps as f64).max(1.0);
    let dense = track.data.len() as f64 > 2.0 * span_px;

    if !dense {
        return track
            .data
            .iter()
            .map(|s| Pos2::new((s.time * pps as f64) as f32, y_of(s.value)))
            .collect();
    }

    // Envelope: two points (min, max) per occupied pixel column
    let mut points = Vec::with_capacity(span_px as usize * 2);
    let mut column = f32::MIN;
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    let mut open = false;
    for s in &track.data {
        let x = ((s.time * pps as f64) as f32).floor();
        if x != column {
            if open {
                points.push(Pos2::new(column + 0.5, y_of(hi)));
                points.push(Pos2::new(column + 0.5, y_of(lo)));
            }
            column = x;
            lo = s.value;
            hi = s.value;
            open = true;
        } else {
            lo = lo.min(s.value);
            hi = hi.max(s.value);
        }
    }
    if open {
        points.push(Pos2::new(column + 0.5, y_of(hi)));
        points.push(Pos2::new(column + 0.5, y_of(lo)));
    }
    points
}

/// Draw one signal row from the cached polyline, translated to the row rect
/// and sliced to the visible clip region.
fn draw_signal_row(
    ui: &Ui,
    rect: Rect,
    track: &SignalTrack,
    color: Color32,
    viewport: &ViewportState,
    cache: &mut WaveformCache,
) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, TRACK_BG);
    if track.is_empty() {
        return;
    }

    let points = cache.polyline(track, viewport.pixels_per_second(), rect.height());
    let clip = ui.clip_rect();
    let x_min = clip.min.x - rect.min.x - 2.0;
    let x_max = clip.max.x - rect.min.x + 2.0;
    // Points are ordered by x; slice out the visible span
    let start = points.partition_point(|p| p.x < x_min);
    let end = points.partition_point(|p| p.x <= x_max);
    if end.saturating_sub(start) < 2 {
        return;
    }
    let visible: Vec<Pos2> = points[start..end]
        .iter()
        .map(|p| Pos2::new(rect.min.x + p.x, rect.min.y + p.y))
        .collect();
    painter.add(Shape::line(visible, Stroke::new(1.5, color)));
}

/// Draw a row of vertical markers; hovering shows the label, clicking seeks.
fn draw_marker_row<'a>(
    ui: &mut Ui,
    rect: Rect,
    row_id: &str,
    markers: impl Iterator<Item = (f64, &'a str, Color32)>,
    viewport: &ViewportState,
    sender: &EventSender,
) {
    ui.painter().rect_filled(rect, 0.0, TRACK_BG);
    let clip = ui.clip_rect();
    for (i, (time, label, color)) in markers.enumerate() {
        let x = rect.min.x + viewport.time_to_pixel(time);
        if x < clip.min.x - 8.0 || x > clip.max.x + 8.0 {
            continue;
        }
        ui.painter().line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(2.0, color),
        );
        let hit = Rect::from_center_size(
            Pos2::new(x, rect.center().y),
            Vec2::new(8.0, rect.height()),
        );
        let response = ui
            .interact(hit, ui.id().with((row_id, i)), Sense::click())
            .on_hover_text(label);
        if response.clicked() {
            sender.emit(AppEvent::Seek(time));
        }
    }
}

/// Draw the stacked procedure rows: one bar per procedure, action markers on
/// top of their bar.
fn draw_procedure_rows(
    ui: &mut Ui,
    rect: Rect,
    session: &SessionData,
    config: &TimelineConfig,
    viewport: &ViewportState,
    sender: &EventSender,
) {
    ui.painter().rect_filled(rect, 0.0, TRACK_BG);
    let clip = ui.clip_rect();
    for (row, procedure) in session.procedures.iter().enumerate() {
        let top = rect.min.y + 4.0 + row as f32 * config.procedure_row_height;
        let start_x = rect.min.x + viewport.time_to_pixel(procedure.start_time);
        let end_x =
            rect.min.x + viewport.time_to_pixel(procedure.resolved_end(session.duration));
        let bar = Rect::from_min_max(
            Pos2::new(start_x, top),
            Pos2::new(end_x.max(start_x + 2.0), top + config.procedure_row_height - 4.0),
        );
        if bar.max.x < clip.min.x || bar.min.x > clip.max.x {
            continue;
        }
        ui.painter().rect_filled(bar, 4.0, PROCEDURE_BAR);
        let response = ui
            .interact(bar, ui.id().with(("procedure", row)), Sense::click())
            .on_hover_text(&procedure.name);
        if response.clicked() {
            sender.emit(AppEvent::Seek(procedure.start_time));
        }

        for (i, marker) in procedure.action_markers.iter().enumerate() {
            let x = rect.min.x + viewport.time_to_pixel(marker.time);
            if x < clip.min.x - 8.0 || x > clip.max.x + 8.0 {
                continue;
            }
            ui.painter().line_segment(
                [Pos2::new(x, bar.min.y), Pos2::new(x, bar.max.y)],
                Stroke::new(2.0, action_color(marker.category)),
            );
            let hit = Rect::from_center_size(
                Pos2::new(x, bar.center().y),
                Vec2::new(8.0, bar.height()),
            );
            let hover = ui
                .interact(hit, ui.id().with(("action", row, i)), Sense::click())
                .on_hover_text(&marker.label);
            if hover.clicked() {
                sender.emit(AppEvent::Seek(marker.time));
            }
        }
    }
}

/// Render all track rows at full content width. Returns the total height so
/// the playhead overlay can span it.
#[allow(clippy::too_many_arguments)]
pub fn render_tracks(
    ui: &mut Ui,
    session: &SessionData,
    config: &TimelineConfig,
    viewport: &ViewportState,
    cache: &mut WaveformCache,
    content_width: f32,
    sender: &EventSender,
) -> f32 {
    let rows = row_layout(session, config);
    let mut total = 0.0;
    for (kind, height) in rows {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(content_width, height), Sense::hover());
        total += height;
        if !ui.is_rect_visible(rect) {
            continue;
        }
        match kind {
            RowKind::Signal(i) => {
                let track = &session.tracks[i];
                draw_signal_row(ui, rect, track, signal_color(i), viewport, cache);
                // Hover readout: interpolated value at the pointer's time
                let response = ui.interact(rect, ui.id().with(("signal", i)), Sense::hover());
                if let Some(pos) = response.hover_pos() {
                    let time = viewport.pixel_to_time(pos.x - rect.min.x);
                    if let Some(value) =
                        crate::core::sample_index::interpolated_value_at(&track.data, time)
                    {
                        response.on_hover_text(format!(
                            "{} · {:.2} {}",
                            crate::utils::format_time(time),
                            value,
                            track.unit
                        ));
                    }
                }
            }
            RowKind::Procedures => {
                draw_procedure_rows(ui, rect, session, config, viewport, sender);
            }
            RowKind::Incidents => {
                let markers = session.incident_markers.iter().map(|m| {
                    let color = match m.severity {
                        IncidentSeverity::Critical => INCIDENT_CRITICAL,
                        IncidentSeverity::Moderate => INCIDENT_MODERATE,
                    };
                    (m.time, m.label.as_str(), color)
                });
                draw_marker_row(ui, rect, "incidents", markers, viewport, sender);
            }
            RowKind::Events => {
                let markers = session.system_markers.iter().map(|m| {
                    let color = match m.category {
                        MarkerCategory::Automatic => MARKER_AUTOMATIC,
                        MarkerCategory::Manual => MARKER_MANUAL,
                    };
                    (m.time, m.label.as_str(), color)
                });
                draw_marker_row(ui, rect, "events", markers, viewport, sender);
            }
            RowKind::Annotations => {
                let sorted = session.annotations.sorted_by_time();
                let markers = sorted.iter().map(|a| {
                    (
                        a.time,
                        a.label.as_str(),
                        crate::utils::parse_hex_color(&a.color)
                            .unwrap_or(Color32::from_rgb(248, 186, 51)),
                    )
                });
                draw_marker_row(ui, rect, "annotations", markers, viewport, sender);
            }
        }
        // Row separator at the bottom edge
        ui.painter().line_segment(
            [
                Pos2::new(rect.min.x, rect.max.y),
                Pos2::new(rect.max.x, rect.max.y),
            ],
            Stroke::new(1.0, ROW_SEPARATOR),
        );
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Sample;

    fn track(samples: usize, rate: f64) -> SignalTrack {
        let data = (0..samples)
            .map(|i| Sample::new(i as f64 / rate, (i % 10) as f64))
            .collect();
        SignalTrack::new("hr", "Heart Rate", "bpm", rate, data)
    }

    #[test]
    fn test_cache_rebuilds_only_on_key_change() {
        let mut cache = WaveformCache::default();
        let track = track(500, 50.0);

        cache.polyline(&track, 10.0, 64.0);
        assert_eq!(cache.rebuilds(), 1);

        // Same zoom and height: served from cache (a clock tick between
        // frames must never trigger a rebuild)
        cache.polyline(&track, 10.0, 64.0);
        cache.polyline(&track, 10.0, 64.0);
        assert_eq!(cache.rebuilds(), 1);

        // Zoom change invalidates
        cache.polyline(&track, 15.0, 64.0);
        assert_eq!(cache.rebuilds(), 2);

        // Row resize invalidates
        cache.polyline(&track, 15.0, 80.0);
        assert_eq!(cache.rebuilds(), 3);
    }

    #[test]
    fn test_polyline_empty_track_renders_nothing() {
        let empty = SignalTrack::new("e", "Empty", "", 1.0, Vec::new());
        assert!(build_polyline(&empty, 10.0, 64.0).is_empty());
    }

    #[test]
    fn test_sparse_polyline_maps_one_point_per_sample() {
        let track = track(10, 1.0); // 10 samples over 9s, far from dense
        let points = build_polyline(&track, 10.0, 64.0);
        assert_eq!(points.len(), 10);
        assert_eq!(points[0].x, 0.0);
        assert!((points[9].x - 90.0).abs() < 0.01);
        // y stays inside the row
        assert!(points.iter().all(|p| p.y >= 0.0 && p.y <= 64.0));
    }

    #[test]
    fn test_dense_polyline_bounded_by_columns() {
        // 10_000 samples over 10s at 10 px/s = 100 columns of content
        let track = track(10_000, 1000.0);
        let points = build_polyline(&track, 10.0, 64.0);
        assert!(points.len() <= 2 * 101);
        assert!(!points.is_empty());
    }

    #[test]
    fn test_row_layout_matches_session_shape() {
        let session = crate::entities::loader::demo_session();
        let config = TimelineConfig::default();
        let rows = row_layout(&session, &config);
        // 3 signals + procedures + incidents + events + annotations
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].0, RowKind::Signal(0));
        assert!(rows.iter().any(|(k, _)| *k == RowKind::Procedures));
        assert_eq!(rows.last().unwrap().0, RowKind::Annotations);
    }

    #[test]
    fn test_row_layout_skips_empty_marker_rows() {
        let session = SessionData {
            duration: 10.0,
            ..Default::default()
        };
        let rows = row_layout(&session, &TimelineConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, RowKind::Annotations);
    }
}
