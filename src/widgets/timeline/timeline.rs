//! Timeline widget - state and configuration.
//!
//! Shared by the label column, ruler, track canvas and playhead overlay.
//! Data flow: UI interactions emit `AppEvent`s to the bus; the main loop
//! applies them and replaces `ViewportState` wholesale; renderers read
//! `TimelineConfig`/`TimelineState` to draw.

use super::scroll_sync::ScrollSync;
use super::tracks_ui::WaveformCache;
use super::viewport::ViewportState;
use serde::{Deserialize, Serialize};

/// Configuration for the timeline widget
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    pub label_column_width: f32,
    pub ruler_height: f32,
    /// Row height for signal tracks
    pub track_height: f32,
    /// Row height for marker tracks (events, incidents, annotations)
    pub marker_track_height: f32,
    /// Height of one procedure row within the procedures track
    pub procedure_row_height: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            label_column_width: 150.0,
            ruler_height: 28.0,
            track_height: 64.0,
            marker_track_height: 28.0,
            procedure_row_height: 18.0,
        }
    }
}

/// Actual scroll offsets reported by each pane on the previous frame; input
/// to the next synchronization pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaneOffsets {
    pub ruler_x: f32,
    pub tracks_x: f32,
    pub tracks_y: f32,
    pub labels_y: f32,
}

/// Timeline state (persistent between frames)
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineState {
    pub viewport: ViewportState,
    /// Recentre on the playhead during playback
    pub follow_playhead: bool,
    #[serde(skip)]
    pub scroll: ScrollSync,
    #[serde(skip)]
    pub pane_offsets: PaneOffsets,
    #[serde(skip)]
    pub waveforms: WaveformCache,
    /// Visible width of the track pane on the last pass, for zoom centering
    #[serde(skip)]
    pub last_viewport_width: f32,
    /// True while the pointer is dragging a seek on the ruler
    #[serde(skip)]
    pub scrubbing: bool,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            viewport: ViewportState::default(),
            follow_playhead: true,
            scroll: ScrollSync::default(),
            pane_offsets: PaneOffsets::default(),
            waveforms: WaveformCache::default(),
            last_viewport_width: 0.0,
            scrubbing: false,
        }
    }
}

impl TimelineState {
    /// Apply a new viewport (zoom change), keeping the time at the viewport
    /// centre stable so zooming doesn't fling the view.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        if viewport == self.viewport {
            return;
        }
        let width = self.last_viewport_width;
        if width > 0.0 {
            let center_time = self
                .viewport
                .pixel_to_time(self.scroll.scroll_x + width / 2.0);
            self.viewport = viewport;
            self.scroll.scroll_x =
                (self.viewport.time_to_pixel(center_time) - width / 2.0).max(0.0);
        } else {
            self.viewport = viewport;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_viewport_keeps_center_time() {
        let mut state = TimelineState {
            last_viewport_width: 400.0,
            ..Default::default()
        };
        // Centre of the view sits at t = (scroll + 200) / pps
        state.scroll.scroll_x = 600.0;
        let center_before = state
            .viewport
            .pixel_to_time(state.scroll.scroll_x + 200.0);

        state.set_viewport(state.viewport.zoom_in());
        let center_after = state
            .viewport
            .pixel_to_time(state.scroll.scroll_x + 200.0);
        assert!((center_before - center_after).abs() < 0.1);
    }

    #[test]
    fn test_set_viewport_same_state_is_noop() {
        let mut state = TimelineState::default();
        state.scroll.scroll_x = 123.0;
        state.set_viewport(state.viewport);
        assert_eq!(state.scroll.scroll_x, 123.0);
    }
}
