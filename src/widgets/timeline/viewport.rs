//! Timeline viewport model: discrete zoom and time↔pixel mapping.
//!
//! Zoom is an index into a fixed ascending table rather than a free factor,
//! so repeated in/out steps land on reproducible levels and the ruler's tick
//! density can be a simple step function of pixels-per-second.
//!
//! The pixel mapping is absolute: `time_to_pixel(t) = t * pixels_per_second`,
//! with horizontal translation delegated to the scroll containers. No drawing
//! surface subtracts a scroll offset on its own.

use serde::{Deserialize, Serialize};

/// Discrete zoom factors, ascending.
pub const ZOOM_TABLE: &[f32] = &[0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0];

/// Index of factor 1.0 in [`ZOOM_TABLE`].
pub const DEFAULT_ZOOM_INDEX: usize = 2;

/// Ruler gridline spacing for the current zoom, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickIntervals {
    pub major: f64,
    pub minor: f64,
}

/// Viewport state: zoom level plus the conversion constants.
///
/// Transitions (`zoom_in`/`zoom_out`/`zoom_reset`) return a new state; the
/// caller replaces its copy wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom_index: usize,
    /// Pixels per second at zoom factor 1.0
    pub base_pixels_per_second: f32,
    /// Floor that keeps conversions finite for zero-length sessions
    pub min_pixels_per_second: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_index: DEFAULT_ZOOM_INDEX,
            base_pixels_per_second: 10.0,
            min_pixels_per_second: 0.5,
        }
    }
}

impl ViewportState {
    /// Step one zoom level in; no-op at the top of the table.
    pub fn zoom_in(self) -> Self {
        Self {
            zoom_index: (self.zoom_index + 1).min(ZOOM_TABLE.len() - 1),
            ..self
        }
    }

    /// Step one zoom level out; no-op at the bottom of the table.
    pub fn zoom_out(self) -> Self {
        Self {
            zoom_index: self.zoom_index.saturating_sub(1),
            ..self
        }
    }

    /// Back to factor 1.0.
    pub fn zoom_reset(self) -> Self {
        Self {
            zoom_index: DEFAULT_ZOOM_INDEX,
            ..self
        }
    }

    pub fn zoom_factor(&self) -> f32 {
        ZOOM_TABLE[self.zoom_index.min(ZOOM_TABLE.len() - 1)]
    }

    pub fn pixels_per_second(&self) -> f32 {
        (self.base_pixels_per_second * self.zoom_factor()).max(self.min_pixels_per_second)
    }

    /// Full horizontal extent of the scrollable timeline. Never narrower
    /// than the visible viewport, so short recordings still fill the screen.
    pub fn content_width(&self, duration: f64, visible_width: f32) -> f32 {
        ((duration.max(0.0) as f32) * self.pixels_per_second()).max(visible_width)
    }

    pub fn time_to_pixel(&self, time: f64) -> f32 {
        (time * self.pixels_per_second() as f64) as f32
    }

    pub fn pixel_to_time(&self, x: f32) -> f64 {
        x as f64 / self.pixels_per_second() as f64
    }

    /// Tick spacing as a step function of pixels-per-second: dense gridlines
    /// only when there is room for them.
    pub fn tick_intervals(&self) -> TickIntervals {
        let pps = self.pixels_per_second();
        if pps > 30.0 {
            TickIntervals { major: 5.0, minor: 1.0 }
        } else if pps > 15.0 {
            TickIntervals { major: 10.0, minor: 2.0 }
        } else {
            TickIntervals { major: 60.0, minor: 10.0 }
        }
    }
}
