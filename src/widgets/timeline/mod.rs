//! Timeline widget - synchronized ruler / tracks / label panes
//!
//! Horizontal stack of signal and marker rows under a seekable time ruler,
//! with a frame-rate playhead overlay on top.

mod playhead;
mod ruler;
pub mod scroll_sync;
mod timeline;
mod timeline_ui;
pub mod tracks_ui;
pub mod viewport;

pub use scroll_sync::{Pane, ScrollSync};
pub use timeline::{PaneOffsets, TimelineConfig, TimelineState};
pub use timeline_ui::render_timeline;
pub use tracks_ui::WaveformCache;
pub use viewport::{TickIntervals, ViewportState, ZOOM_TABLE};
