//! Core playback engine - clock, lookups, drift correction, events
//!
//! These modules form the synchronization core, independent of UI.

pub mod clock;
pub mod drift;
pub mod events;
pub mod playback;
pub mod sample_index;
pub mod transport;

// Re-exports for convenience
pub use clock::ClockState;
pub use drift::DriftCorrector;
pub use events::{AppEvent, EventBus, EventSender, ExportFormat};
pub use playback::{PlaybackController, SPEED_PRESETS};
pub use transport::{MediaTransport, SimulatedMedia};
