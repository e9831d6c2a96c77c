//! DEBRIEF - Session review and annotation library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (clock, lookups, drift, events)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod dialogs;
pub mod entities;
pub mod help;
pub mod utils;
pub mod widgets;

// Re-export commonly used types from core
pub use core::clock::ClockState;
pub use core::events::{AppEvent, EventBus, EventSender};
pub use core::playback::PlaybackController;
pub use core::transport::{MediaTransport, SimulatedMedia};

// Re-export entities
pub use entities::{Annotation, SessionData, SignalTrack};
