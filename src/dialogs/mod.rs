//! Modal windows: annotation entry, settings.

pub mod annotation;
pub mod prefs;

pub use annotation::AnnotationDialog;
pub use prefs::{AppSettings, render_settings_window};
