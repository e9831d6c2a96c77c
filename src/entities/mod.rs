//! Entities module - session data model and IO
//!
//! Capture data (tracks, markers, procedures) is immutable after load; the
//! annotation store is the only mutable entity. UI representation (colors,
//! row layout) stays out of this module.

pub mod annotation;
pub mod loader;
pub mod marker;
pub mod procedure;
pub mod session;
pub mod track;

pub use annotation::{Annotation, AnnotationStore};
pub use marker::{IncidentMarker, IncidentSeverity, MarkerCategory, SystemMarker};
pub use procedure::{ActionCategory, ActionMarker, Procedure};
pub use session::SessionData;
pub use track::{Sample, SignalTrack, ValueRange};
