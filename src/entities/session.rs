//! Session data: everything loaded for one review.
//!
//! Owned by the app shell and passed by reference to panes that need it;
//! there is no global session store. Capture data (tracks, markers,
//! procedures) is immutable after load; only the annotation store mutates.

use super::annotation::AnnotationStore;
use super::marker::{IncidentMarker, SystemMarker};
use super::procedure::Procedure;
use super::track::SignalTrack;
use std::path::PathBuf;

/// A loaded session: capture data plus operator annotations.
#[derive(Clone, Debug, Default)]
pub struct SessionData {
    /// Source document path, if loaded from disk (None for the demo session)
    pub session_path: Option<PathBuf>,
    /// Video file referenced by the capture, played by the media transport
    pub video_path: Option<PathBuf>,
    /// Session length in seconds
    pub duration: f64,
    pub tracks: Vec<SignalTrack>,
    pub procedures: Vec<Procedure>,
    pub system_markers: Vec<SystemMarker>,
    pub incident_markers: Vec<IncidentMarker>,
    pub annotations: AnnotationStore,
}

impl SessionData {
    /// True when nothing has been loaded yet (startup state).
    pub fn is_loaded(&self) -> bool {
        self.duration > 0.0 || !self.tracks.is_empty()
    }

    /// Display name for the title bar and status line.
    pub fn display_name(&self) -> String {
        match &self.session_path {
            Some(path) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("session")
                .to_string(),
            None if self.is_loaded() => "demo session".to_string(),
            None => "no session".to_string(),
        }
    }

    /// Sidecar path for persisted annotations, when the session came from disk.
    pub fn annotation_path(&self) -> Option<PathBuf> {
        self.session_path
            .as_ref()
            .map(|p| p.with_extension("annot.json"))
    }

    /// Total count of timeline markers across all categories.
    pub fn marker_count(&self) -> usize {
        self.system_markers.len()
            + self.incident_markers.len()
            + self
                .procedures
                .iter()
                .map(|p| p.action_markers.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_not_loaded() {
        let session = SessionData::default();
        assert!(!session.is_loaded());
        assert_eq!(session.display_name(), "no session");
        assert!(session.annotation_path().is_none());
    }

    #[test]
    fn test_annotation_sidecar_path() {
        let session = SessionData {
            session_path: Some(PathBuf::from("/tmp/run42.session.json")),
            duration: 10.0,
            ..Default::default()
        };
        assert_eq!(
            session.annotation_path().unwrap(),
            PathBuf::from("/tmp/run42.session.annot.json")
        );
    }
}
