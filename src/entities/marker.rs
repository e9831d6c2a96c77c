//! Session markers: system events and incidents.
//!
//! Markers arrive from the capture in no guaranteed order; the timeline
//! positions each one independently at `time * pixels_per_second`.

use serde::{Deserialize, Serialize};

/// Origin of a system marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    /// Emitted by the recording application (e.g. save points)
    Automatic,
    /// Entered by the trainer during the live session
    Manual,
}

/// A marker emitted by the recording application during the session,
/// such as a save point or a live trainer note.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemMarker {
    /// Time in seconds from session start
    pub time: f64,
    pub label: String,
    pub category: MarkerCategory,
    #[serde(default)]
    pub description: Option<String>,
}

/// Severity classification for incidents.
///
/// Critical covers dangerous situations (spills, contamination, improper
/// dilution); moderate covers non-critical handling anomalies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Critical,
    Moderate,
}

/// An incident marker classifying an event by severity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncidentMarker {
    /// Time in seconds from session start
    pub time: f64,
    pub label: String,
    pub severity: IncidentSeverity,
    #[serde(default)]
    pub description: Option<String>,
}
