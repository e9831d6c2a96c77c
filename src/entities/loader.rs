//! Session document IO.
//!
//! The binary `.plm` capture is decoded by an external tool; this module
//! reads the decoded JSON session document, the annotation sidecar, and
//! provides the built-in demo session used when no document is given.
//!
//! Document shape (all times in seconds):
//! ```json
//! {
//!   "duration": 120.0,
//!   "video_path": "clips/run42.mp4",
//!   "tracks": [ { "id": "...", "name": "...", "unit": "...",
//!                 "sample_rate": 50.0, "data": [{"time": 0.0, "value": 75.0}] } ],
//!   "procedures": [...],
//!   "system_markers": [...],
//!   "incident_markers": [...]
//! }
//! ```

use super::annotation::{Annotation, AnnotationStore};
use super::marker::{IncidentMarker, IncidentSeverity, MarkerCategory, SystemMarker};
use super::procedure::{ActionCategory, ActionMarker, Procedure};
use super::session::SessionData;
use super::track::{Sample, SignalTrack};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk shape of a session document.
#[derive(Debug, Serialize, Deserialize)]
struct SessionDoc {
    duration: f64,
    #[serde(default)]
    video_path: Option<PathBuf>,
    #[serde(default)]
    tracks: Vec<SignalTrack>,
    #[serde(default)]
    procedures: Vec<Procedure>,
    #[serde(default)]
    system_markers: Vec<SystemMarker>,
    #[serde(default)]
    incident_markers: Vec<IncidentMarker>,
}

/// On-disk shape of the annotation sidecar.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AnnotationDoc {
    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// Load a session document plus its annotation sidecar (if present).
pub fn load_session(path: &Path) -> Result<SessionData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading session document {}", path.display()))?;
    let doc: SessionDoc = serde_json::from_str(&raw)
        .with_context(|| format!("parsing session document {}", path.display()))?;

    let mut tracks = doc.tracks;
    for track in &mut tracks {
        if !track.is_sorted() {
            // The capture contract is ascending sample times; recover from a
            // malformed document instead of rendering garbage.
            warn!("track '{}' has unsorted samples, sorting", track.id);
            track.data.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
    }

    let mut session = SessionData {
        session_path: Some(path.to_path_buf()),
        video_path: doc.video_path,
        duration: doc.duration.max(0.0),
        tracks,
        procedures: doc.procedures,
        system_markers: doc.system_markers,
        incident_markers: doc.incident_markers,
        annotations: AnnotationStore::default(),
    };

    if let Some(sidecar) = session.annotation_path() {
        session.annotations = load_annotations(&sidecar);
    }

    info!(
        "Loaded session {}: {:.1}s, {} tracks, {} markers, {} annotations",
        path.display(),
        session.duration,
        session.tracks.len(),
        session.marker_count(),
        session.annotations.len()
    );
    Ok(session)
}

/// Load the annotation sidecar. A missing file is an empty store, not an
/// error; a corrupt one is logged and skipped.
pub fn load_annotations(path: &Path) -> AnnotationStore {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return AnnotationStore::default(),
    };
    match serde_json::from_str::<AnnotationDoc>(&raw) {
        Ok(doc) => AnnotationStore {
            annotations: doc.annotations,
            ..Default::default()
        },
        Err(e) => {
            warn!("ignoring corrupt annotation sidecar {}: {e}", path.display());
            AnnotationStore::default()
        }
    }
}

/// Write the session's annotations to the given path as JSON.
pub fn save_annotations(path: &Path, store: &AnnotationStore) -> Result<()> {
    let doc = AnnotationDoc {
        annotations: store.annotations.clone(),
    };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing annotations to {}", path.display()))?;
    info!("Saved {} annotations to {}", store.len(), path.display());
    Ok(())
}

/// Export annotations as JSON (same shape as the sidecar).
pub fn export_annotations_json(path: &Path, store: &AnnotationStore) -> Result<()> {
    save_annotations(path, store)
}

/// Export annotations as CSV, one row per annotation ordered by time.
pub fn export_annotations_csv(path: &Path, store: &AnnotationStore) -> Result<()> {
    let mut out = String::from("time,category,label,description\n");
    for a in store.sorted_by_time() {
        out.push_str(&format!(
            "{:.3},{},{},{}\n",
            a.time,
            csv_field(&a.category),
            csv_field(&a.label),
            csv_field(&a.description)
        ));
    }
    std::fs::write(path, out)
        .with_context(|| format!("writing CSV export to {}", path.display()))?;
    info!("Exported {} annotations to {}", store.len(), path.display());
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Sine-based signal for the demo session.
fn demo_signal(duration: f64, freq_hz: f64, baseline: f64, amplitude: f64, rate: f64) -> Vec<Sample> {
    let count = (duration * rate) as usize;
    (0..count)
        .map(|i| {
            let time = i as f64 / rate;
            let value = baseline + (time * freq_hz * std::f64::consts::TAU).sin() * amplitude;
            Sample::new(time, value)
        })
        .collect()
}

fn demo_action(time: f64, label: &str, category: ActionCategory) -> ActionMarker {
    ActionMarker {
        time,
        label: label.to_string(),
        category,
        description: None,
    }
}

/// Built-in demo session: a 120 s chemistry-lab training run with three
/// physiological tracks, four procedures, and marker/incident examples.
pub fn demo_session() -> SessionData {
    use ActionCategory::*;
    let duration = 120.0;
    let rate = 50.0;

    let tracks = vec![
        SignalTrack::new(
            "heart-rate",
            "Heart Rate",
            "bpm",
            rate,
            demo_signal(duration, 0.033, 75.0, 15.0, rate),
        ),
        SignalTrack::new(
            "respiration",
            "Respiration",
            "br/min",
            rate,
            demo_signal(duration, 0.0083, 16.0, 4.0, rate),
        ),
        SignalTrack::new(
            "skin-conductance",
            "Skin Conductance",
            "\u{3bc}S",
            rate,
            demo_signal(duration, 0.005, 5.0, 3.0, rate),
        ),
    ];

    let procedures = vec![
        Procedure {
            id: "preparation".to_string(),
            name: "Preparation & PPE".to_string(),
            start_time: 0.0,
            end_time: 30.0,
            action_markers: vec![
                demo_action(5.0, "Lab coat on", CorrectAction),
                demo_action(12.0, "Safety goggles missing", IncorrectAction),
                demo_action(18.0, "Nitrile gloves on", CorrectAction),
                demo_action(25.0, "Goggles on after reminder", CorrectAction),
            ],
            description: None,
        },
        Procedure {
            id: "acid-dilution".to_string(),
            name: "Acid dilution".to_string(),
            start_time: 30.0,
            end_time: 75.0,
            action_markers: vec![
                demo_action(33.0, "Water poured first", CorrectAction),
                demo_action(42.0, "Slow, gradual acid addition", CorrectAction),
                demo_action(50.0, "Mixing time exceeded", TimeoutExceeded),
                demo_action(58.0, "Wrong glassware used", IncorrectAction),
                demo_action(68.0, "Cap closed", CorrectAction),
            ],
            description: None,
        },
        Procedure {
            id: "labelling".to_string(),
            name: "Labelling & storage".to_string(),
            start_time: 75.0,
            end_time: 100.0,
            action_markers: vec![
                demo_action(78.0, "Label written correctly", CorrectAction),
                demo_action(85.0, "Hazard pictograms applied", CorrectAction),
                demo_action(92.0, "Stored in ventilated cabinet", CorrectAction),
            ],
            description: None,
        },
        Procedure {
            id: "cleanup".to_string(),
            name: "Cleanup & finish".to_string(),
            start_time: 100.0,
            end_time: -1.0,
            action_markers: vec![
                demo_action(103.0, "Glassware rinsed", CorrectAction),
                demo_action(108.0, "Residue neutralization skipped", IncorrectAction),
                demo_action(115.0, "Bench cleaned", CorrectAction),
            ],
            description: None,
        },
    ];

    let system_markers = vec![
        SystemMarker {
            time: 28.0,
            label: "Save point".to_string(),
            category: MarkerCategory::Automatic,
            description: None,
        },
        SystemMarker {
            time: 65.0,
            label: "Trainer observation".to_string(),
            category: MarkerCategory::Manual,
            description: Some("Hesitation over glassware choice".to_string()),
        },
        SystemMarker {
            time: 95.0,
            label: "Save point".to_string(),
            category: MarkerCategory::Automatic,
            description: None,
        },
    ];

    let incident_markers = vec![
        IncidentMarker {
            time: 12.0,
            label: "PPE error: goggles missing".to_string(),
            severity: IncidentSeverity::Moderate,
            description: Some("Handling started without eye protection".to_string()),
        },
        IncidentMarker {
            time: 58.0,
            label: "Wrong glassware for concentrated acid".to_string(),
            severity: IncidentSeverity::Moderate,
            description: Some("Beaker used instead of volumetric flask".to_string()),
        },
        IncidentMarker {
            time: 63.0,
            label: "Acid splash on bench".to_string(),
            severity: IncidentSeverity::Critical,
            description: Some("Splatter while mixing, contamination risk".to_string()),
        },
        IncidentMarker {
            time: 108.0,
            label: "Residue not neutralized in sink".to_string(),
            severity: IncidentSeverity::Critical,
            description: Some("Direct disposal without prior neutralization".to_string()),
        },
    ];

    SessionData {
        session_path: None,
        video_path: None,
        duration,
        tracks,
        procedures,
        system_markers,
        incident_markers,
        annotations: AnnotationStore::default(),
    }
}
