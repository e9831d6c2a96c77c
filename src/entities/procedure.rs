//! Procedures: distinct phases or activities within a session.

use serde::{Deserialize, Serialize};

/// Outcome classification for an action performed during a procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    CorrectAction,
    IncorrectAction,
    TimeoutExceeded,
}

/// An action marker within a procedure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionMarker {
    /// Time in seconds from session start
    pub time: f64,
    pub label: String,
    pub category: ActionCategory,
    #[serde(default)]
    pub description: Option<String>,
}

/// A phase or activity within the session, spanning a time interval.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,
    pub name: String,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds; negative means open-ended (runs to session end)
    pub end_time: f64,
    #[serde(default)]
    pub action_markers: Vec<ActionMarker>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Procedure {
    /// Effective end time: open-ended procedures extend to the session
    /// duration.
    pub fn resolved_end(&self, duration: f64) -> f64 {
        if self.end_time < 0.0 {
            duration
        } else {
            self.end_time
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(start: f64, end: f64) -> Procedure {
        Procedure {
            id: "cleanup".to_string(),
            name: "Cleanup".to_string(),
            start_time: start,
            end_time: end,
            action_markers: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn test_resolved_end_bounded() {
        assert_eq!(procedure(30.0, 75.0).resolved_end(120.0), 75.0);
    }

    #[test]
    fn test_resolved_end_open_ended() {
        assert_eq!(procedure(100.0, -1.0).resolved_end(120.0), 120.0);
    }

    #[test]
    fn test_action_category_serde_names() {
        let json = "{\"time\":5.0,\"label\":\"Gown on\",\"category\":\"correct_action\"}";
        let marker: ActionMarker = serde_json::from_str(json).unwrap();
        assert_eq!(marker.category, ActionCategory::CorrectAction);
    }
}
