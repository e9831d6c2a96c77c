//! Operator annotations and their store.
//!
//! Annotations are created during review (not part of the capture) and are
//! persisted to a sidecar file next to the session document. The store keeps
//! a dirty flag plus the instant it went dirty so the app can debounce
//! auto-saves.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// A single operator annotation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    /// Time in seconds from session start
    pub time: f64,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Display color as `#rrggbb`
    pub color: String,
    pub category: String,
}

impl Annotation {
    pub fn new(time: f64, label: &str, description: &str, color: &str, category: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            label: label.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            category: category.to_string(),
        }
    }
}

/// Mutable collection of annotations with dirty tracking.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnotationStore {
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    pub(crate) dirty_since: Option<Instant>,
}

impl AnnotationStore {
    pub fn add(&mut self, annotation: Annotation) {
        log::info!(
            "Annotation added at {:.2}s: {}",
            annotation.time,
            annotation.label
        );
        self.annotations.push(annotation);
        self.mark_dirty();
    }

    /// Remove by id. Returns false if no annotation matched.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        let removed = self.annotations.len() != before;
        if removed {
            self.mark_dirty();
        }
        removed
    }

    /// Annotations ordered by time (marker order is not guaranteed).
    pub fn sorted_by_time(&self) -> Vec<&Annotation> {
        let mut items: Vec<&Annotation> = self.annotations.iter().collect();
        items.sort_by(|a, b| a.time.total_cmp(&b.time));
        items
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// How long the store has been dirty, for save debouncing.
    pub fn dirty_for(&self, now: Instant) -> Option<std::time::Duration> {
        self.dirty_since
            .map(|since| now.saturating_duration_since(since))
    }

    pub fn mark_dirty(&mut self) {
        if self.dirty_since.is_none() {
            self.dirty_since = Some(Instant::now());
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_marks_dirty() {
        let mut store = AnnotationStore::default();
        assert!(!store.is_dirty());
        store.add(Annotation::new(12.0, "Missing goggles", "", "#ef4444", "error"));
        assert!(store.is_dirty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_clean() {
        let mut store = AnnotationStore::default();
        store.add(Annotation::new(1.0, "a", "", "#fff", "note"));
        store.clear_dirty();
        assert!(!store.remove(Uuid::new_v4()));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_remove_existing() {
        let mut store = AnnotationStore::default();
        let annotation = Annotation::new(1.0, "a", "", "#fff", "note");
        let id = annotation.id;
        store.add(annotation);
        store.clear_dirty();
        assert!(store.remove(id));
        assert!(store.is_empty());
        assert!(store.is_dirty());
    }

    #[test]
    fn test_sorted_by_time() {
        let mut store = AnnotationStore::default();
        store.add(Annotation::new(90.0, "late", "", "#fff", "note"));
        store.add(Annotation::new(15.0, "early", "", "#fff", "note"));
        let sorted = store.sorted_by_time();
        assert_eq!(sorted[0].label, "early");
        assert_eq!(sorted[1].label, "late");
    }
}
