//! Application events and the dispatch bus.
//!
//! Widgets never mutate playback or session state directly: they emit an
//! `AppEvent` through a cloned [`EventSender`], and the main loop polls the
//! bus once per frame and applies the batch. This keeps every state
//! transition in one place (whole-state replacement, no hidden mutation from
//! inside a widget callback) and makes the UI panes borrow-check trivially.

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::path::PathBuf;
use uuid::Uuid;

use crate::entities::Annotation;

/// Export file format for annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// User intent, dispatched by widgets and applied by the main loop.
#[derive(Clone, Debug)]
pub enum AppEvent {
    // Transport
    TogglePlayPause,
    Play,
    Pause,
    /// Seek to an absolute time in seconds
    Seek(f64),
    /// Seek relative to the current time (signed seconds)
    StepBy(f64),
    SetSpeed(f64),
    JumpToStart,
    JumpToEnd,

    // Timeline viewport
    ZoomIn,
    ZoomOut,
    ZoomReset,

    // Annotations
    /// Pause and open the annotation dialog at the current time
    OpenAnnotationDialog,
    AddAnnotation(Annotation),
    DeleteAnnotation(Uuid),
    SaveAnnotations,
    ExportAnnotations(ExportFormat),

    // Session lifecycle
    OpenSession(PathBuf),
    OpenSessionDialog,
    OpenDemoSession,
}

/// Cloneable handle for widgets to dispatch events.
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<AppEvent>,
}

impl EventSender {
    pub fn emit(&self, event: AppEvent) {
        // Send can only fail if the bus was dropped, i.e. during teardown
        if let Err(e) = self.tx.send(event) {
            log::warn!("event dropped during teardown: {:?}", e.0);
        }
    }
}

/// Event bus: emitted events queue until the main loop polls them.
pub struct EventBus {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Handle for UI components.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Drain all queued events for batch processing in the main loop.
    pub fn poll(&self) -> Vec<AppEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_queue_until_polled() {
        let bus = EventBus::new();
        let sender = bus.sender();
        sender.emit(AppEvent::Play);
        sender.emit(AppEvent::Seek(12.0));
        let events = bus.poll();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AppEvent::Play));
        assert!(matches!(events[1], AppEvent::Seek(t) if t == 12.0));
        assert!(bus.poll().is_empty());
    }

    #[test]
    fn test_senders_are_cloneable() {
        let bus = EventBus::new();
        let a = bus.sender();
        let b = a.clone();
        a.emit(AppEvent::ZoomIn);
        b.emit(AppEvent::ZoomOut);
        assert_eq!(bus.poll().len(), 2);
    }
}
