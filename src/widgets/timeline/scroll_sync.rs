//! Scroll synchronization across the timeline panes.
//!
//! Three panes share offsets in two independent pairings: ruler↔tracks on
//! the horizontal axis, labels↔tracks on the vertical axis. Each UI pass the
//! synchronizer observes every pane's actual offset; the first pane that
//! deviates from the shared value becomes that pass's origin and writes the
//! shared offset, and every other pane is forced to it. A pane that was
//! merely forced never becomes an origin in the same pass; that is the
//! re-entrancy guard that keeps propagation from ping-ponging between
//! partners.
//!
//! Auto-follow recentres the view on the playhead during playback, but backs
//! off while the user is scrolling (and for a short grace period after), and
//! on the frame of an explicit seek. It must never fight a drag in progress.

use std::time::{Duration, Instant};

/// How long after the last manual scroll auto-follow stays suppressed.
const MANUAL_SCROLL_GRACE: Duration = Duration::from_millis(400);

/// Offsets below this are jitter, not user intent.
const OFFSET_EPSILON: f32 = 0.5;

/// A synchronized pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Ruler,
    Tracks,
    Labels,
}

/// Shared scroll state for one timeline view.
#[derive(Debug, Default)]
pub struct ScrollSync {
    /// Shared horizontal offset (ruler↔tracks pairing)
    pub scroll_x: f32,
    /// Shared vertical offset (labels↔tracks pairing)
    pub scroll_y: f32,
    origin_x: Option<Pane>,
    origin_y: Option<Pane>,
    manual_since: Option<Instant>,
}

impl ScrollSync {
    /// Start a synchronization pass; clears the per-pass origin guards.
    pub fn begin_pass(&mut self) {
        self.origin_x = None;
        self.origin_y = None;
    }

    /// Report a pane's actual horizontal offset. Returns the offset the pane
    /// must show for the rest of this pass.
    pub fn observe_x(&mut self, pane: Pane, offset: f32, now: Instant) -> f32 {
        debug_assert!(matches!(pane, Pane::Ruler | Pane::Tracks));
        if self.origin_x.is_none() && (offset - self.scroll_x).abs() > OFFSET_EPSILON {
            self.origin_x = Some(pane);
            self.scroll_x = offset;
            self.manual_since = Some(now);
        }
        self.scroll_x
    }

    /// Report a pane's actual vertical offset; vertical twin of `observe_x`.
    pub fn observe_y(&mut self, pane: Pane, offset: f32, now: Instant) -> f32 {
        debug_assert!(matches!(pane, Pane::Labels | Pane::Tracks));
        if self.origin_y.is_none() && (offset - self.scroll_y).abs() > OFFSET_EPSILON {
            self.origin_y = Some(pane);
            self.scroll_y = offset;
            self.manual_since = Some(now);
        }
        self.scroll_y
    }

    /// The pane that initiated this pass's horizontal change, if any.
    pub fn origin_x(&self) -> Option<Pane> {
        self.origin_x
    }

    /// Suppress auto-follow (called on explicit seek so the recentre logic
    /// doesn't stack a second jump on top of the user's).
    pub fn suppress_follow(&mut self, now: Instant) {
        self.manual_since = Some(now);
    }

    fn manual_active(&self, now: Instant) -> bool {
        self.manual_since
            .is_some_and(|since| now.saturating_duration_since(since) < MANUAL_SCROLL_GRACE)
    }

    /// Keep the playhead inside the central third of the viewport. Call only
    /// while playing. Returns true when the view was recentred.
    pub fn follow(
        &mut self,
        playhead_px: f32,
        viewport_width: f32,
        content_width: f32,
        now: Instant,
    ) -> bool {
        if viewport_width <= 0.0 || self.manual_active(now) {
            return false;
        }
        let lo = self.scroll_x + viewport_width / 3.0;
        let hi = self.scroll_x + viewport_width * 2.0 / 3.0;
        if playhead_px >= lo && playhead_px <= hi {
            return false;
        }
        let max_scroll = (content_width - viewport_width).max(0.0);
        self.scroll_x = (playhead_px - viewport_width / 2.0).clamp(0.0, max_scroll);
        true
    }

    /// Clamp offsets when the content shrinks (zoom-out, session change).
    pub fn clamp_to(
        &mut self,
        content_width: f32,
        viewport_width: f32,
        content_height: f32,
        viewport_height: f32,
    ) {
        self.scroll_x = self
            .scroll_x
            .clamp(0.0, (content_width - viewport_width).max(0.0));
        self.scroll_y = self
            .scroll_y
            .clamp(0.0, (content_height - viewport_height).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_mover_becomes_origin_and_partner_is_forced() {
        let now = Instant::now();
        let mut sync = ScrollSync::default();
        sync.begin_pass();
        // Ruler scrolled to 100; tracks still at 0
        assert_eq!(sync.observe_x(Pane::Ruler, 100.0, now), 100.0);
        assert_eq!(sync.origin_x(), Some(Pane::Ruler));
        // Tracks reports its stale offset and gets the shared one back
        assert_eq!(sync.observe_x(Pane::Tracks, 0.0, now), 100.0);
        // The forced pane did not steal the origin
        assert_eq!(sync.origin_x(), Some(Pane::Ruler));
    }

    #[test]
    fn test_forced_pane_does_not_repropagate_next_pass() {
        let now = Instant::now();
        let mut sync = ScrollSync::default();
        sync.begin_pass();
        sync.observe_x(Pane::Tracks, 250.0, now);
        sync.observe_x(Pane::Ruler, 0.0, now);

        // Next pass: both panes now agree; nobody becomes origin
        sync.begin_pass();
        assert_eq!(sync.observe_x(Pane::Ruler, 250.0, now), 250.0);
        assert_eq!(sync.observe_x(Pane::Tracks, 250.0, now), 250.0);
        assert_eq!(sync.origin_x(), None);
    }

    #[test]
    fn test_axes_are_independent() {
        let now = Instant::now();
        let mut sync = ScrollSync::default();
        sync.begin_pass();
        sync.observe_x(Pane::Tracks, 80.0, now);
        sync.observe_y(Pane::Labels, 40.0, now);
        assert_eq!(sync.scroll_x, 80.0);
        assert_eq!(sync.scroll_y, 40.0);
        // Tracks vertical follows the labels pane
        assert_eq!(sync.observe_y(Pane::Tracks, 0.0, now), 40.0);
    }

    #[test]
    fn test_follow_recentres_outside_central_third() {
        let now = Instant::now();
        let mut sync = ScrollSync::default();
        // Viewport 300px wide at offset 0: central third is 100..200
        assert!(!sync.follow(150.0, 300.0, 3000.0, now));
        assert_eq!(sync.scroll_x, 0.0);

        assert!(sync.follow(500.0, 300.0, 3000.0, now));
        assert_eq!(sync.scroll_x, 350.0);
    }

    #[test]
    fn test_follow_clamps_to_content() {
        let now = Instant::now();
        let mut sync = ScrollSync::default();
        assert!(sync.follow(2950.0, 300.0, 3000.0, now));
        assert_eq!(sync.scroll_x, 2700.0);
    }

    #[test]
    fn test_follow_suppressed_by_manual_scroll() {
        let t0 = Instant::now();
        let mut sync = ScrollSync::default();
        sync.begin_pass();
        sync.observe_x(Pane::Tracks, 50.0, t0);

        // Playhead is way outside, but the user just scrolled
        assert!(!sync.follow(2000.0, 300.0, 3000.0, t0));
        assert_eq!(sync.scroll_x, 50.0);

        // After the grace period follow resumes
        let later = t0 + Duration::from_millis(500);
        assert!(sync.follow(2000.0, 300.0, 3000.0, later));
    }

    #[test]
    fn test_follow_suppressed_on_explicit_seek() {
        let t0 = Instant::now();
        let mut sync = ScrollSync::default();
        sync.suppress_follow(t0);
        assert!(!sync.follow(2000.0, 300.0, 3000.0, t0));
    }

    #[test]
    fn test_clamp_after_content_shrink() {
        let mut sync = ScrollSync {
            scroll_x: 5000.0,
            scroll_y: 900.0,
            ..Default::default()
        };
        sync.clamp_to(1200.0, 300.0, 400.0, 400.0);
        assert_eq!(sync.scroll_x, 900.0);
        assert_eq!(sync.scroll_y, 0.0);
    }
}
