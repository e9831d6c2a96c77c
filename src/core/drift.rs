//! Drift correction between the logical clock and the media transport.
//!
//! The transport's own playback progression is not guaranteed to track the
//! wall-clock projection; this corrector compares the two on a coarse cadence
//! (default 1000 ms, independent of the frame loop) and re-pins the transport
//! when the gap exceeds a tolerance. It must be cancelled on pause, on
//! explicit seek, and on teardown, since a correction firing right after a seek
//! would fight the seek.

use super::transport::MediaTransport;
use log::{debug, warn};
use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_TOLERANCE: f64 = 0.2;

/// Periodic reconciler; owned by the playback controller.
#[derive(Debug)]
pub struct DriftCorrector {
    interval: Duration,
    tolerance: f64,
    /// None = cancelled; armed by the first poll after (re)start
    last_check: Option<Instant>,
}

impl DriftCorrector {
    pub fn new(interval: Duration, tolerance: f64) -> Self {
        Self {
            interval,
            tolerance,
            last_check: None,
        }
    }

    /// Drop the cadence. The next poll re-arms the interval without
    /// correcting, so a stray cycle can't fire right after pause or seek.
    pub fn cancel(&mut self) {
        self.last_check = None;
    }

    /// Called from the frame loop while playing; rate-limits itself to the
    /// configured interval. Returns the drift that was corrected, if any.
    ///
    /// Transport failures (e.g. a seek refused because the element isn't
    /// ready) are logged and swallowed; the next cycle retries.
    pub fn poll(
        &mut self,
        logical_time: f64,
        media: &mut dyn MediaTransport,
        now: Instant,
    ) -> Option<f64> {
        match self.last_check {
            None => {
                // First poll after start/cancel only arms the timer
                self.last_check = Some(now);
                return None;
            }
            Some(last) if now.saturating_duration_since(last) < self.interval => return None,
            Some(_) => self.last_check = Some(now),
        }

        let drift = logical_time - media.position();
        if drift.abs() <= self.tolerance {
            return None;
        }

        debug!(
            "Correcting media drift: logical {:.3}s, media {:.3}s ({:+.3}s)",
            logical_time,
            media.position(),
            drift
        );
        if let Err(e) = media.set_current_time(logical_time) {
            warn!("drift correction rejected by media transport: {e:#}");
            return None;
        }
        Some(drift)
    }
}

impl Default for DriftCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};

    /// Scripted transport for corrector tests.
    struct FakeMedia {
        position: f64,
        seeks: Vec<f64>,
        fail_seeks: bool,
    }

    impl FakeMedia {
        fn at(position: f64) -> Self {
            Self {
                position,
                seeks: Vec::new(),
                fail_seeks: false,
            }
        }
    }

    impl MediaTransport for FakeMedia {
        fn play(&mut self) -> Result<()> {
            Ok(())
        }
        fn pause(&mut self) -> Result<()> {
            Ok(())
        }
        fn set_current_time(&mut self, seconds: f64) -> Result<()> {
            if self.fail_seeks {
                return Err(anyhow!("not ready"));
            }
            self.seeks.push(seconds);
            self.position = seconds;
            Ok(())
        }
        fn set_playback_rate(&mut self, _rate: f64) -> Result<()> {
            Ok(())
        }
        fn position(&self) -> f64 {
            self.position
        }
    }

    fn armed(now: Instant) -> DriftCorrector {
        let mut corrector = DriftCorrector::default();
        assert_eq!(corrector.poll(0.0, &mut FakeMedia::at(0.0), now), None);
        corrector
    }

    #[test]
    fn test_corrects_drift_above_tolerance() {
        let t0 = Instant::now();
        let mut corrector = armed(t0);
        let mut media = FakeMedia::at(41.5);
        let drift = corrector.poll(42.0, &mut media, t0 + Duration::from_millis(1100));
        assert!((drift.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(media.seeks, vec![42.0]);
        assert_eq!(media.position(), 42.0);
    }

    #[test]
    fn test_small_drift_ignored() {
        let t0 = Instant::now();
        let mut corrector = armed(t0);
        let mut media = FakeMedia::at(41.95);
        let drift = corrector.poll(42.0, &mut media, t0 + Duration::from_millis(1100));
        assert_eq!(drift, None);
        assert!(media.seeks.is_empty());
    }

    #[test]
    fn test_rate_limited_to_interval() {
        let t0 = Instant::now();
        let mut corrector = armed(t0);
        let mut media = FakeMedia::at(0.0);
        // Way off, but the interval hasn't elapsed yet
        assert_eq!(
            corrector.poll(50.0, &mut media, t0 + Duration::from_millis(400)),
            None
        );
        assert!(media.seeks.is_empty());
        assert!(
            corrector
                .poll(50.0, &mut media, t0 + Duration::from_millis(1001))
                .is_some()
        );
    }

    #[test]
    fn test_cancel_disarms_next_poll() {
        let t0 = Instant::now();
        let mut corrector = armed(t0);
        corrector.cancel();
        let mut media = FakeMedia::at(0.0);
        // First poll after cancel only re-arms, even with huge drift
        assert_eq!(
            corrector.poll(99.0, &mut media, t0 + Duration::from_secs(10)),
            None
        );
        assert!(media.seeks.is_empty());
        // A full interval later it corrects again
        assert!(
            corrector
                .poll(99.0, &mut media, t0 + Duration::from_secs(12))
                .is_some()
        );
    }

    #[test]
    fn test_transport_failure_is_swallowed_and_retried() {
        let t0 = Instant::now();
        let mut corrector = armed(t0);
        let mut media = FakeMedia::at(0.0);
        media.fail_seeks = true;
        assert_eq!(
            corrector.poll(10.0, &mut media, t0 + Duration::from_millis(1100)),
            None
        );
        // Next cycle succeeds once the transport recovers
        media.fail_seeks = false;
        assert!(
            corrector
                .poll(10.0, &mut media, t0 + Duration::from_millis(2300))
                .is_some()
        );
        assert_eq!(media.seeks, vec![10.0]);
    }
}
