//! Playback controller: the `{Paused, Playing}` state machine.
//!
//! Owns the anchor clock and the drift corrector, and drives the media
//! transport on every transition. The clock itself is pure (`clock.rs`);
//! everything effectful (transport calls, drift cadence, reach-end pause)
//! lives here.
//!
//! Transitions: `play` Paused→Playing (re-anchor, transport play, drift
//! armed); `pause` Playing→Paused (re-anchor, transport pause, drift
//! cancelled); `seek` self-loop in either state (re-anchor only, drift
//! cancelled so the next cycle doesn't fight the seek); reach-end
//! Playing→Paused with the clock pinned at duration.

use super::clock::ClockState;
use super::drift::DriftCorrector;
use super::transport::MediaTransport;
use log::{info, warn};
use std::time::{Duration, Instant};

/// Speed presets offered by the transport bar.
pub const SPEED_PRESETS: &[f64] = &[0.25, 0.5, 1.0, 1.5, 2.0];

pub struct PlaybackController {
    clock: ClockState,
    duration: f64,
    drift: DriftCorrector,
    /// Drift corrected on the most recent cycle, for the status bar
    last_drift: Option<f64>,
}

impl PlaybackController {
    pub fn new(duration: f64, now: Instant) -> Self {
        Self {
            clock: ClockState::initial(now),
            duration: duration.max(0.0),
            drift: DriftCorrector::default(),
            last_drift: None,
        }
    }

    /// Override the drift cadence/tolerance (from settings).
    pub fn configure_drift(&mut self, interval: Duration, tolerance: f64) {
        self.drift = DriftCorrector::new(interval, tolerance);
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.clock.playing
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed
    }

    pub fn current_time(&self, now: Instant) -> f64 {
        self.clock.current_time(now, self.duration)
    }

    /// Drift applied on the most recent correction cycle, if any.
    pub fn last_drift(&self) -> Option<f64> {
        self.last_drift
    }

    pub fn play(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        if self.clock.playing {
            return;
        }
        // Restart from the top when play is hit at the end of the session
        if self.current_time(now) >= self.duration && self.duration > 0.0 {
            self.clock = self.clock.seek(0.0, now, self.duration);
            drive(media.set_current_time(0.0), "seek");
        }
        self.clock = self.clock.play(now, self.duration);
        self.drift.cancel();
        drive(media.play(), "play");
        info!("Playback started at {:.2}s", self.clock.anchor_time);
    }

    pub fn pause(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        if !self.clock.playing {
            return;
        }
        self.clock = self.clock.pause(now, self.duration);
        self.drift.cancel();
        self.last_drift = None;
        drive(media.pause(), "pause");
        info!("Playback paused at {:.2}s", self.clock.anchor_time);
    }

    pub fn toggle(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        if self.clock.playing {
            self.pause(media, now);
        } else {
            self.play(media, now);
        }
    }

    /// Re-anchor at `time`. Never changes the play/pause state.
    pub fn seek(&mut self, time: f64, media: &mut dyn MediaTransport, now: Instant) {
        self.clock = self.clock.seek(time, now, self.duration);
        // Cancelled so the next drift cycle doesn't fight the seek
        self.drift.cancel();
        drive(media.set_current_time(self.clock.anchor_time), "seek");
    }

    /// Seek relative to the projected current time.
    pub fn step_by(&mut self, delta: f64, media: &mut dyn MediaTransport, now: Instant) {
        let target = self.current_time(now) + delta;
        self.seek(target, media, now);
    }

    pub fn set_speed(&mut self, speed: f64, media: &mut dyn MediaTransport, now: Instant) {
        if speed <= 0.0 {
            warn!("ignoring non-positive playback speed {speed}");
            return;
        }
        self.clock = self.clock.with_speed(speed, now, self.duration);
        drive(media.set_playback_rate(speed), "rate change");
    }

    pub fn jump_to_start(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        self.seek(0.0, media, now);
    }

    pub fn jump_to_end(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        self.seek(self.duration, media, now);
    }

    /// Per-frame update. Detects reach-end: the pure clock never auto-pauses,
    /// so the controller pins it at the session end and pauses explicitly.
    /// Returns true when this call ended playback.
    pub fn update(&mut self, media: &mut dyn MediaTransport, now: Instant) -> bool {
        if !self.clock.playing {
            return false;
        }
        if self.current_time(now) >= self.duration {
            self.clock = self.clock.seek(self.duration, now, self.duration);
            self.pause(media, now);
            info!("Reached session end at {:.2}s", self.duration);
            return true;
        }
        false
    }

    /// Drift-correction poll, rate-limited internally. No-op while paused.
    pub fn poll_drift(&mut self, media: &mut dyn MediaTransport, now: Instant) {
        if !self.clock.playing {
            return;
        }
        let logical = self.current_time(now);
        if let Some(drift) = self.drift.poll(logical, media, now) {
            self.last_drift = Some(drift);
        }
    }
}

/// Transport failures are never fatal: log and keep the logical state.
fn drive(result: anyhow::Result<()>, what: &str) {
    if let Err(e) = result {
        warn!("media transport refused {what}: {e:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::SimulatedMedia;

    const DURATION: f64 = 120.0;
    const EPS: f64 = 1e-9;

    fn controller(now: Instant) -> (PlaybackController, SimulatedMedia) {
        (PlaybackController::new(DURATION, now), SimulatedMedia::new())
    }

    #[test]
    fn test_initial_state_paused_at_zero() {
        let t0 = Instant::now();
        let (ctl, _) = controller(t0);
        assert!(!ctl.is_playing());
        assert_eq!(ctl.current_time(t0), 0.0);
        assert_eq!(ctl.speed(), 1.0);
    }

    #[test]
    fn test_play_drives_transport() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.play(&mut media, t0);
        assert!(ctl.is_playing());
        assert!(media.is_playing());
        ctl.pause(&mut media, t0 + Duration::from_secs(2));
        assert!(!ctl.is_playing());
        assert!(!media.is_playing());
        assert!((ctl.current_time(t0 + Duration::from_secs(9)) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_seek_keeps_play_state() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.seek(30.0, &mut media, t0);
        assert!(!ctl.is_playing());
        assert!((ctl.current_time(t0) - 30.0).abs() < EPS);
        assert_eq!(media.position(), 30.0);

        ctl.play(&mut media, t0);
        ctl.seek(60.0, &mut media, t0);
        assert!(ctl.is_playing());
        assert!((ctl.current_time(t0) - 60.0).abs() < EPS);
    }

    #[test]
    fn test_step_by_clamps() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.step_by(-5.0, &mut media, t0);
        assert_eq!(ctl.current_time(t0), 0.0);
        ctl.seek(118.0, &mut media, t0);
        ctl.step_by(5.0, &mut media, t0);
        assert_eq!(ctl.current_time(t0), DURATION);
    }

    #[test]
    fn test_reach_end_pauses_and_pins() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.seek(119.0, &mut media, t0);
        ctl.play(&mut media, t0);
        let t1 = t0 + Duration::from_secs(5);
        assert!(ctl.update(&mut media, t1));
        assert!(!ctl.is_playing());
        assert!(!media.is_playing());
        assert_eq!(ctl.current_time(t1), DURATION);
        // Subsequent updates are no-ops
        assert!(!ctl.update(&mut media, t1 + Duration::from_secs(1)));
    }

    #[test]
    fn test_play_at_end_restarts_from_top() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.seek(DURATION, &mut media, t0);
        ctl.play(&mut media, t0);
        assert!(ctl.is_playing());
        assert!(ctl.current_time(t0) < 1.0);
    }

    #[test]
    fn test_set_speed_rejects_non_positive() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.set_speed(0.0, &mut media, t0);
        assert_eq!(ctl.speed(), 1.0);
        ctl.set_speed(-1.0, &mut media, t0);
        assert_eq!(ctl.speed(), 1.0);
        ctl.set_speed(2.0, &mut media, t0);
        assert_eq!(ctl.speed(), 2.0);
    }

    #[test]
    fn test_drift_poll_corrects_lagging_media() {
        let t0 = Instant::now();
        let (mut ctl, mut media) = controller(t0);
        ctl.play(&mut media, t0);
        // Arm the cadence, then let media lag behind the logical clock
        ctl.poll_drift(&mut media, t0);
        let t1 = t0 + Duration::from_millis(1500);
        media.tick(t0);
        // media never ticked forward: it reports ~0 while the clock is at 1.5s
        ctl.poll_drift(&mut media, t1);
        assert!((media.position() - ctl.current_time(t1)).abs() < 0.01);
        assert!(ctl.last_drift().is_some());
    }
}
