//! Anchor-based playback clock.
//!
//! Instead of a continuously updated current time, the clock stores a
//! reference point (media time + the monotonic instant it was observed) and
//! projects "now" on demand:
//!
//! `current_time(now) = playing ? clamp(anchor_time + (now - anchor_timestamp) * speed, 0, duration) : anchor_time`
//!
//! Every transition returns a whole new state; nothing is mutated in place.
//! That makes each transition atomic for any observer and testable without a
//! scheduler or fake timers. The clock has no side effects and never
//! auto-pauses at the end of the session: detecting `current_time ==
//! duration` and issuing the pause is the playback controller's job.

use std::time::Instant;

/// Immutable playback clock state.
#[derive(Clone, Copy, Debug)]
pub struct ClockState {
    /// Media time (seconds) at the anchor point, always within `[0, duration]`
    pub anchor_time: f64,
    /// Monotonic instant when the anchor was set
    pub anchor_timestamp: Instant,
    /// Playback speed multiplier (1.0 = realtime)
    pub speed: f64,
    pub playing: bool,
}

impl ClockState {
    /// Initial state: paused at the session start.
    pub fn initial(now: Instant) -> Self {
        Self {
            anchor_time: 0.0,
            anchor_timestamp: now,
            speed: 1.0,
            playing: false,
        }
    }

    /// Project the playback time at `now`, clamped to `[0, duration]`.
    pub fn current_time(&self, now: Instant, duration: f64) -> f64 {
        if !self.playing {
            return self.anchor_time.clamp(0.0, duration.max(0.0));
        }
        let elapsed = now.saturating_duration_since(self.anchor_timestamp).as_secs_f64();
        (self.anchor_time + elapsed * self.speed).clamp(0.0, duration.max(0.0))
    }

    /// Start playing: re-anchor at the projected time so there is no jump.
    pub fn play(&self, now: Instant, duration: f64) -> Self {
        Self {
            anchor_time: self.current_time(now, duration),
            anchor_timestamp: now,
            speed: self.speed,
            playing: true,
        }
    }

    /// Stop playing: re-anchor so the frozen time is the projected one.
    pub fn pause(&self, now: Instant, duration: f64) -> Self {
        Self {
            anchor_time: self.current_time(now, duration),
            anchor_timestamp: now,
            speed: self.speed,
            playing: false,
        }
    }

    /// Move the anchor to `time` (clamped). Play state and speed are kept:
    /// seeking never silently pauses. Pause-on-scrub is a UI-layer policy
    /// applied before calling this.
    pub fn seek(&self, time: f64, now: Instant, duration: f64) -> Self {
        Self {
            anchor_time: time.clamp(0.0, duration.max(0.0)),
            anchor_timestamp: now,
            speed: self.speed,
            playing: self.playing,
        }
    }

    /// Change speed, re-anchoring at the projected time first so the
    /// observable time is continuous across the change.
    pub fn with_speed(&self, speed: f64, now: Instant, duration: f64) -> Self {
        Self {
            anchor_time: self.current_time(now, duration),
            anchor_timestamp: now,
            speed,
            playing: self.playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DURATION: f64 = 120.0;
    const EPS: f64 = 1e-9;

    #[test]
    fn test_paused_time_independent_of_now() {
        let t0 = Instant::now();
        let state = ClockState::initial(t0).seek(42.0, t0, DURATION);
        assert!(!state.playing);
        assert_eq!(state.current_time(t0, DURATION), 42.0);
        assert_eq!(state.current_time(t0 + Duration::from_secs(500), DURATION), 42.0);
    }

    #[test]
    fn test_playing_advances_with_wall_clock() {
        let t0 = Instant::now();
        let state = ClockState {
            anchor_time: 10.0,
            anchor_timestamp: t0,
            speed: 1.0,
            playing: true,
        };
        let projected = state.current_time(t0 + Duration::from_millis(2000), DURATION);
        assert!((projected - 12.0).abs() < EPS);
    }

    #[test]
    fn test_playing_monotonic_non_decreasing() {
        let t0 = Instant::now();
        let state = ClockState::initial(t0).play(t0, DURATION);
        let mut last = state.current_time(t0, DURATION);
        for ms in (0..5000).step_by(250) {
            let t = state.current_time(t0 + Duration::from_millis(ms), DURATION);
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn test_speed_scales_projection() {
        let t0 = Instant::now();
        let state = ClockState {
            anchor_time: 0.0,
            anchor_timestamp: t0,
            speed: 2.0,
            playing: true,
        };
        let projected = state.current_time(t0 + Duration::from_secs(3), DURATION);
        assert!((projected - 6.0).abs() < EPS);
    }

    #[test]
    fn test_seek_lands_exactly_regardless_of_play_state() {
        let t0 = Instant::now();
        for playing in [false, true] {
            let state = ClockState {
                anchor_time: 5.0,
                anchor_timestamp: t0,
                speed: 1.5,
                playing,
            };
            let seeked = state.seek(77.5, t0, DURATION);
            assert!((seeked.current_time(t0, DURATION) - 77.5).abs() < EPS);
            assert_eq!(seeked.playing, playing);
            assert_eq!(seeked.speed, 1.5);
        }
    }

    #[test]
    fn test_seek_clamps_to_session_bounds() {
        let t0 = Instant::now();
        let state = ClockState::initial(t0);
        assert_eq!(state.seek(-5.0, t0, DURATION).anchor_time, 0.0);
        assert_eq!(state.seek(999.0, t0, DURATION).anchor_time, DURATION);
    }

    #[test]
    fn test_projection_clamps_at_duration() {
        let t0 = Instant::now();
        let state = ClockState {
            anchor_time: 119.0,
            anchor_timestamp: t0,
            speed: 1.0,
            playing: true,
        };
        let projected = state.current_time(t0 + Duration::from_secs(30), DURATION);
        assert_eq!(projected, DURATION);
    }

    #[test]
    fn test_speed_change_is_continuous() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(4);
        let state = ClockState::initial(t0).play(t0, DURATION);
        let before = state.current_time(t1, DURATION);
        let changed = state.with_speed(3.0, t1, DURATION);
        assert!((changed.current_time(t1, DURATION) - before).abs() < EPS);
        // 2 more wall seconds at 3x
        let later = changed.current_time(t1 + Duration::from_secs(2), DURATION);
        assert!((later - (before + 6.0)).abs() < EPS);
    }

    #[test]
    fn test_play_pause_round_trip_keeps_time() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(1500);
        let playing = ClockState::initial(t0).play(t0, DURATION);
        let paused = playing.pause(t1, DURATION);
        assert!(!paused.playing);
        assert!((paused.anchor_time - 1.5).abs() < EPS);
        // Resume later: no time passed while paused
        let resumed = paused.play(t1 + Duration::from_secs(60), DURATION);
        assert!((resumed.anchor_time - 1.5).abs() < EPS);
    }

    #[test]
    fn test_zero_duration_pins_at_zero() {
        let t0 = Instant::now();
        let state = ClockState::initial(t0).play(t0, 0.0);
        assert_eq!(state.current_time(t0 + Duration::from_secs(5), 0.0), 0.0);
    }
}
