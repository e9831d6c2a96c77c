//! Media transport seam.
//!
//! The video/audio output is an external collaborator driven through this
//! trait. The logical clock is the source of truth; the transport is a slave
//! that gets re-pinned by the drift corrector when its own progression
//! (decoder/buffering timing) wanders off the wall-clock projection.
//!
//! All driving calls are fallible (a transport may refuse a seek while it
//! isn't ready) and callers log-and-continue rather than propagate.

use anyhow::Result;
use std::time::Instant;

/// Interface to the media output collaborator.
pub trait MediaTransport {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Jump the transport to `seconds`.
    fn set_current_time(&mut self, seconds: f64) -> Result<()>;
    fn set_playback_rate(&mut self, rate: f64) -> Result<()>;
    /// Self-reported position in seconds. Read only by the drift corrector
    /// and diagnostic readouts.
    fn position(&self) -> f64;
}

/// Wall-clock transport used when no decoder backend is wired in.
///
/// Progresses on its own between `tick()` calls like a real media element
/// would between frames, so the drift-correction path is exercised even
/// without video: stalls (window drags, long frames) show up as drift that
/// the corrector has to repair.
#[derive(Debug)]
pub struct SimulatedMedia {
    position: f64,
    rate: f64,
    playing: bool,
    last_tick: Option<Instant>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            rate: 1.0,
            playing: false,
            last_tick: None,
        }
    }

    /// Advance the internal position. Called once per frame by the app.
    pub fn tick(&mut self, now: Instant) {
        if self.playing {
            if let Some(last) = self.last_tick {
                let elapsed = now.saturating_duration_since(last).as_secs_f64();
                self.position += elapsed * self.rate;
            }
        }
        self.last_tick = Some(now);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTransport for SimulatedMedia {
    fn play(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<()> {
        self.position = seconds.max(0.0);
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.rate = rate;
        Ok(())
    }

    fn position(&self) -> f64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_simulated_media_advances_only_while_playing() {
        let t0 = Instant::now();
        let mut media = SimulatedMedia::new();
        media.tick(t0);
        media.tick(t0 + Duration::from_secs(1));
        assert_eq!(media.position(), 0.0);

        media.play().unwrap();
        media.tick(t0 + Duration::from_secs(2));
        media.tick(t0 + Duration::from_secs(3));
        assert!((media.position() - 1.0).abs() < 1e-9);

        media.pause().unwrap();
        media.tick(t0 + Duration::from_secs(10));
        assert!((media.position() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulated_media_rate() {
        let t0 = Instant::now();
        let mut media = SimulatedMedia::new();
        media.set_playback_rate(2.0).unwrap();
        media.play().unwrap();
        media.tick(t0);
        media.tick(t0 + Duration::from_secs(3));
        assert!((media.position() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulated_media_seek_clamps_negative() {
        let mut media = SimulatedMedia::new();
        media.set_current_time(-4.0).unwrap();
        assert_eq!(media.position(), 0.0);
        media.set_current_time(42.0).unwrap();
        assert_eq!(media.position(), 42.0);
    }
}
