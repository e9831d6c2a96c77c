//! Physiological signal tracks.
//!
//! A track is an immutable, time-ordered series of samples as decoded from a
//! session capture. Sample times are seconds from session start and must be
//! non-decreasing; the loader enforces this before a track reaches the UI.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One data point in a signal time series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time in seconds from session start
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Value extent of a series, used for waveform normalization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Scan a series for its extent. Empty series defaults to `0..1` so
    /// downstream normalization stays well-defined.
    pub fn of(samples: &[Sample]) -> Self {
        let mut iter = samples.iter();
        let Some(first) = iter.next() else {
            return Self { min: 0.0, max: 1.0 };
        };
        let mut min = first.value;
        let mut max = first.value;
        for s in iter {
            if s.value < min {
                min = s.value;
            }
            if s.value > max {
                max = s.value;
            }
        }
        Self { min, max }
    }

    /// Symmetrically widen the range by `fraction` of its span.
    ///
    /// A flat series (span 0) is widened by a fixed half-unit instead, so a
    /// constant signal draws as a centered line rather than dividing by zero.
    pub fn padded(self, fraction: f64) -> Self {
        let span = self.max - self.min;
        let pad = if span > 0.0 { span * fraction } else { 0.5 };
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Map a value into `0.0..=1.0` within this range (clamped).
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// A physiological signal as loaded from a session capture.
///
/// Holds raw data and metadata only; display configuration (color, row
/// height) lives with the timeline widgets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalTrack {
    /// Stable identifier, unique within a session
    pub id: String,
    /// Display name, e.g. "Heart Rate"
    pub name: String,
    /// Unit of measurement, e.g. "bpm"
    pub unit: String,
    /// Sampling rate in Hz
    pub sample_rate: f64,
    pub data: Vec<Sample>,
    #[serde(default)]
    pub description: Option<String>,
    /// Padded min/max, computed once on first use (immutable data)
    #[serde(skip)]
    range: OnceLock<ValueRange>,
}

impl SignalTrack {
    pub fn new(id: &str, name: &str, unit: &str, sample_rate: f64, data: Vec<Sample>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            sample_rate,
            data,
            description: None,
            range: OnceLock::new(),
        }
    }

    /// Normalization range for waveform drawing: the raw extent padded by 10%
    /// so peaks don't clip against the row edges. Computed once per track.
    pub fn value_range(&self) -> ValueRange {
        *self
            .range
            .get_or_init(|| ValueRange::of(&self.data).padded(0.1))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if sample times are non-decreasing (loader invariant).
    pub fn is_sorted(&self) -> bool {
        self.data.windows(2).all(|w| w[0].time <= w[1].time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_scan() {
        let data = vec![
            Sample::new(0.0, 5.0),
            Sample::new(1.0, -3.0),
            Sample::new(2.0, 12.0),
        ];
        let range = ValueRange::of(&data);
        assert_eq!(range.min, -3.0);
        assert_eq!(range.max, 12.0);
    }

    #[test]
    fn test_value_range_empty_defaults() {
        let range = ValueRange::of(&[]);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 1.0);
    }

    #[test]
    fn test_padded_widens_symmetrically() {
        let range = ValueRange { min: 0.0, max: 10.0 }.padded(0.1);
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 11.0);
    }

    #[test]
    fn test_padded_flat_series() {
        let range = ValueRange { min: 4.0, max: 4.0 }.padded(0.1);
        assert!(range.max > range.min);
        assert_eq!(range.normalize(4.0), 0.5);
    }

    #[test]
    fn test_normalize_clamps() {
        let range = ValueRange { min: 0.0, max: 10.0 };
        assert_eq!(range.normalize(5.0), 0.5);
        assert_eq!(range.normalize(-20.0), 0.0);
        assert_eq!(range.normalize(99.0), 1.0);
    }

    #[test]
    fn test_track_sorted_check() {
        let ok = SignalTrack::new(
            "hr",
            "Heart Rate",
            "bpm",
            50.0,
            vec![Sample::new(0.0, 1.0), Sample::new(0.02, 2.0)],
        );
        assert!(ok.is_sorted());

        let bad = SignalTrack::new(
            "hr",
            "Heart Rate",
            "bpm",
            50.0,
            vec![Sample::new(1.0, 1.0), Sample::new(0.5, 2.0)],
        );
        assert!(!bad.is_sorted());
    }
}
