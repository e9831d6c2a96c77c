//! Binary-search lookups into sorted sample series.
//!
//! Two flavors: nearest-sample (for the live value readout in the label
//! column, where a stale value is worse than no value) and linear
//! interpolation (for smooth cursor readouts). Both are O(log n) and degrade
//! to "no value" on empty input instead of failing.

use crate::entities::Sample;

/// Index of the first sample with `time >= t`.
fn lower_bound(samples: &[Sample], t: f64) -> usize {
    samples.partition_point(|s| s.time < t)
}

/// Value of the sample closest in time to `t`, if it lies within
/// `threshold` seconds. Equal-distance ties resolve to the earlier sample.
pub fn nearest_value_at(samples: &[Sample], t: f64, threshold: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let idx = lower_bound(samples, t).min(samples.len() - 1);
    let mut closest = idx;
    let mut closest_diff = (samples[idx].time - t).abs();
    if idx > 0 {
        let prev_diff = (samples[idx - 1].time - t).abs();
        // `<=` prefers the earlier index on exact ties
        if prev_diff <= closest_diff {
            closest = idx - 1;
            closest_diff = prev_diff;
        }
    }
    (closest_diff <= threshold).then(|| samples[closest].value)
}

/// Linearly interpolated value at `t`, clamped to the first/last sample
/// outside the series range. Duplicate timestamps in the bracketing pair
/// return the earlier value rather than dividing by zero.
pub fn interpolated_value_at(samples: &[Sample], t: f64) -> Option<f64> {
    let first = samples.first()?;
    let last = samples.last()?;
    if t <= first.time {
        return Some(first.value);
    }
    if t >= last.time {
        return Some(last.value);
    }
    // t is strictly inside, so the bracket indices are valid
    let hi = lower_bound(samples, t);
    let (s0, s1) = (samples[hi - 1], samples[hi]);
    if s1.time <= s0.time {
        return Some(s0.value);
    }
    let frac = (t - s0.time) / (s1.time - s0.time);
    Some(s0.value + frac * (s1.value - s0.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(f64, f64)]) -> Vec<Sample> {
        points.iter().map(|&(t, v)| Sample::new(t, v)).collect()
    }

    #[test]
    fn test_nearest_empty_series() {
        assert_eq!(nearest_value_at(&[], 3.0, 1.0), None);
    }

    #[test]
    fn test_nearest_single_sample_threshold() {
        let data = series(&[(5.0, 9.0)]);
        assert_eq!(nearest_value_at(&data, 5.0, 0.5), Some(9.0));
        assert_eq!(nearest_value_at(&data, 5.4, 0.5), Some(9.0));
        assert_eq!(nearest_value_at(&data, 4.6, 0.5), Some(9.0));
        assert_eq!(nearest_value_at(&data, 6.0, 0.5), None);
        assert_eq!(nearest_value_at(&data, 3.0, 0.5), None);
    }

    #[test]
    fn test_nearest_picks_closest_side() {
        let data = series(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(nearest_value_at(&data, 0.9, 0.5), Some(2.0));
        assert_eq!(nearest_value_at(&data, 1.2, 0.5), Some(2.0));
        assert_eq!(nearest_value_at(&data, 1.8, 0.5), Some(3.0));
    }

    #[test]
    fn test_nearest_tie_resolves_to_earlier() {
        let data = series(&[(1.0, 10.0), (3.0, 30.0)]);
        // 2.0 is equidistant from both samples
        assert_eq!(nearest_value_at(&data, 2.0, 2.0), Some(10.0));
    }

    #[test]
    fn test_nearest_past_the_end() {
        let data = series(&[(0.0, 1.0), (10.0, 2.0)]);
        assert_eq!(nearest_value_at(&data, 10.3, 0.5), Some(2.0));
        assert_eq!(nearest_value_at(&data, 12.0, 0.5), None);
    }

    #[test]
    fn test_interpolated_empty_series() {
        assert_eq!(interpolated_value_at(&[], 3.0), None);
    }

    #[test]
    fn test_interpolated_midpoint() {
        let data = series(&[(0.0, 0.0), (10.0, 100.0)]);
        assert_eq!(interpolated_value_at(&data, 5.0), Some(50.0));
        assert_eq!(interpolated_value_at(&data, 2.5), Some(25.0));
    }

    #[test]
    fn test_interpolated_clamps_at_ends() {
        let data = series(&[(0.0, 0.0), (10.0, 100.0)]);
        assert_eq!(interpolated_value_at(&data, 0.0), Some(0.0));
        assert_eq!(interpolated_value_at(&data, -3.0), Some(0.0));
        assert_eq!(interpolated_value_at(&data, 15.0), Some(100.0));
    }

    #[test]
    fn test_interpolated_exact_sample_hit() {
        let data = series(&[(0.0, 0.0), (4.0, 8.0), (10.0, 100.0)]);
        assert_eq!(interpolated_value_at(&data, 4.0), Some(8.0));
    }

    #[test]
    fn test_interpolated_duplicate_timestamps() {
        let data = series(&[(0.0, 0.0), (5.0, 10.0), (5.0, 99.0), (10.0, 100.0)]);
        // Bracket lands on the duplicate pair; earlier value wins
        let v = interpolated_value_at(&data, 5.0).unwrap();
        assert_eq!(v, 10.0);
    }
}
