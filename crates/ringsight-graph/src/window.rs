//! Sliding-window counting over transaction timestamps.

use chrono::{DateTime, Duration, Utc};

/// Largest number of instants that fit inside any contiguous window.
///
/// Two-pointer sweep over a sorted copy of the input, O(n log n) for the
/// sort and O(n) for the sweep. The window is closed: an instant exactly
/// `window` after the left edge still counts.
#[must_use]
pub fn max_count_in_window(timestamps: &[DateTime<Utc>], window: Duration) -> usize {
    if timestamps.is_empty() {
        return 0;
    }

    let mut ts = timestamps.to_vec();
    ts.sort_unstable();

    let mut max_count = 0;
    let mut lo = 0;
    for hi in 0..ts.len() {
        while ts[hi] - ts[lo] > window {
            lo += 1;
        }
        max_count = max_count.max(hi - lo + 1);
    }
    max_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_hours(hours: &[i64]) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        hours.iter().map(|h| base + Duration::hours(*h)).collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(max_count_in_window(&[], Duration::hours(72)), 0);
    }

    #[test]
    fn test_all_inside_window() {
        let ts = at_hours(&[0, 1, 2, 3]);
        assert_eq!(max_count_in_window(&ts, Duration::hours(72)), 4);
    }

    #[test]
    fn test_window_slides() {
        // 0h..4h cluster, then an outlier at 100h
        let ts = at_hours(&[0, 1, 2, 3, 4, 100]);
        assert_eq!(max_count_in_window(&ts, Duration::hours(24)), 5);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let ts = at_hours(&[0, 72]);
        assert_eq!(max_count_in_window(&ts, Duration::hours(72)), 2);
        assert_eq!(max_count_in_window(&ts, Duration::hours(71)), 1);
    }

    #[test]
    fn test_unsorted_input() {
        let ts = at_hours(&[100, 2, 0, 1]);
        assert_eq!(max_count_in_window(&ts, Duration::hours(24)), 3);
    }
}
