//! Time arithmetic and overlap detection for intra-day scheduling.
//!
//! All duration math happens on a canonical minute-of-day integer. Raw
//! "HH:MM" strings are parsed exactly once at the boundary; nothing in the
//! engine compares time strings lexicographically.

use chrono::{NaiveTime, Timelike};

/// Parse a wall-clock time in either `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Canonical minute-of-day representation, `0..1440`.
pub fn minute_of_day(time: NaiveTime) -> i64 {
    time.hour() as i64 * 60 + time.minute() as i64
}

/// Add minutes to a time, wrapping within a single day. Activities are
/// intra-day, so no multi-day rollover is needed.
pub fn add_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    let total = (minute_of_day(time) + minutes).rem_euclid(24 * 60);
    NaiveTime::from_hms_opt((total / 60) as u32, (total % 60) as u32, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

/// True iff the earlier activity is still running when the later one starts.
/// Callers pass the pair already ordered so that `start_a <= start_b`.
pub fn overlaps(start_a: NaiveTime, duration_a_minutes: u32, start_b: NaiveTime) -> bool {
    minute_of_day(start_a) + duration_a_minutes as i64 > minute_of_day(start_b)
}

/// Coarse duration buckets used for pacing labels and request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    /// Under an hour.
    Short,
    /// One to three hours.
    HalfDay,
    /// More than three hours.
    FullDay,
}

impl DurationBucket {
    pub fn for_minutes(minutes: u32) -> Self {
        match minutes {
            0..=59 => DurationBucket::Short,
            60..=180 => DurationBucket::HalfDay,
            _ => DurationBucket::FullDay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_both_time_formats() {
        assert_eq!(parse_time("09:30"), Some(t(9, 30)));
        assert_eq!(parse_time("09:30:00"), Some(t(9, 30)));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("garbage"), None);
    }

    #[test]
    fn add_minutes_wraps_across_hours() {
        assert_eq!(add_minutes(t(9, 45), 30), t(10, 15));
        assert_eq!(add_minutes(t(23, 30), 60), t(0, 30));
        assert_eq!(add_minutes(t(10, 0), -30), t(9, 30));
    }

    #[test]
    fn overlap_is_strict() {
        // 09:00 + 120min runs until 11:00; a 10:00 start collides.
        assert!(overlaps(t(9, 0), 120, t(10, 0)));
        // Back-to-back is not a conflict.
        assert!(!overlaps(t(9, 0), 60, t(10, 0)));
        assert!(!overlaps(t(9, 0), 30, t(10, 0)));
    }

    #[test]
    fn duration_buckets() {
        assert_eq!(DurationBucket::for_minutes(45), DurationBucket::Short);
        assert_eq!(DurationBucket::for_minutes(60), DurationBucket::HalfDay);
        assert_eq!(DurationBucket::for_minutes(180), DurationBucket::HalfDay);
        assert_eq!(DurationBucket::for_minutes(181), DurationBucket::FullDay);
    }
}
