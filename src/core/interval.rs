use std::fmt::{Debug, Formatter};

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", format_utc(self.start), format_utc(self.end))
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of the specified length starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, length: TimeDelta) -> Self {
        Self::new(start, start + length)
    }
}

/// Format the timestamp as UTC ISO-8601 with the `Z` suffix and whole seconds.
#[must_use]
pub fn format_utc(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_utc_drops_microseconds() {
        let timestamp = Utc.timestamp_micros(1_759_338_520_326_747).unwrap();
        assert_eq!(format_utc(timestamp), "2025-10-01T17:08:40Z");
    }

    #[test]
    fn test_starting_at() {
        let start = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let interval = Interval::starting_at(start, TimeDelta::hours(24));
        assert_eq!(interval.end - interval.start, TimeDelta::hours(24));
        assert_eq!(format!("{interval:?}"), "2025-10-01T12:00:00Z..2025-10-02T12:00:00Z");
    }
}
