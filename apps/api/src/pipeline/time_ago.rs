//! Time-distance formatter: absolute timestamp → "{n} {unit} ago".
//!
//! Buckets are checked largest unit first and the count is truncated, never rounded.
//! A month is a flat 30 days (2,592,000 s) and a year a flat 365 days.

use std::fmt;

use chrono::{DateTime, Utc};

pub const MINUTE_SECS: i64 = 60;
pub const HOUR_SECS: i64 = 3_600;
pub const DAY_SECS: i64 = 86_400;
pub const MONTH_SECS: i64 = 2_592_000;
pub const YEAR_SECS: i64 = 31_536_000;

/// Elapsed-time range used to label how long ago a listing was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    Seconds(i64),
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Months(i64),
    Years(i64),
}

impl AgeBucket {
    /// Classifies an elapsed duration in seconds. Negative input (a timestamp in
    /// the future) is clamped to zero seconds.
    pub fn from_elapsed(elapsed_secs: i64) -> Self {
        let secs = elapsed_secs.max(0);
        if secs >= YEAR_SECS {
            AgeBucket::Years(secs / YEAR_SECS)
        } else if secs >= MONTH_SECS {
            AgeBucket::Months(secs / MONTH_SECS)
        } else if secs >= DAY_SECS {
            AgeBucket::Days(secs / DAY_SECS)
        } else if secs >= HOUR_SECS {
            AgeBucket::Hours(secs / HOUR_SECS)
        } else if secs >= MINUTE_SECS {
            AgeBucket::Minutes(secs / MINUTE_SECS)
        } else {
            AgeBucket::Seconds(secs)
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBucket::Seconds(n) => write!(f, "{n} seconds ago"),
            AgeBucket::Minutes(n) => write!(f, "{n} minutes ago"),
            AgeBucket::Hours(n) => write!(f, "{n} hours ago"),
            AgeBucket::Days(n) => write!(f, "{n} days ago"),
            AgeBucket::Months(n) => write!(f, "{n} months ago"),
            AgeBucket::Years(n) => write!(f, "{n} years ago"),
        }
    }
}

/// Whole seconds between `posted` and `now`, floored at zero.
pub fn elapsed_secs(posted: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - posted).num_seconds().max(0)
}

pub fn format_time_ago(posted: DateTime<Utc>, now: DateTime<Utc>) -> String {
    AgeBucket::from_elapsed(elapsed_secs(posted, now)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_under_a_minute_reports_seconds() {
        let posted = now() - Duration::seconds(42);
        assert_eq!(format_time_ago(posted, now()), "42 seconds ago");
    }

    #[test]
    fn test_minutes_bucket_is_reachable() {
        let posted = now() - Duration::seconds(5 * 60 + 59);
        assert_eq!(format_time_ago(posted, now()), "5 minutes ago");
    }

    #[test]
    fn test_hours_truncate_not_round() {
        let posted = now() - Duration::minutes(2 * 60 + 59);
        assert_eq!(format_time_ago(posted, now()), "2 hours ago");
    }

    #[test]
    fn test_days_bucket() {
        let posted = now() - Duration::days(29);
        assert_eq!(format_time_ago(posted, now()), "29 days ago");
    }

    #[test]
    fn test_thirty_days_is_one_month() {
        let posted = now() - Duration::days(30);
        assert_eq!(format_time_ago(posted, now()), "1 months ago");
    }

    #[test]
    fn test_years_bucket() {
        let posted = now() - Duration::days(800);
        assert_eq!(format_time_ago(posted, now()), "2 years ago");
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero_seconds() {
        let posted = now() + Duration::hours(3);
        assert_eq!(format_time_ago(posted, now()), "0 seconds ago");
        assert_eq!(elapsed_secs(posted, now()), 0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AgeBucket::from_elapsed(59), AgeBucket::Seconds(59));
        assert_eq!(AgeBucket::from_elapsed(60), AgeBucket::Minutes(1));
        assert_eq!(AgeBucket::from_elapsed(HOUR_SECS), AgeBucket::Hours(1));
        assert_eq!(AgeBucket::from_elapsed(DAY_SECS - 1), AgeBucket::Hours(23));
        assert_eq!(AgeBucket::from_elapsed(MONTH_SECS - 1), AgeBucket::Days(29));
        assert_eq!(AgeBucket::from_elapsed(YEAR_SECS), AgeBucket::Years(1));
    }
}
