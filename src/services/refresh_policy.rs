//! Daily refresh window for the popular-repository list.
//!
//! The window opens every day at `hour:buffer_minutes` UTC and stays open
//! until midnight. Inside the window the cached list is force-refreshed once,
//! unless a refresh already happened inside today's window. The policy is a
//! pure function of `(now, last_refresh)`.

use chrono::{DateTime, NaiveTime, TimeDelta, Timelike, Utc};

use crate::domain::models::RefreshConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshWindowPolicy {
    hour: u32,
    buffer_minutes: u32,
}

impl RefreshWindowPolicy {
    /// `hour` is 0-23 and `buffer_minutes` 0-59, both UTC.
    pub const fn new(hour: u32, buffer_minutes: u32) -> Self {
        Self {
            hour,
            buffer_minutes,
        }
    }

    /// True from `hour:buffer_minutes` until the end of the UTC day.
    pub fn is_refresh_window(&self, now: DateTime<Utc>) -> bool {
        self.is_at_or_after_opening(now.hour(), now.minute())
    }

    /// True iff `last_refresh` is on the same UTC date as `now` and was
    /// itself taken inside the window. A refresh earlier that day but
    /// before the window opened does not count. Missing or unparseable
    /// timestamps count as never refreshed.
    pub fn has_refreshed_today(&self, last_refresh: Option<&str>, now: DateTime<Utc>) -> bool {
        let Some(last) = last_refresh.and_then(parse_timestamp) else {
            return false;
        };

        last.date_naive() == now.date_naive()
            && self.is_at_or_after_opening(last.hour(), last.minute())
    }

    pub fn should_force_refresh(&self, now: DateTime<Utc>, last_refresh: Option<&str>) -> bool {
        self.is_refresh_window(now) && !self.has_refreshed_today(last_refresh, now)
    }

    /// The first window opening strictly after `now`.
    pub fn next_opening(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let opening = now.date_naive().and_time(NaiveTime::MIN).and_utc()
            + TimeDelta::hours(i64::from(self.hour))
            + TimeDelta::minutes(i64::from(self.buffer_minutes));

        if opening > now {
            opening
        } else {
            opening + TimeDelta::days(1)
        }
    }

    const fn is_at_or_after_opening(&self, hour: u32, minute: u32) -> bool {
        hour > self.hour || (hour == self.hour && minute >= self.buffer_minutes)
    }
}

impl From<RefreshConfig> for RefreshWindowPolicy {
    fn from(config: RefreshConfig) -> Self {
        Self::new(config.hour, config.buffer_minutes)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        let policy = RefreshWindowPolicy::new(12, 15);

        assert!(policy.is_refresh_window(at(1, 12, 15)));
        assert!(!policy.is_refresh_window(at(1, 12, 14)));
        assert!(policy.is_refresh_window(at(1, 13, 0)));
        assert!(!policy.is_refresh_window(at(1, 11, 59)));
        assert!(policy.is_refresh_window(at(1, 23, 59)));
        assert!(!policy.is_refresh_window(at(1, 0, 0)));
    }

    #[test]
    fn test_refreshed_inside_todays_window() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let now = at(1, 18, 0);

        assert!(policy.has_refreshed_today(Some("2024-05-01T12:20:00.000Z"), now));
        assert!(!policy.should_force_refresh(now, Some("2024-05-01T12:20:00.000Z")));
    }

    #[test]
    fn test_refresh_before_window_does_not_count() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let now = at(1, 18, 0);

        assert!(!policy.has_refreshed_today(Some("2024-05-01T12:10:00.000Z"), now));
        assert!(policy.should_force_refresh(now, Some("2024-05-01T12:10:00.000Z")));
    }

    #[test]
    fn test_refresh_on_another_day_does_not_count() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let now = at(2, 13, 0);

        assert!(!policy.has_refreshed_today(Some("2024-05-01T20:00:00.000Z"), now));
        assert!(policy.should_force_refresh(now, Some("2024-05-01T20:00:00.000Z")));
    }

    #[test]
    fn test_missing_or_garbled_marker_counts_as_never_refreshed() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let now = at(1, 13, 0);

        assert!(policy.should_force_refresh(now, None));
        assert!(policy.should_force_refresh(now, Some("yesterday-ish")));
        assert!(policy.should_force_refresh(now, Some("")));
    }

    #[test]
    fn test_never_forces_outside_window() {
        let policy = RefreshWindowPolicy::new(12, 15);

        assert!(!policy.should_force_refresh(at(1, 9, 0), None));
    }

    #[test]
    fn test_marker_with_offset_is_compared_in_utc() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let now = at(1, 18, 0);

        // 14:30+02:00 is 12:30Z, inside the window.
        assert!(policy.has_refreshed_today(Some("2024-05-01T14:30:00+02:00"), now));
        // 01:00+02:00 on the 2nd is 23:00Z on the 1st.
        assert!(policy.has_refreshed_today(Some("2024-05-02T01:00:00+02:00"), now));
    }

    #[test]
    fn test_next_opening() {
        let policy = RefreshWindowPolicy::new(2, 5);

        assert_eq!(policy.next_opening(at(1, 1, 0)), at(1, 2, 5));
        assert_eq!(policy.next_opening(at(1, 2, 4)), at(1, 2, 5));
        // Exactly at the opening, the next one is tomorrow's.
        assert_eq!(policy.next_opening(at(1, 2, 5)), at(2, 2, 5));
        assert_eq!(policy.next_opening(at(1, 23, 59)), at(2, 2, 5));
    }

    #[test]
    fn test_next_opening_is_inside_window() {
        let policy = RefreshWindowPolicy::new(12, 15);
        let opening = policy.next_opening(at(3, 18, 30));

        assert_eq!(opening, at(4, 12, 15));
        assert!(policy.is_refresh_window(opening));
        assert!(policy.should_force_refresh(opening, Some("2024-05-03T12:20:00Z")));
    }

    #[test]
    fn test_from_config() {
        let policy = RefreshWindowPolicy::from(RefreshConfig {
            hour: 2,
            buffer_minutes: 5,
        });
        assert_eq!(policy, RefreshWindowPolicy::new(2, 5));
    }
}
