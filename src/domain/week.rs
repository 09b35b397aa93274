use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// The Monday of a calendar week. This is the join key between the weekly
/// post-count series and the weekly price series, so the "always a Monday"
/// invariant matters: two series bucketed with different week-start
/// conventions would silently never join. Construction is only possible via
/// flooring, which is what keeps the invariant airtight.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Floor a date to the Monday of its week.
    pub fn from_date(date: NaiveDate) -> Self {
        let days_past_monday = date.weekday().num_days_from_monday() as i64;
        WeekKey(date - Duration::days(days_past_monday))
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self::from_date(datetime.date())
    }

    pub fn monday(&self) -> NaiveDate {
        self.0
    }

    /// Whole weeks from `self` to `other` (negative if `other` is earlier).
    pub fn weeks_until(&self, other: WeekKey) -> i64 {
        (other.0 - self.0).num_days() / 7
    }

    /// Days since 1970-01-01, used as the plot's x coordinate.
    pub fn days_since_epoch(&self) -> i64 {
        (self.0 - NaiveDate::default()).num_days()
    }

    /// The complete gap-free sequence of weeks from `start` to `end`
    /// inclusive, at 7-day steps. Empty when `end` precedes `start`.
    pub fn range_inclusive(start: WeekKey, end: WeekKey) -> impl Iterator<Item = WeekKey> {
        (0..=start.weeks_until(end)).map(move |week_index| WeekKey(start.0 + Duration::days(7 * week_index)))
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_floors_every_weekday_to_monday() {
        // 2024-06-10 is a Monday; the whole week floors back to it
        for day in 10..=16 {
            let key = WeekKey::from_date(date(2024, 6, day));
            assert_eq!(key.monday(), date(2024, 6, 10));
            assert_eq!(key.monday().weekday(), Weekday::Mon);
        }
        // The following Monday starts a new week
        assert_eq!(WeekKey::from_date(date(2024, 6, 17)).monday(), date(2024, 6, 17));
    }

    #[test]
    fn test_range_inclusive_covers_both_endpoints() {
        let start = WeekKey::from_date(date(2024, 6, 10));
        let end = WeekKey::from_date(date(2024, 7, 1));
        let weeks: Vec<WeekKey> = WeekKey::range_inclusive(start, end).collect();

        assert_eq!(weeks.len(), 4, "4 Mondays between 06-10 and 07-01 inclusive");
        assert_eq!(weeks[0], start);
        assert_eq!(weeks[3], end);
        assert!(weeks.iter().all(|w| w.monday().weekday() == Weekday::Mon));
    }

    #[test]
    fn test_range_inclusive_single_week() {
        let only = WeekKey::from_date(date(2024, 6, 12));
        let weeks: Vec<WeekKey> = WeekKey::range_inclusive(only, only).collect();
        assert_eq!(weeks, vec![only]);
    }

    #[test]
    fn test_range_inclusive_is_empty_when_reversed() {
        let start = WeekKey::from_date(date(2024, 6, 17));
        let end = WeekKey::from_date(date(2024, 6, 10));
        assert_eq!(WeekKey::range_inclusive(start, end).count(), 0);
    }

    #[test]
    fn test_weeks_until() {
        let w0 = WeekKey::from_date(date(2024, 6, 10));
        let w3 = WeekKey::from_date(date(2024, 7, 1));
        assert_eq!(w0.weeks_until(w3), 3);
        assert_eq!(w3.weeks_until(w0), -3);
        assert_eq!(w0.weeks_until(w0), 0);
    }
}
