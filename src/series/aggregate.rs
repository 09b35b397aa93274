use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::domain::{DedupPolicy, ForumPosts, WeekKey};
use crate::series::WeeklyPostCounts;

/// Fold the independent per-forum results into one flat date collection.
/// This is the only place where posts from different forums meet, so it is
/// also where the duplicate policy applies.
pub fn combine_forum_posts(forums: Vec<ForumPosts>, policy: DedupPolicy) -> Vec<NaiveDateTime> {
    let all_dates: Vec<NaiveDateTime> = forums.into_iter().flat_map(|f| f.dates).collect();

    match policy {
        DedupPolicy::KeepAll => all_dates,
        DedupPolicy::UniqueTimestamps => {
            let mut seen = BTreeSet::new();
            all_dates.into_iter().filter(|date| seen.insert(*date)).collect()
        }
    }
}

/// Bucket a flat, unordered date collection into per-calendar-week counts.
pub fn group_by_week(dates: &[NaiveDateTime]) -> WeeklyPostCounts {
    let mut weekly_counts = WeeklyPostCounts::new();
    for date in dates {
        *weekly_counts.entry(WeekKey::from_datetime(*date)).or_insert(0) += 1;
    }
    weekly_counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForumId;
    use chrono::NaiveDate;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_group_by_week_buckets_on_monday() {
        // Mon 06-10 and Tue 06-11 share a week; Mon 06-17 starts the next
        let dates = vec![
            midnight(2024, 6, 10),
            midnight(2024, 6, 11),
            midnight(2024, 6, 17),
        ];
        let counts = group_by_week(&dates);

        assert_eq!(counts.len(), 2);
        let week1 = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let week2 = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
        assert_eq!(counts.get(&week1), Some(&2));
        assert_eq!(counts.get(&week2), Some(&1));
    }

    #[test]
    fn test_group_by_week_empty_input() {
        assert!(group_by_week(&[]).is_empty());
    }

    fn forum(dates: Vec<NaiveDateTime>) -> ForumPosts {
        ForumPosts {
            forum: ForumId::DaumCafe("test"),
            label: "test",
            dates,
        }
    }

    #[test]
    fn test_combine_keep_all_preserves_duplicates() {
        let forums = vec![
            forum(vec![midnight(2024, 6, 10), midnight(2024, 6, 11)]),
            forum(vec![midnight(2024, 6, 10)]),
        ];
        let combined = combine_forum_posts(forums, DedupPolicy::KeepAll);
        assert_eq!(combined.len(), 3);
    }

    #[test]
    fn test_combine_unique_timestamps_drops_cross_forum_duplicates() {
        let forums = vec![
            forum(vec![midnight(2024, 6, 10), midnight(2024, 6, 11)]),
            forum(vec![midnight(2024, 6, 10)]),
        ];
        let combined = combine_forum_posts(forums, DedupPolicy::UniqueTimestamps);
        assert_eq!(combined.len(), 2);
    }
}
