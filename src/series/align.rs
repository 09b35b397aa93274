//! Series alignment: reconcile the sparse weekly post-count and price
//! series onto one dense, gap-free weekly index.
//!
//! The canonical index is an inclusive 7-day-step WeekKey sequence. Inside
//! it, every week gets exactly one (count, price) pair: counts default to
//! zero, prices are taken exactly where known and linearly interpolated
//! between the nearest known neighbours where not.

use std::error::Error;
use std::fmt;

use crate::domain::WeekKey;
use crate::series::{WeeklyPostCounts, WeeklyPrices};

/// Which span the canonical index covers when the two series disagree about
/// their date ranges. Data outside the chosen span is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RangePolicy {
    /// The price series' span. Post weeks outside it are dropped.
    TruncateToPriceRange,
    /// The union of both series' spans.
    UnionRange,
    /// The post-count series' span; falls back to the price span when no
    /// posts were collected.
    TruncateToPostRange,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AlignError {
    /// The reference price series came back empty; there is nothing to
    /// anchor the index to and nothing worth charting.
    EmptyReferenceSeries,
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AlignError::EmptyReferenceSeries => {
                write!(f, "reference price series is empty, nothing to align")
            }
        }
    }
}

impl Error for AlignError {}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedWeek {
    pub week: WeekKey,
    pub post_count: u64,
    pub price: f64,
}

/// The dense weekly series both chart axes are drawn from.
#[derive(Debug, Clone, Default)]
pub struct AlignedSeries {
    pub weeks: Vec<AlignedWeek>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn total_posts(&self) -> u64 {
        self.weeks.iter().map(|w| w.post_count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.weeks.iter().map(|w| w.post_count).max().unwrap_or(0)
    }

    /// Min and max price over the whole series.
    pub fn price_bounds(&self) -> (f64, f64) {
        let mut bounds = (f64::INFINITY, f64::NEG_INFINITY);
        for week in &self.weeks {
            bounds.0 = bounds.0.min(week.price);
            bounds.1 = bounds.1.max(week.price);
        }
        bounds
    }
}

pub fn align_series(
    counts: &WeeklyPostCounts,
    prices: &WeeklyPrices,
    policy: RangePolicy,
) -> Result<AlignedSeries, AlignError> {
    if prices.is_empty() {
        return Err(AlignError::EmptyReferenceSeries);
    }

    // BTreeMap keys are ordered, so first/last are min/max
    let price_start = *prices.keys().next().expect("non-empty");
    let price_end = *prices.keys().next_back().expect("non-empty");
    let post_span = counts
        .keys()
        .next()
        .zip(counts.keys().next_back())
        .map(|(start, end)| (*start, *end));

    let (range_start, range_end) = match (policy, post_span) {
        (RangePolicy::TruncateToPriceRange, _) | (RangePolicy::TruncateToPostRange, None) => {
            (price_start, price_end)
        }
        (RangePolicy::TruncateToPostRange, Some(span)) => span,
        (RangePolicy::UnionRange, None) => (price_start, price_end),
        (RangePolicy::UnionRange, Some((post_start, post_end))) => (
            price_start.min(post_start),
            price_end.max(post_end),
        ),
    };

    let known: Vec<(WeekKey, f64)> = prices.iter().map(|(week, price)| (*week, *price)).collect();

    let weeks = WeekKey::range_inclusive(range_start, range_end)
        .map(|week| AlignedWeek {
            week,
            post_count: counts.get(&week).copied().unwrap_or(0),
            price: price_at(&known, week),
        })
        .collect();

    Ok(AlignedSeries { weeks })
}

/// Price for `week` against the ordered known points: exact where known,
/// linear between the bounding neighbours inside the known span, and flat
/// extension of the nearest endpoint outside it. Under the default range
/// policy the index bounds are themselves known points, so the flat arms
/// never fire there.
fn price_at(known: &[(WeekKey, f64)], week: WeekKey) -> f64 {
    match known.binary_search_by(|(k, _)| k.cmp(&week)) {
        Ok(index) => known[index].1,
        Err(insertion) if insertion == 0 => known[0].1,
        Err(insertion) if insertion == known.len() => known[known.len() - 1].1,
        Err(insertion) => {
            let (week_before, price_before) = known[insertion - 1];
            let (week_after, price_after) = known[insertion];
            let span = week_before.weeks_until(week_after) as f64;
            let progress = week_before.weeks_until(week) as f64 / span;
            price_before + (price_after - price_before) * progress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Weekday};

    fn week(y: i32, m: u32, d: u32) -> WeekKey {
        WeekKey::from_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn prices(entries: &[(WeekKey, f64)]) -> WeeklyPrices {
        entries.iter().copied().collect()
    }

    fn counts(entries: &[(WeekKey, u64)]) -> WeeklyPostCounts {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_length_spans_price_range_inclusive() {
        let p = prices(&[(week(2024, 6, 3), 1.0), (week(2024, 7, 15), 2.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        // 06-03 .. 07-15 inclusive is 7 Mondays
        assert_eq!(aligned.len(), 7);
    }

    #[test]
    fn test_every_week_is_a_monday_with_no_gaps() {
        let p = prices(&[(week(2024, 6, 3), 1.0), (week(2024, 7, 1), 2.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        for pair in aligned.weeks.windows(2) {
            assert_eq!(pair[0].week.weeks_until(pair[1].week), 1);
        }
        for aligned_week in &aligned.weeks {
            assert_eq!(aligned_week.week.monday().weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn test_known_prices_are_exact() {
        let w1 = week(2024, 6, 3);
        let w3 = week(2024, 6, 17);
        let p = prices(&[(w1, 10.0), (w3, 30.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.weeks[0].price, 10.0);
        assert_eq!(aligned.weeks[2].price, 30.0);
    }

    #[test]
    fn test_gap_is_linearly_interpolated() {
        // W1 = 10, W3 = 30, nothing for W2: midpoint interpolation gives 20
        let w1 = week(2024, 6, 3);
        let w3 = week(2024, 6, 17);
        let p = prices(&[(w1, 10.0), (w3, 30.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.len(), 3);
        assert!((aligned.weeks[1].price - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_uneven_gap_interpolates_by_week_distance() {
        // Known at W0 = 0 and W4 = 40; W1 should sit a quarter of the way
        let w0 = week(2024, 6, 3);
        let w4 = week(2024, 7, 1);
        let p = prices(&[(w0, 0.0), (w4, 40.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.len(), 5);
        assert!((aligned.weeks[1].price - 10.0).abs() < f64::EPSILON);
        assert!((aligned.weeks[3].price - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let w1 = week(2024, 6, 3);
        let w2 = week(2024, 6, 10);
        let p = prices(&[(w1, 1.0), (w2, 2.0)]);
        let c = counts(&[(w2, 5)]);
        let aligned = align_series(&c, &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.weeks[0].post_count, 0);
        assert_eq!(aligned.weeks[1].post_count, 5);
    }

    #[test]
    fn test_posts_outside_price_range_are_dropped_by_default() {
        let w1 = week(2024, 6, 3);
        let w2 = week(2024, 6, 10);
        let early = week(2024, 1, 1);
        let p = prices(&[(w1, 1.0), (w2, 2.0)]);
        let c = counts(&[(early, 99), (w1, 3)]);
        let aligned = align_series(&c, &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned.total_posts(), 3);
    }

    #[test]
    fn test_union_range_extends_prices_flat() {
        let w1 = week(2024, 6, 3);
        let w2 = week(2024, 6, 10);
        let early = week(2024, 5, 20);
        let p = prices(&[(w1, 10.0), (w2, 20.0)]);
        let c = counts(&[(early, 4)]);
        let aligned = align_series(&c, &p, RangePolicy::UnionRange).unwrap();

        // 05-20 .. 06-10 inclusive is 4 Mondays
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.weeks[0].post_count, 4);
        // Weeks before the first known price carry it flat
        assert_eq!(aligned.weeks[0].price, 10.0);
        assert_eq!(aligned.weeks[1].price, 10.0);
    }

    #[test]
    fn test_single_week_index_is_legal() {
        let only = week(2024, 6, 3);
        let p = prices(&[(only, 42.0)]);
        let aligned =
            align_series(&counts(&[]), &p, RangePolicy::TruncateToPriceRange).unwrap();
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned.weeks[0].price, 42.0);
    }

    #[test]
    fn test_empty_prices_fail_gracefully() {
        let c = counts(&[(week(2024, 6, 3), 1)]);
        let result = align_series(&c, &WeeklyPrices::new(), RangePolicy::TruncateToPriceRange);
        assert_eq!(result.unwrap_err(), AlignError::EmptyReferenceSeries);
    }
}
