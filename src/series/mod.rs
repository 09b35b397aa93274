// Weekly series construction: bucketing collected post dates, and aligning
// the post-count and price series onto one canonical weekly index.

pub mod aggregate;
pub mod align;

use std::collections::BTreeMap;

use crate::domain::WeekKey;

/// Posts per calendar week. Built once by the aggregator, read-only after.
pub type WeeklyPostCounts = BTreeMap<WeekKey, u64>;

/// Weekly closing price per calendar week. Sparse: only weeks the provider
/// returned data for. Read-only after fetch.
pub type WeeklyPrices = BTreeMap<WeekKey, f64>;

// Re-export commonly used items
pub use aggregate::{combine_forum_posts, group_by_week};
pub use align::{AlignError, AlignedSeries, AlignedWeek, RangePolicy, align_series};
