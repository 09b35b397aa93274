//! Aggregation and alignment configuration

use crate::series::align::RangePolicy;

pub struct SeriesConfig {
    /// Which span the canonical weekly index covers when the post-count and
    /// price series disagree about their date ranges.
    pub range_policy: RangePolicy,
}

pub const SERIES: SeriesConfig = SeriesConfig {
    range_policy: RangePolicy::TruncateToPriceRange,
};
