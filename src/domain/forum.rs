use chrono::NaiveDateTime;

/// Identifies one configured community forum. Naver cafes are addressed by
/// numeric cafe id, Daum cafes by their short group id string.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum ForumId {
    NaverCafe(u64),
    DaumCafe(&'static str),
}

impl std::fmt::Display for ForumId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ForumId::NaverCafe(cafe_id) => write!(f, "naver:{}", cafe_id),
            ForumId::DaumCafe(grp_id) => write!(f, "daum:{}", grp_id),
        }
    }
}

/// One forum's collected post dates. Each pagination loop produces exactly
/// one of these; the orchestration layer folds them together afterwards, so
/// no collector ever touches another collector's results.
#[derive(Debug, Clone)]
pub struct ForumPosts {
    pub forum: ForumId,
    pub label: &'static str,
    pub dates: Vec<NaiveDateTime>,
}

/// What to do about the same post date arriving from more than one forum.
/// The configured cafe tables contain at least one aliased pair (two entries
/// sharing a cafe id), so duplicates are a real possibility, not a
/// theoretical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DedupPolicy {
    /// Count every collected date, duplicates included.
    KeepAll,
    /// Drop exact duplicate timestamps from the combined collection. Two
    /// distinct posts published at the same second also collapse under this
    /// policy; that is the trade-off for suppressing the aliased-forum
    /// double count.
    UniqueTimestamps,
}
