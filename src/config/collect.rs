//! Collection-wide configuration shared by both forum backends.

use crate::domain::DedupPolicy;

pub struct CollectConfig {
    /// Search keyword sent to both forum backends ("bitcoin" in Korean).
    pub keyword: &'static str,
    /// Desktop browser User-Agent; both backends refuse obviously
    /// non-browser clients.
    pub user_agent: &'static str,
    /// Politeness delay bounds between successive page requests to the same
    /// service (milliseconds). A rate-limiting policy, not a correctness
    /// requirement.
    pub politeness_min_ms: u64,
    pub politeness_max_ms: u64,
    /// Hard cap on pages fetched per forum, so a backend advertising a bogus
    /// continuation can never loop us forever.
    pub max_pages_per_forum: u32,
    /// How duplicate post dates across forums are treated when per-forum
    /// results are folded together.
    pub dedup: DedupPolicy,
    /// Per-request timeout for the forum HTTP clients (milliseconds).
    pub timeout_ms: u64,
}

pub const COLLECT: CollectConfig = CollectConfig {
    keyword: "비트코인",
    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    politeness_min_ms: 1100,
    politeness_max_ms: 3500,
    max_pages_per_forum: 400,
    dedup: DedupPolicy::KeepAll,
    timeout_ms: 10_000,
};
