// Forum post collection: one paginated collector per backend, all feeding
// the same per-forum result type.

pub mod date_text;
pub mod daum_html;
pub mod naver_api;

use std::error::Error;
use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tokio::time::{Duration, sleep};

use crate::config::COLLECT;
use crate::domain::ForumPosts;

pub use daum_html::DaumCafeSource;
pub use naver_api::NaverCafeSource;

// Custom error type for the collector boundary. Both variants are caught and
// logged where they arise; neither crosses a collector's public surface.
#[derive(Debug)]
pub enum CollectError {
    Transport(String),
    Parse(String),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CollectError::Transport(msg) => write!(f, "transport failure: {}", msg),
            CollectError::Parse(msg) => write!(f, "parse failure: {}", msg),
        }
    }
}

impl Error for CollectError {}

#[async_trait]
pub trait CollectForumPosts: Send + Sync {
    /// Run this forum's full pagination loop. Page-level failures degrade to
    /// an empty page inside the loop; an Err here means the collector could
    /// not start at all (e.g. HTTP client construction failed).
    async fn collect_posts(&self) -> Result<ForumPosts>;

    /// Human-readable identifier for logging (so that afterwards we know which forum produced what).
    fn signature(&self) -> String;
}

/// Randomized delay between successive page requests to the same service.
pub async fn politeness_sleep() {
    // ThreadRng is not Send, so keep it scoped out of the await
    let delay_ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(COLLECT.politeness_min_ms..=COLLECT.politeness_max_ms)
    };
    sleep(Duration::from_millis(delay_ms)).await;
}

pub(crate) fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(COLLECT.timeout_ms))
        .user_agent(COLLECT.user_agent)
        .build()?;
    Ok(client)
}
