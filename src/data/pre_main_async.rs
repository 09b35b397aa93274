// Async code to run in main before egui starts up

use chrono::NaiveDateTime;
use futures::future::join_all;
use itertools::Itertools;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::collect::{CollectForumPosts, DaumCafeSource, NaverCafeSource};
use crate::config::{COLLECT, DAUM, NAVER, SERIES};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::ForumPosts;
use crate::market::fetch_weekly_closes;
use crate::series::{AlignedSeries, align_series, combine_forum_posts, group_by_week};

fn build_sources() -> Vec<Box<dyn CollectForumPosts>> {
    let mut sources: Vec<Box<dyn CollectForumPosts>> = Vec::new();
    for (cafe_id, label) in NAVER.cafes {
        sources.push(Box::new(NaverCafeSource {
            cafe_id: *cafe_id,
            label,
        }));
    }
    for (grp_id, label) in DAUM.groups {
        sources.push(Box::new(DaumCafeSource { grp_id, label }));
    }
    sources
}

/// Run every configured forum's pagination loop as its own task and fold
/// the per-forum results into one flat date collection. A forum that fails
/// or panics contributes nothing; it never takes the run down with it.
pub async fn collect_all_forums() -> Vec<NaiveDateTime> {
    let sources = build_sources();
    log::info!(
        "Collecting '{}' posts from {} forums: {}",
        COLLECT.keyword,
        sources.len(),
        sources.iter().map(|s| s.signature()).join(", ")
    );

    let start_time = Instant::now();
    let mut handles: Vec<JoinHandle<anyhow::Result<ForumPosts>>> = Vec::new();
    for source in sources {
        handles.push(tokio::spawn(async move { source.collect_posts().await }));
    }
    let results = join_all(handles).await;
    log::info!("All forum collection tasks finished in {:?}", start_time.elapsed());

    let mut forums: Vec<ForumPosts> = Vec::new();
    for result in results {
        match result {
            Ok(Ok(posts)) => {
                log::info!("{} ({}): {} post dates", posts.forum, posts.label, posts.dates.len());
                forums.push(posts);
            }
            Ok(Err(e)) => log::warn!("Forum collection failed: {:#}", e),
            Err(e) => log::warn!("Forum collection task panicked: {:?}", e),
        }
    }

    combine_forum_posts(forums, COLLECT.dedup)
}

/// The full pre-GUI pipeline: collect, bucket, fetch the reference series,
/// align. `None` means there is nothing to chart (no posts collected, or an
/// empty reference series) and the run should end after the logs.
pub async fn build_aligned_series() -> Option<AlignedSeries> {
    let all_dates = collect_all_forums().await;
    if all_dates.is_empty() {
        log::warn!("No post dates collected from any forum; nothing to chart.");
        return None;
    }

    // min() is safe here, the emptiness check is right above
    let earliest = all_dates.iter().min().copied()?;
    log::info!(
        "Collected {} post dates in total (earliest {})",
        all_dates.len(),
        earliest.date()
    );

    let weekly_counts = group_by_week(&all_dates);
    let weekly_prices = fetch_weekly_closes(earliest.date()).await;

    match align_series(&weekly_counts, &weekly_prices, SERIES.range_policy) {
        Ok(aligned) => {
            log::info!(
                "Aligned {} weeks under policy {} ({} posts kept)",
                aligned.len(),
                SERIES.range_policy,
                aligned.total_posts()
            );
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_align_table {
                for week in &aligned.weeks {
                    log::info!("{} | {:>5} posts | {:>12.2}", week.week, week.post_count, week.price);
                }
            }
            Some(aligned)
        }
        Err(e) => {
            log::error!("{}; skipping chart", e);
            None
        }
    }
}
