//! Daum cafe collector: pages the cafe search listing (HTML) and extracts
//! one publish date per listed post.
//!
//! Unlike the Naver API there is no continuation cursor; the listing's
//! pagination control advertises the last page number, and the loop stops
//! once the current page reaches it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use scraper::{Html, Selector};

use crate::collect::date_text::parse_post_date_text;
use crate::collect::{
    CollectError, CollectForumPosts, build_http_client, politeness_sleep,
};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{COLLECT, DAUM};
use crate::domain::{ForumId, ForumPosts};

pub struct DaumCafeSource {
    pub grp_id: &'static str,
    pub label: &'static str,
}

#[async_trait]
impl CollectForumPosts for DaumCafeSource {
    fn signature(&self) -> String {
        format!("daum:{} ({})", self.grp_id, self.label)
    }

    async fn collect_posts(&self) -> Result<ForumPosts> {
        let client = build_http_client()?;
        let mut dates: Vec<NaiveDateTime> = Vec::new();
        let mut pagenum: u32 = 1;

        loop {
            politeness_sleep().await;
            let today = Local::now().date_naive();

            let (page_dates, advertised_last) =
                match self.fetch_listing_page(&client, pagenum, today).await {
                    Ok(result) => result,
                    Err(e) => {
                        log::warn!("{} page {}: {}", self.signature(), pagenum, e);
                        (Vec::new(), None)
                    }
                };

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_page_fetches {
                log::info!(
                    "{} page {}: {} post dates",
                    self.signature(),
                    pagenum,
                    page_dates.len()
                );
            }
            dates.extend(page_dates);

            match advertised_last {
                Some(last_page) if pagenum < last_page => {
                    if pagenum >= COLLECT.max_pages_per_forum {
                        log::warn!(
                            "{} hit the {}-page safety cap; stopping early",
                            self.signature(),
                            COLLECT.max_pages_per_forum
                        );
                        break;
                    }
                    pagenum += 1;
                }
                // Current page is the advertised last page, or the listing
                // carried no pagination control at all
                _ => break,
            }
        }

        Ok(ForumPosts {
            forum: ForumId::DaumCafe(self.grp_id),
            label: self.label,
            dates,
        })
    }
}

impl DaumCafeSource {
    async fn fetch_listing_page(
        &self,
        client: &reqwest::Client,
        pagenum: u32,
        today: NaiveDate,
    ) -> Result<(Vec<NaiveDateTime>, Option<u32>), CollectError> {
        let params: Vec<(&str, String)> = vec![
            ("grpid", self.grp_id.to_string()),
            ("fldid", String::new()),
            ("pagenum", pagenum.to_string()),
            ("listnum", DAUM.list_num.to_string()),
            ("item", DAUM.item.to_string()),
            ("head", String::new()),
            ("query", COLLECT.keyword.to_string()),
            ("attachfile_yn", String::new()),
            ("media_info", String::new()),
            ("viewtype", DAUM.view_type.to_string()),
            ("searchPeriod", DAUM.search_period.to_string()),
            ("sorttype", DAUM.sort_type.to_string()),
            ("nickname", String::new()),
        ];

        let response = client
            .get(DAUM.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CollectError::Transport(format!("{} ({})", e, DAUM.search_url)))?;

        if !response.status().is_success() {
            return Err(CollectError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                DAUM.search_url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CollectError::Transport(format!("{} ({})", e, DAUM.search_url)))?;

        // Html is parsed and dropped inside the synchronous helper; it must
        // not live across an await point (not Send)
        Ok(parse_listing_page(&body, today, &self.signature()))
    }
}

/// Extract post dates and the advertised last page number from one listing
/// document. Missing containers degrade to an empty page + no pagination.
fn parse_listing_page(
    body: &str,
    today: NaiveDate,
    context: &str,
) -> (Vec<NaiveDateTime>, Option<u32>) {
    let date_cell = Selector::parse("table.bbsList td.date").expect("valid selector");
    let paging_block = Selector::parse("div.paging").expect("valid selector");
    let page_link = Selector::parse("a.num_box").expect("valid selector");

    let document = Html::parse_document(body);

    let mut dates = Vec::new();
    for cell in document.select(&date_cell) {
        let text: String = cell.text().collect();
        match parse_post_date_text(text.trim(), today) {
            Ok(date) => dates.push(date),
            Err(e) => log::warn!("{}: {}", context, e),
        }
    }

    // The last a.num_box link in the pagination block carries the highest
    // reachable page number
    let last_page = document.select(&paging_block).next().and_then(|paging| {
        let last_link = paging.select(&page_link).last()?;
        let text: String = last_link.text().collect();
        match text.trim().parse::<u32>() {
            Ok(page) => Some(page),
            Err(_) => {
                log::warn!(
                    "{}: pagination link text {:?} is not a page number",
                    context,
                    text.trim()
                );
                None
            }
        }
    });

    (dates, last_page)
}
