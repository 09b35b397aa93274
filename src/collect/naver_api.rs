//! Naver cafe collector: pages the mobile-web article search API (JSON) and
//! extracts one publish date per article hit.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::collect::date_text::parse_post_date_text;
use crate::collect::{
    CollectError, CollectForumPosts, build_http_client, politeness_sleep,
};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{COLLECT, NAVER};
use crate::domain::{ForumId, ForumPosts};

pub struct NaverCafeSource {
    pub cafe_id: u64,
    pub label: &'static str,
}

// Response shape:
// {message: {result: {articleList: [{type, item: {currentSecTime}}], nextRequestParameter}}}
// Every level is optional in practice; a missing container is an empty page,
// not an error.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    message: Option<SearchMessage>,
}

#[derive(Debug, Deserialize)]
struct SearchMessage {
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    article_list: Vec<ArticleEntry>,
    next_request_parameter: Option<NextRequestParameter>,
}

#[derive(Debug, Deserialize)]
struct ArticleEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    item: Option<ArticleItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleItem {
    current_sec_time: Option<String>,
}

/// Opaque continuation cursor echoed back into the next page request.
/// An absent cursor, or a cursor without a page number, means last page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRequestParameter {
    page: Option<u32>,
    last_item_index: Option<i64>,
    last_ad_index: Option<i64>,
}

#[async_trait]
impl CollectForumPosts for NaverCafeSource {
    fn signature(&self) -> String {
        format!("naver:{} ({})", self.cafe_id, self.label)
    }

    async fn collect_posts(&self) -> Result<ForumPosts> {
        let client = build_http_client()?;
        let mut dates: Vec<NaiveDateTime> = Vec::new();
        let mut cursor: Option<NextRequestParameter> = None;
        let mut page: u32 = 1;

        loop {
            politeness_sleep().await;
            let today = Local::now().date_naive();

            let (page_dates, next) = match self
                .fetch_search_page(&client, page, cursor.as_ref(), today)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    // A failed page contributes nothing but does not end the run
                    log::warn!("{} page {}: {}", self.signature(), page, e);
                    (Vec::new(), None)
                }
            };

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_page_fetches {
                log::info!(
                    "{} page {}: {} post dates",
                    self.signature(),
                    page,
                    page_dates.len()
                );
            }
            dates.extend(page_dates);

            match next.as_ref().and_then(|n| n.page) {
                Some(next_page) if page < COLLECT.max_pages_per_forum => {
                    page = next_page;
                    cursor = next;
                }
                Some(_) => {
                    log::warn!(
                        "{} hit the {}-page safety cap; stopping early",
                        self.signature(),
                        COLLECT.max_pages_per_forum
                    );
                    break;
                }
                None => break,
            }
        }

        Ok(ForumPosts {
            forum: ForumId::NaverCafe(self.cafe_id),
            label: self.label,
            dates,
        })
    }
}

impl NaverCafeSource {
    async fn fetch_search_page(
        &self,
        client: &reqwest::Client,
        page: u32,
        cursor: Option<&NextRequestParameter>,
        today: NaiveDate,
    ) -> Result<(Vec<NaiveDateTime>, Option<NextRequestParameter>), CollectError> {
        // First page starts both indices at 0; continuation pages echo the
        // cursor's indices, defaulting to -1 when the cursor omits one.
        let last_item_index = cursor.map(|c| c.last_item_index.unwrap_or(-1)).unwrap_or(0);
        let last_ad_index = cursor.map(|c| c.last_ad_index.unwrap_or(-1)).unwrap_or(0);

        let params: Vec<(&str, String)> = vec![
            ("cafeId", self.cafe_id.to_string()),
            ("query", COLLECT.keyword.to_string()),
            ("searchBy", NAVER.search_by.to_string()),
            ("sortBy", NAVER.sort_by.to_string()),
            ("page", page.to_string()),
            ("perPage", NAVER.per_page.to_string()),
            ("adUnit", NAVER.ad_unit.to_string()),
            ("lastItemIndex", last_item_index.to_string()),
            ("lastAdIndex", last_ad_index.to_string()),
            ("ad", "true".to_string()),
        ];

        let response = client
            .get(NAVER.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CollectError::Transport(format!("{} ({})", e, NAVER.search_url)))?;

        if !response.status().is_success() {
            return Err(CollectError::Transport(format!(
                "HTTP {} from {}",
                response.status(),
                NAVER.search_url
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CollectError::Parse(format!("{} ({})", e, NAVER.search_url)))?;

        Ok(extract_page(body, today, &self.signature()))
    }
}

/// Pull post dates and the continuation cursor out of one decoded response.
/// Individual articles with missing or unparseable dates are skipped.
fn extract_page(
    response: SearchResponse,
    today: NaiveDate,
    context: &str,
) -> (Vec<NaiveDateTime>, Option<NextRequestParameter>) {
    let Some(result) = response.message.and_then(|m| m.result) else {
        log::warn!("{}: response carried no article list", context);
        return (Vec::new(), None);
    };

    let mut dates = Vec::new();
    for entry in &result.article_list {
        if entry.kind.as_deref() != Some("ARTICLE") {
            continue;
        }
        let Some(date_text) = entry.item.as_ref().and_then(|i| i.current_sec_time.as_deref())
        else {
            continue;
        };
        match parse_post_date_text(date_text, today) {
            Ok(date) => dates.push(date),
            Err(e) => log::warn!("{}: {}", context, e),
        }
    }

    (dates, result.next_request_parameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn test_extract_page_skips_ads_and_bad_dates() {
        let json = r#"{
            "message": {"result": {
                "articleList": [
                    {"type": "ARTICLE", "item": {"currentSecTime": "24.06.10."}},
                    {"type": "AD", "item": {"currentSecTime": "24.06.11."}},
                    {"type": "ARTICLE", "item": {"currentSecTime": "not a date"}},
                    {"type": "ARTICLE", "item": {}},
                    {"type": "ARTICLE"}
                ],
                "nextRequestParameter": {"page": 2, "lastItemIndex": 42, "lastAdIndex": 7}
            }}
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let (dates, next) = extract_page(response, today(), "test");

        assert_eq!(dates.len(), 1, "only the parseable ARTICLE survives");
        assert_eq!(
            dates[0].date(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        let next = next.unwrap();
        assert_eq!(next.page, Some(2));
        assert_eq!(next.last_item_index, Some(42));
    }

    #[test]
    fn test_extract_page_last_page_has_no_cursor() {
        let json = r#"{
            "message": {"result": {
                "articleList": [
                    {"type": "ARTICLE", "item": {"currentSecTime": "2024.06.10"}}
                ]
            }}
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let (dates, next) = extract_page(response, today(), "test");
        assert_eq!(dates.len(), 1);
        assert!(next.is_none());
    }

    #[test]
    fn test_extract_page_tolerates_empty_response() {
        let response: SearchResponse = serde_json::from_str(r#"{"message": {}}"#).unwrap();
        let (dates, next) = extract_page(response, today(), "test");
        assert!(dates.is_empty());
        assert!(next.is_none());
    }
}
