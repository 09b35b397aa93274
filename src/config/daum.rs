//! Daum cafe search configuration: endpoint, fixed query parameters and the
//! group id table to sweep.

pub struct DaumConfig {
    /// Cafe search listing endpoint (HTML).
    pub search_url: &'static str,
    /// Rows requested per listing page.
    pub list_num: u32,
    /// item=onlytitle restricts matching to post titles.
    pub item: &'static str,
    pub view_type: &'static str,
    pub search_period: &'static str,
    pub sort_type: &'static str,
    /// (group id, cafe name) pairs to sweep. Names are display labels only.
    pub groups: &'static [(&'static str, &'static str)],
}

pub const DAUM: DaumConfig = DaumConfig {
    search_url: "https://cafe.daum.net/_c21_/cafesearch",
    list_num: 100,
    item: "onlytitle",
    view_type: "tit",
    search_period: "all",
    sort_type: "0",
    groups: &[
        ("ut", "맘스카페"),
        ("SqBK", "대구맘"),
        ("YfAr", "부산맘"),
    ],
};
