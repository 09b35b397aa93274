//! Naver cafe search API configuration: endpoint, fixed query parameters
//! and the cafe id table to sweep.

pub struct NaverConfig {
    /// Mobile-web article search endpoint (JSON).
    pub search_url: &'static str,
    /// Articles requested per page.
    pub per_page: u32,
    /// searchBy=1 restricts matching to post titles.
    pub search_by: u32,
    pub sort_by: &'static str,
    pub ad_unit: &'static str,
    /// (cafe id, cafe name) pairs to sweep. Names are display labels only.
    pub cafes: &'static [(u64, &'static str)],
}

pub const NAVER: NaverConfig = NaverConfig {
    search_url: "https://apis.naver.com/cafe-web/cafe-mobile/CafeMobileWebArticleSearchListV4",
    per_page: 1000,
    search_by: 1,
    sort_by: "date",
    ad_unit: "MW_CAFE_BOARD",
    cafes: &[
        (14793916, "줌마렐라(마산맘)"),
        (14042965, "강남엄마 목동엄마"),
        (12448054, "고.우.리 일산아지매"),
        (10094499, "맘스홀릭 베이비"),
        (22897837, "동탄맘들 모여라"),
        (22897837, "인천아띠아모"), // same cafe id as 동탄맘들 모여라; DedupPolicy decides whether the double count survives
        (13276223, "수원맘모여라"),
        (11306253, "파주맘"),
        (18391491, "광명맘"),
        (15194989, "분따"),
        (12165814, "운정맘"),
        (18376548, "대전세종맘스베이비"),
        (24361059, "세종맘카페"),
        (12182370, "도담도담대전맘"),
        (27069107, "청주맘블리"),
        (26217677, "천안아산줌마렐라"),
        (24000254, "대구맘365"),
        (23604018, "구미맘수다방"),
        (26025763, "광주맘"),
    ],
};
