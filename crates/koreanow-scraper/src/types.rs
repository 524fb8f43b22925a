/// One news record as delivered by the policy news API, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
    /// Raw HTML snippet from the API.
    pub summary: String,
    pub pub_date: String,
    pub author: String,
}

/// What the detail page yielded. Both fields are `None` when the fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDetail {
    pub image: Option<String>,
    pub full_content: Option<String>,
}
