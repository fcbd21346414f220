use serde::Deserialize;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<String>,
}

/// Query string of `GET /top-headlines`.
#[derive(Debug, Deserialize, Default)]
pub struct HeadlinesParams {
    pub page: Option<String>,
}
