use reqwest::StatusCode;
use thiserror::Error;

use crate::config::Config;
use crate::data_models::Results;

const API_KEY_HEADER: &str = "X-Api-Key";
const SORT_BY: &str = "publishedAt";
const LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("request to news api failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("news api returned status {0}")]
    Status(StatusCode),

    #[error("could not decode news api response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin client over the two news API endpoints the site uses.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    headlines_source: String,
}

impl NewsClient {
    pub fn new(config: &Config) -> NewsClient {
        NewsClient {
            http: reqwest::Client::new(),
            base_url: config.news_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.news_api_key.clone(),
            headlines_source: config.headlines_source.clone(),
        }
    }

    /// Full-text search, newest first.
    pub async fn everything(
        &self,
        query: &str,
        page_size: i64,
        page: i64,
    ) -> Result<Results, NewsApiError> {
        let url = format!("{}/everything", self.base_url);
        let page_size = page_size.to_string();
        let page = page.to_string();
        let params = [
            ("q", query),
            ("pageSize", page_size.as_str()),
            ("page", page.as_str()),
            ("sortBy", SORT_BY),
            ("language", LANGUAGE),
        ];
        self.fetch(&url, &params).await
    }

    /// Headlines from the configured source. Not paginated.
    pub async fn top_headlines(&self) -> Result<Results, NewsApiError> {
        let url = format!("{}/top-headlines", self.base_url);
        let params = [("sources", self.headlines_source.as_str())];
        self.fetch(&url, &params).await
    }

    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<Results, NewsApiError> {
        log::debug!("fetching {url}");
        let res = self
            .http
            .get(url)
            .query(params)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(NewsApiError::Status(status));
        }

        let body = res.bytes().await?;
        let results = serde_json::from_slice(&body)?;
        Ok(results)
    }
}
