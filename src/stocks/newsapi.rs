// newsapi.rs
use super::{Article, NewsSource};
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

pub struct NewsApiClient {
    config: NewsApiConfig,
    retry: RetryPolicy,
    client: Client,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig, retry: RetryPolicy) -> Self {
        Self {
            config,
            retry,
            client: Client::new(),
        }
    }

    fn try_fetch(&self, query: &str) -> Result<Vec<Article>, AppError> {
        let resp = self
            .client
            .get(format!("{}/v2/everything", self.config.base_url.trim_end_matches('/')))
            .header("User-Agent", concat!("deal_alerts/", env!("CARGO_PKG_VERSION")))
            .query(&[("qInTitle", query), ("apiKey", self.config.api_key.as_str())])
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        let body = check_status(resp)?
            .json::<EverythingResponse>()
            .map_err(|e| AppError::Deserialize(format!("news articles: {e}")))?;

        Ok(body.articles)
    }
}

impl NewsSource for NewsApiClient {
    fn headlines(&self, query: &str) -> Result<Vec<Article>, AppError> {
        self.retry.run("newsapi everything", || self.try_fetch(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn articles_tolerate_null_description() {
        let body: EverythingResponse = serde_json::from_value(serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                { "title": "Tesla ships", "description": null, "url": "https://x" },
                { "title": "Tesla slips", "description": "Shares fall" }
            ]
        }))
        .unwrap();

        assert_eq!(body.articles.len(), 2);
        assert_eq!(body.articles[0].description, None);
        assert_eq!(body.articles[1].description.as_deref(), Some("Shares fall"));
    }
}
