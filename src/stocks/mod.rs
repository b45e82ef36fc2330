mod alert;
mod alphavantage;
mod newsapi;

pub use alert::{run_stock_alert, StockAlertConfig, StockAlertSummary};
pub use alphavantage::{
    AlphaVantageClient, AlphaVantageConfig, DEFAULT_BASE_URL as ALPHAVANTAGE_DEFAULT_URL,
};
pub use newsapi::{NewsApiClient, NewsApiConfig, DEFAULT_BASE_URL as NEWSAPI_DEFAULT_URL};

use crate::errors::AppError;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
}

pub trait QuoteSource {
    /// Daily closes, most recent first.
    fn daily_closes(&self, symbol: &str) -> Result<Vec<DailyClose>, AppError>;
}

pub trait NewsSource {
    /// Articles whose title mentions `query`, in the provider's order.
    fn headlines(&self, query: &str) -> Result<Vec<Article>, AppError>;
}
