// alphavantage.rs
use super::{DailyClose, QuoteSource};
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

const SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";

#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
}

pub struct AlphaVantageClient {
    config: AlphaVantageConfig,
    retry: RetryPolicy,
    client: Client,
}

impl AlphaVantageClient {
    pub fn new(config: AlphaVantageConfig, retry: RetryPolicy) -> Self {
        Self {
            config,
            retry,
            client: Client::new(),
        }
    }

    fn try_fetch(&self, symbol: &str) -> Result<Value, AppError> {
        let resp = self
            .client
            .get(format!("{}/query", self.config.base_url.trim_end_matches('/')))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        check_status(resp)?
            .json()
            .map_err(|e| AppError::Deserialize(format!("daily series: {e}")))
    }
}

impl QuoteSource for AlphaVantageClient {
    fn daily_closes(&self, symbol: &str) -> Result<Vec<DailyClose>, AppError> {
        let body = self.retry.run("alphavantage daily", || self.try_fetch(symbol))?;
        parse_daily_series(&body)
    }
}

/// Extracts the closes from a `TIME_SERIES_DAILY` body, newest first.
/// Throttled or invalid requests come back with a `Note`/`Information`/
/// `Error Message` instead of the series; that text ends up in the error.
fn parse_daily_series(body: &Value) -> Result<Vec<DailyClose>, AppError> {
    let series = body.get(SERIES_KEY).and_then(Value::as_object).ok_or_else(|| {
        let reason = ["Note", "Information", "Error Message"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .unwrap_or("series missing");
        AppError::UnexpectedShape(format!("{SERIES_KEY}: {reason}"))
    })?;

    let mut closes = series
        .iter()
        .map(|(day, bar)| -> Result<DailyClose, AppError> {
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|e| AppError::UnexpectedShape(format!("series date {day:?}: {e}")))?;
            let close = bar
                .get(CLOSE_KEY)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| AppError::UnexpectedShape(format!("no close for {day}")))?;
            Ok(DailyClose { date, close })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    closes.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(closes)
}
