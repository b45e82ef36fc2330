use super::{Article, DailyClose, NewsSource, QuoteSource};
use crate::errors::AppError;
use crate::notify::{Delivery, Notifier};
use tracing::info;

#[derive(Debug, Clone)]
pub struct StockAlertConfig {
    pub symbol: String,
    /// Searched for in news titles.
    pub company: String,
    /// Absolute whole-percent move that has to be exceeded.
    pub threshold_percent: i64,
    pub article_limit: usize,
}

impl Default for StockAlertConfig {
    fn default() -> Self {
        Self {
            symbol: "TSLA".to_string(),
            company: "Tesla Inc".to_string(),
            threshold_percent: 1,
            article_limit: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockAlertSummary {
    pub percent: i64,
    pub triggered: bool,
    pub sent: usize,
    pub duplicates: usize,
}

/// Move between the two most recent closes.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMove {
    pub latest: f64,
    pub previous: f64,
    pub difference: f64,
    /// Difference relative to the latest close, rounded half to even.
    pub percent: i64,
}

impl PriceMove {
    /// `closes` must be newest first.
    pub fn from_closes(closes: &[DailyClose]) -> Result<Self, AppError> {
        let (latest, previous) = match closes {
            [latest, previous, ..] => (latest.close, previous.close),
            _ => {
                return Err(AppError::UnexpectedShape(format!(
                    "need two daily closes, got {}",
                    closes.len()
                )))
            }
        };
        if latest == 0.0 {
            return Err(AppError::UnexpectedShape("latest close is zero".into()));
        }

        let difference = latest - previous;
        let percent = (difference * 100.0 / latest).round_ties_even() as i64;

        Ok(Self {
            latest,
            previous,
            difference,
            percent,
        })
    }

    pub fn arrow(&self) -> &'static str {
        if self.difference > 0.0 {
            "🔺"
        } else {
            "🔻"
        }
    }

    pub fn is_significant(&self, threshold_percent: i64) -> bool {
        self.percent.abs() > threshold_percent
    }
}

pub fn format_article(symbol: &str, price_move: &PriceMove, article: &Article) -> String {
    format!(
        "{symbol}: {}{}%\nHeadline: {}. \nBrief: {}",
        price_move.arrow(),
        price_move.percent,
        article.title,
        article.description.as_deref().unwrap_or("")
    )
}

/// Texts the top headlines when the stock moved more than the threshold.
pub fn run_stock_alert(
    quotes: &dyn QuoteSource,
    news: &dyn NewsSource,
    notifier: &mut Notifier,
    config: &StockAlertConfig,
) -> Result<StockAlertSummary, AppError> {
    let closes = quotes.daily_closes(&config.symbol)?;
    let price_move = PriceMove::from_closes(&closes)?;
    info!(
        symbol = %config.symbol,
        latest = price_move.latest,
        previous = price_move.previous,
        percent = price_move.percent,
        "Daily move"
    );

    let mut summary = StockAlertSummary {
        percent: price_move.percent,
        ..StockAlertSummary::default()
    };

    if !price_move.is_significant(config.threshold_percent) {
        info!(threshold = config.threshold_percent, "Move below threshold, no alert");
        return Ok(summary);
    }
    summary.triggered = true;

    let articles = news.headlines(&config.company)?;
    for article in articles.iter().take(config.article_limit) {
        let body = format_article(&config.symbol, &price_move, article);
        match notifier.send_sms(&body)? {
            Delivery::Sent(_) => summary.sent += 1,
            Delivery::Duplicate => summary.duplicates += 1,
            Delivery::NoRecipients => {}
        }
    }

    Ok(summary)
}
