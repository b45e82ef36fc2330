// src/config.rs
//
// Everything is read from the environment (a `.env` file is loaded first
// by `main`). Each job only asks for the variables it actually uses.

use crate::deals::DealRunConfig;
use crate::errors::AppError;
use crate::flights::{AmadeusConfig, AMADEUS_DEFAULT_URL};
use crate::notify::{
    BrevoConfig, Channel, DedupScope, PhoneNumbers, TwilioConfig, BREVO_DEFAULT_URL,
    TWILIO_DEFAULT_URL,
};
use crate::retry::RetryPolicy;
use crate::sheets::SheetyConfig;
use crate::stocks::{
    AlphaVantageConfig, NewsApiConfig, StockAlertConfig, ALPHAVANTAGE_DEFAULT_URL,
    NEWSAPI_DEFAULT_URL,
};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_EMAIL_SUBJECT: &str = "New Low Price Flight!";

/// Variable lookup; `std::env::var` in production, a map in tests.
pub struct Env<F: Fn(&str) -> Option<String>> {
    lookup: F,
}

impl Env<fn(&str) -> Option<String>> {
    pub fn process() -> Self {
        Self {
            lookup: |key| std::env::var(key).ok(),
        }
    }
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    pub fn required(&self, key: &str) -> Result<String, AppError> {
        self.get(key)
            .ok_or_else(|| AppError::Config(format!("{key} environment variable not set")))
    }

    pub fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn parsed<T>(&self, key: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}"))),
            None => Ok(default),
        }
    }
}

/// Settings shared by both jobs for delivering alerts.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// `None` in dry-run mode or when no text channel is used.
    pub twilio: Option<TwilioConfig>,
    /// `None` in dry-run mode or when email is not used.
    pub brevo: Option<BrevoConfig>,
    pub numbers: PhoneNumbers,
    pub subject: String,
    pub dedup_scope: DedupScope,
    /// SQLite file for cross-run dedup; process-lifetime only when unset.
    pub sent_log_db: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FlightJobConfig {
    pub sheety: SheetyConfig,
    pub amadeus: AmadeusConfig,
    pub notify: NotifyConfig,
    pub run: DealRunConfig,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct StockJobConfig {
    pub alphavantage: AlphaVantageConfig,
    pub newsapi: NewsApiConfig,
    pub notify: NotifyConfig,
    pub alert: StockAlertConfig,
    pub retry: RetryPolicy,
}

pub fn retry_policy<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<RetryPolicy, AppError> {
    let defaults = RetryPolicy::default();
    Ok(RetryPolicy {
        max_attempts: env.parsed("RETRY_MAX_ATTEMPTS", defaults.max_attempts)?,
        min_backoff: Duration::from_secs(
            env.parsed("RETRY_MIN_BACKOFF_SECS", defaults.min_backoff.as_secs())?,
        ),
        max_backoff: Duration::from_secs(
            env.parsed("RETRY_MAX_BACKOFF_SECS", defaults.max_backoff.as_secs())?,
        ),
        jitter: Duration::from_millis(env.parsed("RETRY_JITTER_MS", 0)?),
    })
}

pub fn parse_channels(raw: &str) -> Result<Vec<Channel>, AppError> {
    let channels = raw
        .split(',')
        .filter(|c| !c.trim().is_empty())
        .map(Channel::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if channels.is_empty() {
        return Err(AppError::Config("NOTIFY_CHANNELS lists no channel".into()));
    }
    Ok(channels)
}

fn notify_config<F: Fn(&str) -> Option<String>>(
    env: &Env<F>,
    channels: &[Channel],
    dry_run: bool,
) -> Result<NotifyConfig, AppError> {
    let uses = |c: Channel| channels.contains(&c);
    let need_texts = uses(Channel::Sms) || uses(Channel::WhatsApp);

    let twilio = if need_texts && !dry_run {
        Some(TwilioConfig {
            account_sid: env.required("TWILIO_SID")?,
            auth_token: env.required("TWILIO_AUTH_TOKEN")?,
            base_url: env.or("TWILIO_BASE_URL", TWILIO_DEFAULT_URL),
        })
    } else {
        None
    };

    let brevo = if uses(Channel::Email) && !dry_run {
        Some(BrevoConfig {
            api_key: env.required("BREVO_API_KEY")?,
            sender_email: env.required("MY_EMAIL")?,
            sender_name: env.or("EMAIL_SENDER_NAME", "Flight Club"),
            base_url: env.or("BREVO_BASE_URL", BREVO_DEFAULT_URL),
        })
    } else {
        None
    };

    let number = |key: &str, needed: bool| -> Result<String, AppError> {
        if needed && !dry_run {
            env.required(key)
        } else {
            Ok(env.or(key, ""))
        }
    };

    Ok(NotifyConfig {
        twilio,
        brevo,
        numbers: PhoneNumbers {
            sms_from: number("TWILIO_VIRTUAL_NUMBER", uses(Channel::Sms))?,
            whatsapp_from: number("TWILIO_WHATSAPP_NUMBER", uses(Channel::WhatsApp))?,
            to: number("TWILIO_VERIFIED_NUMBER", need_texts)?,
        },
        subject: env.or("EMAIL_SUBJECT", DEFAULT_EMAIL_SUBJECT),
        dedup_scope: env.parsed("DEDUP_SCOPE", DedupScope::Global)?,
        sent_log_db: env.get("SENT_LOG_DB"),
    })
}

impl FlightJobConfig {
    pub fn from_env<F: Fn(&str) -> Option<String>>(
        env: &Env<F>,
        dry_run: bool,
    ) -> Result<Self, AppError> {
        let defaults = DealRunConfig::default();
        let channels = parse_channels(&env.or("NOTIFY_CHANNELS", "whatsapp,email"))?;

        let run = DealRunConfig {
            origin: env.or("ORIGIN_CITY_IATA", &defaults.origin),
            currency: env.or("CURRENCY_CODE", &defaults.currency),
            lead_days: env.parsed("SEARCH_LEAD_DAYS", defaults.lead_days)?,
            horizon_days: env.parsed("SEARCH_HORIZON_DAYS", defaults.horizon_days)?,
            adults: defaults.adults,
            max_offers: env.parsed("SEARCH_MAX_OFFERS", defaults.max_offers)?,
            pause: Duration::from_secs(
                env.parsed("COURTESY_PAUSE_SECS", defaults.pause.as_secs())?,
            ),
            channels: channels.clone(),
        };

        Ok(Self {
            sheety: SheetyConfig {
                username: env.required("SHEETY_USERNAME")?,
                password: env.required("SHEETY_PASSWORD")?,
                prices_endpoint: env.required("SHEETY_PRICES_ENDPOINT")?,
                users_endpoint: env.required("SHEETY_USERS_ENDPOINT")?,
                prices_key: env.or("SHEETY_PRICES_KEY", "prices"),
                price_row_key: env.or("SHEETY_PRICE_ROW_KEY", "price"),
                users_key: env.or("SHEETY_USERS_KEY", "users"),
                email_field: env.or("SHEETY_EMAIL_FIELD", "whatIsYourEmail?"),
            },
            amadeus: AmadeusConfig {
                api_key: env.required("AMADEUS_API_KEY")?,
                api_secret: env.required("AMADEUS_SECRET")?,
                base_url: env.or("AMADEUS_BASE_URL", AMADEUS_DEFAULT_URL),
            },
            notify: notify_config(env, &channels, dry_run)?,
            run,
            retry: retry_policy(env)?,
        })
    }
}

impl StockJobConfig {
    pub fn from_env<F: Fn(&str) -> Option<String>>(
        env: &Env<F>,
        dry_run: bool,
    ) -> Result<Self, AppError> {
        let defaults = StockAlertConfig::default();

        Ok(Self {
            alphavantage: AlphaVantageConfig {
                api_key: env.required("STOCK_API_KEY")?,
                base_url: env.or("ALPHAVANTAGE_BASE_URL", ALPHAVANTAGE_DEFAULT_URL),
            },
            newsapi: NewsApiConfig {
                api_key: env.required("NEWS_API_KEY")?,
                base_url: env.or("NEWSAPI_BASE_URL", NEWSAPI_DEFAULT_URL),
            },
            notify: notify_config(env, &[Channel::Sms], dry_run)?,
            alert: StockAlertConfig {
                symbol: env.or("STOCK_SYMBOL", &defaults.symbol),
                company: env.or("COMPANY_NAME", &defaults.company),
                threshold_percent: env
                .parsed("STOCK_THRESHOLD_PERCENT", defaults.threshold_percent)?,
                article_limit: env.parsed("NEWS_ARTICLE_LIMIT", defaults.article_limit)?,
            },
            retry: retry_policy(env)?,
        })
    }
}
