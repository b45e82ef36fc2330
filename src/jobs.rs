// src/jobs.rs
use crate::config::{Env, FlightJobConfig, NotifyConfig, StockJobConfig};
use crate::db::init_db;
use crate::deals::{run_flight_deals, RunSummary};
use crate::errors::AppError;
use crate::flights::AmadeusClient;
use crate::notify::{
    BrevoMailer, DryRunSender, MailSender, MessageSender, Notifier, SentLog, TwilioSender,
};
use crate::retry::RetryPolicy;
use crate::sheets::SheetyClient;
use crate::stocks::{run_stock_alert, AlphaVantageClient, NewsApiClient, StockAlertSummary};
use chrono::Local;
use tracing::info;

pub fn run_flights(dry_run: bool) -> Result<RunSummary, AppError> {
    let config = FlightJobConfig::from_env(&Env::process(), dry_run)?;

    let store = SheetyClient::new(config.sheety.clone(), config.retry.clone())?;
    let provider = AmadeusClient::new(config.amadeus.clone(), config.retry.clone())?;
    let mut notifier = build_notifier(&config.notify, &config.retry, dry_run)?;

    let today = Local::now().date_naive();
    let summary = run_flight_deals(&store, &provider, &mut notifier, &config.run, today)?;
    info!(messages = notifier.sent_log().len(), "Distinct messages delivered");
    Ok(summary)
}

pub fn run_stocks(dry_run: bool) -> Result<StockAlertSummary, AppError> {
    let config = StockJobConfig::from_env(&Env::process(), dry_run)?;

    let quotes = AlphaVantageClient::new(config.alphavantage.clone(), config.retry.clone());
    let news = NewsApiClient::new(config.newsapi.clone(), config.retry.clone());
    let mut notifier = build_notifier(&config.notify, &config.retry, dry_run)?;

    let summary = run_stock_alert(&quotes, &news, &mut notifier, &config.alert)?;
    info!(?summary, messages = notifier.sent_log().len(), "Stock alert finished");
    Ok(summary)
}

pub(crate) fn build_notifier(
    config: &NotifyConfig,
    retry: &RetryPolicy,
    dry_run: bool,
) -> Result<Notifier, AppError> {
    let (texts, mail): (Option<Box<dyn MessageSender>>, Option<Box<dyn MailSender>>) =
        if dry_run {
            (
                Some(Box::new(DryRunSender) as Box<dyn MessageSender>),
                Some(Box::new(DryRunSender) as Box<dyn MailSender>),
            )
        } else {
            let texts = match &config.twilio {
                Some(twilio) => {
                    let sender = TwilioSender::new(twilio.clone(), retry.clone())?;
                    Some(Box::new(sender) as Box<dyn MessageSender>)
                }
                None => None,
            };
            let mail = config.brevo.as_ref().map(|brevo| {
                Box::new(BrevoMailer::new(brevo.clone(), retry.clone())) as Box<dyn MailSender>
            });
            (texts, mail)
        };

    let mut sent = SentLog::new(config.dedup_scope);
    if let Some(path) = &config.sent_log_db {
        let db = init_db(path)?;
        // Dry runs only consult the durable log.
        sent = if dry_run {
            info!(path = %path, "Using durable sent-log (read-only, dry run)");
            sent.with_read_only_store(db)
        } else {
            info!(path = %path, "Using durable sent-log");
            sent.with_store(db)
        };
    }

    Ok(Notifier::new(
        texts,
        mail,
        config.numbers.clone(),
        config.subject.clone(),
        sent,
    ))
}
