// src/deals/orchestrator.rs
use super::policy::{deal_message, search_with_fallback, should_notify};
use crate::errors::AppError;
use crate::flights::{FlightProvider, IataLookup, SearchQuery};
use crate::notify::{Channel, Delivery, Notifier};
use crate::sheets::{apply_code_updates, CodeUpdate, Destination, DestinationStore};
use chrono::{Days, NaiveDate};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct DealRunConfig {
    /// IATA code every search departs from.
    pub origin: String,
    pub currency: String,
    /// Departure is this many days after today.
    pub lead_days: u64,
    /// Return is this many days after today.
    pub horizon_days: u64,
    pub adults: u32,
    pub max_offers: u32,
    /// Courtesy pause after each code lookup and each destination.
    pub pause: Duration,
    /// Channels every deal goes out on, in order.
    pub channels: Vec<Channel>,
}

impl Default for DealRunConfig {
    fn default() -> Self {
        Self {
            origin: "LON".to_string(),
            currency: "GBP".to_string(),
            lead_days: 1,
            horizon_days: 6 * 30,
            adults: 1,
            max_offers: 10,
            pause: Duration::from_secs(2),
            channels: vec![Channel::WhatsApp, Channel::Email],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub destinations: usize,
    pub codes_backfilled: usize,
    /// Destinations for which at least one channel actually sent.
    pub notified: usize,
    /// Channel sends suppressed as duplicates.
    pub duplicates: usize,
    pub no_deal: usize,
    /// Destinations without a usable airport code.
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Notified { sent: usize, duplicates: usize },
    NoDeal,
    Skipped,
}

/// One full flight-deal pass.
///
/// Setup (destinations, code backfill, customers) aborts on error.
/// After that each destination is handled on its own: a failure is
/// logged and counted, and the loop moves on to the next one.
pub fn run_flight_deals(
    store: &dyn DestinationStore,
    provider: &dyn FlightProvider,
    notifier: &mut Notifier,
    config: &DealRunConfig,
    today: NaiveDate,
) -> Result<RunSummary, AppError> {
    let snapshot = store.fetch_destinations()?;
    info!(count = snapshot.len(), "Fetched destinations");

    let updates = backfill_codes(&snapshot, provider, config.pause)?;
    if !updates.is_empty() {
        store.update_iata_codes(&updates)?;
    }
    let destinations = apply_code_updates(&snapshot, &updates);

    let customers = store.fetch_customers()?;
    let emails: Vec<String> = customers.into_iter().map(|c| c.email).collect();
    info!(count = emails.len(), "Fetched customer emails");

    let (departure_date, return_date) = travel_window(today, config)?;

    let mut summary = RunSummary {
        destinations: destinations.len(),
        codes_backfilled: updates.len(),
        ..RunSummary::default()
    };

    for destination in &destinations {
        info!(city = %destination.city, "Searching flights to {}...", destination.city);

        let query = SearchQuery {
            origin: config.origin.clone(),
            destination: destination.iata_code.clone(),
            departure_date,
            return_date,
            non_stop: true,
            adults: config.adults,
            currency: config.currency.clone(),
            max_offers: config.max_offers,
        };

        match process_destination(destination, &query, provider, notifier, config, &emails) {
            Ok(Outcome::Notified { sent, duplicates }) => {
                if sent > 0 {
                    summary.notified += 1;
                }
                summary.duplicates += duplicates;
            }
            Ok(Outcome::NoDeal) => summary.no_deal += 1,
            Ok(Outcome::Skipped) => {
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                error!(city = %destination.city, "❌ Destination failed: {e}");
                summary.failed += 1;
            }
        }

        pause(config.pause);
    }

    info!(?summary, "Flight deal run finished");
    Ok(summary)
}

/// Looks up an airport code for every destination that has none.
///
/// Only resolved codes end up in the returned batch; misses are logged
/// and left blank so the next run tries again.
pub fn backfill_codes(
    destinations: &[Destination],
    provider: &dyn FlightProvider,
    courtesy_pause: Duration,
) -> Result<Vec<CodeUpdate>, AppError> {
    let mut updates = Vec::new();

    for dest in destinations.iter().filter(|d| d.needs_code()) {
        match provider.lookup_iata_code(&dest.city)? {
            IataLookup::Found(code) => updates.push(CodeUpdate {
                id: dest.id,
                city: dest.city.clone(),
                iata_code: code,
            }),
            IataLookup::NotFound => {
                warn!(city = %dest.city, "No airport code found");
            }
        }
        pause(courtesy_pause);
    }

    Ok(updates)
}

fn process_destination(
    destination: &Destination,
    query: &SearchQuery,
    provider: &dyn FlightProvider,
    notifier: &mut Notifier,
    config: &DealRunConfig,
    emails: &[String],
) -> Result<Outcome, AppError> {
    if destination.needs_code() {
        warn!(city = %destination.city, "No airport code, skipping search");
        return Ok(Outcome::Skipped);
    }

    let (record, kind) = search_with_fallback(provider, query)?;

    if !should_notify(&record, destination.lowest_price) {
        return Ok(Outcome::NoDeal);
    }
    let flight = match record.details() {
        Some(flight) => flight,
        None => return Ok(Outcome::NoDeal),
    };

    info!(
        city = %destination.city,
        ?kind,
        price = flight.price,
        reference = destination.lowest_price,
        "Lower price found, sending notifications"
    );

    let message = deal_message(flight, &config.currency);
    let mut sent = 0;
    let mut duplicates = 0;
    for &channel in &config.channels {
        match notifier.send(channel, emails, &message)? {
            Delivery::Sent(_) => sent += 1,
            Delivery::Duplicate => duplicates += 1,
            Delivery::NoRecipients => {}
        }
    }

    Ok(Outcome::Notified { sent, duplicates })
}

fn travel_window(
    today: NaiveDate,
    config: &DealRunConfig,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let out = today.checked_add_days(Days::new(config.lead_days));
    let back = today.checked_add_days(Days::new(config.horizon_days));

    match (out, back) {
        (Some(out), Some(back)) if out <= back => Ok((out, back)),
        _ => Err(AppError::Config(format!(
            "invalid travel window: +{} to +{} days from {today}",
            config.lead_days, config.horizon_days
        ))),
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_tomorrow_to_six_months() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (out, back) = travel_window(today, &DealRunConfig::default()).unwrap();
        assert_eq!(out, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(back, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn inverted_window_is_a_config_error() {
        let config = DealRunConfig {
            lead_days: 10,
            horizon_days: 5,
            ..DealRunConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(matches!(travel_window(today, &config), Err(AppError::Config(_))));
    }
}
