use crate::errors::AppError;
use crate::flights::{
    find_cheapest_flight, FlightDetails, FlightProvider, FlightRecord, SearchQuery,
};
use tracing::info;

/// Which search produced the record fed to the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Direct,
    Indirect,
}

/// A deal is worth sending only when a real fare beats the reference price.
pub fn should_notify(record: &FlightRecord, reference_price: f64) -> bool {
    match record.price() {
        Some(price) => price < reference_price,
        None => false,
    }
}

pub fn deal_message(flight: &FlightDetails, currency: &str) -> String {
    if flight.is_direct() {
        format!(
            "Low price alert! Only {currency} {:.2} to fly direct from {} to {}, \
             departing on {} and returning on {}.",
            flight.price, flight.origin, flight.destination, flight.out_date, flight.return_date
        )
    } else {
        format!(
            "Low price alert! Only {currency} {:.2} to fly from {} to {} with {} stop(s), \
             departing on {} and returning on {}.",
            flight.price,
            flight.origin,
            flight.destination,
            flight.stops,
            flight.out_date,
            flight.return_date
        )
    }
}

/// Direct flights first; indirect ones only when no direct offer exists.
///
/// A direct result is kept even if an indirect fare would be cheaper.
pub fn search_with_fallback(
    provider: &dyn FlightProvider,
    query: &SearchQuery,
) -> Result<(FlightRecord, SearchKind), AppError> {
    let direct_query = SearchQuery {
        non_stop: true,
        ..query.clone()
    };
    let offers = provider.search_offers(&direct_query)?;
    let record = find_cheapest_flight(offers.as_ref())?;
    info!(destination = %query.destination, "Direct flight: {record}");

    if record.is_available() {
        return Ok((record, SearchKind::Direct));
    }

    info!(destination = %query.destination, "No direct flights, checking indirect flights");
    let offers = provider.search_offers(&direct_query.allowing_stops())?;
    let record = find_cheapest_flight(offers.as_ref())?;
    info!(destination = %query.destination, "Cheapest indirect flight: {record}");

    Ok((record, SearchKind::Indirect))
}
