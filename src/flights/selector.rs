use super::{FlightDetails, FlightError, FlightOffer, FlightRecord, OfferResponse};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Picks the cheapest offer out of a search response.
///
/// An absent or empty response yields `FlightRecord::Unavailable`.
/// Offers are scanned in order and only a strictly lower price replaces
/// the running cheapest, so ties keep the earlier offer. Any offer that
/// lacks the outbound/inbound itineraries the record is derived from is
/// rejected rather than guessed at.
pub fn find_cheapest_flight(response: Option<&OfferResponse>) -> Result<FlightRecord, FlightError> {
    let offers = match response {
        Some(r) if !r.data.is_empty() => &r.data,
        _ => {
            info!("No flight data available.");
            return Ok(FlightRecord::Unavailable);
        }
    };

    let mut cheapest = derive_details(0, &offers[0])?;

    for (index, offer) in offers.iter().enumerate().skip(1) {
        let details = derive_details(index, offer)?;
        if details.price < cheapest.price {
            debug!(
                destination = %details.destination,
                price = details.price,
                "new lowest price"
            );
            cheapest = details;
        }
    }

    Ok(FlightRecord::Available(cheapest))
}

fn derive_details(index: usize, offer: &FlightOffer) -> Result<FlightDetails, FlightError> {
    let price = offer
        .price
        .grand_total
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| FlightError::InvalidPrice {
            offer: index,
            value: offer.price.grand_total.clone(),
        })?;

    let (outbound, inbound) = match offer.itineraries.as_slice() {
        [outbound, inbound, ..] => (outbound, inbound),
        other => {
            return Err(FlightError::MissingItineraries {
                offer: index,
                found: other.len(),
            })
        }
    };

    let (first_out, last_out) = match (outbound.segments.first(), outbound.segments.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(FlightError::EmptyItinerary {
                offer: index,
                itinerary: 0,
            })
        }
    };
    let first_in = inbound.segments.first().ok_or(FlightError::EmptyItinerary {
        offer: index,
        itinerary: 1,
    })?;

    Ok(FlightDetails {
        price,
        origin: first_out.departure.iata_code.clone(),
        destination: last_out.arrival.iata_code.clone(),
        out_date: calendar_date(index, &first_out.departure.at)?,
        return_date: calendar_date(index, &first_in.departure.at)?,
        stops: outbound.segments.len() - 1,
    })
}

/// `2025-03-01T10:15:00` → `2025-03-01`.
fn calendar_date(index: usize, at: &str) -> Result<NaiveDate, FlightError> {
    let day = at.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| FlightError::InvalidTimestamp {
        offer: index,
        value: at.to_string(),
    })
}
