mod amadeus;
mod flight_error;
mod models;
mod record;
mod selector;

pub use amadeus::{AmadeusClient, AmadeusConfig, DEFAULT_BASE_URL as AMADEUS_DEFAULT_URL};
pub use flight_error::FlightError;
pub use models::{FlightOffer, OfferResponse};
pub use record::{FlightDetails, FlightRecord};
pub use selector::find_cheapest_flight;

use crate::errors::AppError;
use chrono::NaiveDate;

/// Result of a city → airport code lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IataLookup {
    Found(String),
    NotFound,
}

/// One offer search against the flight provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub non_stop: bool,
    pub adults: u32,
    pub currency: String,
    pub max_offers: u32,
}

impl SearchQuery {
    /// Same query with indirect flights allowed.
    pub fn allowing_stops(&self) -> Self {
        Self {
            non_stop: false,
            ..self.clone()
        }
    }
}

/// The flight-search collaborator the deal run depends on.
pub trait FlightProvider {
    fn lookup_iata_code(&self, city: &str) -> Result<IataLookup, AppError>;

    /// `Ok(None)` means the provider had nothing to say for this query.
    fn search_offers(&self, query: &SearchQuery) -> Result<Option<OfferResponse>, AppError>;
}
