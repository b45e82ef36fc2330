use std::error::Error;
use std::fmt;

/// An offer that does not have the shape the selector relies on.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightError {
    MissingItineraries { offer: usize, found: usize },
    EmptyItinerary { offer: usize, itinerary: usize },
    InvalidPrice { offer: usize, value: String },
    InvalidTimestamp { offer: usize, value: String },
}

impl fmt::Display for FlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightError::MissingItineraries { offer, found } => write!(
                f,
                "offer {offer}: expected outbound and inbound itineraries, found {found}"
            ),
            FlightError::EmptyItinerary { offer, itinerary } => {
                write!(f, "offer {offer}: itinerary {itinerary} has no segments")
            }
            FlightError::InvalidPrice { offer, value } => {
                write!(f, "offer {offer}: grand total {value:?} is not a number")
            }
            FlightError::InvalidTimestamp { offer, value } => {
                write!(f, "offer {offer}: departure time {value:?} is not a date")
            }
        }
    }
}

impl Error for FlightError {}
