use chrono::NaiveDate;
use std::fmt;

/// The cheapest flight found for one search, or nothing at all.
///
/// There is no partially filled record: either every field is known
/// or the search came back empty.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightRecord {
    Unavailable,
    Available(FlightDetails),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightDetails {
    pub price: f64,
    pub origin: String,
    pub destination: String,
    pub out_date: NaiveDate,
    pub return_date: NaiveDate,
    pub stops: usize,
}

impl FlightRecord {
    pub fn price(&self) -> Option<f64> {
        match self {
            FlightRecord::Available(details) => Some(details.price),
            FlightRecord::Unavailable => None,
        }
    }

    pub fn details(&self) -> Option<&FlightDetails> {
        match self {
            FlightRecord::Available(details) => Some(details),
            FlightRecord::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FlightRecord::Available(_))
    }
}

impl FlightDetails {
    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }
}

impl fmt::Display for FlightRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightRecord::Unavailable => write!(f, "N/A"),
            FlightRecord::Available(d) => write!(
                f,
                "{:.2} {} -> {} ({} / {}, {} stop(s))",
                d.price, d.origin, d.destination, d.out_date, d.return_date, d.stops
            ),
        }
    }
}
