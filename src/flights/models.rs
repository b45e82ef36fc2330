use serde::Deserialize;

// response
//  └── data[]
//       ├── price
//       │    ├── grandTotal   ("123.45")
//       │    └── currency
//       └── itineraries[]     (0 = outbound, 1 = inbound)
//            └── segments[]
//                 ├── departure
//                 │    ├── iataCode
//                 │    └── at    ("2025-03-01T10:15:00")
//                 └── arrival
//                      ├── iataCode
//                      └── at

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferResponse {
    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightOffer {
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub grand_total: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    pub at: String,
}
