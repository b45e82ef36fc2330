// amadeus.rs
use super::{FlightProvider, IataLookup, OfferResponse, SearchQuery};
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const CITIES_PATH: &str = "/v1/reference-data/locations/cities";
const OFFERS_PATH: &str = "/v2/shopping/flight-offers";

/// Tokens are refreshed this long before the provider says they expire.
const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct AccessToken {
    value: String,
    refresh_at: Instant,
}

pub struct AmadeusClient {
    config: AmadeusConfig,
    retry: RetryPolicy,
    client: Client,
    token: RefCell<Option<AccessToken>>,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig, retry: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            config,
            retry,
            client,
            token: RefCell::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Returns a cached bearer token, fetching a new one when it is
    /// missing or about to expire.
    fn bearer_token(&self) -> Result<String, AppError> {
        if let Some(token) = self.token.borrow().as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.retry.run("amadeus token", || self.request_token())?;
        info!(
            expires_in = fresh.expires_in,
            "New Amadeus token obtained"
        );

        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(TOKEN_SAFETY_MARGIN);
        let value = fresh.access_token;
        *self.token.borrow_mut() = Some(AccessToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    fn request_token(&self) -> Result<TokenResponse, AppError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.api_key.as_str()),
            ("client_secret", self.config.api_secret.as_str()),
        ];

        let resp = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&form)
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        check_status(resp)?
            .json::<TokenResponse>()
            .map_err(|e| AppError::Deserialize(format!("token response: {e}")))
    }

    fn try_lookup(&self, city: &str) -> Result<IataLookup, AppError> {
        let token = self.bearer_token()?;
        let resp = self
            .client
            .get(self.url(CITIES_PATH))
            .bearer_auth(token)
            .query(&[("keyword", city), ("max", "2"), ("include", "AIRPORTS")])
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        let body: Value = check_status(resp)?
            .json()
            .map_err(|e| AppError::Deserialize(format!("city lookup: {e}")))?;

        Ok(parse_city_lookup(&body))
    }

    fn try_search(&self, query: &SearchQuery) -> Result<Option<OfferResponse>, AppError> {
        let token = self.bearer_token()?;
        let params = search_params(query);

        let resp = self
            .client
            .get(self.url(OFFERS_PATH))
            .bearer_auth(token)
            .query(&params)
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_client_error() && status.as_u16() != 429 {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            warn!(
                origin = %query.origin,
                destination = %query.destination,
                status = status.as_u16(),
                "Flight search failed: {text}"
            );
            return Ok(None);
        }

        let offers = check_status(resp)?
            .json::<OfferResponse>()
            .map_err(|e| AppError::UnexpectedShape(format!("flight offers: {e}")))?;

        Ok(Some(offers))
    }
}

impl FlightProvider for AmadeusClient {
    fn lookup_iata_code(&self, city: &str) -> Result<IataLookup, AppError> {
        self.retry.run("amadeus city lookup", || self.try_lookup(city))
    }

    fn search_offers(&self, query: &SearchQuery) -> Result<Option<OfferResponse>, AppError> {
        self.retry.run("amadeus offer search", || self.try_search(query))
    }
}

fn parse_city_lookup(body: &Value) -> IataLookup {
    body["data"]
        .get(0)
        .and_then(|city| city["iataCode"].as_str())
        .filter(|code| !code.trim().is_empty())
        .map(|code| IataLookup::Found(code.to_string()))
        .unwrap_or(IataLookup::NotFound)
}

fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    vec![
        ("originLocationCode", query.origin.clone()),
        ("destinationLocationCode", query.destination.clone()),
        ("departureDate", query.departure_date.format("%Y-%m-%d").to_string()),
        ("returnDate", query.return_date.format("%Y-%m-%d").to_string()),
        ("adults", query.adults.to_string()),
        ("nonStop", query.non_stop.to_string()),
        ("currencyCode", query.currency.clone()),
        ("max", query.max_offers.to_string()),
    ]
}
