// sheety.rs
use super::{CodeUpdate, Customer, Destination, DestinationStore};
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct SheetyConfig {
    pub username: String,
    pub password: String,
    pub prices_endpoint: String,
    pub users_endpoint: String,
    /// Root key of the prices sheet response (`prices`).
    pub prices_key: String,
    /// Row key used in PUT bodies (`price`).
    pub price_row_key: String,
    /// Root key of the users sheet response (`users`).
    pub users_key: String,
    /// Column holding the customer's email address.
    pub email_field: String,
}

pub struct SheetyClient {
    config: SheetyConfig,
    retry: RetryPolicy,
    client: Client,
}

impl SheetyClient {
    pub fn new(config: SheetyConfig, retry: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            config,
            retry,
            client,
        })
    }

    fn get_rows(&self, endpoint: &str, key: &str) -> Result<Vec<Value>, AppError> {
        let resp = self
            .client
            .get(endpoint)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        let body: Value = check_status(resp)?
            .json()
            .map_err(|e| AppError::Deserialize(e.to_string()))?;

        Ok(rows_under(&body, key))
    }

    fn put_code(&self, update: &CodeUpdate) -> Result<(), AppError> {
        let url = row_url(&self.config.prices_endpoint, update.id)?;
        let mut body = Map::new();
        body.insert(
            self.config.price_row_key.clone(),
            serde_json::to_value(update).map_err(|e| AppError::Deserialize(e.to_string()))?,
        );

        let resp = self
            .client
            .put(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&body)
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        check_status(resp)?;
        Ok(())
    }
}

impl DestinationStore for SheetyClient {
    fn fetch_destinations(&self) -> Result<Vec<Destination>, AppError> {
        let rows = self.retry.run("sheety destinations", || {
            self.get_rows(&self.config.prices_endpoint, &self.config.prices_key)
        })?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| AppError::UnexpectedShape(format!("destination row: {e}")))
            })
            .collect()
    }

    fn update_iata_codes(&self, updates: &[CodeUpdate]) -> Result<(), AppError> {
        for update in updates {
            self.retry
                .run("sheety code update", || self.put_code(update))?;
            info!(city = %update.city, iata_code = %update.iata_code, "Updated destination code");
        }
        Ok(())
    }

    fn fetch_customers(&self) -> Result<Vec<Customer>, AppError> {
        let rows = self.retry.run("sheety customers", || {
            self.get_rows(&self.config.users_endpoint, &self.config.users_key)
        })?;

        Ok(customers_from_rows(&rows, &self.config.email_field))
    }
}

fn rows_under(body: &Value, key: &str) -> Vec<Value> {
    body.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// `https://api.sheety.co/x/flights/prices` + 7 → `.../prices/7`
fn row_url(endpoint: &str, id: u64) -> Result<Url, AppError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| AppError::Config(format!("invalid sheet endpoint {endpoint:?}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("sheet endpoint {endpoint:?} cannot take a row id")))?
        .pop_if_empty()
        .push(&id.to_string());

    Ok(url)
}

fn customers_from_rows(rows: &[Value], email_field: &str) -> Vec<Customer> {
    rows.iter()
        .filter_map(|row| {
            let email = row
                .get(email_field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|e| !e.is_empty());

            if email.is_none() {
                warn!(field = email_field, "Skipping customer row without an email");
            }
            email.map(|e| Customer {
                email: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_url_appends_id() {
        let url = row_url("https://api.sheety.co/abc/flightDeals/prices", 7).unwrap();
        assert_eq!(url.as_str(), "https://api.sheety.co/abc/flightDeals/prices/7");

        let url = row_url("https://api.sheety.co/abc/flightDeals/prices/", 7).unwrap();
        assert_eq!(url.as_str(), "https://api.sheety.co/abc/flightDeals/prices/7");
    }

    #[test]
    fn row_url_rejects_garbage() {
        assert!(matches!(row_url("not a url", 1), Err(AppError::Config(_))));
    }

    #[test]
    fn missing_root_key_gives_no_rows() {
        assert!(rows_under(&json!({ "errors": [] }), "prices").is_empty());
        assert_eq!(rows_under(&json!({ "prices": [ {}, {} ] }), "prices").len(), 2);
    }

    #[test]
    fn customers_read_configured_column() {
        let rows = vec![
            json!({ "id": 2, "whatIsYourEmail?": "ada@example.com" }),
            json!({ "id": 3, "whatIsYourEmail?": "  " }),
            json!({ "id": 4 }),
            json!({ "id": 5, "whatIsYourEmail?": " alan@example.com " }),
        ];

        let customers = customers_from_rows(&rows, "whatIsYourEmail?");
        assert_eq!(
            customers,
            vec![
                Customer { email: "ada@example.com".into() },
                Customer { email: "alan@example.com".into() },
            ]
        );
    }

    #[test]
    fn code_update_body_uses_camel_case() {
        let update = CodeUpdate {
            id: 9,
            city: "Paris".into(),
            iata_code: "PAR".into(),
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "iataCode": "PAR" }));
    }
}
