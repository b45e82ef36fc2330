// errors.rs
use crate::flights::FlightError;
use std::fmt;

/// Errors surfaced by the jobs, either from a vendor API call
/// or from local concerns (configuration, sent-log database).
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Api { status: u16, body: String },
    Deserialize(String),
    UnexpectedShape(String),
    Flight(FlightError),
    Db(String),
}

impl AppError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::Network(msg) => write!(f, "Network error: {msg}"),
            AppError::Api { status, body } => write!(f, "API error (HTTP {status}): {body}"),
            AppError::Deserialize(msg) => write!(f, "Deserialize error: {msg}"),
            AppError::UnexpectedShape(msg) => write!(f, "Unexpected data shape: {msg}"),
            AppError::Flight(err) => write!(f, "Flight data error: {err}"),
            AppError::Db(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<FlightError> for AppError {
    fn from(err: FlightError) -> Self {
        AppError::Flight(err)
    }
}

/// Reads a blocking response, turning non-2xx statuses into `AppError::Api`.
pub fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
    Err(AppError::Api {
        status: status.as_u16(),
        body,
    })
}
