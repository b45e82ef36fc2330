// twilio.rs
use super::MessageSender;
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub base_url: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

pub struct TwilioSender {
    config: TwilioConfig,
    retry: RetryPolicy,
    client: Client,
}

impl TwilioSender {
    pub fn new(config: TwilioConfig, retry: RetryPolicy) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            config,
            retry,
            client,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    fn try_send(&self, from: &str, to: &str, body: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .map_err(|e| AppError::Network(e.to_string()))?;

        let message = check_status(resp)?
            .json::<MessageResource>()
            .map_err(|e| AppError::Deserialize(format!("twilio message: {e}")))?;

        Ok(message.sid)
    }
}

impl MessageSender for TwilioSender {
    fn send_message(&self, from: &str, to: &str, body: &str) -> Result<String, AppError> {
        self.retry.run("twilio message", || self.try_send(from, to, body))
    }
}
