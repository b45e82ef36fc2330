// src/notify/brevo.rs

use super::MailSender;
use crate::errors::{check_status, AppError};
use crate::retry::RetryPolicy;
use crate::templates::alert_email;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.brevo.com";

#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    pub base_url: String,
}

pub struct BrevoMailer {
    config: BrevoConfig,
    retry: RetryPolicy,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
    text_content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoAccepted {
    message_id: String,
}

impl BrevoMailer {
    pub fn new(config: BrevoConfig, retry: RetryPolicy) -> Self {
        Self {
            config,
            retry,
            client: Client::new(),
        }
    }

    fn payload<'a>(
        &'a self,
        recipient: &'a str,
        subject: &'a str,
        body: &'a str,
    ) -> BrevoPayload<'a> {
        BrevoPayload {
            sender: BrevoSender {
                name: &self.config.sender_name,
                email: &self.config.sender_email,
            },
            to: vec![BrevoRecipient { email: recipient }],
            subject,
            html_content: alert_email(subject, body).into_string(),
            text_content: body,
        }
    }

    fn try_send_one(&self, payload: &BrevoPayload<'_>) -> Result<String, AppError> {
        let resp = self
            .client
            .post(format!(
                "{}/v3/smtp/email",
                self.config.base_url.trim_end_matches('/')
            ))
            .header("api-key", &self.config.api_key)
            .json(payload)
            .send()
            .map_err(|e| AppError::Network(format!("Failed to send email request: {e}")))?;

        let accepted = check_status(resp)?
            .json::<BrevoAccepted>()
            .map_err(|e| AppError::Deserialize(format!("brevo response: {e}")))?;

        Ok(accepted.message_id)
    }
}

impl MailSender for BrevoMailer {
    fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<String>, AppError> {
        let mut confirmations = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let payload = self.payload(recipient, subject, body);
            let id = self
                .retry
                .run("brevo email", || self.try_send_one(&payload))?;
            info!(to = %recipient, "Email sent");
            confirmations.push(id);
        }

        Ok(confirmations)
    }
}
