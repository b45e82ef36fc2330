mod brevo;
mod dry_run;
mod notifier;
mod sent_log;
mod twilio;

pub use brevo::{BrevoConfig, BrevoMailer, DEFAULT_BASE_URL as BREVO_DEFAULT_URL};
pub use dry_run::DryRunSender;
pub use notifier::{Delivery, Notifier, PhoneNumbers};
pub use sent_log::{DedupScope, SentLog};
pub use twilio::{TwilioConfig, TwilioSender, DEFAULT_BASE_URL as TWILIO_DEFAULT_URL};

use crate::errors::AppError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Sms,
    WhatsApp,
    Email,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::WhatsApp => "whatsapp",
            Channel::Email => "email",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" => Ok(Channel::Sms),
            "whatsapp" => Ok(Channel::WhatsApp),
            "email" => Ok(Channel::Email),
            other => Err(AppError::Config(format!("unknown notification channel {other:?}"))),
        }
    }
}

/// Text transport (SMS and WhatsApp). Returns the provider's message id.
pub trait MessageSender {
    fn send_message(&self, from: &str, to: &str, body: &str) -> Result<String, AppError>;
}

/// Email transport. Returns one confirmation id per recipient, in order.
pub trait MailSender {
    fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<String>, AppError>;
}
