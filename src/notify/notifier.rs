use super::{Channel, MailSender, MessageSender, SentLog};
use crate::errors::AppError;
use tracing::{info, warn};

/// What happened to one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Provider confirmation ids (one for texts, one per recipient for email).
    Sent(Vec<String>),
    /// Already delivered earlier; nothing was sent.
    Duplicate,
    /// Email with an empty recipient list; nothing was sent or recorded.
    NoRecipients,
}

#[derive(Debug, Clone)]
pub struct PhoneNumbers {
    /// Twilio number SMS are sent from.
    pub sms_from: String,
    /// Twilio number WhatsApp messages are sent from.
    pub whatsapp_from: String,
    /// Verified number that receives the alerts.
    pub to: String,
}

/// Sends alerts over SMS, WhatsApp and email, never repeating a body
/// the sent-log already knows about.
pub struct Notifier {
    texts: Option<Box<dyn MessageSender>>,
    mail: Option<Box<dyn MailSender>>,
    numbers: PhoneNumbers,
    subject: String,
    sent: SentLog,
}

impl Notifier {
    /// A channel whose transport is `None` fails with a configuration error.
    pub fn new(
        texts: Option<Box<dyn MessageSender>>,
        mail: Option<Box<dyn MailSender>>,
        numbers: PhoneNumbers,
        subject: impl Into<String>,
        sent: SentLog,
    ) -> Self {
        Self {
            texts,
            mail,
            numbers,
            subject: subject.into(),
            sent,
        }
    }

    pub fn sent_log(&self) -> &SentLog {
        &self.sent
    }

    pub fn send_sms(&mut self, body: &str) -> Result<Delivery, AppError> {
        let (from, to) = (self.numbers.sms_from.clone(), self.numbers.to.clone());
        self.send_text(Channel::Sms, &from, &to, body)
    }

    pub fn send_whatsapp(&mut self, body: &str) -> Result<Delivery, AppError> {
        let from = format!("whatsapp:{}", self.numbers.whatsapp_from);
        let to = format!("whatsapp:{}", self.numbers.to);
        self.send_text(Channel::WhatsApp, &from, &to, body)
    }

    pub fn send_emails(&mut self, recipients: &[String], body: &str) -> Result<Delivery, AppError> {
        if self.sent.contains(Channel::Email, body)? {
            info!(channel = %Channel::Email, "duplicate, skipped");
            return Ok(Delivery::Duplicate);
        }
        if recipients.is_empty() {
            warn!(channel = %Channel::Email, "no recipients, email skipped");
            return Ok(Delivery::NoRecipients);
        }

        let mail = self
            .mail
            .as_ref()
            .ok_or_else(|| AppError::Config("email channel has no transport".into()))?;
        let confirmations = mail.send_mail(recipients, &self.subject, body)?;
        self.sent.record(Channel::Email, body)?;
        info!(
            channel = %Channel::Email,
            recipients = confirmations.len(),
            "Emails sent"
        );
        Ok(Delivery::Sent(confirmations))
    }

    /// Sends on whichever channel is asked for; email goes to `recipients`.
    pub fn send(
        &mut self,
        channel: Channel,
        recipients: &[String],
        body: &str,
    ) -> Result<Delivery, AppError> {
        match channel {
            Channel::Sms => self.send_sms(body),
            Channel::WhatsApp => self.send_whatsapp(body),
            Channel::Email => self.send_emails(recipients, body),
        }
    }

    fn send_text(
        &mut self,
        channel: Channel,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<Delivery, AppError> {
        if self.sent.contains(channel, body)? {
            info!(channel = %channel, "duplicate, skipped");
            return Ok(Delivery::Duplicate);
        }

        let texts = self
            .texts
            .as_ref()
            .ok_or_else(|| AppError::Config(format!("{channel} channel has no transport")))?;
        let sid = texts.send_message(from, to, body)?;
        self.sent.record(channel, body)?;
        info!(channel = %channel, sid = %sid, "Message sent");
        Ok(Delivery::Sent(vec![sid]))
    }
}
