use super::{MailSender, MessageSender};
use crate::errors::AppError;
use tracing::info;

/// Logs what would have been sent instead of calling a provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSender;

impl MessageSender for DryRunSender {
    fn send_message(&self, from: &str, to: &str, body: &str) -> Result<String, AppError> {
        info!(from, to, "[dry-run] message: {body}");
        Ok("dry-run".to_string())
    }
}

impl MailSender for DryRunSender {
    fn send_mail(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Vec<String>, AppError> {
        for to in recipients {
            info!(to = %to, subject, "[dry-run] email: {body}");
        }
        Ok(recipients.iter().map(|_| "dry-run".to_string()).collect())
    }
}
