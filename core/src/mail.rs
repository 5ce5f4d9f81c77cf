use folio_common::mail::{is_valid_address, MailError, MailMessage, Mailer};
use tracing::info;

/// Mailer that records deliveries in the log instead of talking to a mail server.
pub struct LogMailer {
    from: Option<String>,
}

impl LogMailer {
    pub fn new(from: Option<String>) -> Self {
        Self { from }
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let from = self
            .from
            .as_deref()
            .ok_or_else(|| MailError::Configuration("no sender address configured".to_string()))?;
        if !is_valid_address(from) {
            return Err(MailError::Configuration(format!("sender address '{from}' is invalid")));
        }
        if !is_valid_address(&message.to) {
            return Err(MailError::InvalidAddress(message.to));
        }
        info!("Mail from {} to {}: {}", from, message.to, message.subject);
        Ok(())
    }
}
