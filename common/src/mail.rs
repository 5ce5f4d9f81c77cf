use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail is not configured: {0}")]
    Configuration(String),
    #[error("invalid mail address '{0}'")]
    InvalidAddress(String),
    #[error("mail delivery failed")]
    Delivery(#[source] anyhow::Error),
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Loose syntactic check of a mail address: one `@`, a non-empty local part
/// and a dotted domain without whitespace.
pub fn is_valid_address(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !address.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}
