use thiserror::Error;

use crate::mail::MailError;

/// Failures of the password reminder.
///
/// The first three variants are expected outcomes of a reset request and map
/// one to one onto result codes. Everything else ends up in [`ReminderError::Other`].
#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("mail configuration error: {0}")]
    MailConfiguration(String),
    #[error("invalid mail address: {0}")]
    InvalidMailAddress(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<MailError> for ReminderError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Configuration(msg) => ReminderError::MailConfiguration(msg),
            MailError::InvalidAddress(address) => ReminderError::InvalidMailAddress(address),
            MailError::Delivery(source) => ReminderError::Other(source),
        }
    }
}

/// Defines the contract for regenerating a user's credentials.
#[async_trait::async_trait]
pub trait PasswordReminderService: Send + Sync {
    /// Generates a new password for `login` and mails it to the user.
    ///
    /// # Errors
    /// * [`ReminderError::UserNotFound`] - No account exists for `login`.
    /// * [`ReminderError::MailConfiguration`] - Outgoing mail is not set up.
    /// * [`ReminderError::InvalidMailAddress`] - The account's address cannot receive mail.
    async fn generate_and_send_new_password(&self, login: &str) -> Result<(), ReminderError>;
}
