use std::sync::Arc;

use folio_common::mail::{is_valid_address, MailMessage, Mailer};
use folio_common::reminder::{PasswordReminderService, ReminderError};
use folio_common::users::UserDirectory;
use rand::distr::{Alphanumeric, SampleString};
use tracing::{debug, warn};

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;
const SUBJECT: &str = "Your new password";

/// Generates a random password, mails it to the address on file and stores it
/// in the [`UserDirectory`].
///
/// The password is stored only after the mail went out. When storing fails
/// after that, the user has been sent a password that does not work yet; the
/// failure is logged with `warn!` and reported as [`ReminderError::Other`].
pub struct MailingReminderService {
    users: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
    password_length: usize,
}

impl MailingReminderService {
    pub fn new(users: Arc<dyn UserDirectory>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users,
            mailer,
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }

    pub fn with_password_length(mut self, password_length: usize) -> Self {
        self.password_length = password_length;
        self
    }

    fn generate_password(&self) -> String {
        Alphanumeric.sample_string(&mut rand::rng(), self.password_length)
    }
}

#[async_trait::async_trait]
impl PasswordReminderService for MailingReminderService {
    async fn generate_and_send_new_password(&self, login: &str) -> Result<(), ReminderError> {
        let email = self
            .users
            .email_of(login)
            .ok_or_else(|| ReminderError::UserNotFound(login.to_string()))?;
        if !is_valid_address(&email) {
            return Err(ReminderError::InvalidMailAddress(email));
        }

        let password = self.generate_password();
        let message = MailMessage {
            to: email,
            subject: SUBJECT.to_string(),
            body: format!("Hello {login},\n\nyour new password is: {password}\n"),
        };

        // the stored password changes only once the mail went out
        self.mailer.send(message).await?;
        if let Err(err) = self.users.replace_password(login, &password) {
            warn!("Mailed a new password to {login} but could not store it: {err:#}");
            return Err(err.into());
        }
        debug!("Replaced password of {login}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::InMemoryUserDirectory;
    use folio_common::mail::MailError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<MailMessage>>,
        fail_with: Mutex<Option<MailError>>,
    }

    #[async_trait::async_trait]
    impl Mailer for Outbox {
        async fn send(&self, message: MailMessage) -> Result<(), MailError> {
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    fn service(outbox: Arc<Outbox>) -> (MailingReminderService, Arc<InMemoryUserDirectory>) {
        let users = Arc::new(
            InMemoryUserDirectory::new()
                .with_user("admin", "admin@example.com")
                .with_user("broken", "broken-address"),
        );
        (MailingReminderService::new(users.clone(), outbox).with_password_length(16), users)
    }

    #[tokio::test]
    async fn mails_new_password_to_user() {
        let outbox = Arc::new(Outbox::default());
        let (service, users) = service(outbox.clone());

        service.generate_and_send_new_password("admin").await.unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "admin@example.com");
        let password = sent[0].body.trim_end().rsplit(' ').next().unwrap();
        assert_eq!(password.len(), 16);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(users.has_password("admin"));
    }

    #[tokio::test]
    async fn unknown_login_is_user_not_found() {
        let outbox = Arc::new(Outbox::default());
        let (service, _) = service(outbox.clone());
        let err = service.generate_and_send_new_password("ghost").await.unwrap_err();
        assert!(matches!(err, ReminderError::UserNotFound(ref login) if login == "ghost"));
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_sending() {
        let outbox = Arc::new(Outbox::default());
        let (service, users) = service(outbox.clone());
        let err = service.generate_and_send_new_password("broken").await.unwrap_err();
        assert!(matches!(err, ReminderError::InvalidMailAddress(_)));
        assert!(outbox.sent.lock().unwrap().is_empty());
        assert!(!users.has_password("broken"));
    }

    #[tokio::test]
    async fn mail_failure_keeps_old_password() {
        let outbox = Arc::new(Outbox::default());
        *outbox.fail_with.lock().unwrap() = Some(MailError::Configuration("no smtp".into()));
        let (service, users) = service(outbox);
        let err = service.generate_and_send_new_password("admin").await.unwrap_err();
        assert!(matches!(err, ReminderError::MailConfiguration(_)));
        assert!(!users.has_password("admin"));
    }

    struct ReadOnlyUsers;

    impl UserDirectory for ReadOnlyUsers {
        fn email_of(&self, _login: &str) -> Option<String> {
            Some("admin@example.com".to_string())
        }

        fn replace_password(&self, _login: &str, _password: &str) -> anyhow::Result<()> {
            anyhow::bail!("directory is read-only")
        }
    }

    #[tokio::test]
    async fn store_failure_after_mailing_is_reported() {
        let outbox = Arc::new(Outbox::default());
        let service = MailingReminderService::new(Arc::new(ReadOnlyUsers), outbox.clone());

        let err = service.generate_and_send_new_password("admin").await.unwrap_err();

        assert!(matches!(err, ReminderError::Other(ref e) if e.to_string() == "directory is read-only"));
        assert_eq!(outbox.sent.lock().unwrap().len(), 1);
    }
}
