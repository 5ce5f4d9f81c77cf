#![cfg(test)]
use std::sync::{Arc, Mutex};

use folio_common::locale::Locale;
use folio_common::reminder::{PasswordReminderService, ReminderError};
use folio_core::password_reset::{FormView, PasswordResetController, ResetOutcome, MAIN_VIEW};
use folio_core::translations::MessageBundleTranslator;

const EXISTING_USER_NAME: &str = "admin";

#[derive(Clone, Copy)]
enum Failure {
    MailConfiguration,
    InvalidMailAddress,
    Unexpected,
}

/// Reminder that knows a single user and records every call.
#[derive(Default)]
struct RecordingReminder {
    calls: Mutex<Vec<String>>,
    failure: Option<Failure>,
}

impl RecordingReminder {
    fn failing_with(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PasswordReminderService for RecordingReminder {
    async fn generate_and_send_new_password(&self, login: &str) -> Result<(), ReminderError> {
        self.calls.lock().unwrap().push(login.to_string());
        match self.failure {
            Some(Failure::MailConfiguration) => Err(ReminderError::MailConfiguration("error".into())),
            Some(Failure::InvalidMailAddress) => Err(ReminderError::InvalidMailAddress("error".into())),
            Some(Failure::Unexpected) => Err(anyhow::anyhow!("database unavailable").into()),
            None if login == EXISTING_USER_NAME => Ok(()),
            None => Err(ReminderError::UserNotFound(login.to_string())),
        }
    }
}

fn controller(reminder: &Arc<RecordingReminder>, demo: bool) -> PasswordResetController {
    PasswordResetController::new(reminder.clone(), Arc::new(MessageBundleTranslator::built_in()), demo)
}

#[tokio::test]
async fn redirects_to_main_view_in_demo_environment() {
    let reminder = Arc::new(RecordingReminder::default());
    let controller = controller(&reminder, true);

    for (iframe, popup) in [(false, false), (true, false), (false, true), (true, true)] {
        let view = controller.forgot_password_form_view(iframe, popup, &Locale::default());
        assert_eq!(view, FormView::Redirect { url: MAIN_VIEW.to_string() });
    }
    assert_eq!(MAIN_VIEW, "main.html");
    assert!(reminder.calls().is_empty());
}

#[tokio::test]
async fn returns_success_for_existing_user() {
    let reminder = Arc::new(RecordingReminder::default());
    let controller = controller(&reminder, false);

    let result = controller.process_forgot_password(Some(EXISTING_USER_NAME)).await;

    assert_eq!(result, Some(ResetOutcome::Success));
    assert_eq!(result.unwrap().as_str(), "success");
    assert_eq!(reminder.calls(), vec![EXISTING_USER_NAME.to_string()]);
}

#[tokio::test]
async fn returns_nothing_in_demo_environment() {
    let reminder = Arc::new(RecordingReminder::default());
    let controller = controller(&reminder, true);

    for login in [Some(EXISTING_USER_NAME), Some("someone"), Some(""), None] {
        assert_eq!(controller.process_forgot_password(login).await, None);
    }
    assert!(reminder.calls().is_empty());
}

#[tokio::test]
async fn returns_user_not_found_for_unknown_login() {
    let reminder = Arc::new(RecordingReminder::default());
    let controller = controller(&reminder, false);

    let result = controller.process_forgot_password(Some("userThatDoesNotExists")).await;

    assert_eq!(result, Some(ResetOutcome::UserNotFound));
    assert_eq!(reminder.calls().len(), 1);
}

#[tokio::test]
async fn returns_login_is_blank_without_calling_reminder() {
    let reminder = Arc::new(RecordingReminder::default());
    let controller = controller(&reminder, false);

    for login in [None, Some(""), Some("   ")] {
        let result = controller.process_forgot_password(login).await;
        assert_eq!(result.map(|r| r.as_str()), Some("loginIsBlank"));
    }
    assert!(reminder.calls().is_empty());
}

#[tokio::test]
async fn maps_reminder_failures_onto_codes() {
    let cases = [
        (Failure::MailConfiguration, "invalidMailConfig"),
        (Failure::InvalidMailAddress, "invalidMailAddress"),
        (Failure::Unexpected, "error"),
    ];
    for (failure, code) in cases {
        let reminder = Arc::new(RecordingReminder::failing_with(failure));
        let controller = controller(&reminder, false);

        let result = controller.process_forgot_password(Some(EXISTING_USER_NAME)).await;

        assert_eq!(result.map(|r| r.as_str()), Some(code));
        assert_eq!(reminder.calls().len(), 1);
    }
}
