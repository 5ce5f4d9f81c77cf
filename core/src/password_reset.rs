//! # Password Reset
//!
//! The "forgot password" flow: a form view selector and a submit handler.
//!
//! A submission is trimmed and checked for blankness, then handed to the
//! [`PasswordReminderService`] exactly once. The service's outcome is reduced
//! to a [`ResetOutcome`] code for the client.
//!
//! In a demo deployment the flow is switched off entirely: the form redirects
//! to the main view and submissions yield no outcome, without the reminder
//! ever being called.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use folio_common::locale::Locale;
use folio_common::reminder::{PasswordReminderService, ReminderError};
use folio_common::translation::Translator;
use tracing::{debug, error};

pub const MAIN_VIEW: &str = "main.html";
pub const FORM_VIEW: &str = "forgotPassword";

const FORM_LABELS: &[&str] = &[
    "security.form.header.forgotPassword",
    "security.form.label.login",
    "security.form.button.submit",
    "security.form.button.back",
];
const OUTCOME_MESSAGE_PREFIX: &str = "security.message.forgotPassword.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetOutcome {
    Success,
    UserNotFound,
    LoginIsBlank,
    InvalidMailConfig,
    InvalidMailAddress,
    Error,
}

impl ResetOutcome {
    pub const ALL: [ResetOutcome; 6] = [
        ResetOutcome::Success,
        ResetOutcome::UserNotFound,
        ResetOutcome::LoginIsBlank,
        ResetOutcome::InvalidMailConfig,
        ResetOutcome::InvalidMailAddress,
        ResetOutcome::Error,
    ];

    /// Code sent back to the client.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetOutcome::Success => "success",
            ResetOutcome::UserNotFound => "userNotFound",
            ResetOutcome::LoginIsBlank => "loginIsBlank",
            ResetOutcome::InvalidMailConfig => "invalidMailConfig",
            ResetOutcome::InvalidMailAddress => "invalidMailAddress",
            ResetOutcome::Error => "error",
        }
    }
}

impl fmt::Display for ResetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormView {
    Form {
        view_name: String,
        iframe: bool,
        popup: bool,
        locale: Locale,
        translations: BTreeMap<String, String>,
    },
    Redirect {
        url: String,
    },
}

pub struct PasswordResetController {
    reminder: Arc<dyn PasswordReminderService>,
    translator: Arc<dyn Translator>,
    demo_environment: bool,
}

impl PasswordResetController {
    pub fn new(
        reminder: Arc<dyn PasswordReminderService>,
        translator: Arc<dyn Translator>,
        demo_environment: bool,
    ) -> Self {
        Self {
            reminder,
            translator,
            demo_environment,
        }
    }

    /// Selects the view for the "forgot password" page.
    pub fn forgot_password_form_view(&self, iframe: bool, popup: bool, locale: &Locale) -> FormView {
        if self.demo_environment {
            return FormView::Redirect {
                url: MAIN_VIEW.to_string(),
            };
        }

        let outcome_keys = ResetOutcome::ALL
            .iter()
            .map(|outcome| format!("{OUTCOME_MESSAGE_PREFIX}{outcome}"));
        let translations = FORM_LABELS
            .iter()
            .map(|key| key.to_string())
            .chain(outcome_keys)
            .map(|key| {
                let text = self.translator.translate(&key, locale);
                (key, text)
            })
            .collect();

        FormView::Form {
            view_name: FORM_VIEW.to_string(),
            iframe,
            popup,
            locale: locale.clone(),
            translations,
        }
    }

    /// Handles a submitted login. Returns `None` in a demo environment.
    pub async fn process_forgot_password(&self, login: Option<&str>) -> Option<ResetOutcome> {
        if self.demo_environment {
            return None;
        }

        let Some(login) = login.filter(|login| !login.trim().is_empty()) else {
            return Some(ResetOutcome::LoginIsBlank);
        };

        let outcome = match self.reminder.generate_and_send_new_password(login).await {
            Ok(()) => ResetOutcome::Success,
            Err(ReminderError::UserNotFound(_)) => ResetOutcome::UserNotFound,
            Err(ReminderError::MailConfiguration(_)) => ResetOutcome::InvalidMailConfig,
            Err(ReminderError::InvalidMailAddress(_)) => ResetOutcome::InvalidMailAddress,
            Err(err) => {
                error!("Unexpected error while resetting password: {err:#}");
                ResetOutcome::Error
            }
        };
        debug!("Password reset finished with '{outcome}'");
        Some(outcome)
    }
}
