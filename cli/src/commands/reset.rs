use std::sync::Arc;

use anyhow::Context;
use colored::*;
use folio_common::config::Config;
use folio_common::translation::Translator;
use folio_common::users::UserDirectory;
use folio_core::mail::LogMailer;
use folio_core::password_reset::{FormView, PasswordResetController, ResetOutcome};
use folio_core::reminder::MailingReminderService;
use folio_core::users::InMemoryUserDirectory;

use crate::terminal::print;

pub fn controller(translator: Arc<dyn Translator>, cfg: &Config) -> anyhow::Result<PasswordResetController> {
    let users: Arc<dyn UserDirectory> = match &cfg.users_file {
        Some(path) => Arc::new(InMemoryUserDirectory::from_file(path).context("loading user directory")?),
        None => Arc::new(InMemoryUserDirectory::new()),
    };
    let mailer = Arc::new(LogMailer::new(cfg.mail_from.clone()));
    let reminder = Arc::new(MailingReminderService::new(users, mailer));
    Ok(PasswordResetController::new(reminder, translator, cfg.demo_environment))
}

pub fn forgot_form(controller: &PasswordResetController, iframe: bool, popup: bool, cfg: &Config) {
    match controller.forgot_password_form_view(iframe, popup, &cfg.default_locale) {
        FormView::Redirect { url } => {
            print::header("redirect");
            print::aligned_line("Location", url.yellow());
        }
        FormView::Form {
            view_name,
            iframe,
            popup,
            locale,
            translations,
        } => {
            print::header("forgot password form");
            print::aligned_line("View", view_name);
            print::aligned_line("Locale", locale.to_string());
            print::aligned_line("Iframe", iframe.to_string());
            print::aligned_line("Popup", popup.to_string());
            for (key, text) in translations {
                print::aligned_line(&key, text);
            }
        }
    }
}

pub async fn reset_password(controller: &PasswordResetController, login: Option<&str>) -> anyhow::Result<()> {
    let Some(outcome) = controller.process_forgot_password(login).await else {
        print::print_status("demo environment, password reset skipped");
        return Ok(());
    };

    let code = match outcome {
        ResetOutcome::Success => outcome.as_str().green().bold(),
        ResetOutcome::LoginIsBlank | ResetOutcome::UserNotFound => outcome.as_str().yellow().bold(),
        _ => outcome.as_str().red().bold(),
    };
    print::aligned_line("Result", code);
    Ok(())
}
