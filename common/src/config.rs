use std::path::PathBuf;

use crate::locale::Locale;

pub struct Config {
    /// Marks the deployment as a demo environment.
    ///
    /// Disables real credential changes: the password reset form redirects to
    /// the main view and submissions are ignored.
    pub demo_environment: bool,
    /// Directory generated reports are written into.
    pub report_dir: PathBuf,
    /// Directory holding `messages*.properties` bundles.
    pub messages_dir: Option<PathBuf>,
    pub default_locale: Locale,
    /// File of `login=email` lines backing the user directory.
    pub users_file: Option<PathBuf>,
    /// Sender address for outgoing mail. Mail delivery is misconfigured without it.
    pub mail_from: Option<String>,
    /// Display name of the authenticated user stamped onto reports.
    pub current_user: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_environment: false,
            report_dir: PathBuf::from("reports"),
            messages_dir: None,
            default_locale: Locale::default(),
            users_file: None,
            mail_from: None,
            current_user: String::from("anonymous"),
        }
    }
}
