pub mod report;
pub mod reset;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_common::config::Config;
use folio_common::locale::Locale;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Report rendering and password reset tooling.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Treat this deployment as a demo environment (disables password resets)
    #[arg(long, global = true, env = "FOLIO_DEMO")]
    pub demo: bool,

    /// Directory reports are written into
    #[arg(long, global = true, env = "FOLIO_REPORT_DIR", default_value = "reports")]
    pub report_dir: PathBuf,

    /// Directory with messages*.properties bundles
    #[arg(long, global = true, env = "FOLIO_MESSAGES_DIR")]
    pub messages_dir: Option<PathBuf>,

    /// Locale used for translated texts, e.g. "en" or "pl"
    #[arg(long, global = true, env = "FOLIO_LOCALE", default_value = "en")]
    pub locale: Locale,

    /// File of login=email lines
    #[arg(long, global = true, env = "FOLIO_USERS")]
    pub users: Option<PathBuf>,

    /// Sender address of outgoing mail
    #[arg(long, global = true, env = "FOLIO_MAIL_FROM")]
    pub mail_from: Option<String>,

    /// Name stamped onto reports as their author
    #[arg(long, global = true, env = "FOLIO_USER", default_value = "anonymous")]
    pub user: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a plain text report to PDF
    #[command(alias = "r")]
    Report {
        /// Output file name without extension, relative to the report directory
        file_name: String,
        /// Message key of the report title
        #[arg(long)]
        title_key: Option<String>,
        /// Heading printed above the body
        #[arg(long)]
        heading: Option<String>,
        /// Body paragraph, may be repeated
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Read body paragraphs from a file, one per line
        #[arg(long)]
        input: Option<PathBuf>,
        /// Entity field as name=value, may be repeated
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[command(flatten)]
        company: CompanyArgs,
    },
    /// Show which view the "forgot password" page resolves to
    #[command(alias = "f")]
    ForgotForm {
        #[arg(long)]
        iframe: bool,
        #[arg(long)]
        popup: bool,
    },
    /// Generate and mail a new password for a login
    #[command(alias = "p")]
    ResetPassword { login: Option<String> },
}

#[derive(clap::Args)]
pub struct CompanyArgs {
    #[arg(long = "company-name", default_value = "")]
    pub name: String,
    #[arg(long = "company-street")]
    pub street: Option<String>,
    #[arg(long = "company-house")]
    pub house: Option<String>,
    #[arg(long = "company-zip-code")]
    pub zip_code: Option<String>,
    #[arg(long = "company-city")]
    pub city: Option<String>,
    #[arg(long = "company-phone")]
    pub phone: Option<String>,
    #[arg(long = "company-email")]
    pub email: Option<String>,
    #[arg(long = "company-www")]
    pub www: Option<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            demo_environment: self.demo,
            report_dir: self.report_dir.clone(),
            messages_dir: self.messages_dir.clone(),
            default_locale: self.locale.clone(),
            users_file: self.users.clone(),
            mail_from: self.mail_from.clone(),
            current_user: self.user.clone(),
        }
    }
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid field '{s}', expected name=value"))?;
    if name.trim().is_empty() {
        return Err(format!("invalid field '{s}', name is empty"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}
