mod commands;
mod terminal;

use std::sync::Arc;

use anyhow::Context;
use commands::{CommandLine, Commands, report, reset};
use folio_common::config::Config;
use folio_common::translation::Translator;
use folio_core::translations::MessageBundleTranslator;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg: Config = commands.config();
    let translator: Arc<dyn Translator> = Arc::new(load_translator(&cfg)?);

    match commands.command {
        Commands::Report {
            file_name,
            title_key,
            heading,
            lines,
            input,
            fields,
            company,
        } => {
            print::header("generating report");
            let args = report::ReportArgs {
                file_name,
                title_key,
                heading,
                lines,
                input,
                fields,
                company,
            };
            // rendering does blocking file IO
            tokio::task::spawn_blocking(move || report::report(args, translator, &cfg)).await?
        }
        Commands::ForgotForm { iframe, popup } => {
            let controller = reset::controller(translator, &cfg)?;
            reset::forgot_form(&controller, iframe, popup, &cfg);
            Ok(())
        }
        Commands::ResetPassword { login } => {
            print::header("password reset");
            let controller = reset::controller(translator, &cfg)?;
            reset::reset_password(&controller, login.as_deref()).await
        }
    }
}

fn load_translator(cfg: &Config) -> anyhow::Result<MessageBundleTranslator> {
    match &cfg.messages_dir {
        Some(dir) => MessageBundleTranslator::from_dir(dir).context("loading message bundles"),
        None => Ok(MessageBundleTranslator::built_in()),
    }
}
