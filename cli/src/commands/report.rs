use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use folio_common::config::Config;
use folio_common::entity::{Company, Entity, FILE_NAME_FIELD};
use folio_common::translation::Translator;
use folio_core::report::{PdfDocumentService, TextReport};
use folio_core::security::StaticSecurityService;
use tracing::info_span;

use crate::commands::CompanyArgs;
use crate::terminal::print;

pub struct ReportArgs {
    pub file_name: String,
    pub title_key: Option<String>,
    pub heading: Option<String>,
    pub lines: Vec<String>,
    pub input: Option<PathBuf>,
    pub fields: Vec<(String, String)>,
    pub company: CompanyArgs,
}

pub fn report(args: ReportArgs, translator: Arc<dyn Translator>, cfg: &Config) -> anyhow::Result<()> {
    let span = info_span!("report", file = %args.file_name);
    let _guard = span.enter();

    let mut paragraphs = args.lines;
    if let Some(input) = &args.input {
        paragraphs.extend(read_paragraphs(input)?);
    }

    let mut body = TextReport::new(paragraphs);
    if let Some(title_key) = args.title_key {
        body = body.with_title_key(title_key);
    }
    if let Some(heading) = args.heading {
        body = body.with_heading(heading);
    }

    let mut entity = Entity::new().with_field(FILE_NAME_FIELD, args.file_name.as_str());
    for (name, value) in args.fields {
        entity.set_field(name, value);
    }

    let security = Arc::new(StaticSecurityService::new(cfg.current_user.clone()));
    let service = PdfDocumentService::new(translator, security, cfg.report_dir.clone(), Box::new(body));
    let path = service
        .generate(&entity, &company(args.company), &cfg.default_locale)
        .with_context(|| format!("generating report '{}'", args.file_name))?;

    print::header("report ready");
    print::aligned_line("Title", service.report_title(&cfg.default_locale));
    print::aligned_line("File", path.display().to_string());
    Ok(())
}

fn read_paragraphs(path: &Path) -> anyhow::Result<Vec<String>> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(source
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn company(args: CompanyArgs) -> Company {
    Company {
        name: args.name,
        street: args.street,
        house: args.house,
        flat: None,
        zip_code: args.zip_code,
        city: args.city,
        phone: args.phone,
        email: args.email,
        www: args.www,
    }
}
