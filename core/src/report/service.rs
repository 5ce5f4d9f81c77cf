use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use folio_common::entity::{Company, Entity, FILE_NAME_FIELD};
use folio_common::locale::Locale;
use folio_common::security::SecurityService;
use folio_common::translation::Translator;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::report::document::{LayoutError, Margins, PageSize, ReportDocument};
use crate::report::numbering::PageNumbering;
use crate::report::pdf;

pub const REPORT_EXTENSION: &str = "pdf";

pub const PAGE_LABEL: &str = "report.commons.page.label";
pub const OF_LABEL: &str = "report.commons.of.label";
pub const PHONE_LABEL: &str = "basic.company.phone.label";
pub const GENERATED_BY_LABEL: &str = "report.commons.generatedBy.label";
pub const END_OF_PRINT_LABEL: &str = "report.commons.endOfPrint.label";

const AUTHOR: &str = "folio";
const SUBJECT: &str = "Generated report";
const KEYWORDS: &str = "report, pdf";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("entity has no '{}' field", FILE_NAME_FIELD)]
    MissingFileName,
    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("failed to write PDF")]
    Pdf(#[from] lopdf::Error),
}

/// A report variant: supplies the title and fills the document body.
pub trait ReportBody: Send + Sync {
    /// Message key of the report title.
    fn title_key(&self) -> &str;

    fn build_content(&self, document: &mut ReportDocument, entity: &Entity, locale: &Locale) -> Result<(), LayoutError>;
}

pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Renders one report variant into PDF files.
///
/// Every page gets a header and footer with company details, the current
/// user and `Page N of M`; the body comes from the [`ReportBody`].
pub struct PdfDocumentService {
    translator: Arc<dyn Translator>,
    security: Arc<dyn SecurityService>,
    report_dir: PathBuf,
    body: Box<dyn ReportBody>,
    clock: Clock,
}

impl PdfDocumentService {
    pub fn new(
        translator: Arc<dyn Translator>,
        security: Arc<dyn SecurityService>,
        report_dir: impl Into<PathBuf>,
        body: Box<dyn ReportBody>,
    ) -> Self {
        Self {
            translator,
            security,
            report_dir: report_dir.into(),
            body,
            clock: Box::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Replaces the source of the generation timestamp.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Target path of the report for `file_name`. Relative names land in the report directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.report_dir.join(format!("{file_name}.{REPORT_EXTENSION}"))
    }

    pub fn report_title(&self, locale: &Locale) -> String {
        self.translator.translate(self.body.title_key(), locale)
    }

    /// Generates the report of `entity` and returns the path of the written file.
    pub fn generate(&self, entity: &Entity, company: &Company, locale: &Locale) -> Result<PathBuf, ReportError> {
        let mut document = ReportDocument::new(PageSize::A4, Margins::REPORT);
        self.generate_into(&mut document, entity, company, locale)
    }

    /// Same as [`generate`](Self::generate) over a caller supplied document.
    ///
    /// On failure the document is closed and the partially created file is
    /// removed before the error is returned.
    pub fn generate_into(
        &self,
        document: &mut ReportDocument,
        entity: &Entity,
        company: &Company,
        locale: &Locale,
    ) -> Result<PathBuf, ReportError> {
        let file_name = entity.file_name().ok_or(ReportError::MissingFileName)?;
        let path = self.output_path(file_name);

        self.ensure_report_directory_exists(&path)?;
        let file = File::create(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        match self.render(document, file, &path, entity, company, locale) {
            Ok(()) => {
                info!("Generated report {}", path.display());
                Ok(path)
            }
            Err(err) => {
                error!("Problem with generating document - {err}");
                document.close();
                discard_partial_output(&path);
                Err(err)
            }
        }
    }

    fn render(
        &self,
        document: &mut ReportDocument,
        file: File,
        path: &Path,
        entity: &Entity,
        company: &Company,
        locale: &Locale,
    ) -> Result<(), ReportError> {
        let generated_at = (self.clock)();
        let translate = |key: &str| self.translator.translate(key, locale);

        let numbering = PageNumbering {
            page_label: translate(PAGE_LABEL),
            of_label: translate(OF_LABEL),
            phone_label: translate(PHONE_LABEL),
            company: company.clone(),
            generated_by_label: translate(GENERATED_BY_LABEL),
            user_name: self.security.current_user_name(),
            generated_at,
        };

        document.set_margins(Margins::REPORT);
        self.build_metadata(document, locale, generated_at);

        document.open()?;
        self.body.build_content(document, entity, locale)?;
        document.add_end_of_document(&translate(END_OF_PRINT_LABEL))?;

        let page_size = document.page_size();
        let margins = document.margins();
        let metadata = document.metadata().clone();
        let mut pages = document.close();
        numbering.decorate_all(&mut pages, page_size, margins);

        let mut writer = BufWriter::new(file);
        pdf::write_pdf(&pages, page_size, &metadata, &mut writer)?;
        writer.flush().map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {} pages to {}", pages.len(), path.display());
        Ok(())
    }

    fn build_metadata(&self, document: &mut ReportDocument, locale: &Locale, generated_at: NaiveDateTime) {
        let metadata = document.metadata_mut();
        metadata.title = Some(self.report_title(locale));
        metadata.author = Some(AUTHOR.to_string());
        metadata.subject = Some(SUBJECT.to_string());
        metadata.keywords = Some(KEYWORDS.to_string());
        metadata.creator = Some(AUTHOR.to_string());
        metadata.created_at = Some(generated_at);
    }

    /// Creates the directory the report file lands in. For relative file
    /// names that covers the report directory itself.
    fn ensure_report_directory_exists(&self, path: &Path) -> Result<(), ReportError> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(());
        }
        debug!("Creating report directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })
    }
}

fn discard_partial_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Could not remove partial report {}: {}", path.display(), e);
        }
    }
}
