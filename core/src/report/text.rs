use folio_common::entity::{Entity, FILE_NAME_FIELD};
use folio_common::locale::Locale;

use crate::report::document::{LayoutError, ReportDocument};
use crate::report::service::ReportBody;

pub const TEXT_REPORT_TITLE: &str = "report.text.title";

/// Plain report: the entity's fields as a key/value list followed by free text paragraphs.
pub struct TextReport {
    title_key: String,
    heading: Option<String>,
    paragraphs: Vec<String>,
}

impl TextReport {
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self {
            title_key: TEXT_REPORT_TITLE.to_string(),
            heading: None,
            paragraphs,
        }
    }

    pub fn with_title_key(mut self, title_key: impl Into<String>) -> Self {
        self.title_key = title_key.into();
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

impl ReportBody for TextReport {
    fn title_key(&self) -> &str {
        &self.title_key
    }

    fn build_content(&self, document: &mut ReportDocument, entity: &Entity, _locale: &Locale) -> Result<(), LayoutError> {
        if let Some(heading) = &self.heading {
            document.add_title(heading)?;
        }

        let mut fields = entity.fields().filter(|(name, _)| *name != FILE_NAME_FIELD).peekable();
        if fields.peek().is_some() {
            for (name, value) in fields {
                document.add_key_value(name, value)?;
            }
            document.add_rule()?;
        }

        for paragraph in &self.paragraphs {
            document.add_paragraph(paragraph)?;
        }
        Ok(())
    }
}
