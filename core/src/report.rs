//! PDF report rendering.
//!
//! [`PdfDocumentService`] runs the fixed part of every report: output file,
//! metadata, page decoration and the end-of-document marker. The body is
//! supplied by a [`ReportBody`] implementation, one per report variant.
//!
//! Pages are laid out into a [`ReportDocument`] buffer first and decorated in
//! a second pass at close time, when the total page count is known.

pub mod document;
pub mod numbering;
pub mod pdf;
mod service;
pub mod text;

pub use document::{LayoutError, Margins, PageSize, ReportDocument};
pub use numbering::PageNumbering;
pub use service::{
    Clock, PdfDocumentService, ReportBody, ReportError, END_OF_PRINT_LABEL, GENERATED_BY_LABEL, OF_LABEL,
    PAGE_LABEL, PHONE_LABEL, REPORT_EXTENSION,
};
pub use text::TextReport;
