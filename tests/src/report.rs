#![cfg(test)]
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use folio_common::entity::{Company, Entity, FILE_NAME_FIELD};
use folio_common::locale::Locale;
use folio_core::report::{Clock, LayoutError, Margins, PageSize, PdfDocumentService, ReportBody, ReportDocument, ReportError};
use folio_core::security::StaticSecurityService;
use folio_core::translations::MessageBundleTranslator;
use lopdf::content::Content;
use lopdf::{Document, Object};

fn fixed_clock() -> Clock {
    Box::new(|| NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 9).unwrap())
}

struct OrderLines(usize);

impl ReportBody for OrderLines {
    fn title_key(&self) -> &str {
        "orders.title"
    }

    fn build_content(&self, document: &mut ReportDocument, entity: &Entity, _: &Locale) -> Result<(), LayoutError> {
        document.add_title(entity.get_field("number").unwrap_or("?"))?;
        let rows: Vec<Vec<String>> = (1..=self.0)
            .map(|i| vec![i.to_string(), format!("Product {i}"), format!("{}", i * 3)])
            .collect();
        document.add_table(&["No", "Product", "Quantity"], &rows)
    }
}

struct FailingBody;

impl ReportBody for FailingBody {
    fn title_key(&self) -> &str {
        "orders.title"
    }

    fn build_content(&self, document: &mut ReportDocument, _: &Entity, _: &Locale) -> Result<(), LayoutError> {
        document.add_paragraph("before failure")?;
        document.add_table(&["a", "b"], &[vec!["only one".to_string()]])
    }
}

fn translator() -> Arc<MessageBundleTranslator> {
    let mut translator = MessageBundleTranslator::built_in();
    let pl: Locale = "pl".parse().unwrap();
    translator.insert(None, "orders.title", "Orders");
    translator.insert(Some(&pl), "orders.title", "Zamowienia");
    translator.insert(Some(&pl), "report.commons.page.label", "Strona");
    translator.insert(Some(&pl), "report.commons.of.label", "z");
    translator.insert(Some(&pl), "report.commons.endOfPrint.label", "Koniec wydruku");
    Arc::new(translator)
}

fn service(dir: &Path, body: Box<dyn ReportBody>) -> PdfDocumentService {
    PdfDocumentService::new(translator(), Arc::new(StaticSecurityService::new("Jan Kowalski")), dir, body)
        .with_clock(fixed_clock())
}

fn order(file_name: &str) -> Entity {
    Entity::new()
        .with_field(FILE_NAME_FIELD, file_name)
        .with_field("number", "ORD-1")
}

fn company() -> Company {
    Company {
        city: Some("Warsaw".into()),
        ..Company::new("Acme").with_phone("+48 22 123")
    }
}

/// Text shown on each page, in drawing order.
fn page_texts(path: &Path) -> Vec<Vec<String>> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

#[test]
fn stamps_every_page_with_final_page_count() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(tmp.path(), Box::new(OrderLines(150)));

    let path = service.generate(&order("orders"), &company(), &Locale::default()).unwrap();

    let pages = page_texts(&path);
    assert!(pages.len() > 1, "expected a multi page report");
    let total = pages.len();
    for (idx, texts) in pages.iter().enumerate() {
        let expected = format!("Page {} of {}", idx + 1, total);
        assert!(texts.contains(&expected), "page {} lacks '{}'", idx + 1, expected);
        assert!(texts.contains(&"Acme".to_string()));
        assert!(texts.contains(&"Phone: +48 22 123".to_string()));
        assert!(texts.contains(&"Generated by Jan Kowalski".to_string()));
    }
    assert!(pages[total - 1].contains(&"End of print".to_string()));
    assert!(!pages[0].contains(&"End of print".to_string()));
}

#[test]
fn translates_decorations_for_locale() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(tmp.path(), Box::new(OrderLines(3)));
    let pl: Locale = "pl".parse().unwrap();

    let path = service.generate(&order("zamowienia"), &company(), &pl).unwrap();

    let pages = page_texts(&path);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].contains(&"Strona 1 z 1".to_string()));
    assert!(pages[0].contains(&"Koniec wydruku".to_string()));

    let doc = Document::load(&path).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let title = doc.get_dictionary(info_id).unwrap().get(b"Title").unwrap().as_str().unwrap();
    assert_eq!(title, b"Zamowienia");
}

#[test]
fn two_file_names_give_two_identical_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(tmp.path(), Box::new(OrderLines(5)));

    let first = service.generate(&order("first"), &company(), &Locale::default()).unwrap();
    let second = service.generate(&order("second"), &company(), &Locale::default()).unwrap();

    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
    assert_eq!(page_texts(&first), page_texts(&second));
}

#[test]
fn layout_error_is_returned_after_cleanup() {
    let tmp = tempfile::tempdir().unwrap();
    let service = service(tmp.path(), Box::new(FailingBody));
    let mut document = ReportDocument::new(PageSize::A4, Margins::REPORT);

    let err = service
        .generate_into(&mut document, &order("failed"), &company(), &Locale::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::Layout(LayoutError::RowWidth { row: 0, expected: 2, actual: 1 })
    ));
    assert!(!document.is_open());
    assert!(!tmp.path().join("failed.pdf").exists());
}

#[test]
fn creates_missing_directories_and_tolerates_existing_ones() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("reports").join("2024");
    let service = service(&dir, Box::new(OrderLines(1)));

    let path = service.generate(&order("march/orders"), &company(), &Locale::default()).unwrap();
    assert_eq!(path, dir.join("march").join("orders.pdf"));
    assert!(path.exists());

    let again = service.generate(&order("march/orders-2"), &company(), &Locale::default()).unwrap();
    assert!(again.exists());
}
