//! Serializes laid-out pages into a PDF file with `lopdf`.
//!
//! Text uses the standard Helvetica fonts; no fonts are embedded. The font
//! encoding is `WinAnsiEncoding` extended with the Polish letters it lacks,
//! which are placed on the unused control codes through a `Differences` array.
//! Any other character outside that set is drawn as `?`.

use std::io::Write;

use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::report::document::{Element, Font, Metadata, Page, PageSize};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!("folio ", env!("CARGO_PKG_VERSION"));
const RULE_GRAY: f32 = 0.6;

/// First font code taken by [`EXTRA_GLYPHS`].
const FIRST_EXTRA_CODE: u8 = 1;

/// Letters missing from `WinAnsiEncoding`, with their standard glyph names.
const EXTRA_GLYPHS: [(char, &str); 16] = [
    ('Ą', "Aogonek"),
    ('ą', "aogonek"),
    ('Ć', "Cacute"),
    ('ć', "cacute"),
    ('Ę', "Eogonek"),
    ('ę', "eogonek"),
    ('Ł', "Lslash"),
    ('ł', "lslash"),
    ('Ń', "Nacute"),
    ('ń', "nacute"),
    ('Ś', "Sacute"),
    ('ś', "sacute"),
    ('Ź', "Zacute"),
    ('ź', "zacute"),
    ('Ż', "Zdotaccent"),
    ('ż', "zdotaccent"),
];

pub fn write_pdf<W: Write>(
    pages: &[Page],
    page_size: PageSize,
    metadata: &Metadata,
    out: &mut W,
) -> Result<(), lopdf::Error> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let encoding_id = doc.add_object(encoding_dictionary());
    let regular_id = doc.add_object(font_dictionary("Helvetica", encoding_id));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold", encoding_id));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), page_size.width.into(), page_size.height.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = info_dictionary(&mut doc, metadata);
    doc.trailer.set("Info", info_id);

    doc.save_to(out)?;
    Ok(())
}

fn font_dictionary(base_font: &str, encoding_id: ObjectId) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => encoding_id,
    }
}

fn encoding_dictionary() -> lopdf::Dictionary {
    let mut differences: Vec<Object> = vec![i64::from(FIRST_EXTRA_CODE).into()];
    differences.extend(EXTRA_GLYPHS.iter().map(|(_, glyph)| Object::Name(glyph.as_bytes().to_vec())));
    dictionary! {
        "Type" => "Encoding",
        "BaseEncoding" => "WinAnsiEncoding",
        "Differences" => differences,
    }
}

fn info_dictionary(doc: &mut Document, metadata: &Metadata) -> ObjectId {
    let mut info = dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
    };
    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            info.set(key, text_string(value));
        }
    }
    if let Some(created_at) = metadata.created_at {
        info.set("CreationDate", Object::string_literal(pdf_date(created_at)));
    }
    doc.add_object(info)
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut operations = Vec::new();
    for element in &page.elements {
        match element {
            Element::Text { x, y, size, font, text } => {
                let font_name = match font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec![font_name.into(), (*size).into()]));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(encode_text(text))]));
                operations.push(Operation::new("ET", vec![]));
            }
            Element::Line { from, to } => {
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new("G", vec![RULE_GRAY.into()]));
                operations.push(Operation::new("w", vec![0.5_f32.into()]));
                operations.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
                operations.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
                operations.push(Operation::new("S", vec![]));
                operations.push(Operation::new("Q", vec![]));
            }
        }
    }
    operations
}

/// Maps text onto the single-byte font encoding written by [`encoding_dictionary`].
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if let Some(idx) = EXTRA_GLYPHS.iter().position(|(letter, _)| *letter == c) {
                return FIRST_EXTRA_CODE + idx as u8;
            }
            match c {
                '€' => 0x80,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                _ => match u32::from(c) {
                    code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
                    _ => b'?',
                },
            }
        })
        .collect()
}

/// Info dictionary string: Latin-1 when possible, UTF-16BE with a byte order mark otherwise.
fn text_string(value: &str) -> Object {
    if value.chars().all(|c| matches!(u32::from(c), 0x20..=0x7E | 0xA0..=0xFF)) {
        return Object::string_literal(value.chars().map(|c| u32::from(c) as u8).collect::<Vec<u8>>());
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend(unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn pdf_date(at: NaiveDateTime) -> String {
    format!("D:{}", at.format("%Y%m%d%H%M%S"))
}
