use chrono::NaiveDateTime;
use folio_common::entity::Company;

use crate::report::document::{text_width, Element, Font, Margins, Page, PageSize};

const DECORATION_SIZE: f32 = 8.0;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header and footer stamped onto every page once the page count is final.
///
/// Header: company name and address on the left, author and generation time
/// on the right. Footer: company phone and contact on the left, `Page N of M`
/// on the right.
pub struct PageNumbering {
    pub page_label: String,
    pub of_label: String,
    pub phone_label: String,
    pub company: Company,
    pub generated_by_label: String,
    pub user_name: String,
    pub generated_at: NaiveDateTime,
}

impl PageNumbering {
    pub fn page_of(&self, number: usize, total: usize) -> String {
        format!("{} {} {} {}", self.page_label, number, self.of_label, total)
    }

    pub fn generated_by(&self) -> String {
        format!("{} {}", self.generated_by_label, self.user_name)
    }

    pub fn timestamp(&self) -> String {
        self.generated_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn phone(&self) -> Option<String> {
        self.company
            .phone
            .as_deref()
            .map(|phone| format!("{}: {}", self.phone_label, phone))
    }

    pub fn decorate_all(&self, pages: &mut [Page], page_size: PageSize, margins: Margins) {
        let total = pages.len();
        for (idx, page) in pages.iter_mut().enumerate() {
            self.decorate(page, idx + 1, total, page_size, margins);
        }
    }

    pub fn decorate(&self, page: &mut Page, number: usize, total: usize, page_size: PageSize, margins: Margins) {
        let left = margins.left;
        let right = page_size.width - margins.right;
        let line_height = DECORATION_SIZE * 1.4;

        // header sits inside the top margin, footer inside the bottom one
        let header_y = page_size.height - margins.top + 8.0 + line_height;
        let footer_y = margins.bottom - 10.0 - DECORATION_SIZE;

        let mut stamps: Vec<Element> = Vec::new();

        stamps.push(text_at(left, header_y, Font::Bold, &self.company.name));
        stamps.push(right_aligned(right, header_y, Font::Regular, &self.generated_by()));
        if let Some(address) = self.company.address_line() {
            stamps.push(text_at(left, header_y - line_height, Font::Regular, &address));
        }
        stamps.push(right_aligned(right, header_y - line_height, Font::Regular, &self.timestamp()));
        stamps.push(Element::Line {
            from: (left, header_y - line_height - 4.0),
            to: (right, header_y - line_height - 4.0),
        });

        stamps.push(Element::Line {
            from: (left, margins.bottom - 6.0),
            to: (right, margins.bottom - 6.0),
        });
        if let Some(phone) = self.phone() {
            stamps.push(text_at(left, footer_y, Font::Regular, &phone));
        }
        if let Some(contact) = self.company.contact_line() {
            stamps.push(text_at(left, footer_y - line_height, Font::Regular, &contact));
        }
        stamps.push(right_aligned(right, footer_y, Font::Regular, &self.page_of(number, total)));

        page.elements.extend(stamps.into_iter().filter(|stamp| match stamp {
            Element::Text { text, .. } => !text.is_empty(),
            Element::Line { .. } => true,
        }));
    }
}

fn text_at(x: f32, y: f32, font: Font, text: &str) -> Element {
    Element::Text {
        x,
        y,
        size: DECORATION_SIZE,
        font,
        text: text.to_string(),
    }
}

fn right_aligned(right: f32, y: f32, font: Font, text: &str) -> Element {
    let x = right - text_width(text, DECORATION_SIZE, font);
    text_at(x, y, font, text)
}
