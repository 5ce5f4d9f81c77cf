//! Buffered page layout.
//!
//! A [`ReportDocument`] lays text out into pages in memory. Nothing is drawn
//! while the body is being built, so the total page count is known when the
//! pages are decorated and serialized at close time.
//!
//! Coordinates are PDF points with the origin in the bottom-left corner.

use chrono::NaiveDateTime;
use thiserror::Error;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.0;
const LINE_SPACING: f32 = 1.4;
const PARAGRAPH_GAP: f32 = 6.0;
const KEY_COLUMN: f32 = 160.0;
const CELL_PADDING: f32 = 4.0;

/// Failure while composing document content.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("document is not open")]
    NotOpen,
    #[error("table must have at least one column")]
    EmptyTable,
    #[error("table row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Content(String),
}

impl LayoutError {
    pub fn content(msg: impl Into<String>) -> Self {
        LayoutError::Content(msg.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    /// Margins of every generated report.
    pub const REPORT: Margins = Margins {
        left: 40.0,
        right: 40.0,
        top: 60.0,
        bottom: 60.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        text: String,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Line { .. } => None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Created,
    Open,
    Closed,
}

pub struct ReportDocument {
    page_size: PageSize,
    margins: Margins,
    metadata: Metadata,
    state: State,
    pages: Vec<Page>,
    cursor_y: f32,
}

impl ReportDocument {
    pub fn new(page_size: PageSize, margins: Margins) -> Self {
        Self {
            page_size,
            margins,
            metadata: Metadata::default(),
            state: State::Created,
            pages: Vec::new(),
            cursor_y: page_size.height - margins.top,
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Width available for content between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_size.width - self.margins.left - self.margins.right
    }

    /// Opens the document and starts the first page.
    ///
    /// A closed document cannot be reopened.
    pub fn open(&mut self) -> Result<(), LayoutError> {
        match self.state {
            State::Open => Ok(()),
            State::Closed => Err(LayoutError::NotOpen),
            State::Created => {
                self.state = State::Open;
                self.start_page();
                Ok(())
            }
        }
    }

    /// Closes the document and hands out the buffered pages.
    ///
    /// Safe to call more than once; later calls return no pages.
    pub fn close(&mut self) -> Vec<Page> {
        self.state = State::Closed;
        std::mem::take(&mut self.pages)
    }

    pub fn add_title(&mut self, text: &str) -> Result<(), LayoutError> {
        self.add_wrapped(text, TITLE_SIZE, Font::Bold)?;
        self.add_spacer(PARAGRAPH_GAP * 2.0)
    }

    pub fn add_heading(&mut self, text: &str) -> Result<(), LayoutError> {
        self.add_spacer(PARAGRAPH_GAP)?;
        self.add_wrapped(text, HEADING_SIZE, Font::Bold)?;
        self.add_spacer(PARAGRAPH_GAP / 2.0)
    }

    pub fn add_paragraph(&mut self, text: &str) -> Result<(), LayoutError> {
        self.add_wrapped(text, BODY_SIZE, Font::Regular)?;
        self.add_spacer(PARAGRAPH_GAP)
    }

    /// Adds a bold label with its value in a second column. Both sides wrap
    /// inside their column.
    pub fn add_key_value(&mut self, key: &str, value: &str) -> Result<(), LayoutError> {
        self.ensure_open()?;
        let x = self.margins.left;
        let key_lines = wrap(key, BODY_SIZE, Font::Bold, KEY_COLUMN - CELL_PADDING);
        let value_lines = wrap(value, BODY_SIZE, Font::Regular, self.content_width() - KEY_COLUMN);
        self.add_columns(&[(x, Font::Bold, key_lines), (x + KEY_COLUMN, Font::Regular, value_lines)]);
        Ok(())
    }

    /// Adds a table with equally wide columns. Cell text wraps inside its column.
    pub fn add_table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<(), LayoutError> {
        self.ensure_open()?;
        if header.is_empty() {
            return Err(LayoutError::EmptyTable);
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, cells)| cells.len() != header.len()) {
            return Err(LayoutError::RowWidth {
                row,
                expected: header.len(),
                actual: cells.len(),
            });
        }

        let column_width = self.content_width() / header.len() as f32;
        let header_cells: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
        self.add_table_row(&header_cells, column_width, Font::Bold);
        self.add_rule()?;
        for cells in rows {
            self.add_table_row(cells, column_width, Font::Regular);
        }
        self.add_spacer(PARAGRAPH_GAP)
    }

    pub fn add_spacer(&mut self, height: f32) -> Result<(), LayoutError> {
        self.ensure_open()?;
        self.cursor_y -= height;
        Ok(())
    }

    /// Draws a horizontal rule across the content area.
    pub fn add_rule(&mut self) -> Result<(), LayoutError> {
        self.ensure_open()?;
        self.ensure_space(PARAGRAPH_GAP);
        let y = self.cursor_y - PARAGRAPH_GAP / 2.0;
        let (left, right) = (self.margins.left, self.page_size.width - self.margins.right);
        self.current_page().elements.push(Element::Line {
            from: (left, y),
            to: (right, y),
        });
        self.cursor_y -= PARAGRAPH_GAP;
        Ok(())
    }

    /// Forces the following content onto a fresh page.
    pub fn new_page(&mut self) -> Result<(), LayoutError> {
        self.ensure_open()?;
        self.start_page();
        Ok(())
    }

    /// Closes the body with a rule and a centered end marker.
    pub fn add_end_of_document(&mut self, label: &str) -> Result<(), LayoutError> {
        self.ensure_open()?;
        self.add_spacer(PARAGRAPH_GAP)?;
        self.add_rule()?;
        let line_height = SMALL_SIZE * LINE_SPACING;
        self.ensure_space(line_height);
        let x = self.margins.left + (self.content_width() - text_width(label, SMALL_SIZE, Font::Regular)) / 2.0;
        self.push_text(x.max(self.margins.left), self.cursor_y - SMALL_SIZE, SMALL_SIZE, Font::Regular, label);
        self.cursor_y -= line_height;
        Ok(())
    }

    fn add_wrapped(&mut self, text: &str, size: f32, font: Font) -> Result<(), LayoutError> {
        self.ensure_open()?;
        let line_height = size * LINE_SPACING;
        for line in wrap(text, size, font, self.content_width()) {
            self.ensure_space(line_height);
            self.push_text(self.margins.left, self.cursor_y - size, size, font, &line);
            self.cursor_y -= line_height;
        }
        Ok(())
    }

    fn add_table_row(&mut self, cells: &[String], column_width: f32, font: Font) {
        let inner_width = column_width - 2.0 * CELL_PADDING;
        let columns: Vec<(f32, Font, Vec<String>)> = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let x = self.margins.left + column as f32 * column_width + CELL_PADDING;
                (x, font, wrap(cell, BODY_SIZE, font, inner_width))
            })
            .collect();
        let row_lines = columns.iter().map(|(_, _, lines)| lines.len()).max().unwrap_or(1);

        let row_height = BODY_SIZE * LINE_SPACING * row_lines as f32;
        if row_height <= self.page_size.height - self.margins.top - self.margins.bottom {
            self.ensure_space(row_height);
        }
        self.add_columns(&columns);
    }

    /// Lays out side by side blocks of lines. Each output line checks the
    /// remaining space, so every column continues on the next page together.
    fn add_columns(&mut self, columns: &[(f32, Font, Vec<String>)]) {
        let line_height = BODY_SIZE * LINE_SPACING;
        let line_count = columns.iter().map(|(_, _, lines)| lines.len()).max().unwrap_or(0);
        for i in 0..line_count {
            self.ensure_space(line_height);
            let y = self.cursor_y - BODY_SIZE;
            for (x, font, lines) in columns {
                if let Some(line) = lines.get(i) {
                    self.push_text(*x, y, BODY_SIZE, *font, line);
                }
            }
            self.cursor_y -= line_height;
        }
    }

    fn ensure_open(&self) -> Result<(), LayoutError> {
        if self.is_open() { Ok(()) } else { Err(LayoutError::NotOpen) }
    }

    /// Moves to a new page when `height` does not fit above the bottom margin.
    ///
    /// A block taller than a whole page is placed on the current page when it
    /// is still empty, so layout always makes progress.
    fn ensure_space(&mut self, height: f32) {
        let top = self.page_size.height - self.margins.top;
        let fits = self.cursor_y - height >= self.margins.bottom;
        let page_empty = self.cursor_y >= top;
        if !fits && !page_empty {
            self.start_page();
        }
    }

    fn start_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.page_size.height - self.margins.top;
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.start_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_text(&mut self, x: f32, y: f32, size: f32, font: Font, text: &str) {
        if text.is_empty() {
            return;
        }
        self.current_page().elements.push(Element::Text {
            x,
            y,
            size,
            font,
            text: text.to_string(),
        });
    }
}

/// Approximate rendered width of `text` in Helvetica.
pub fn text_width(text: &str, size: f32, font: Font) -> f32 {
    let factor = match font {
        Font::Regular => 0.52,
        Font::Bold => 0.56,
    };
    text.chars().count() as f32 * size * factor
}

/// Greedy word wrap. Words wider than `max_width` are broken by character.
fn wrap(text: &str, size: f32, font: Font, max_width: f32) -> Vec<String> {
    let char_width = text_width("m", size, font);
    let max_chars = ((max_width / char_width).floor() as usize).max(1);

    let mut lines = Vec::new();
    for source_line in text.lines() {
        let mut line = String::new();
        let mut line_chars = 0;
        for word in source_line.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                let needed = if line_chars == 0 { chunk.len() } else { line_chars + 1 + chunk.len() };
                if needed > max_chars && line_chars > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_chars = 0;
                }
                if line_chars > 0 {
                    line.push(' ');
                    line_chars += 1;
                }
                line.extend(chunk);
                line_chars += chunk.len();
            }
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
