//! Renderer-neutral document model. Sections build a [`ReportDocument`] once; the CSV and
//! PDF writers each read the parts they need.

use std::fmt;

/// RGB triple, 0-255 per channel.
pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub header_fill: Rgb,
    /// Grey level of the header text.
    pub header_text: u8,
    pub stripe: Rgb,
}

pub const TITLE_COLOR: Rgb = [109, 40, 217];
pub const BODY_COLOR: Rgb = [55, 65, 81];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Money. Rendered with the currency prefix in documents, bare in CSV.
    Amount(f64),
    Count(u64),
    Number(f64),
    /// Number with a fixed count of decimals.
    Fixed(f64, usize),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Spreadsheet form: raw numbers, no currency.
    pub fn raw(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Amount(value) | Cell::Number(value) => value.to_string(),
            Cell::Count(value) => value.to_string(),
            Cell::Fixed(value, places) => format!("{:.*}", *places, value),
        }
    }

    /// Printed form.
    pub fn display(&self, currency: &str) -> String {
        match self {
            Cell::Amount(value) => format!("{currency}{value}"),
            other => other.raw(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    pub fn new(columns: Vec<&'static str>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub title: String,
    pub summary: Vec<String>,
    pub table: ReportTable,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    pub fn single(page: ReportPage) -> Self {
        Self {
            title: page.title.clone(),
            pages: vec![page],
        }
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|page| page.table.rows.len()).sum()
    }
}
