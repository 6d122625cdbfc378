//! A4 portrait rendering with the built-in Helvetica faces.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb as PdfRgb,
};

use super::layout::{Rgb, ReportDocument, ReportPage, BODY_COLOR, TITLE_COLOR};
use super::ExportError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const MARGIN_TOP: f32 = 18.0;
const MARGIN_BOTTOM: f32 = 15.0;
const LINE_GAP: f32 = 8.0;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.5;
const TITLE_SIZE: f32 = 18.0;
const SUMMARY_SIZE: f32 = 12.0;
const TABLE_SIZE: f32 = 10.0;
/// Rough Helvetica advance at `TABLE_SIZE`, used to clip cell text.
const CHAR_WIDTH: f32 = 1.9;
const LAYER: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub(crate) fn render(document: &ReportDocument, currency: &str) -> Result<Vec<u8>, ExportError> {
    let title = ascii(&document.title);
    let (doc, page, layer) = PdfDocument::new(
        title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        LAYER,
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    let mut layer = doc.get_page(page).get_layer(layer);
    for (index, report) in document.pages.iter().enumerate() {
        if index > 0 {
            layer = new_page(&doc);
        }
        draw_page(&doc, layer.clone(), report, &fonts, currency);
    }

    Ok(doc.save_to_bytes()?)
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    doc.get_page(page).get_layer(layer)
}

fn draw_page(
    doc: &PdfDocumentReference,
    mut layer: PdfLayerReference,
    report: &ReportPage,
    fonts: &Fonts,
    currency: &str,
) {
    let mut y = PAGE_HEIGHT - MARGIN_TOP;
    fill(&layer, TITLE_COLOR);
    layer.use_text(ascii(&report.title), TITLE_SIZE, Mm(MARGIN_X), Mm(y), &fonts.bold);

    y -= LINE_GAP + 2.0;
    fill(&layer, BODY_COLOR);
    for line in &report.summary {
        layer.use_text(ascii(line), SUMMARY_SIZE, Mm(MARGIN_X), Mm(y), &fonts.regular);
        y -= LINE_GAP;
    }

    let table = &report.table;
    let columns = table.columns.len().max(1);
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN_X) / columns as f32;
    let max_chars = ((column_width - 2.0 * CELL_PADDING) / CHAR_WIDTH).max(1.0) as usize;

    y -= ROW_HEIGHT / 2.0;
    draw_header(&layer, report, fonts, y, column_width, max_chars);
    y -= ROW_HEIGHT;

    for (index, row) in table.rows.iter().enumerate() {
        if y < MARGIN_BOTTOM {
            layer = new_page(doc);
            y = PAGE_HEIGHT - MARGIN_BOTTOM - ROW_HEIGHT;
            draw_header(&layer, report, fonts, y, column_width, max_chars);
            y -= ROW_HEIGHT;
        }
        if index % 2 == 1 {
            band(&layer, report.theme.stripe, y);
        }
        fill(&layer, BODY_COLOR);
        for (column, cell) in row.iter().enumerate() {
            let x = MARGIN_X + column as f32 * column_width + CELL_PADDING;
            let text = clip(&ascii(&cell.display(currency)), max_chars);
            layer.use_text(text, TABLE_SIZE, Mm(x), Mm(y + 2.5), &fonts.regular);
        }
        y -= ROW_HEIGHT;
    }
}

fn draw_header(
    layer: &PdfLayerReference,
    report: &ReportPage,
    fonts: &Fonts,
    y: f32,
    column_width: f32,
    max_chars: usize,
) {
    band(layer, report.theme.header_fill, y);
    let grey = report.theme.header_text;
    fill(layer, [grey, grey, grey]);
    for (column, name) in report.table.columns.iter().enumerate() {
        let x = MARGIN_X + column as f32 * column_width + CELL_PADDING;
        layer.use_text(clip(name, max_chars), TABLE_SIZE, Mm(x), Mm(y + 2.5), &fonts.bold);
    }
}

/// Full-width filled row whose bottom edge sits at `y`.
fn band(layer: &PdfLayerReference, color: Rgb, y: f32) {
    fill(layer, color);
    layer.add_rect(Rect::new(
        Mm(MARGIN_X),
        Mm(y),
        Mm(PAGE_WIDTH - MARGIN_X),
        Mm(y + ROW_HEIGHT),
    ));
}

fn fill(layer: &PdfLayerReference, [r, g, b]: Rgb) {
    layer.set_fill_color(Color::Rgb(PdfRgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    )));
}

/// The built-in fonts only cover Latin-1; the rupee sign becomes "Rs." and anything else
/// outside ASCII becomes "?".
pub fn ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '₹' => out.push_str("Rs."),
            ch if ch.is_ascii() => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str("...");
    clipped
}
