use super::layout::{Cell, ReportTable};
use super::ExportError;

/// Header row plus one line per table row. Fields with commas, quotes or newlines are
/// quoted with inner quotes doubled; lines end in `\n`.
pub(crate) fn write_table(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::raw))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
