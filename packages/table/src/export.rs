//! CSV export of finished tables.
//!
//! The header row holds the column names; each record becomes one row.
//! Absent cells are written as [`ExportOptions::absent_marker`].

use std::io::Write;
use std::path::Path;

use travel_scrape_table_models::{Cell, Table};

/// Errors that can occur while exporting a table.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How a table is rendered as CSV.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Text written for absent cells.
    pub absent_marker: String,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            absent_marker: String::new(),
            delimiter: b',',
        }
    }
}

impl ExportOptions {
    /// Sets the text written for absent cells.
    #[must_use]
    pub fn with_absent_marker(mut self, marker: &str) -> Self {
        marker.clone_into(&mut self.absent_marker);
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Writes `table` as CSV to `writer`.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_csv<W: Write>(
    table: &Table,
    writer: W,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    csv_writer.write_record(table.schema().names())?;

    for record in table.rows() {
        csv_writer.write_record(record.cells().iter().map(|cell| match cell {
            Cell::Absent => options.absent_marker.clone(),
            other => other.to_string(),
        }))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `table` as CSV to a file, creating or truncating it.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_csv_file(
    table: &Table,
    path: &Path,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(table, std::io::BufWriter::new(file), options)?;
    log::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use travel_scrape_table_models::{ColumnDef, ColumnParser, Schema};

    use super::*;

    fn table() -> Table {
        let schema = Schema::new(vec![
            ColumnDef::text("name"),
            ColumnDef::new("price", ColumnParser::Price),
            ColumnDef::new("reviews", ColumnParser::ReviewCount),
        ])
        .unwrap();
        let mut table = Table::new(schema.clone());

        let mut builder = schema.builder();
        builder.text("name", "Hotel Sol, Centro").unwrap();
        builder.set_named("price", Cell::Float(1234.0)).unwrap();
        builder.set_named("reviews", Cell::Integer(12)).unwrap();
        table.push(builder.build()).unwrap();

        let mut builder = schema.builder();
        builder.text("name", "Hostal Luna").unwrap();
        builder.set_named("price", Cell::Float(99.5)).unwrap();
        table.push(builder.build()).unwrap();

        table
    }

    fn render(options: &ExportOptions) -> String {
        let mut out = Vec::new();
        write_csv(&table(), &mut out, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        assert_eq!(
            render(&ExportOptions::default()),
            "name,price,reviews\n\"Hotel Sol, Centro\",1234,12\nHostal Luna,99.5,\n"
        );
    }

    #[test]
    fn writes_absent_marker() {
        let options = ExportOptions::default()
            .with_absent_marker("Desconocido")
            .with_delimiter(b'\t');
        assert_eq!(
            render(&options),
            "name\tprice\treviews\nHotel Sol, Centro\t1234\t12\nHostal Luna\t99.5\tDesconocido\n"
        );
    }
}
