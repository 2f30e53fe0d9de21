//! Where finished tables and chart descriptions go.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use travel_scrape_table::chart::{ChartError, ChartSink, JsonChartSink};
use travel_scrape_table::export::{ExportError, ExportOptions, write_csv, write_csv_file};
use travel_scrape_table_models::Table;

/// Writes `table` as CSV to `out`, or to stdout when `out` is `None`.
pub fn emit_csv(table: &Table, out: Option<&Path>, absent_marker: &str) -> Result<(), ExportError> {
    let options = ExportOptions::default().with_absent_marker(absent_marker);
    match out {
        Some(path) => write_csv_file(table, path, &options),
        None => write_csv(table, std::io::stdout().lock(), &options),
    }
}

/// Opens a JSON-lines chart sink writing to `path`.
pub fn chart_sink(path: &Path) -> Result<JsonChartSink<BufWriter<File>>, ChartError> {
    let file = File::create(path)?;
    log::info!("Writing chart descriptions to {}", path.display());
    Ok(JsonChartSink::new(BufWriter::new(file)))
}

/// Runs `render` against a sink for `path`, if one was requested.
pub fn with_chart_sink(
    path: Option<&Path>,
    render: impl FnOnce(&mut dyn ChartSink) -> Result<(), ChartError>,
) -> Result<(), ChartError> {
    let Some(path) = path else {
        return Ok(());
    };
    let mut sink = chart_sink(path)?;
    render(&mut sink)
}

#[cfg(test)]
mod tests {
    use travel_scrape_table::chart::Figure;
    use travel_scrape_table_models::{Cell, ColumnDef, Schema};

    use super::*;

    fn table() -> Table {
        let schema = Schema::new(vec![ColumnDef::text("name"), ColumnDef::text("price")]).unwrap();
        let mut builder = schema.builder();
        builder.text("name", "Hostal Luna").unwrap();
        builder.set_named("price", Cell::Absent).unwrap();
        let record = builder.build();
        Table::from_rows(schema, vec![record]).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("travel_scrape_cli_{}_{name}", std::process::id()))
    }

    #[test]
    fn writes_csv_file_with_marker() {
        let path = temp_path("out.csv");
        emit_csv(&table(), Some(path.as_path()), "Desconocido").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, "name,price\nHostal Luna,Desconocido\n");
    }

    #[test]
    fn skips_chart_without_path() {
        let mut called = false;
        with_chart_sink(None, |_| {
            called = true;
            Ok(())
        })
        .unwrap();
        assert!(!called);
    }

    #[test]
    fn writes_chart_lines() {
        let path = temp_path("charts.jsonl");
        with_chart_sink(Some(path.as_path()), |sink| sink.render(&Figure { panels: vec![] })).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, "{\"panels\":[]}\n");
    }
}
