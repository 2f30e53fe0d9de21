//! Renderer-agnostic comparison charts.
//!
//! [`comparison_chart`] turns a table and two column names into a
//! [`ComparisonChart`] description. Drawing is left to whatever implements
//! [`ChartSink`]; [`JsonChartSink`] serializes figures for an external
//! renderer.

use std::io::Write;

use serde::Serialize;
use strum_macros::Display;
use travel_scrape_table_models::{SchemaError, Table};

/// Errors that can occur while building or emitting a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A requested column does not exist.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The value column holds a non-numeric cell.
    #[error("column '{column}', row {row}: value is not numeric")]
    NonNumeric {
        /// The value column.
        column: String,
        /// Zero-based row index.
        row: usize,
    },

    /// Serializing a figure failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a figure failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bar direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Labels on the vertical axis, bars grow to the right.
    Horizontal,
    /// Labels on the horizontal axis, bars grow upwards.
    Vertical,
}

/// Presentation settings for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartStyle {
    /// Chart title.
    pub title: String,
    /// Caption of the axis holding the labels.
    pub label_axis: String,
    /// Caption of the axis holding the values.
    pub value_axis: String,
    /// Bar direction.
    pub orientation: Orientation,
    /// Bar colour name.
    pub color: String,
}

impl ChartStyle {
    /// Creates a style.
    #[must_use]
    pub fn new(
        title: &str,
        label_axis: &str,
        value_axis: &str,
        orientation: Orientation,
        color: &str,
    ) -> Self {
        Self {
            title: title.to_owned(),
            label_axis: label_axis.to_owned(),
            value_axis: value_axis.to_owned(),
            orientation,
            color: color.to_owned(),
        }
    }
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Category label.
    pub label: String,
    /// Bar length.
    pub value: f64,
}

/// A bar chart comparing one numeric column across rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    /// Presentation settings.
    #[serde(flatten)]
    pub style: ChartStyle,
    /// Bars in table row order.
    pub bars: Vec<Bar>,
}

/// One or more charts drawn side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Panels from left to right.
    pub panels: Vec<ComparisonChart>,
}

impl From<ComparisonChart> for Figure {
    fn from(chart: ComparisonChart) -> Self {
        Self {
            panels: vec![chart],
        }
    }
}

/// Builds a chart from `label_column` and `value_column` of `table`.
///
/// Rows whose value is absent are skipped.
///
/// # Errors
///
/// Returns [`ChartError::Schema`] if either column is missing and
/// [`ChartError::NonNumeric`] if a value cell holds text.
pub fn comparison_chart(
    table: &Table,
    label_column: &str,
    value_column: &str,
    style: ChartStyle,
) -> Result<ComparisonChart, ChartError> {
    let labels = table.column(label_column)?;
    let values = table.column(value_column)?;

    let mut bars = Vec::with_capacity(table.len());
    for (row, (label, value)) in labels.zip(values).enumerate() {
        if value.is_absent() {
            log::debug!("Skipping row {row}: '{value_column}' is absent");
            continue;
        }
        let value = value.as_f64().ok_or_else(|| ChartError::NonNumeric {
            column: value_column.to_owned(),
            row,
        })?;
        bars.push(Bar {
            label: label.to_string(),
            value,
        });
    }

    log::debug!(
        "'{}': {} {} bars of '{value_column}'",
        style.title,
        bars.len(),
        style.orientation
    );
    Ok(ComparisonChart { style, bars })
}

/// Receives finished figures.
pub trait ChartSink {
    /// Accepts one figure.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] if the figure cannot be emitted.
    fn render(&mut self, figure: &Figure) -> Result<(), ChartError>;
}

/// Writes each figure as one JSON document per line.
#[derive(Debug)]
pub struct JsonChartSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonChartSink<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartSink for JsonChartSink<W> {
    fn render(&mut self, figure: &Figure) -> Result<(), ChartError> {
        serde_json::to_writer(&mut self.writer, figure)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use travel_scrape_table_models::{Cell, ColumnDef, ColumnParser, Schema};

    use super::*;

    fn table() -> Table {
        let schema = Schema::new(vec![
            ColumnDef::text("name"),
            ColumnDef::new("price", ColumnParser::Price),
        ])
        .unwrap();
        let mut table = Table::new(schema.clone());
        for (name, price) in [("A", Cell::Float(80.0)), ("B", Cell::Absent), ("C", Cell::Float(120.0))] {
            let mut builder = schema.builder();
            builder.text("name", name).unwrap();
            builder.set_named("price", price).unwrap();
            table.push(builder.build()).unwrap();
        }
        table
    }

    fn style() -> ChartStyle {
        ChartStyle::new("Prices", "Name", "Price (€)", Orientation::Horizontal, "blue")
    }

    #[test]
    fn orientation_displays_snake_case() {
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
    }

    #[test]
    fn skips_absent_values() {
        let chart = comparison_chart(&table(), "name", "price", style()).unwrap();
        let labels: Vec<_> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["A", "C"]);
        assert!((chart.bars[1].value - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_text_values() {
        let err = comparison_chart(&table(), "price", "name", style()).unwrap_err();
        assert!(matches!(err, ChartError::NonNumeric { row: 0, .. }));
    }

    #[test]
    fn rejects_unknown_column() {
        let err = comparison_chart(&table(), "name", "score", style()).unwrap_err();
        assert!(matches!(err, ChartError::Schema(SchemaError::UnknownColumn(_))));
    }

    #[test]
    fn json_sink_writes_one_line_per_figure() {
        let chart = comparison_chart(&table(), "name", "price", style()).unwrap();
        let mut sink = JsonChartSink::new(Vec::new());
        sink.render(&chart.into()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["panels"][0]["title"], "Prices");
        assert_eq!(value["panels"][0]["orientation"], "horizontal");
        assert_eq!(value["panels"][0]["bars"][0]["label"], "A");
        assert!(out.ends_with('\n'));
    }
}
