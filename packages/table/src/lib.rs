#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Column-wise table assembly, CSV export and chart descriptions.
//!
//! Extractors produce raw tables whose cells are scraped text. [`assemble`]
//! applies one [`ColumnParser`] per column across every row and returns a
//! typed [`Table`] with the same row order. The [`export`] and [`chart`]
//! modules consume finished tables.

pub mod chart;
pub mod export;

use travel_scrape_parse::{
    ParseError, extract_distance_token, parse_distance_km, parse_float, parse_integer,
    parse_location_score, parse_price, parse_rating_with_count, parse_score,
};
use travel_scrape_table_models::{Cell, ColumnParser, Schema, SchemaError, Table};

/// Errors that abort an assembly pass.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// A cell in a strict column does not have the column's numeric shape.
    #[error("column '{column}', row {row}: cannot convert '{value}': {source}")]
    Conversion {
        /// Name of the offending column.
        column: String,
        /// Zero-based row index.
        row: usize,
        /// The raw cell text.
        value: String,
        /// Why the conversion failed.
        #[source]
        source: ParseError,
    },

    /// The raw table does not match the target schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Normalizes a raw table into `schema`, one column at a time.
///
/// The raw table must declare the same column names in the same order.
/// Absent cells stay absent in every column.
///
/// # Errors
///
/// Returns [`AssembleError::Conversion`] for the first non-conforming cell of
/// a strict column (score, price, location score, float, integer, or a
/// distance token with a non-numeric magnitude), and
/// [`AssembleError::Schema`] if the column names differ.
pub fn assemble(raw: Table, schema: &Schema) -> Result<Table, AssembleError> {
    let (raw_schema, rows) = raw.into_parts();

    if raw_schema.len() != schema.len() {
        return Err(SchemaError::WidthMismatch {
            expected: schema.len(),
            actual: raw_schema.len(),
        }
        .into());
    }
    if let Some(name) = raw_schema
        .names()
        .zip(schema.names())
        .find(|(raw_name, name)| raw_name != name)
        .map(|(raw_name, _)| raw_name.to_owned())
    {
        return Err(SchemaError::UnknownColumn(name).into());
    }

    let mut grid: Vec<Vec<Cell>> = rows.into_iter().map(|r| r.into_cells()).collect();

    for (col, def) in schema.columns().iter().enumerate() {
        let mut absent = 0_usize;
        for (row, cells) in grid.iter_mut().enumerate() {
            let cell = std::mem::take(&mut cells[col]);
            let parsed = convert_cell(def.parser, cell).map_err(|(value, source)| {
                AssembleError::Conversion {
                    column: def.name.clone(),
                    row,
                    value,
                    source,
                }
            })?;
            if parsed.is_absent() {
                absent += 1;
            }
            cells[col] = parsed;
        }
        log::debug!(
            "Column '{}' parsed as {} ({absent}/{} absent)",
            def.name,
            def.parser,
            grid.len()
        );
    }

    let mut table = Table::new(schema.clone());
    for cells in grid {
        let mut builder = schema.builder();
        for (def, cell) in schema.columns().iter().zip(cells) {
            builder.set_named(&def.name, cell)?;
        }
        table.push(builder.build())?;
    }

    Ok(table)
}

/// Applies one column parser to one cell.
///
/// Only text cells are parsed; cells that are already typed or absent pass
/// through. On failure the raw text is returned alongside the error.
fn convert_cell(parser: ColumnParser, cell: Cell) -> Result<Cell, (String, ParseError)> {
    let Cell::Text(text) = cell else {
        return Ok(cell);
    };

    let result = match parser {
        ColumnParser::Text => return Ok(Cell::Text(text)),
        ColumnParser::Distance => match extract_distance_token(&text) {
            None => Ok(Cell::Absent),
            Some(token) => parse_distance_km(token).map(Cell::from_float),
        },
        ColumnParser::Score => parse_score(&text).map(Cell::Float),
        ColumnParser::Price => parse_price(&text).map(Cell::Float),
        ColumnParser::LocationScore => parse_location_score(&text).map(Cell::Float),
        ColumnParser::Float => parse_float(&text).map(Cell::Float),
        ColumnParser::Integer => parse_integer(&text).map(Cell::Integer),
        ColumnParser::Rating => Ok(Cell::from_float(parse_rating_with_count(&text).rating)),
        ColumnParser::ReviewCount => Ok(parse_rating_with_count(&text)
            .count
            .and_then(|c| i64::try_from(c).ok())
            .map_or(Cell::Absent, Cell::Integer)),
    };

    result.map_err(|e| (text, e))
}
