#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Schema, record and table types shared by the travel scraping toolchain.
//!
//! A [`Schema`] is an explicit, ordered list of typed column definitions.
//! Records are built through a [`RecordBuilder`] bound to a schema, so a
//! write to a column the schema does not declare is caught when the record
//! is constructed rather than surfacing later as a missing key. A [`Table`]
//! only accepts records of its own width.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors raised when a record or table does not match its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two columns in one schema share a name.
    #[error("duplicate column '{0}' in schema")]
    DuplicateColumn(String),

    /// A column name was used that the schema does not declare.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A record's width differs from the schema it is pushed into.
    #[error("record has {actual} cells but schema declares {expected} columns")]
    WidthMismatch {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of cells in the record.
        actual: usize,
    },

    /// A record was filled against a schema other than the one its columns
    /// were resolved in.
    #[error(
        "columns resolved against [{}] but record schema is [{}]",
        .expected.join(", "),
        .actual.join(", ")
    )]
    ColumnMismatch {
        /// Column names the ids were resolved against.
        expected: Vec<String>,
        /// Column names of the record's schema.
        actual: Vec<String>,
    },
}

/// How the cells of one column are normalized by the table assembler.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnParser {
    /// Kept as scraped.
    Text,
    /// `"2,5 km"` / `"500 m"` embedded in noisier text, in kilometers.
    Distance,
    /// Comma- or period-decimal score.
    Score,
    /// Currency-stripped, thousands-separated whole price.
    Price,
    /// A score preceded by one or more descriptive words.
    LocationScore,
    /// Leading rating token of a rating-with-count descriptor.
    Rating,
    /// Trailing count token of a rating-with-count descriptor.
    ReviewCount,
    /// Plain floating point number.
    Float,
    /// Plain integer.
    Integer,
}

/// One column of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name, unique within its schema.
    pub name: String,
    /// Normalization applied to every cell of this column.
    pub parser: ColumnParser,
}

impl ColumnDef {
    /// Creates a column definition.
    #[must_use]
    pub fn new(name: &str, parser: ColumnParser) -> Self {
        Self {
            name: name.to_owned(),
            parser,
        }
    }

    /// Creates a pass-through text column.
    #[must_use]
    pub fn text(name: &str) -> Self {
        Self::new(name, ColumnParser::Text)
    }
}

/// Position of a column inside the schema that issued it.
///
/// Only meaningful for the schema it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(usize);

impl ColumnId {
    /// Returns the zero-based column position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered list of uniquely named, typed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Creates a schema from its columns.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] if two columns share a name.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self, SchemaError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Returns the column definitions in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema declares no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column_id(&self, name: &str) -> Option<ColumnId> {
        self.columns.iter().position(|c| c.name == name).map(ColumnId)
    }

    /// Looks up a column by name, failing if the schema does not declare it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] if no column has this name.
    pub fn require(&self, name: &str) -> Result<ColumnId, SchemaError> {
        self.column_id(name)
            .ok_or_else(|| SchemaError::UnknownColumn(name.to_owned()))
    }

    /// Returns the definition of a column.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&ColumnDef> {
        self.columns.get(id.0)
    }

    /// Starts a record with every column absent.
    #[must_use]
    pub fn builder(&self) -> RecordBuilder<'_> {
        RecordBuilder {
            schema: self,
            cells: vec![Cell::Absent; self.columns.len()],
        }
    }

    /// Returns a copy of this schema with every column parsed as text.
    ///
    /// Raw tables produced by the extractors use this shape before the
    /// assembler applies the real column parsers.
    #[must_use]
    pub fn as_raw(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnDef::text(&c.name))
                .collect(),
        }
    }
}

/// One cell of a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Text as scraped (or a text column after assembly).
    Text(String),
    /// A floating point value.
    Float(f64),
    /// An integer value.
    Integer(i64),
    /// No value could be derived.
    #[default]
    Absent,
}

impl Cell {
    /// Wraps optional text, mapping `None` to [`Cell::Absent`].
    #[must_use]
    pub fn from_text(text: Option<String>) -> Self {
        text.map_or(Self::Absent, Self::Text)
    }

    /// Wraps an optional float, mapping `None` to [`Cell::Absent`].
    #[must_use]
    pub fn from_float(value: Option<f64>) -> Self {
        value.map_or(Self::Absent, Self::Float)
    }

    /// Returns `true` for [`Cell::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the text of a [`Cell::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a numeric cell as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            Self::Text(_) | Self::Absent => None,
        }
    }

    /// Returns an integer cell.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Float(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Absent => Ok(()),
        }
    }
}

/// One row: exactly one cell per schema column, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    /// Returns the cells in schema order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell of one column.
    #[must_use]
    pub fn get(&self, id: ColumnId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the record has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consumes the record, returning its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Builds one [`Record`] against a schema. Unset columns stay absent.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    schema: &'a Schema,
    cells: Vec<Cell>,
}

impl RecordBuilder<'_> {
    /// Returns the schema this record is built against.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        self.schema
    }

    /// Sets a column by id. Ids issued by another schema that fall outside
    /// this one are ignored.
    pub fn set(&mut self, id: ColumnId, cell: Cell) -> &mut Self {
        if let Some(slot) = self.cells.get_mut(id.0) {
            *slot = cell;
        }
        self
    }

    /// Sets a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] if the schema has no such column.
    pub fn set_named(&mut self, name: &str, cell: Cell) -> Result<&mut Self, SchemaError> {
        let id = self.schema.require(name)?;
        Ok(self.set(id, cell))
    }

    /// Sets a text column by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] if the schema has no such column.
    pub fn text(&mut self, name: &str, value: &str) -> Result<&mut Self, SchemaError> {
        self.set_named(name, Cell::Text(value.to_owned()))
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> Record {
        Record { cells: self.cells }
    }
}

/// A schema plus rows in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Record>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub const fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates a table from rows, checking every row's width.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::WidthMismatch`] for the first row that does not
    /// match the schema.
    pub fn from_rows(schema: Schema, rows: Vec<Record>) -> Result<Self, SchemaError> {
        let mut table = Self::new(schema);
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::WidthMismatch`] if the record does not have one
    /// cell per column.
    pub fn push(&mut self, record: Record) -> Result<(), SchemaError> {
        if record.len() != self.schema.len() {
            return Err(SchemaError::WidthMismatch {
                expected: self.schema.len(),
                actual: record.len(),
            });
        }
        self.rows.push(record);
        Ok(())
    }

    /// Appends every row of another table with the same column names.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] naming the first column that
    /// differs between the two schemas.
    pub fn extend(&mut self, other: Self) -> Result<(), SchemaError> {
        if let Some(name) = other
            .schema
            .names()
            .zip(self.schema.names())
            .find(|(a, b)| a != b)
            .map(|(a, _)| a.to_owned())
        {
            return Err(SchemaError::UnknownColumn(name));
        }
        for row in other.rows {
            self.push(row)?;
        }
        Ok(())
    }

    /// Returns the schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns one cell by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let id = self.schema.column_id(column)?;
        self.rows.get(row)?.get(id)
    }

    /// Iterates over the cells of one column.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] if the schema has no such column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell>, SchemaError> {
        let id = self.schema.require(name)?;
        Ok(self.rows.iter().filter_map(move |row| row.get(id)))
    }

    /// Consumes the table, returning its schema and rows.
    #[must_use]
    pub fn into_parts(self) -> (Schema, Vec<Record>) {
        (self.schema, self.rows)
    }
}
