//! In-memory record set loaded from a delimited file

use polars::prelude::*;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single field value read back out of a [`Table`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<AnyValue<'_>> for Cell {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Cell::Missing,
            AnyValue::Int64(i) => Cell::Integer(i),
            AnyValue::Float64(x) => Cell::Float(x),
            AnyValue::String(s) => Cell::Text(s.to_string()),
            AnyValue::StringOwned(s) => Cell::Text(s.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Missing => Ok(()),
        }
    }
}

/// Missing values serialize as empty strings
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(i) => serializer.serialize_i64(*i),
            Cell::Float(x) => serializer.serialize_f64(*x),
            Cell::Missing => serializer.serialize_str(""),
        }
    }
}

/// Ordered rows sharing one header, backed by a polars [`DataFrame`]
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Header names in file order
    pub fn columns(&self) -> Vec<&str> {
        self.frame.get_columns().iter().map(|c| c.name().as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.frame.column(name).ok()
    }

    /// Value at `row` of `column`, if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<Cell> {
        let column = self.column(column)?;
        if row >= column.len() {
            return None;
        }
        column.get(row).ok().map(Cell::from)
    }

    /// Copy of the rows in `start..end`, clamped to the table length
    pub fn slice(&self, start: usize, end: usize) -> Table {
        let end = end.min(self.len());
        let start = start.min(end);
        let offset = i64::try_from(start).unwrap_or(i64::MAX);
        Table::new(self.frame.slice(offset, end - start))
    }

    /// Rows where `mask` is true
    pub fn filter(&self, mask: &BooleanChunked) -> PolarsResult<Table> {
        Ok(Table::new(self.frame.filter(mask)?))
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

/// Records orientation: an array of `{column: value}` objects
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.frame.get_columns();
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for row in 0..self.len() {
            seq.serialize_element(&Record { columns, row })?;
        }
        seq.end()
    }
}

/// One row of a table, serialized in header order
struct Record<'a> {
    columns: &'a [Column],
    row: usize,
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            let cell = column.get(self.row).map(Cell::from).map_err(S::Error::custom)?;
            map.serialize_entry(column.name().as_str(), &cell)?;
        }
        map.end()
    }
}
