//! Core table types for profile data.
//!
//! Profile exports are wide and ragged: one upload may carry `job_1_*` through
//! `job_14_*`, the next only `job_1_*`, and any cell may be blank. The types
//! here model that honestly:
//! - `CellValue` distinguishes a missing cell from an empty string
//! - `Record` answers `Missing` for columns it never had
//! - `Table` keeps the column order of the source so exports look familiar

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Cell values
// =============================================================================

/// A single cell in a profile table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent, blank in a CSV, or `null` in JSON
    #[default]
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

static MISSING: CellValue = CellValue::Missing;

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// The cell rendered as a string, or `None` when it is missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Integer(n) => Some(n.to_string()),
            CellValue::Float(f) => Some(format_float(*f)),
            CellValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming, so a
    /// `current_years_in_role` read back from a CSV still compares as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Float(f) if !f.is_nan() => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            _ => None,
        }
    }

    /// Build a cell from a JSON scalar. Arrays and objects are kept as their
    /// JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Missing,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Missing),
            },
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Missing => serde_json::Value::Null,
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Integer(n) => serde_json::Value::from(*n),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for CellValue {
    /// Missing cells render as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(s) => f.write_str(&s),
            None => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Missing => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Integer(n) => serializer.serialize_i64(*n),
            CellValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            CellValue::Float(_) => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map(CellValue::Float).unwrap_or(CellValue::Missing)
    }
}

/// Integral floats keep one decimal ("4.0"), everything else uses the
/// shortest round-trip form ("0.5", "12.3").
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

// =============================================================================
// Records
// =============================================================================

/// One profile row: column name to cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a column. Columns the record never had read as `Missing`.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    /// Rendered text of a column, `None` when missing.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).as_text()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.cells.iter()
    }

    /// The record as a JSON object, e.g. for sending to the scoring engine.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .cells
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

/// An ordered set of columns and the rows that fill them.
///
/// Tables are treated as values: reductions such as `without_rows` build a
/// new table and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, deriving the column list from the rows in
    /// first-seen order.
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for (column, _) in row.iter() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    pub fn push(&mut self, row: Record) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    /// A new table without the rows whose mask entry is `true`.
    ///
    /// Rows past the end of a short mask are kept.
    pub fn without_rows(&self, exclude: &[bool]) -> Table {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| !exclude.get(*i).copied().unwrap_or(false))
            .map(|(_, row)| row.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
