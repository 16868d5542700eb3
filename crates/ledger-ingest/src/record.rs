//! Record types flowing through the pipeline
//!
//! Raw and sanitized rows share the loosely-typed [`Record`] shape. Validation
//! turns them into [`ValidatedRecord`]s, and a [`RecordBatch`] carries those
//! together with the column types the sink needs to bind NULLs correctly.

use crate::schema::FieldType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Sheet row number of the first data row (the header occupies row 1).
pub const FIRST_DATA_ROW: usize = 2;

/// A loosely-typed cell value, as produced by the sheet or the sanitizer
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Semantic NULL (set by the sanitizer, or a JSON null from the source)
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for NULL and for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value as plain text; NULL renders as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::Integer(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// One sheet row keyed by column header
///
/// Used for both raw rows (straight from the source) and sanitized rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: HashMap<String, Cell>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder-style insert, handy for fixtures
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.insert(column, value);
        self
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A strictly-typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Decimal(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Decimal(v) => serializer.serialize_f64(*v),
            FieldValue::Text(v) => serializer.serialize_str(v),
            FieldValue::Boolean(v) => serializer.serialize_bool(*v),
            FieldValue::Date(v) => serializer.collect_str(&v.format("%Y-%m-%d")),
            FieldValue::DateTime(v) => serializer.collect_str(&v.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// A row that passed every schema check, fields in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedRecord {
    values: Vec<(&'static str, FieldValue)>,
}

impl ValidatedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, value: FieldValue) {
        self.values.push((field, value));
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for ValidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A destination column with its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: FieldType,
}

/// Validated (and possibly identified) rows ready for the sink
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub columns: Vec<Column>,
    pub rows: Vec<ValidatedRecord>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::text("   ").is_blank());
        assert!(!Cell::Integer(0).is_blank());
        assert!(!Cell::text("x").is_blank());
    }

    #[test]
    fn test_cell_display_marks_null() {
        assert_eq!(Cell::Null.to_string(), "NULL");
        assert_eq!(Cell::Null.to_text(), "");
        assert_eq!(Cell::Integer(1000).to_string(), "1000");
        assert_eq!(Cell::Bool(true).to_string(), "TRUE");
    }

    #[test]
    fn test_validated_record_serializes_in_order() {
        let mut record = ValidatedRecord::new();
        record.push("account_code", FieldValue::Integer(6100));
        record.push(
            "expense_date",
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()),
        );
        record.push("expense_comments", FieldValue::Null);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"account_code":6100,"expense_date":"2026-01-20","expense_comments":null}"#
        );
    }

    #[test]
    fn test_datetime_serializes_iso() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 20)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let json = serde_json::to_value(FieldValue::DateTime(dt)).unwrap();
        assert_eq!(json, serde_json::json!("2026-01-20T14:30:00"));
    }
}
