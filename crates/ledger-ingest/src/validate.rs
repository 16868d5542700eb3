//! Generic schema validator
//!
//! One function serves every source type: the [`SourceSchema`] value passed
//! in decides which fields are checked and how each one is coerced. A row
//! that fails produces a single [`ValidationError`] carrying every field
//! failure, and never stops the rest of the batch.

use crate::record::{Cell, FieldValue, Record, ValidatedRecord, FIRST_DATA_ROW};
use crate::schema::SourceSchema;
use std::fmt;

/// Placeholder for snapshot columns absent from the record
pub const MISSING: &str = "MISSING";

/// Width of the separator line closing each diagnostic entry
pub const SEPARATOR_WIDTH: usize = 100;

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A row that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Sheet row number (header is row 1)
    pub row: usize,
    /// `col: value | col: value` over the schema's snapshot columns
    pub snapshot: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// `field: message; field: message`
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Diagnostic log entry, newline-terminated
    pub fn render(&self) -> String {
        format!(
            "(ROW {}) DATA: {}\nERROR: {}\n{}\n",
            self.row,
            self.snapshot,
            self.message(),
            "-".repeat(SEPARATOR_WIDTH)
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.message())
    }
}

/// Result of validating a whole batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ValidatedRecord>,
    pub errors: Vec<ValidationError>,
}

impl BatchOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validate one sanitized record against a schema.
///
/// On success every schema field is present in the output, in schema order,
/// with absent or blank optional fields as [`FieldValue::Null`].
pub fn validate_record(
    schema: &SourceSchema,
    record: &Record,
) -> Result<ValidatedRecord, Vec<FieldError>> {
    let mut validated = ValidatedRecord::new();
    let mut errors = Vec::new();

    for (field, required) in schema.fields() {
        let value = match record.get(field.name) {
            None if required => Err(FieldError::new(field.name, "Field required")),
            Some(Cell::Null) if required => {
                Err(FieldError::new(field.name, "Required fields cannot be NULL"))
            },
            Some(cell) if required && cell.is_blank() => {
                Err(FieldError::new(field.name, "Required fields cannot be empty"))
            },
            None => Ok(FieldValue::Null),
            Some(cell) if cell.is_blank() => Ok(FieldValue::Null),
            Some(cell) => {
                schema.coercion_for(field)(cell).map_err(|msg| FieldError::new(field.name, msg))
            },
        };

        match value {
            Ok(value) => validated.push(field.name, value),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(errors)
    }
}

/// Render the diagnostic snapshot of a sanitized record.
pub fn snapshot(schema: &SourceSchema, record: &Record) -> String {
    schema
        .snapshot_columns
        .iter()
        .map(|column| match record.get(column) {
            Some(cell) => format!("{}: {}", column, cell),
            None => format!("{}: {}", column, MISSING),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Validate sanitized records in order, isolating failures per row.
pub fn validate_batch(schema: &SourceSchema, records: &[Record]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, record) in records.iter().enumerate() {
        match validate_record(schema, record) {
            Ok(validated) => outcome.records.push(validated),
            Err(errors) => outcome.errors.push(ValidationError {
                row: FIRST_DATA_ROW + index,
                snapshot: snapshot(schema, record),
                errors,
            }),
        }
    }

    outcome
}
