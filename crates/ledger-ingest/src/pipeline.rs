//! Pure row processing: sanitize, validate, identify.

use crate::identifier;
use crate::record::{Column, FieldValue, Record, RecordBatch, ValidatedRecord};
use crate::sanitize::sanitize;
use crate::schema::{FieldType, SourceSchema};
use crate::validate::{validate_batch, BatchOutcome};

/// Sanitize then validate raw rows, preserving their order and row numbers.
pub fn process_rows(schema: &SourceSchema, raw: &[Record]) -> BatchOutcome {
    let sanitized: Vec<Record> = raw.iter().map(|record| sanitize(schema, record)).collect();
    validate_batch(schema, &sanitized)
}

/// Assemble the upload batch: schema columns plus the identifier column,
/// when the source has one.
pub fn prepare_batch(schema: &SourceSchema, mut records: Vec<ValidatedRecord>) -> RecordBatch {
    let mut columns: Vec<Column> = schema
        .fields()
        .map(|(field, _)| Column {
            name: field.name,
            ty: field.ty,
        })
        .collect();

    if let Some(spec) = &schema.identifier {
        identifier::assign(spec, &mut records);
        columns.push(Column {
            name: spec.column,
            ty: FieldType::Text,
        });
    }

    RecordBatch {
        columns,
        rows: records,
    }
}

/// Identifier of a prepared row, if it has one
pub fn row_identifier<'a>(schema: &SourceSchema, row: &'a ValidatedRecord) -> Option<&'a str> {
    match row.get(schema.identifier?.column)? {
        FieldValue::Text(id) => Some(id.as_str()),
        _ => None,
    }
}
