//! Record sanitizer
//!
//! Normalizes one raw sheet row before validation. Every column of the raw
//! row is carried over; the fields named by the schema are rewritten
//! according to their [`Clean`] rule and type:
//!
//! - currency: `$`, `,` and surrounding whitespace removed; a blank required
//!   amount becomes `"0"`, a blank optional amount becomes NULL
//! - code: rendered as trimmed text, `"0"` when the column is absent
//! - date / datetime: see [`dates::normalize_date`]; failures become NULL
//! - everything else: text is trimmed, optional blanks become NULL
//!
//! Sanitizing never fails. Bad values surface later as validation errors.

pub mod dates;

use crate::record::{Cell, Record};
use crate::schema::{Clean, FieldSpec, SourceSchema};
use dates::DateOutcome;
use tracing::{debug, warn};

pub fn sanitize(schema: &SourceSchema, raw: &Record) -> Record {
    let mut record = raw.clone();

    for (field, required) in schema.fields() {
        let current = raw.get(field.name);
        if let Some(cell) = clean_field(field, required, current) {
            record.insert(field.name, cell);
        }
    }

    record
}

/// New value for one field, or `None` to leave the column as it is.
fn clean_field(field: &FieldSpec, required: bool, current: Option<&Cell>) -> Option<Cell> {
    match field.clean {
        Clean::Currency => {
            let text = current.map(Cell::to_text).unwrap_or_default();
            let stripped = strip_currency(&text);
            Some(match (stripped.is_empty(), required) {
                (true, true) => Cell::text("0"),
                (true, false) => Cell::Null,
                (false, _) => Cell::Text(stripped),
            })
        },
        Clean::Code => Some(match current {
            Some(cell) => Cell::text(cell.to_text().trim()),
            None => Cell::text("0"),
        }),
        Clean::Standard if field.ty.is_temporal() => {
            let text = current.map(Cell::to_text).unwrap_or_default();
            let outcome = dates::normalize_date(&text);
            if let DateOutcome::Failed { reason, .. } = &outcome {
                if outcome.needs_operator_notice() {
                    warn!(
                        "Date conversion failed for '{}' in {}: {}",
                        text.trim(),
                        field.name,
                        reason
                    );
                } else {
                    debug!(field = field.name, value = %text.trim(), %reason, "unparseable date");
                }
            }
            Some(outcome.into_value().map(Cell::Text).unwrap_or(Cell::Null))
        },
        Clean::Standard => {
            let cell = current?;
            if !required && cell.is_blank() {
                return Some(Cell::Null);
            }
            match cell {
                Cell::Text(s) => Some(Cell::text(s.trim())),
                _ => None,
            }
        },
    }
}

fn strip_currency(value: &str) -> String {
    value.replace(['$', ','], "").trim().to_string()
}
