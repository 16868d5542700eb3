//! Field coercions
//!
//! Pure functions from a present, non-NULL [`Cell`] to a typed
//! [`FieldValue`]. Presence and blank checks happen in the validator before
//! any of these run.

use crate::record::{Cell, FieldValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const I64_MIN_F64: f64 = i64::MIN as f64;
const I64_MAX_F64: f64 = i64::MAX as f64;

pub fn integer(cell: &Cell) -> Result<FieldValue, String> {
    match cell {
        Cell::Integer(v) => Ok(FieldValue::Integer(*v)),
        Cell::Float(v) if v.is_finite() && v.fract() != 0.0 => {
            Err("Input should be a valid integer, got a number with a fractional part".to_string())
        },
        // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound.
        Cell::Float(v) if (I64_MIN_F64..I64_MAX_F64).contains(v) => {
            Ok(FieldValue::Integer(*v as i64))
        },
        Cell::Float(_) => Err("Input should be a valid integer, number out of range".to_string()),
        Cell::Text(s) => parse_integer_text(s.trim()).map(FieldValue::Integer).ok_or_else(|| {
            "Input should be a valid integer, unable to parse string as an integer".to_string()
        }),
        Cell::Bool(_) | Cell::Null => Err("Input should be a valid integer".to_string()),
    }
}

/// Accepts `"42"`, `"-7"` and zero fractions such as `"6100.0"`.
fn parse_integer_text(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let (whole, fraction) = s.split_once('.')?;
    if whole.is_empty() || !fraction.chars().all(|c| c == '0') {
        return None;
    }
    whole.parse().ok()
}

pub fn decimal(cell: &Cell) -> Result<FieldValue, String> {
    match cell {
        Cell::Integer(v) => Ok(FieldValue::Decimal(*v as f64)),
        Cell::Float(v) => Ok(FieldValue::Decimal(*v)),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Decimal)
            .map_err(|_| "Input should be a valid number, unable to parse string as a number".to_string()),
        Cell::Bool(_) | Cell::Null => Err("Input should be a valid number".to_string()),
    }
}

pub fn text(cell: &Cell) -> Result<FieldValue, String> {
    match cell {
        Cell::Null => Err("Input should be a valid string".to_string()),
        Cell::Text(s) => Ok(FieldValue::Text(s.trim().to_string())),
        other => Ok(FieldValue::Text(other.to_text())),
    }
}

pub fn boolean(cell: &Cell) -> Result<FieldValue, String> {
    match cell {
        Cell::Bool(v) => Ok(FieldValue::Boolean(*v)),
        _ => Err("Input should be a valid boolean".to_string()),
    }
}

/// Boolean as written by sheet formulas: `TRUE`/`FALSE` in any case.
/// Numbers count as true when non-zero.
pub fn sheet_boolean(cell: &Cell) -> Result<FieldValue, String> {
    match cell {
        Cell::Bool(v) => Ok(FieldValue::Boolean(*v)),
        Cell::Integer(v) => Ok(FieldValue::Boolean(*v != 0)),
        Cell::Float(v) => Ok(FieldValue::Boolean(*v != 0.0)),
        Cell::Text(s) => match s.trim().to_uppercase().as_str() {
            "TRUE" => Ok(FieldValue::Boolean(true)),
            "FALSE" => Ok(FieldValue::Boolean(false)),
            _ => Err("Input should be a valid boolean, unable to interpret input".to_string()),
        },
        Cell::Null => Err("Input should be a valid boolean".to_string()),
    }
}

pub fn date(cell: &Cell) -> Result<FieldValue, String> {
    let Cell::Text(s) = cell else {
        return Err("Input should be a valid date".to_string());
    };
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(FieldValue::Date(d));
    }

    match parse_datetime_text(s) {
        Some(dt) if dt.time() == NaiveTime::MIN => Ok(FieldValue::Date(dt.date())),
        Some(_) => Err(
            "Datetimes provided to dates should have zero time - e.g. be exact dates".to_string(),
        ),
        None => Err("Input should be a valid date or datetime, invalid date format".to_string()),
    }
}

pub fn datetime(cell: &Cell) -> Result<FieldValue, String> {
    let Cell::Text(s) = cell else {
        return Err("Input should be a valid datetime".to_string());
    };
    let s = s.trim();

    if let Some(dt) = parse_datetime_text(s) {
        return Ok(FieldValue::DateTime(dt));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| FieldValue::DateTime(d.and_time(NaiveTime::MIN)))
        .map_err(|_| "Input should be a valid datetime, invalid datetime format".to_string())
}

/// ISO-like date-time text. Offsets are normalised to UTC.
fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_integer_variants() {
        assert_eq!(integer(&Cell::Integer(6100)), Ok(FieldValue::Integer(6100)));
        assert_eq!(integer(&Cell::text(" 6100 ")), Ok(FieldValue::Integer(6100)));
        assert_eq!(integer(&Cell::text("6100.0")), Ok(FieldValue::Integer(6100)));
        assert_eq!(integer(&Cell::Float(12.0)), Ok(FieldValue::Integer(12)));
        assert_eq!(integer(&Cell::text("0")), Ok(FieldValue::Integer(0)));
    }

    #[test]
    fn test_integer_rejects() {
        assert!(integer(&Cell::text("61a0")).is_err());
        assert!(integer(&Cell::text("12.5")).is_err());
        assert!(integer(&Cell::text(".0")).is_err());
        assert!(integer(&Cell::Float(12.5)).unwrap_err().contains("fractional"));
        assert!(integer(&Cell::Bool(true)).is_err());
    }

    #[test]
    fn test_integer_rejects_out_of_range_numbers() {
        // 12345678901234567890 as numericised from the sheet
        let err = integer(&Cell::Float(1.2345678901234567e19)).unwrap_err();
        assert!(err.contains("out of range"));
        assert!(integer(&Cell::Float(-1.0e19)).is_err());
        assert!(integer(&Cell::Float(i64::MAX as f64)).is_err());
        assert!(integer(&Cell::Float(f64::INFINITY)).is_err());
        assert!(integer(&Cell::text("12345678901234567890")).is_err());

        assert_eq!(
            integer(&Cell::Float(i64::MIN as f64)),
            Ok(FieldValue::Integer(i64::MIN))
        );
        assert_eq!(
            integer(&Cell::Float(9.0e15)),
            Ok(FieldValue::Integer(9_000_000_000_000_000))
        );
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(&Cell::text("1234.50")), Ok(FieldValue::Decimal(1234.5)));
        assert_eq!(decimal(&Cell::Integer(3)), Ok(FieldValue::Decimal(3.0)));
        assert_eq!(decimal(&Cell::text("0")), Ok(FieldValue::Decimal(0.0)));
        assert!(decimal(&Cell::text("twelve")).is_err());
    }

    #[test]
    fn test_text_trims_and_renders() {
        assert_eq!(text(&Cell::text("  Office  ")), Ok(FieldValue::Text("Office".into())));
        assert_eq!(text(&Cell::Integer(42)), Ok(FieldValue::Text("42".into())));
    }

    #[test]
    fn test_sheet_boolean() {
        assert_eq!(sheet_boolean(&Cell::text("TRUE")), Ok(FieldValue::Boolean(true)));
        assert_eq!(sheet_boolean(&Cell::text("false")), Ok(FieldValue::Boolean(false)));
        assert_eq!(sheet_boolean(&Cell::Bool(true)), Ok(FieldValue::Boolean(true)));
        assert_eq!(sheet_boolean(&Cell::Integer(0)), Ok(FieldValue::Boolean(false)));
        assert!(sheet_boolean(&Cell::text("maybe")).is_err());
    }

    #[test]
    fn test_date_accepts_plain_and_midnight() {
        assert_eq!(date(&Cell::text("2026-01-20")), Ok(FieldValue::Date(ymd(2026, 1, 20))));
        assert_eq!(
            date(&Cell::text("2026-01-20T00:00:00")),
            Ok(FieldValue::Date(ymd(2026, 1, 20)))
        );
    }

    #[test]
    fn test_date_rejects_time_and_garbage() {
        assert!(date(&Cell::text("2026-01-20T14:30:00")).unwrap_err().contains("zero time"));
        assert!(date(&Cell::text("next tuesday")).is_err());
        assert!(date(&Cell::Integer(45000)).is_err());
    }

    #[test]
    fn test_datetime_formats() {
        let expected = FieldValue::DateTime(ymd(2026, 1, 20).and_hms_opt(14, 30, 0).unwrap());
        assert_eq!(datetime(&Cell::text("2026-01-20T14:30:00")), Ok(expected.clone()));
        assert_eq!(datetime(&Cell::text("2026-01-20 14:30:00")), Ok(expected.clone()));
        assert_eq!(datetime(&Cell::text("2026-01-20T14:30")), Ok(expected.clone()));
        assert_eq!(datetime(&Cell::text("2026-01-20T16:30:00+02:00")), Ok(expected));
        assert_eq!(
            datetime(&Cell::text("2026-01-20")),
            Ok(FieldValue::DateTime(ymd(2026, 1, 20).and_hms_opt(0, 0, 0).unwrap()))
        );
        assert!(datetime(&Cell::text("20/01/2026")).is_err());
    }
}
