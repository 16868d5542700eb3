//! Spreadsheet date normalization
//!
//! Sheets hand dates back in whatever display format the column uses. The
//! recognised shapes are rewritten to ISO-8601 (`YYYY-MM-DDTHH:MM:SS`);
//! anything without a slash or an AM/PM marker is passed through untouched
//! and left for the validator to judge.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Result of normalizing one date cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutcome {
    /// Blank input
    Empty,
    /// Recognised and rewritten as ISO-8601
    Normalized(String),
    /// Not a recognised display format; returned as-is
    PassedThrough(String),
    /// Looked like a display format but did not parse
    Failed {
        /// True when the value carried an AM/PM marker
        meridiem: bool,
        reason: String,
    },
}

impl DateOutcome {
    /// Text to store in the sanitized record; `None` means NULL.
    pub fn into_value(self) -> Option<String> {
        match self {
            DateOutcome::Normalized(v) | DateOutcome::PassedThrough(v) => Some(v),
            DateOutcome::Empty | DateOutcome::Failed { .. } => None,
        }
    }

    /// AM/PM timestamps are written by hand, so their failures are reported
    /// to the operator straight away. Other failures only surface through
    /// validation.
    pub fn needs_operator_notice(&self) -> bool {
        matches!(self, DateOutcome::Failed { meridiem: true, .. })
    }
}

pub fn normalize_date(raw: &str) -> DateOutcome {
    let value = raw.trim();
    if value.is_empty() {
        return DateOutcome::Empty;
    }

    let upper = value.to_uppercase();
    if upper.contains("AM") || upper.contains("PM") {
        if !has_four_digit_year(value) {
            return short_year(true);
        }
        let date_part = if value.contains('-') { "%Y-%m-%d" } else { "%m/%d/%Y" };
        let format = format!("{} %I:%M:%S %p", date_part);
        return match NaiveDateTime::parse_from_str(value, &format) {
            Ok(dt) => DateOutcome::Normalized(iso(dt)),
            Err(e) => DateOutcome::Failed {
                meridiem: true,
                reason: e.to_string(),
            },
        };
    }

    if value.contains('/') {
        if !has_four_digit_year(value) {
            return short_year(false);
        }
        let parsed = if value.contains(' ') {
            NaiveDateTime::parse_from_str(value, "%m/%d/%Y %H:%M:%S")
        } else {
            NaiveDate::parse_from_str(value, "%m/%d/%Y").map(|d| d.and_time(NaiveTime::MIN))
        };
        return match parsed {
            Ok(dt) => DateOutcome::Normalized(iso(dt)),
            Err(e) => DateOutcome::Failed {
                meridiem: false,
                reason: e.to_string(),
            },
        };
    }

    DateOutcome::PassedThrough(value.to_string())
}

/// chrono's `%Y` accepts any digit count, so `1/20/26` would land in year 26.
fn has_four_digit_year(value: &str) -> bool {
    let date = value.split_whitespace().next().unwrap_or_default();
    let year = if date.contains('-') {
        date.split('-').next()
    } else {
        date.split('/').nth(2)
    };
    year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

fn short_year(meridiem: bool) -> DateOutcome {
    DateOutcome::Failed {
        meridiem,
        reason: "year must have four digits".to_string(),
    }
}

fn iso(dt: NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn normalized(s: &str) -> DateOutcome {
        DateOutcome::Normalized(s.to_string())
    }

    #[test]
    fn test_slash_date() {
        assert_eq!(normalize_date("1/20/2026"), normalized("2026-01-20T00:00:00"));
        assert_eq!(normalize_date(" 01/20/2026 "), normalized("2026-01-20T00:00:00"));
    }

    #[test]
    fn test_slash_datetime() {
        assert_eq!(normalize_date("01/20/2026 14:30:00"), normalized("2026-01-20T14:30:00"));
    }

    #[test]
    fn test_meridiem() {
        assert_eq!(normalize_date("2026-04-02 09:15:00 AM"), normalized("2026-04-02T09:15:00"));
        assert_eq!(normalize_date("4/2/2026 9:15:00 PM"), normalized("2026-04-02T21:15:00"));
        assert_eq!(normalize_date("2026-04-02 12:00:00 am"), normalized("2026-04-02T00:00:00"));
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(
            normalize_date("2026-01-20"),
            DateOutcome::PassedThrough("2026-01-20".to_string())
        );
        assert_eq!(
            normalize_date("not a date"),
            DateOutcome::PassedThrough("not a date".to_string())
        );
    }

    #[test]
    fn test_failures_become_null() {
        let slash = normalize_date("13/45/2026");
        assert!(matches!(slash, DateOutcome::Failed { meridiem: false, .. }));
        assert_eq!(slash.into_value(), None);

        for short in ["1/20/26", "1/20/226", "01/20/26 14:30:00", "1/20/20260"] {
            let outcome = normalize_date(short);
            assert!(
                matches!(outcome, DateOutcome::Failed { meridiem: false, .. }),
                "{short} parsed as {outcome:?}"
            );
        }
        assert!(matches!(
            normalize_date("4/2/26 9:15:00 PM"),
            DateOutcome::Failed { meridiem: true, .. }
        ));
        assert!(matches!(
            normalize_date("226-04-02 09:15:00 AM"),
            DateOutcome::Failed { meridiem: true, .. }
        ));

        let meridiem = normalize_date("2026-04-02 25:99 PM");
        assert!(matches!(meridiem, DateOutcome::Failed { meridiem: true, .. }));
        assert_eq!(meridiem.into_value(), None);
    }

    #[test]
    fn test_only_meridiem_failures_notify_operator() {
        assert!(normalize_date("4/2/2026 9:75:00 PM").needs_operator_notice());
        assert!(normalize_date("4/2/26 9:15:00 PM").needs_operator_notice());
        assert!(!normalize_date("13/45/2026").needs_operator_notice());
        assert!(!normalize_date("4/2/2026 9:15:00 PM").needs_operator_notice());
        assert!(!normalize_date("").needs_operator_notice());
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_date("   "), DateOutcome::Empty);
        assert_eq!(normalize_date("").into_value(), None);
    }
}
