//! Environment variable helpers
//!
//! Configuration is read once at startup. Blank values count as unset, and a
//! value that is present but unparseable is an error rather than a silent
//! fallback to the default.

use crate::error::{CommonError, Result};
use std::str::FromStr;

/// Read an optional variable. Unset and blank values both yield `None`.
pub fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable that must be present and non-blank.
pub fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| CommonError::MissingVar(name.to_string()))
}

/// Read and parse a variable, falling back to `default` when it is unset.
pub fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| CommonError::InvalidVar {
            name: name.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
