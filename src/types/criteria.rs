//! Helpers for loosely-typed request fields.
//!
//! Clients send search criteria as strings, numbers, `null`, or not at all,
//! and frequently send `""` to mean "any". Every optional field goes through
//! [`blank_as_none`] so that an absent constraint is always `None`.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::error::SchoolError;

/// Deserialize an optional scalar as `Option<String>`.
///
/// `null`, `""` and whitespace-only strings become `None`; numbers and
/// booleans are stringified.
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Unwrap a required field or report which one is missing.
pub fn required(field: &str, value: Option<String>) -> Result<String, SchoolError> {
    value.ok_or_else(|| SchoolError::validation(format!("Field `{field}` is required.")))
}

/// Parse a required integer field (roll numbers, class numbers sent as text).
pub fn required_int(field: &str, value: Option<String>) -> Result<i64, SchoolError> {
    let raw = required(field, value)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SchoolError::validation(format!("Field `{field}` must be an integer.")))
}

/// Parse a required numeric field.
pub fn required_number(field: &str, value: Option<String>) -> Result<f64, SchoolError> {
    let raw = required(field, value)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| SchoolError::validation(format!("Field `{field}` must be a number.")))
}
