//! Input validation and lenient decoding helpers for action props.
//!
//! Required fields are checked before any outbound call is made.

use crate::error::ConnectorError;
use serde::{Deserialize, Deserializer};

/// Fails with [`ConnectorError::MissingField`] if `value` is blank.
pub fn require(field: &str, value: &str) -> Result<(), ConnectorError> {
    if value.trim().is_empty() {
        return Err(ConnectorError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Fails if a list field has no entries.
pub fn require_list(field: &str, values: &[String]) -> Result<(), ConnectorError> {
    if values.iter().all(|v| v.trim().is_empty()) {
        return Err(ConnectorError::MissingField(field.to_string()));
    }
    Ok(())
}

/// Splits a comma separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns `None` for blank strings.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Deserializes an id given either as a string or a number.
///
/// Use with `#[serde(default, deserialize_with = "input::string_or_number")]`.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(StringOrNumber::into_string)
        .unwrap_or_default())
}

/// Optional variant of [`string_or_number`].
pub fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

/// Deserializes a list given either as a JSON array or a comma separated string.
pub fn list_or_csv<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<ListOrCsv>::deserialize(deserializer)? {
        Some(ListOrCsv::List(items)) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(ListOrCsv::Csv(raw)) => split_list(&raw),
        None => Vec::new(),
    })
}
