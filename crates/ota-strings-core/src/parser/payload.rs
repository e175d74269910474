//! Locale bundle payload parser.

use std::collections::HashMap;

use ota_strings_types::ParseError;
use serde_json::Value;

use super::parse_object_root;

/// Decode a flat locale payload into a key -> string table.
///
/// Strings are kept as-is and numbers are rendered in their canonical JSON
/// form. Objects, arrays, booleans and nulls are dropped without failing the
/// bundle.
pub fn parse_locale_payload(raw: &str) -> Result<HashMap<String, String>, ParseError> {
    let root = parse_object_root(raw, ParseError::InvalidLocalePayload)?;

    let values = root
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            _ => None,
        })
        .collect();

    Ok(values)
}
