//! Decoders for manifest and locale bundle payloads.
//!
//! Both parsers work on `serde_json::Value` rather than typed structs because
//! the server has shipped several schema shapes over time and partial
//! payloads must degrade entry by entry instead of failing as a whole.

mod manifest;
mod payload;

pub use manifest::parse_manifest;
pub use payload::parse_locale_payload;

use ota_strings_types::ParseError;
use serde_json::{Map, Value};

/// Decode text and require an object root; `on_non_object` is returned for
/// any other JSON root.
fn parse_object_root(
    raw: &str,
    on_non_object: ParseError,
) -> Result<Map<String, Value>, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ParseError::from_json_error(&e))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(on_non_object),
    }
}
