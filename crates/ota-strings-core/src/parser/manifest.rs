//! Manifest parser tolerant of every locale-list shape the server has used.

use ota_strings_types::{LocaleDescriptor, Manifest, ParseError};
use serde_json::{Map, Value};
use url::Url;

use super::parse_object_root;

/// Fields that may hold the locale list, in priority order.
const CONTAINER_FIELDS: [&str; 3] = ["locales", "translations", "bundles"];
/// Fields that may hold the revision, in priority order.
const REVISION_FIELDS: [&str; 2] = ["revision", "version"];
const TAG_FIELDS: [&str; 3] = ["locale", "code", "language"];
const ETAG_FIELDS: [&str; 2] = ["etag", "version"];
const URL_FIELDS: [&str; 2] = ["url", "resource_url"];

/// Decode a manifest payload.
///
/// Accepted locale-list shapes:
/// - an array of descriptor objects, each carrying its own tag
/// - an object keyed by tag whose values are descriptor objects
/// - an object keyed by tag whose values are anything else (tag-only entries)
///
/// Entries without a resolvable tag are dropped; the revision defaults to 0.
/// Only a non-object root fails.
pub fn parse_manifest(raw: &str) -> Result<Manifest, ParseError> {
    let root = parse_object_root(raw, ParseError::InvalidManifest)?;

    let revision = REVISION_FIELDS.iter().find_map(|field| int_value(root.get(*field))).unwrap_or(0);
    let locales = parse_locales(&root);

    Ok(Manifest { revision, locales })
}

fn parse_locales(root: &Map<String, Value>) -> Vec<LocaleDescriptor> {
    let container = CONTAINER_FIELDS.iter().find_map(|field| root.get(*field));

    match container {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(fields) => parse_descriptor(fields, None),
                _ => None,
            })
            .collect(),
        Some(Value::Object(keyed)) => keyed
            .iter()
            .filter_map(|(tag, value)| match value {
                Value::Object(fields) => parse_descriptor(fields, Some(tag.as_str())),
                _ if tag.is_empty() => None,
                _ => Some(LocaleDescriptor::tag_only(tag.clone())),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_descriptor(fields: &Map<String, Value>, fallback_tag: Option<&str>) -> Option<LocaleDescriptor> {
    let locale = first_string(fields, &TAG_FIELDS)
        .or_else(|| fallback_tag.map(str::to_string))
        .filter(|tag| !tag.is_empty())?;

    let etag = first_string(fields, &ETAG_FIELDS);
    let url = first_string(fields, &URL_FIELDS).and_then(|raw| Url::parse(&raw).ok());

    Some(LocaleDescriptor { locale, etag, url })
}

fn first_string(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| string_value(fields.get(*name)))
}

fn string_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)
        }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
