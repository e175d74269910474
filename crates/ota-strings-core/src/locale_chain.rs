//! Locale fallback chain resolution.
//!
//! Turns a locale preference such as `en-GB` or `pt_BR` into the ordered list
//! of tags used as the lookup search order, most specific first.

/// Tag used when a preference is empty or unparseable.
pub const DEFAULT_LOCALE: &str = "en";

/// Environment variables consulted for the process locale, in priority order.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Build the fallback chain for a locale tag.
///
/// `en-GB` yields `["en-GB", "en"]`, `zh_Hant_TW` yields
/// `["zh-Hant-TW", "zh-Hant", "zh"]`. Underscores are normalized to dashes and
/// empty subtags are ignored.
pub fn resolve_chain(locale_tag: &str) -> Vec<String> {
    let parts: Vec<&str> = locale_tag
        .trim()
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return vec![DEFAULT_LOCALE.to_string()];
    }

    (1..=parts.len()).rev().map(|len| parts[..len].join("-")).collect()
}

/// Fallback chain for the process locale.
pub fn preferred_chain() -> Vec<String> {
    let preference = LOCALE_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty());

    match preference {
        Some(value) => resolve_chain(&posix_locale_to_tag(&value)),
        None => vec![DEFAULT_LOCALE.to_string()],
    }
}

/// Strip encoding and modifier suffixes from a POSIX locale name
/// (`de_DE.UTF-8@euro` -> `de_DE`). `C` and `POSIX` carry no language.
fn posix_locale_to_tag(value: &str) -> String {
    let without_modifier = value.split('@').next().unwrap_or_default();
    let tag = without_modifier.split('.').next().unwrap_or_default().trim();
    if tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
        return String::new();
    }
    tag.to_string()
}
