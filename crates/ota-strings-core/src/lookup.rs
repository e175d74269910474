//! In-memory locale tables queried on every string lookup.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Key -> string table for one locale.
pub type LocaleTable = HashMap<String, String>;

/// Thread-safe mapping from locale tag to its table.
///
/// Readers take a shared lock and never block each other. Writers replace a
/// whole table (or the whole map) behind an `Arc`, so a reader sees either the
/// old table or the new one, never a mix.
#[derive(Debug, Default)]
pub struct LookupSnapshot {
    tables: RwLock<HashMap<String, Arc<LocaleTable>>>,
}

impl LookupSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a complete set of tables.
    pub fn replace_all(&self, tables: HashMap<String, LocaleTable>) {
        let tables = tables.into_iter().map(|(tag, table)| (tag, Arc::new(table))).collect();
        *self.tables.write() = tables;
    }

    /// Swap one locale's table.
    pub fn set_locale(&self, locale_tag: impl Into<String>, table: LocaleTable) {
        let table = Arc::new(table);
        self.tables.write().insert(locale_tag.into(), table);
    }

    /// First value for `key` along `chain`, most specific tag first.
    pub fn value<S: AsRef<str>>(&self, key: &str, chain: &[S]) -> Option<String> {
        let tables = self.tables.read();
        chain
            .iter()
            .filter_map(|tag| tables.get(tag.as_ref()))
            .find_map(|table| table.get(key))
            .cloned()
    }

    pub fn table(&self, locale_tag: &str) -> Option<Arc<LocaleTable>> {
        self.tables.read().get(locale_tag).cloned()
    }

    pub fn locales(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    pub fn clear(&self) {
        self.tables.write().clear();
    }
}
