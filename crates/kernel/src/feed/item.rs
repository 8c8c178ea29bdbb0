//! Feed records.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of an item, assigned once when the record is loaded.
///
/// Two loads of the same row yield different keys, so caches keyed by
/// `ItemKey` follow record identity rather than record content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

/// A feed row plus the fields render adapters attach to it.
#[derive(Debug, Clone)]
pub struct Item {
    key: ItemKey,
    fields: Map<String, Value>,
    derived: BTreeMap<String, String>,
    /// Verdict of the latest filter pass.
    pub matches: bool,
}

impl Item {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            key: ItemKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed)),
            fields,
            derived: BTreeMap::new(),
            matches: true,
        }
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field rendered as text. Null and missing fields are `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Text of a field, or an empty string.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Attach a derived field.
    pub fn derive(&mut self, name: &str, value: impl Into<String>) {
        self.derived.insert(name.to_string(), value.into());
    }

    pub fn derived(&self, name: &str) -> Option<&str> {
        self.derived.get(name).map(String::as_str)
    }
}
