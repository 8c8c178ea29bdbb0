//! Localized strings from the site's placeholders sheet.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::feed::{FeedPayload, FeedRequest, FeedSource};
use crate::filter::FilterLabels;
use crate::pagination::PagerLabels;

/// Key/text pairs with keys normalized to camelCase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: HashMap<String, String>,
}

/// `"No Results"` and `"no-results"` both become `noResults`.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.trim().chars() {
        if ch.is_alphanumeric() {
            if upper_next && !out.is_empty() {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

fn column<'a>(row: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a str> {
    row.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_str())
}

impl Placeholders {
    /// Build from sheet rows with `Key` and `Text` columns. Rows without a
    /// key are skipped.
    pub fn from_payload(payload: &FeedPayload) -> Self {
        let values = payload
            .data
            .iter()
            .filter_map(|row| {
                let key = to_camel_case(column(row, "key")?);
                if key.is_empty() {
                    return None;
                }
                Some((key, column(row, "text").unwrap_or_default().to_string()))
            })
            .collect();
        Self { values }
    }

    /// Fetch the placeholders sheet at `path`. A missing or broken sheet
    /// yields empty placeholders so every lookup falls back.
    pub async fn load(feed: &dyn FeedSource, path: &str) -> Self {
        match feed.fetch(&FeedRequest::new(path)).await {
            Ok(payload) => {
                let placeholders = Self::from_payload(&payload);
                debug!(path, entries = placeholders.len(), "placeholders loaded");
                placeholders
            }
            Err(e) => {
                warn!(path, error = %e, "placeholders unavailable, using defaults");
                Self::default()
            }
        }
    }

    pub fn with(mut self, key: &str, text: &str) -> Self {
        self.values.insert(to_camel_case(key), text.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-blank text for `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.values
            .get(&to_camel_case(key))
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Text for `key`, or `fallback` when absent or blank.
    pub fn get(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or(fallback).to_string()
    }

    pub fn pager_labels(&self) -> PagerLabels {
        let defaults = PagerLabels::default();
        PagerLabels {
            previous: self.get("previous", &defaults.previous),
            next: self.get("next", &defaults.next),
        }
    }

    pub fn filter_labels(&self) -> FilterLabels {
        let defaults = FilterLabels::default();
        FilterLabels {
            all: self.get("all", &defaults.all),
            range: self.get("range", &defaults.range),
        }
    }
}
