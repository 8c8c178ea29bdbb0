//! Tabular item feeds.
//!
//! A feed is a JSON sheet of the form `{ "data": [ { field: value, ... } ] }`.
//! Rows become [`Item`]s, each with an identity assigned at load time.

mod cache;
mod http;
mod item;
mod static_source;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

pub use cache::CachedFeedSource;
pub use http::HttpFeedSource;
pub use item::{Item, ItemKey};
pub use static_source::StaticFeedSource;

use crate::error::BlockResult;

/// Default item index published by the site.
pub const DEFAULT_SOURCE: &str = "/query-index.json";

/// A request for one sheet of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedRequest {
    /// Path of the JSON resource, relative to the site origin.
    pub source: String,
    /// Named sheet within a multi-sheet resource.
    pub sheet: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl FeedRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sheet: None,
            offset: None,
            limit: None,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Source path with `sheet`, `offset` and `limit` as query parameters.
    pub fn to_path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(sheet) = &self.sheet {
            query.append_pair("sheet", sheet);
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        let query = query.finish();
        if query.is_empty() {
            self.source.clone()
        } else if self.source.contains('?') {
            format!("{}&{query}", self.source)
        } else {
            format!("{}?{query}", self.source)
        }
    }
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

/// Decoded feed payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl FeedPayload {
    pub fn from_rows(data: Vec<Map<String, Value>>) -> Self {
        Self {
            total: Some(data.len() as u64),
            data,
            offset: None,
            limit: None,
        }
    }

    /// Convert rows into items, assigning each a fresh identity.
    pub fn into_items(self) -> Vec<Item> {
        self.data.into_iter().map(Item::new).collect()
    }
}

/// A source of feed payloads.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one sheet. A single attempt; failures are returned, not retried.
    async fn fetch(&self, request: &FeedRequest) -> BlockResult<FeedPayload>;

    /// Fetch one sheet and convert its rows into items.
    async fn fetch_items(&self, request: &FeedRequest) -> BlockResult<Vec<Item>> {
        Ok(self.fetch(request).await?.into_items())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_request_targets_query_index() {
        let req = FeedRequest::default();
        assert_eq!(req.to_path(), "/query-index.json");
    }

    #[test]
    fn request_path_carries_sheet_and_paging() {
        let req = FeedRequest::new("/events.json")
            .with_sheet("upcoming events")
            .with_limit(500);
        assert_eq!(req.to_path(), "/events.json?sheet=upcoming+events&limit=500");
    }

    #[test]
    fn request_path_extends_existing_query() {
        let req = FeedRequest::new("/index.json?lang=en").with_sheet("news");
        assert_eq!(req.to_path(), "/index.json?lang=en&sheet=news");
    }

    #[test]
    fn payload_tolerates_missing_paging_fields() {
        let payload: FeedPayload =
            serde_json::from_str(r#"{"data":[{"title":"a"},{"title":"b"}]}"#).unwrap();
        assert_eq!(payload.data.len(), 2);
        assert!(payload.total.is_none());

        let items = payload.into_items();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0].key(), items[1].key());
    }
}
