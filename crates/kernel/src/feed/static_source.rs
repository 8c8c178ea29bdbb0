//! In-memory feed source.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{FeedPayload, FeedRequest, FeedSource};
use crate::error::{BlockError, BlockResult};

/// Serves fixed payloads keyed by source path and sheet name.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    payloads: HashMap<(String, Option<String>), FeedPayload>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload for `source` (optionally restricted to one sheet).
    pub fn with_payload(mut self, source: &str, sheet: Option<&str>, payload: FeedPayload) -> Self {
        self.payloads
            .insert((source.to_string(), sheet.map(str::to_string)), payload);
        self
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self, request: &FeedRequest) -> BlockResult<FeedPayload> {
        let exact = (request.source.clone(), request.sheet.clone());
        let any_sheet = (request.source.clone(), None);
        self.payloads
            .get(&exact)
            .or_else(|| self.payloads.get(&any_sheet))
            .cloned()
            .ok_or_else(|| BlockError::MissingSource(request.to_path()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(title: &str) -> FeedPayload {
        FeedPayload::from_rows(vec![json!({"title": title}).as_object().cloned().unwrap()])
    }

    #[tokio::test]
    async fn sheet_specific_payload_wins() {
        let source = StaticFeedSource::new()
            .with_payload("/index.json", None, payload("any"))
            .with_payload("/index.json", Some("news"), payload("news"));

        let news = source
            .fetch(&FeedRequest::new("/index.json").with_sheet("news"))
            .await
            .unwrap();
        assert_eq!(news.data[0]["title"], "news");

        let other = source
            .fetch(&FeedRequest::new("/index.json").with_sheet("events"))
            .await
            .unwrap();
        assert_eq!(other.data[0]["title"], "any");
    }

    #[tokio::test]
    async fn unknown_source_is_an_error() {
        let err = StaticFeedSource::new()
            .fetch(&FeedRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlockError::MissingSource(_)));
    }
}
