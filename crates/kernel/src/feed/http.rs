//! Feed source backed by HTTP.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{FeedPayload, FeedRequest, FeedSource};
use crate::error::{BlockError, BlockResult};

/// Fetches sheets from a site origin with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    origin: Url,
}

impl HttpFeedSource {
    /// Create a source resolving request paths against `origin`.
    pub fn new(origin: &str) -> BlockResult<Self> {
        let origin = Url::parse(origin).map_err(|source| BlockError::FeedUrl {
            url: origin.to_string(),
            source,
        })?;
        Ok(Self {
            client: Client::new(),
            origin,
        })
    }

    /// Absolute URL for a request.
    pub fn url_for(&self, request: &FeedRequest) -> BlockResult<Url> {
        let path = request.to_path();
        self.origin
            .join(&path)
            .map_err(|source| BlockError::FeedUrl { url: path, source })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, request: &FeedRequest) -> BlockResult<FeedPayload> {
        let url = self.url_for(request)?;
        debug!(url = %url, "fetching feed");

        let payload = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<FeedPayload>()
            .await?;

        debug!(url = %url, rows = payload.data.len(), "feed fetched");
        Ok(payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_against_origin() {
        let source = HttpFeedSource::new("https://www.example.com/en/").unwrap();
        let url = source
            .url_for(&FeedRequest::default().with_sheet("news"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.example.com/query-index.json?sheet=news"
        );
    }

    #[test]
    fn rejects_invalid_origin() {
        let err = HttpFeedSource::new("not a url").unwrap_err();
        assert!(matches!(err, BlockError::FeedUrl { .. }));
    }
}
