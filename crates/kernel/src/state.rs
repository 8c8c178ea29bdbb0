//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::block::{BlocksConfig, render_block};
use crate::config::Config;
use crate::error::{BlockError, BlockResult};
use crate::feed::{CachedFeedSource, FeedSource, HttpFeedSource};
use crate::i18n::Placeholders;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    blocks: BlocksConfig,
    feed: Arc<dyn FeedSource>,
}

impl AppState {
    /// Load the block configuration and connect the cached HTTP feed.
    pub fn new(config: &Config) -> Result<Self> {
        let blocks = BlocksConfig::load(&config.blocks_config)?;
        let http = HttpFeedSource::new(&config.site_origin)
            .context("failed to create feed client")?;
        let feed = CachedFeedSource::new(http, config.feed_cache_ttl);

        info!(
            blocks = blocks.len(),
            origin = %config.site_origin,
            "block configuration loaded"
        );
        Ok(Self::with_parts(config.clone(), blocks, Arc::new(feed)))
    }

    /// Assemble state from already built parts.
    pub fn with_parts(config: Config, blocks: BlocksConfig, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                blocks,
                feed,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn blocks(&self) -> &BlocksConfig {
        &self.inner.blocks
    }

    pub fn feed(&self) -> &dyn FeedSource {
        self.inner.feed.as_ref()
    }

    /// Render block `name` for `query` as of today.
    pub async fn render(&self, name: &str, query: &str) -> BlockResult<String> {
        self.render_on(name, query, Local::now().date_naive()).await
    }

    /// Render block `name` for `query` as of `today`.
    pub async fn render_on(&self, name: &str, query: &str, today: NaiveDate) -> BlockResult<String> {
        let config = self
            .blocks()
            .get(name)
            .ok_or_else(|| BlockError::UnknownBlock(name.to_string()))?;
        let placeholders = Placeholders::load(self.feed(), &self.config().placeholders_path).await;
        render_block(config, self.feed(), &placeholders, query, today).await
    }
}
