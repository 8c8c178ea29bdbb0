//! Per-block configuration, read from a TOML file.
//!
//! ```toml
//! [blocks.news]
//! kind = "news"
//! source = "/news/query-index.json"
//! filters = "/news/filters.json"
//! limit = 6
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::{self, EventsMode};
use crate::feed::{DEFAULT_SOURCE, FeedRequest, Item};
use crate::list::ItemTemplate;

/// Default page size.
pub const DEFAULT_LIMIT: usize = 10;

/// Content a list block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    News,
    Events,
}

impl BlockKind {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Events => "events",
        }
    }

    /// Order, window and decorate freshly loaded items.
    pub fn prepare(self, mut items: Vec<Item>, today: NaiveDate, mode: EventsMode) -> Vec<Item> {
        match self {
            Self::News => {
                adapters::news::prepare(&mut items);
                items
            }
            Self::Events => adapters::events::prepare(items, today, mode),
        }
    }

    pub fn template(self) -> ItemTemplate {
        match self {
            Self::News => adapters::news::render_card,
            Self::Events => adapters::events::render_card,
        }
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Configuration of one list block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Taken from the table key.
    #[serde(skip)]
    pub name: String,
    pub kind: BlockKind,
    /// Item feed path.
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub sheet: Option<String>,
    /// Items per page; 0 shows everything.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Filter authoring sheet. Without one the block has no filters.
    #[serde(default)]
    pub filters: Option<String>,
    #[serde(default)]
    pub filters_sheet: Option<String>,
    #[serde(default)]
    pub mode: EventsMode,
    /// Overrides the `noResults` placeholder.
    #[serde(default)]
    pub no_results: Option<String>,
    /// Page the block lives on; pager links point here.
    #[serde(default)]
    pub path: Option<String>,
}

impl BlockConfig {
    pub fn new(name: &str, kind: BlockKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source: default_source(),
            sheet: None,
            limit: DEFAULT_LIMIT,
            filters: None,
            filters_sheet: None,
            mode: EventsMode::default(),
            no_results: None,
            path: None,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_filters(mut self, filters: &str) -> Self {
        self.filters = Some(filters.to_string());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_mode(mut self, mode: EventsMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn feed_request(&self) -> FeedRequest {
        let request = FeedRequest::new(&self.source);
        match &self.sheet {
            Some(sheet) => request.with_sheet(sheet),
            None => request,
        }
    }

    pub fn filters_request(&self) -> Option<FeedRequest> {
        let request = FeedRequest::new(self.filters.as_deref()?);
        Some(match &self.filters_sheet {
            Some(sheet) => request.with_sheet(sheet),
            None => request,
        })
    }

    pub fn page_path(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| format!("/{}", self.name))
    }
}

/// Every configured block, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    blocks: BTreeMap<String, BlockConfig>,
}

impl BlocksConfig {
    pub fn from_toml_str(input: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(input).context("invalid blocks configuration")?;
        for (name, block) in &mut config.blocks {
            block.name.clone_from(name);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&input).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn insert(&mut self, block: BlockConfig) {
        self.blocks.insert(block.name.clone(), block);
    }

    pub fn get(&self, name: &str) -> Option<&BlockConfig> {
        self.blocks.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.blocks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
