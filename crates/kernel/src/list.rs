//! List rendering with per-item node reuse.
//!
//! Rendered item nodes are cached by [`ItemKey`], i.e. by record identity.
//! A record mutated after its first render keeps its old node; only a
//! freshly loaded record (new key) is rendered again.

use std::collections::HashMap;

use tracing::debug;

use crate::dom::{Document, NodeId};
use crate::feed::{Item, ItemKey};
use crate::pagination::{Pager, PagerLabels, PaginationState, page_window, render_pager};

/// Renders one item into a detached node.
pub type ItemTemplate = fn(&mut Document, &Item) -> NodeId;

/// Presentation options for a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Path used for pager links.
    pub path: String,
    /// Current query string, preserved in pager links.
    pub query: String,
    /// Shown when no item matches.
    pub no_results: Option<String>,
    pub labels: PagerLabels,
}

/// What a render pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub matching: usize,
    pub shown: usize,
    pub cache_hits: usize,
    pub pager: bool,
}

/// Renders pages of items into a container, reusing nodes across passes.
#[derive(Debug, Default)]
pub struct ListRenderer {
    cache: HashMap<ItemKey, NodeId>,
}

impl ListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items with a cached node.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached node reference.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Replace the contents of `container` with the pager (when there is
    /// more than one page) followed by the requested page of matching items.
    pub fn render_list<F>(
        &mut self,
        doc: &mut Document,
        container: NodeId,
        template: F,
        items: &[Item],
        state: &PaginationState,
        options: &ListOptions,
    ) -> RenderStats
    where
        F: Fn(&mut Document, &Item) -> NodeId,
    {
        doc.clear_children(container);

        let matching = items.iter().filter(|item| item.matches).count();
        let mut stats = RenderStats {
            matching,
            ..RenderStats::default()
        };

        if matching == 0 {
            if let Some(text) = &options.no_results {
                let empty = doc.create_element_with_class("p", "no-results");
                doc.set_text(empty, text);
                doc.append_child(container, empty);
            }
            debug!("list rendered with no matching items");
            return stats;
        }

        let pager = Pager::build(matching, state);
        if !pager.is_empty() {
            let nav = render_pager(doc, &pager, &options.path, &options.query, &options.labels);
            doc.append_child(container, nav);
            stats.pager = true;
        }

        for item in page_window(items, state) {
            let node = match self.cache.get(&item.key()) {
                Some(node) => {
                    stats.cache_hits += 1;
                    *node
                }
                None => {
                    let node = template(doc, item);
                    self.cache.insert(item.key(), node);
                    node
                }
            };
            doc.append_child(container, node);
            stats.shown += 1;
        }

        debug!(
            matching = stats.matching,
            shown = stats.shown,
            cache_hits = stats.cache_hits,
            page = state.page,
            "list rendered"
        );
        stats
    }
}
