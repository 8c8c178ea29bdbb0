//! List blocks: a feed-backed list with optional filters and pagination.
//!
//! Decoration fetches the items, prepares them for the block kind, builds a
//! filterable element pool (one element per item, carrying `data-<field>`
//! for every filter field), builds the filter controls and renders the first
//! page. Every `RenderFilters` event runs the filter engine and then
//! re-renders the list from the pool's verdicts.

mod config;

pub use config::{BlockConfig, BlockKind, BlocksConfig, DEFAULT_LIMIT};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::dom::{Document, HIDDEN_CLASS, NodeId};
use crate::error::BlockResult;
use crate::events::{BlockEvent, EventBus, FilterInput};
use crate::feed::{FeedSource, Item};
use crate::filter::{FilterConfigRow, FilterHost, FilterState, decorate_filters, events_from_query};
use crate::i18n::Placeholders;
use crate::list::{ItemTemplate, ListOptions, ListRenderer, RenderStats};
use crate::pagination::{PaginationState, canonical_query, page_window, query_with_page};

/// Everything the block's listeners operate on.
pub struct ListState {
    doc: Document,
    root: NodeId,
    filter_container: NodeId,
    list_container: NodeId,
    filters: FilterState,
    items: Vec<Item>,
    /// Pool element per item, index-aligned with `items`.
    index_nodes: Vec<NodeId>,
    index_fields: Vec<String>,
    renderer: ListRenderer,
    template: ItemTemplate,
    pagination: PaginationState,
    options: ListOptions,
    last_render: RenderStats,
}

impl FilterHost for ListState {
    fn filter_parts(&mut self) -> (&mut Document, &mut FilterState) {
        (&mut self.doc, &mut self.filters)
    }
}

impl ListState {
    fn sync_matches(&mut self) {
        for (item, node) in self.items.iter_mut().zip(&self.index_nodes) {
            item.matches = !self.doc.has_class(*node, HIDDEN_CLASS);
        }
    }

    fn render(&mut self) {
        self.last_render = self.renderer.render_list(
            &mut self.doc,
            self.list_container,
            self.template,
            &self.items,
            &self.pagination,
            &self.options,
        );
    }

    fn rebuild_index(&mut self) {
        let root = self.filters.index_root;
        self.doc.clear_children(root);
        self.index_nodes = self
            .items
            .iter()
            .map(|item| {
                let el = self.doc.create_element("li");
                for field in &self.index_fields {
                    if let Some(value) = field_text(item, field) {
                        self.doc.set_data(el, field, value.trim());
                    }
                }
                self.doc.append_child(root, el);
                el
            })
            .collect();
    }
}

/// Item field by exact name, falling back to a case-insensitive match.
fn field_text(item: &Item, field: &str) -> Option<String> {
    if let Some(text) = item.text(field) {
        return Some(text);
    }
    item.fields()
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(field))
        .and_then(|(_, v)| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
}

/// Every field named by the filter rows.
fn filter_fields(rows: &[FilterConfigRow]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for row in rows {
        for field in row.filter_fields.split(',').map(str::trim) {
            if !field.is_empty() && !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
    }
    fields
}

/// Fetch and prepare the items for `config`.
pub async fn fetch_items(
    config: &BlockConfig,
    feed: &dyn FeedSource,
    today: NaiveDate,
) -> BlockResult<Vec<Item>> {
    let items = feed.fetch_items(&config.feed_request()).await?;
    Ok(config.kind.prepare(items, today, config.mode))
}

/// Fetch the filter authoring rows for `config`.
///
/// A block without a filter sheet, or whose sheet cannot be loaded, has no
/// filters.
pub async fn load_filter_rows(config: &BlockConfig, feed: &dyn FeedSource) -> Vec<FilterConfigRow> {
    let Some(request) = config.filters_request() else {
        return Vec::new();
    };
    match feed.fetch(&request).await {
        Ok(payload) => payload
            .data
            .iter()
            .filter_map(FilterConfigRow::from_row)
            .collect(),
        Err(e) => {
            warn!(block = %config.name, error = %e, "filter sheet unavailable");
            Vec::new()
        }
    }
}

/// Build the filter controls for `rows` and subscribe the list re-render
/// after them. Returns the bus and the number of filters built.
fn wire_listeners(state: &mut ListState, rows: &[FilterConfigRow]) -> (EventBus<ListState, BlockEvent>, usize) {
    let container = state.filter_container;
    let mut bus = EventBus::new();
    let built = decorate_filters(state, &mut bus, Some(container), rows);
    if built == 0 {
        state.doc.detach(container);
    }
    bus.subscribe("list-render", |state: &mut ListState, event, _| {
        if *event == BlockEvent::RenderFilters {
            state.sync_matches();
            state.render();
        }
    });
    (bus, built)
}

/// A decorated list block.
pub struct ListBlock {
    config: BlockConfig,
    today: NaiveDate,
    rows: Vec<FilterConfigRow>,
    state: ListState,
    bus: EventBus<ListState, BlockEvent>,
}

impl ListBlock {
    /// Fetch the items and build the block around them.
    pub async fn decorate(
        config: &BlockConfig,
        feed: &dyn FeedSource,
        rows: &[FilterConfigRow],
        placeholders: &Placeholders,
        today: NaiveDate,
    ) -> BlockResult<Self> {
        let items = fetch_items(config, feed, today).await?;
        Ok(Self::with_items(config, items, rows, placeholders, today))
    }

    /// Build the block around already prepared items.
    pub fn with_items(
        config: &BlockConfig,
        items: Vec<Item>,
        rows: &[FilterConfigRow],
        placeholders: &Placeholders,
        today: NaiveDate,
    ) -> Self {
        let mut doc = Document::new();
        let root = doc.create_element_with_class("div", config.kind.class_name());
        doc.add_class(root, "list-block");
        doc.set_data(root, "block-name", &config.name);

        let filter_container = doc.create_element_with_class("div", "filters");
        doc.append_child(root, filter_container);
        let list_container = doc.create_element_with_class("div", "list");
        doc.append_child(root, list_container);
        let index_root = doc.create_element_with_class("ul", "list-index");

        let no_results = config
            .no_results
            .clone()
            .or_else(|| placeholders.lookup("noResults").map(str::to_string));

        let mut state = ListState {
            doc,
            root,
            filter_container,
            list_container,
            filters: FilterState::new(index_root).with_labels(placeholders.filter_labels()),
            items,
            index_nodes: Vec::new(),
            index_fields: filter_fields(rows),
            renderer: ListRenderer::new(),
            template: config.kind.template(),
            pagination: PaginationState::new(1, config.limit),
            options: ListOptions {
                path: config.page_path(),
                query: String::new(),
                no_results,
                labels: placeholders.pager_labels(),
            },
            last_render: RenderStats::default(),
        };
        state.rebuild_index();

        let (bus, built) = wire_listeners(&mut state, rows);

        let mut block = Self {
            config: config.clone(),
            today,
            rows: rows.to_vec(),
            state,
            bus,
        };
        block.dispatch(BlockEvent::RenderFilters);
        info!(
            block = %block.config.name,
            items = block.state.items.len(),
            filters = built,
            "list block decorated"
        );
        block
    }

    /// Run an event through the block's listeners.
    pub fn dispatch(&mut self, event: BlockEvent) -> usize {
        self.bus.dispatch(&mut self.state, event)
    }

    pub fn toggle_option(&mut self, filter: &str, option: &str, checked: bool) {
        self.change(
            filter,
            FilterInput::Toggle {
                option: option.to_string(),
                checked,
            },
        );
    }

    /// Set a dropdown or text filter. An empty value clears it.
    pub fn set_value(&mut self, filter: &str, value: &str) {
        self.change(filter, FilterInput::Value(value.to_string()));
    }

    /// Move a slider without committing.
    pub fn slide(&mut self, filter: &str, low: f64, high: f64) {
        self.dispatch(BlockEvent::Input {
            filter: filter.to_string(),
            input: FilterInput::Range { low, high },
        });
    }

    /// Release a slider, committing its current position.
    pub fn release(&mut self, filter: &str) {
        self.change(filter, FilterInput::Release);
    }

    /// Move and commit a slider in one step.
    pub fn set_range(&mut self, filter: &str, low: f64, high: f64) {
        self.change(filter, FilterInput::Range { low, high });
    }

    fn change(&mut self, filter: &str, input: FilterInput) {
        self.dispatch(BlockEvent::Change {
            filter: filter.to_string(),
            input,
        });
    }

    /// Show `page` of the current result set.
    pub fn go_to_page(&mut self, page: usize) {
        self.state.pagination = PaginationState::new(page, self.config.limit);
        self.state.options.query = query_with_page(&self.state.options.query, page);
        self.dispatch(BlockEvent::RenderFilters);
    }

    /// Apply the page and filter selections carried by a URL query string.
    pub fn apply_query(&mut self, query: &str) {
        self.state.pagination = PaginationState::from_query(query, self.config.limit);
        self.state.options.query = canonical_query(query);
        let events = events_from_query(&self.state.filters.filters, query);
        debug!(block = %self.config.name, events = events.len(), "applying query");
        for event in events {
            self.dispatch(event);
        }
        self.dispatch(BlockEvent::RenderFilters);
    }

    /// Replace the items with a fresh load and re-render with the current
    /// filter selections.
    ///
    /// The controls are rebuilt against the new pool, so observed options and
    /// slider bounds follow the new items; committed selections are replayed
    /// onto them. Loads are not sequenced: whichever set of items is applied
    /// last wins.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        let selections = self.state.filters.selection_events();

        self.state.items = items;
        self.state.renderer.clear_cache();
        self.state.rebuild_index();

        self.state.doc.clear_children(self.state.filter_container);
        self.state.filters.reset();
        let (bus, _) = wire_listeners(&mut self.state, &self.rows);
        self.bus = bus;

        debug!(block = %self.config.name, selections = selections.len(), "items replaced");
        for event in selections {
            self.dispatch(event);
        }
        self.dispatch(BlockEvent::RenderFilters);
    }

    /// Refetch the items and re-render.
    pub async fn reload(&mut self, feed: &dyn FeedSource) -> BlockResult<()> {
        let items = fetch_items(&self.config, feed, self.today).await?;
        self.replace_items(items);
        Ok(())
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.state.doc
    }

    pub fn root(&self) -> NodeId {
        self.state.root
    }

    pub fn list_container(&self) -> NodeId {
        self.state.list_container
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn pagination(&self) -> PaginationState {
        self.state.pagination
    }

    pub fn last_render(&self) -> RenderStats {
        self.state.last_render
    }

    /// Items on the page currently shown.
    pub fn page_items(&self) -> Vec<&Item> {
        page_window(&self.state.items, &self.state.pagination)
    }

    /// Serialized block markup.
    pub fn to_html(&self) -> String {
        self.state.doc.to_html(self.state.root)
    }
}

/// Decorate the block `config` names, apply `query` and return its markup.
pub async fn render_block(
    config: &BlockConfig,
    feed: &dyn FeedSource,
    placeholders: &Placeholders,
    query: &str,
    today: NaiveDate,
) -> BlockResult<String> {
    let rows = load_filter_rows(config, feed).await;
    let mut block = ListBlock::decorate(config, feed, &rows, placeholders, today).await?;
    block.apply_query(query);
    Ok(block.to_html())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::filter::SliderPhase;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn news(count: usize) -> Vec<Item> {
        (1..=count)
            .map(|i| {
                let topic = if i % 2 == 0 { "Cloud" } else { "AI" };
                Item::new(
                    json!({"title": format!("Story {i}"), "topic": topic, "Price": i * 10})
                        .as_object()
                        .cloned()
                        .unwrap(),
                )
            })
            .collect()
    }

    fn block(count: usize, rows: &[FilterConfigRow]) -> ListBlock {
        let config = BlockConfig::new("news", BlockKind::News).with_limit(2);
        ListBlock::with_items(&config, news(count), rows, &Placeholders::default(), today())
    }

    fn titles(block: &ListBlock) -> Vec<String> {
        block
            .page_items()
            .iter()
            .map(|i| i.text_or_empty("title"))
            .collect()
    }

    #[test]
    fn block_without_filters_has_no_filter_container() {
        let block = block(3, &[]);
        let html = block.to_html();

        assert!(!html.contains("class=\"filters\""));
        assert!(html.starts_with("<div class=\"news list-block\" data-block-name=\"news\"><div class=\"list\"><nav class=\"pagination\""));
        assert_eq!(block.last_render().shown, 2);
    }

    #[test]
    fn index_elements_carry_filter_fields() {
        let rows = vec![
            FilterConfigRow::new("Topic", "checkbox", "topic", ""),
            FilterConfigRow::new("Price", "slider", "price", ""),
        ];
        let block = block(2, &rows);
        let doc = block.document();
        let pool = doc.children(block.filters().index_root);

        assert_eq!(pool.len(), 2);
        assert_eq!(doc.data(pool[0], "topic"), Some("AI"));
        assert_eq!(doc.data(pool[1], "price"), Some("20"));
    }

    #[test]
    fn filter_change_rerenders_list() {
        let rows = vec![FilterConfigRow::new("Topic", "checkbox", "topic", "")];
        let mut block = block(5, &rows);

        block.toggle_option("Topic", "Cloud", true);

        assert_eq!(block.last_render().matching, 2);
        assert_eq!(titles(&block), vec!["Story 2", "Story 4"]);
        assert!(!block.last_render().pager);
    }

    #[test]
    fn query_selects_filters_and_page() {
        let rows = vec![FilterConfigRow::new("Topic", "checkbox", "topic", "")];
        let mut block = block(5, &rows);

        block.apply_query("topic=AI&page=2");

        assert_eq!(block.pagination().page, 2);
        assert_eq!(titles(&block), vec!["Story 5"]);
        assert!(block.to_html().contains("href=\"/news?topic=AI\""));
    }

    #[test]
    fn go_to_page_updates_links() {
        let mut block = block(5, &[]);
        block.go_to_page(3);

        assert_eq!(titles(&block), vec!["Story 5"]);
        assert!(block.to_html().contains("<a href=\"/news?page=2\">Previous</a>"));
    }

    #[test]
    fn replacing_items_renders_fresh_nodes() {
        let mut block = block(1, &[]);
        let before = block.document().children(block.list_container()).to_vec();

        block.replace_items(news(1));
        let after = block.document().children(block.list_container()).to_vec();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
        assert_ne!(before, after);
    }

    fn rows_of(records: &[(&str, &str, u32)]) -> Vec<Item> {
        records
            .iter()
            .map(|(title, topic, price)| {
                Item::new(
                    json!({"title": title, "topic": topic, "price": price})
                        .as_object()
                        .cloned()
                        .unwrap(),
                )
            })
            .collect()
    }

    fn priced_block(records: &[(&str, &str, u32)]) -> ListBlock {
        let rows = vec![
            FilterConfigRow::new("Topic", "checkbox", "topic", ""),
            FilterConfigRow::new("Price", "slider", "price", ""),
        ];
        let config = BlockConfig::new("news", BlockKind::News).with_limit(10);
        ListBlock::with_items(&config, rows_of(records), &rows, &Placeholders::default(), today())
    }

    #[test]
    fn reload_remounts_untouched_slider_on_new_bounds() {
        let mut block = priced_block(&[("A", "AI", 10), ("B", "AI", 20)]);

        block.replace_items(rows_of(&[("A", "AI", 10), ("B", "AI", 20), ("C", "AI", 500)]));

        assert_eq!(block.last_render().matching, 3);
        let slider = block.filters().slider("Price").unwrap();
        assert_eq!((slider.min, slider.max), (10.0, 500.0));
        assert!(block.to_html().contains("from 10 to 500"));
    }

    #[test]
    fn reload_keeps_committed_selections() {
        let mut block = priced_block(&[("A", "AI", 10), ("B", "Cloud", 20), ("C", "AI", 40)]);
        block.toggle_option("Topic", "AI", true);
        block.set_range("Price", 30.0, 40.0);
        assert_eq!(titles(&block), vec!["C"]);

        block.replace_items(rows_of(&[
            ("A", "AI", 10),
            ("C", "AI", 40),
            ("D", "AI", 35),
            ("E", "Cloud", 35),
        ]));

        assert_eq!(titles(&block), vec!["C", "D"]);
        assert_eq!(block.filters().slider("Price").unwrap().phase, SliderPhase::Committed);
        assert!(block.to_html().contains("value=\"AI\" checked"));
    }

    #[test]
    fn reload_refreshes_observed_options() {
        let mut block = priced_block(&[("A", "AI", 10)]);
        assert!(!block.to_html().contains("value=\"Cloud\""));

        block.replace_items(rows_of(&[("A", "AI", 10), ("B", "Cloud", 20)]));
        block.toggle_option("Topic", "Cloud", true);

        assert_eq!(titles(&block), vec!["B"]);
    }

    #[test]
    fn padded_values_match_their_own_option() {
        let mut block = priced_block(&[("A", "AI ", 10), ("B", " Cloud", 20)]);
        let pool = block.document().children(block.filters().index_root).to_vec();
        assert_eq!(block.document().data(pool[0], "topic"), Some("AI"));

        block.toggle_option("Topic", "AI", true);

        assert_eq!(titles(&block), vec!["A"]);
    }
}
