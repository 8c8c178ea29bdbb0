//! Placard test utilities.
//!
//! Helpers for integration testing: feed row builders, ready-made sheets
//! and assertion utilities for rendered markup.

use placard_kernel::feed::{FeedPayload, StaticFeedSource};
use serde_json::{Map, Value as JsonValue, json};

/// Create a feed row with a title and a path derived from it.
pub fn test_row(title: &str) -> TestRow {
    let slug = title.to_lowercase().replace(' ', "-");
    TestRow {
        fields: Map::new(),
    }
    .with_text("title", title)
    .with_text("path", &format!("/news/{slug}"))
}

/// A feed row builder for creating test fixtures.
#[derive(Debug, Clone, Default)]
pub struct TestRow {
    pub fields: Map<String, JsonValue>,
}

impl TestRow {
    /// Add a single field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Add a text field.
    pub fn with_text(self, name: &str, value: &str) -> Self {
        self.with_field(name, JsonValue::String(value.to_string()))
    }

    /// Set the publish date (any format the feed accepts).
    pub fn published(self, date: &str) -> Self {
        self.with_text("publishDate", date)
    }

    /// Set the event dates.
    pub fn running(self, start: &str, end: &str) -> Self {
        self.with_text("startDate", start).with_text("endDate", end)
    }

    /// Remove a field.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.remove(name);
        self
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.fields
    }
}

/// A sheet payload from rows.
pub fn feed_payload(rows: Vec<TestRow>) -> FeedPayload {
    FeedPayload::from_rows(rows.into_iter().map(TestRow::into_map).collect())
}

/// One row of a filter authoring sheet.
pub fn filter_row(name: &str, filter_type: &str, fields: &str, decoration: &str) -> TestRow {
    TestRow::default()
        .with_text("Name", name)
        .with_text("Filter Type", filter_type)
        .with_text("Filter Fields", fields)
        .with_text("Decoration", decoration)
}

/// A placeholders sheet from key/text pairs.
pub fn placeholders_payload(entries: &[(&str, &str)]) -> FeedPayload {
    feed_payload(
        entries
            .iter()
            .map(|(key, text)| TestRow::default().with_text("Key", key).with_text("Text", text))
            .collect(),
    )
}

/// `count` news rows, alternating between the "AI" and "Cloud" topics, with
/// `Story 1` the newest and prices of 10, 20, 30...
pub fn news_rows(count: usize) -> Vec<TestRow> {
    (1..=count)
        .map(|i| {
            let topic = if i % 2 == 0 { "Cloud" } else { "AI" };
            let serial = 46_000 - i64::try_from(i).unwrap_or(0);
            test_row(&format!("Story {i}"))
                .with_text("topic", topic)
                .with_field("price", json!(i * 10))
                .with_field("publishDate", json!(serial))
                .with_text("description", &format!("About story {i}."))
        })
        .collect()
}

/// An in-memory feed serving `news_rows(count)` at `source`, with a topic
/// checkbox and a price slider at `/filters.json`.
pub fn news_feed(source: &str, count: usize) -> StaticFeedSource {
    StaticFeedSource::new()
        .with_payload(source, None, feed_payload(news_rows(count)))
        .with_payload(
            "/filters.json",
            None,
            feed_payload(vec![
                filter_row("Topic", "checkbox", "topic", "AI\nCloud"),
                filter_row("Price", "slider", "price", "from ${low} to ${high}"),
            ]),
        )
}

/// Assertion helpers for rendered markup.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string not to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert how often a substring occurs.
    pub fn occurrences(haystack: &str, needle: &str, expected: usize) {
        let actual = haystack.matches(needle).count();
        assert_eq!(
            actual, expected,
            "Expected '{needle}' {expected} times, found {actual}\nActual: {haystack}"
        );
    }
}
