#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! The [`TestApp`] runs the real routes and block pipeline over an
//! in-memory feed, so no site needs to be reachable.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use placard_kernel::feed::StaticFeedSource;
use placard_kernel::{AppState, BlocksConfig, Config, routes};
use placard_test_utils::{feed_payload, news_feed, placeholders_payload, test_row};

pub const NEWS_SOURCE: &str = "/news/query-index.json";
pub const EVENTS_SOURCE: &str = "/events/query-index.json";

pub const BLOCKS: &str = r#"
[blocks.news]
kind = "news"
source = "/news/query-index.json"
filters = "/filters.json"
limit = 10
no_results = "No stories match."

[blocks.events]
kind = "events"
source = "/events/query-index.json"
mode = "all"

[blocks.broken]
kind = "news"
source = "/missing.json"
"#;

/// The in-memory site: 25 news stories with filters, three events and a
/// placeholders sheet.
pub fn test_feed() -> StaticFeedSource {
    news_feed(NEWS_SOURCE, 25)
        .with_payload(
            EVENTS_SOURCE,
            None,
            feed_payload(vec![
                test_row("Meetup").running("2026-05-01", "2026-05-01"),
                test_row("Summit").running("2026-06-10", "2026-06-12"),
                test_row("Undated"),
            ]),
        )
        .with_payload(
            "/placeholders.json",
            None,
            placeholders_payload(&[("Previous", "Newer"), ("Next", "Older")]),
        )
}

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::from_lookup(|_| None).expect("default config");
        let blocks = BlocksConfig::from_toml_str(BLOCKS).expect("blocks config");
        let state = AppState::with_parts(config, blocks, Arc::new(test_feed()));
        Self {
            router: routes::app(state.clone()),
            state,
        }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}

/// Number of rendered news cards in `html`.
pub fn news_cards(html: &str) -> usize {
    html.matches("<article class=\"news-card\">").count()
}
