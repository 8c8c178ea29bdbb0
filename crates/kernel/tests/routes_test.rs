#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP tests for the preview server.

mod common;

use axum::http::StatusCode;
use placard_test_utils::assert;

use common::{TestApp, news_cards, response_json, response_text};

#[tokio::test]
async fn health_reports_block_count() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["blocks"], 3);
}

#[tokio::test]
async fn lists_configured_blocks() {
    let app = TestApp::new();
    let body = response_json(app.get("/blocks").await).await;

    assert_eq!(body["blocks"], serde_json::json!(["broken", "events", "news"]));
}

#[tokio::test]
async fn first_page_with_localized_pager() {
    let app = TestApp::new();
    let response = app.get("/blocks/news").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert_eq!(news_cards(&html), 10);
    assert::contains(&html, "<div class=\"filters\">");
    assert::contains(&html, "<a href=\"/news?page=2\">Older</a>");
    assert::not_contains(&html, "Newer");
    assert::not_contains(&html, "page=1");
}

#[tokio::test]
async fn last_page_links_back() {
    let app = TestApp::new();
    let html = response_text(app.get("/blocks/news?page=3").await).await;

    assert_eq!(news_cards(&html), 5);
    assert::contains(&html, "<span aria-current=\"page\">3</span>");
    assert::contains(&html, "<a href=\"/news?page=2\">Newer</a>");
    assert::contains(&html, "<a href=\"/news\">1</a>");
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let app = TestApp::new();
    let response = app.get("/blocks/news?page=4").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert_eq!(news_cards(&html), 0);
    assert::contains(&html, "<nav class=\"pagination\" aria-label=\"Pagination\">");
}

#[tokio::test]
async fn huge_page_number_is_empty_not_an_error() {
    let app = TestApp::new();
    let response = app.get(&format!("/blocks/news?page={}", usize::MAX)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response_text(response).await;
    assert_eq!(news_cards(&html), 0);
    assert::contains(&html, "<a href=\"/news?page=3\">Newer</a>");
}

#[tokio::test]
async fn checkbox_selection_from_query() {
    let app = TestApp::new();
    let html = response_text(app.get("/blocks/news?topic=Cloud").await).await;

    assert_eq!(news_cards(&html), 10);
    assert::contains(&html, "Story 2<");
    assert::not_contains(&html, "Story 1<");
    assert::contains(&html, "<a href=\"/news?topic=Cloud&amp;page=2\">2</a>");
    assert::contains(&html, "value=\"Cloud\" checked");
}

#[tokio::test]
async fn slider_range_from_query() {
    let app = TestApp::new();
    let html = response_text(app.get("/blocks/news?price=0-25").await).await;

    assert_eq!(news_cards(&html), 2);
    assert::contains(&html, "from $10 to $25");
    assert::not_contains(&html, "class=\"pagination\"");
}

#[tokio::test]
async fn no_match_shows_fallback() {
    let app = TestApp::new();
    let html = response_text(app.get("/blocks/news?topic=Cloud&price=10-10").await).await;

    assert_eq!(news_cards(&html), 0);
    assert::contains(&html, "<p class=\"no-results\">No stories match.</p>");
}

#[tokio::test]
async fn events_block_renders_without_filters() {
    let app = TestApp::new();
    let html = response_text(app.get("/blocks/events").await).await;

    assert::occurrences(&html, "<article class=\"event-card\">", 3);
    assert::not_contains(&html, "class=\"filters\"");
    assert::contains(&html, "June 10-12, 2026");
}

#[tokio::test]
async fn unknown_block_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/blocks/gallery").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_feed_is_bad_gateway() {
    let app = TestApp::new();
    let response = app.get("/blocks/broken").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
