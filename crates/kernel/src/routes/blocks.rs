//! Block preview endpoints.
//!
//! `GET /blocks/{name}` decorates the named block against the live feed and
//! returns its markup. The query string carries `page` and filter selections
//! exactly as a page URL would.

use axum::extract::{Path, RawQuery, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
struct BlockList {
    blocks: Vec<String>,
}

/// List configured block names.
async fn list_blocks(State(state): State<AppState>) -> Json<BlockList> {
    Json(BlockList {
        blocks: state.blocks().names(),
    })
}

/// Render one block.
async fn render_block(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Html<String>> {
    let query = query.unwrap_or_default();
    debug!(block = %name, %query, "rendering block");
    let html = state.render(&name, &query).await?;
    Ok(Html(html))
}

/// Create the block router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blocks", get(list_blocks))
        .route("/blocks/{name}", get(render_block))
}
