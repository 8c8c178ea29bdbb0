//! HTTP route handlers.

pub mod blocks;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Every route, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(blocks::router())
        .with_state(state)
}
